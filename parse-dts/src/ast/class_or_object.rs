use super::expr::Expr;
use super::node::Node;
use super::type_expr::IndexSignature;
use super::type_expr::Signature;
use super::type_expr::TypeExpr;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum PropertyKey {
  /// Also covers keywords used as names, like `default` or `delete`.
  Ident(String),
  String(String),
  Number(String),
  Private(String),
  /// `[expr]`; the expression is not kept.
  Computed,
}

impl PropertyKey {
  pub fn ident(&self) -> Option<&str> {
    match self {
      PropertyKey::Ident(name) => Some(name),
      _ => None,
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AccessorKind {
  Get,
  Set,
}

#[derive(Debug, Serialize)]
pub struct ClassProperty {
  pub declare: bool,
  pub static_: bool,
  pub key: Node<PropertyKey>,
  pub type_annotation: Option<Node<TypeExpr>>,
  pub initializer: Option<Node<Expr>>,
}

#[derive(Debug, Serialize)]
pub struct ClassMethod {
  pub declare: bool,
  pub static_: bool,
  pub key: Node<PropertyKey>,
  pub signature: Node<Signature>,
}

#[derive(Debug, Serialize)]
pub struct ClassAccessor {
  pub declare: bool,
  pub static_: bool,
  pub kind: AccessorKind,
  pub key: Node<PropertyKey>,
  pub signature: Node<Signature>,
}

#[derive(Debug, Serialize)]
pub enum ClassMember {
  Accessor(ClassAccessor),
  Constructor(Node<Signature>),
  Index(IndexSignature),
  Method(ClassMethod),
  Property(ClassProperty),
  /// `static { ... }`
  StaticBlock,
}

#[derive(Debug, Serialize)]
pub enum ObjectMember {
  Accessor {
    kind: AccessorKind,
    key: Node<PropertyKey>,
    signature: Node<Signature>,
  },
  Method {
    key: Node<PropertyKey>,
    signature: Node<Signature>,
  },
  /// `key: value`
  Property {
    key: Node<PropertyKey>,
    value: Node<Expr>,
  },
  /// `key` or `key = default`
  Shorthand {
    key: Node<PropertyKey>,
    initializer: Option<Node<Expr>>,
  },
  Spread(Node<Expr>),
}
