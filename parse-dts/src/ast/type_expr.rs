use super::class_or_object::AccessorKind;
use super::class_or_object::PropertyKey;
use super::expr::Expr;
use super::node::Node;
use super::stmt::BindingName;
use serde::Serialize;

/// A type, kept only as deep as needed to find member names.
///
/// Type references, keywords, literals and operators are not represented; a type like
/// `Array<{ a: string }> | null` is a `Compound` containing the one nested type literal.
#[derive(Debug, Serialize)]
pub enum TypeExpr {
  /// `(a: A) => B` or `new (a: A) => B`.
  Function(Node<Signature>),
  /// `{ a: string; b(): void }`
  Literal(Vec<Node<TypeMember>>),
  /// `{ readonly [K in keyof T]?: T[K] }`
  Mapped(MappedType),
  /// Any other type, with the nested structured types it contains in source order.
  Compound(Vec<Node<TypeExpr>>),
}

#[derive(Debug, Serialize)]
pub struct MappedType {
  pub constraint: Node<TypeExpr>,
  pub value: Option<Node<TypeExpr>>,
}

#[derive(Debug, Serialize)]
pub struct TypeParameter {
  pub name: String,
  pub constraint: Option<Node<TypeExpr>>,
  pub default: Option<Node<TypeExpr>>,
}

#[derive(Debug, Serialize)]
pub struct Param {
  pub rest: bool,
  pub name: Node<BindingName>,
  pub optional: bool,
  pub type_annotation: Option<Node<TypeExpr>>,
  pub initializer: Option<Node<Expr>>,
}

/// Parameters and return type of anything callable: functions, methods, accessors, call and
/// construct signatures, and function types.
#[derive(Debug, Serialize)]
pub struct Signature {
  pub type_parameters: Vec<Node<TypeParameter>>,
  pub params: Vec<Node<Param>>,
  pub return_type: Option<Node<TypeExpr>>,
}

/// `[key: string]: T`
#[derive(Debug, Serialize)]
pub struct IndexSignature {
  pub parameter_type: Node<TypeExpr>,
  pub type_annotation: Option<Node<TypeExpr>>,
}

#[derive(Debug, Serialize)]
pub struct PropertySignature {
  pub readonly: bool,
  pub key: Node<PropertyKey>,
  pub optional: bool,
  pub type_annotation: Option<Node<TypeExpr>>,
}

#[derive(Debug, Serialize)]
pub struct MethodSignature {
  pub key: Node<PropertyKey>,
  pub optional: bool,
  pub signature: Node<Signature>,
}

#[derive(Debug, Serialize)]
pub struct AccessorSignature {
  pub kind: AccessorKind,
  pub key: Node<PropertyKey>,
  pub signature: Node<Signature>,
}

/// A member of an interface or type literal.
#[derive(Debug, Serialize)]
pub enum TypeMember {
  Accessor(AccessorSignature),
  Call(Node<Signature>),
  Construct(Node<Signature>),
  Index(IndexSignature),
  Method(MethodSignature),
  Property(PropertySignature),
}
