use super::class_or_object::ObjectMember;
use super::node::Node;
use super::stmt::ClassDecl;
use super::type_expr::Signature;
use serde::Serialize;

/// An expression, skimmed the same way as [`TypeExpr`](super::type_expr::TypeExpr): only object
/// literals, class expressions and function expressions are kept.
#[derive(Debug, Serialize)]
pub enum Expr {
  Class(ClassDecl),
  Compound(Vec<Node<Expr>>),
  /// `function (a) {}`; the body is skipped.
  Function(Node<Signature>),
  Object(Vec<Node<ObjectMember>>),
}
