use super::class_or_object::ClassMember;
use super::class_or_object::PropertyKey;
use super::expr::Expr;
use super::node::Node;
use super::type_expr::Signature;
use super::type_expr::TypeExpr;
use super::type_expr::TypeMember;
use super::type_expr::TypeParameter;
use crate::directive::ReferenceDirective;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TopLevel {
  pub references: Vec<ReferenceDirective>,
  pub body: Vec<Node<Stmt>>,
}

#[derive(Debug, Serialize)]
pub struct Ident {
  pub name: String,
}

#[derive(Debug, Serialize)]
pub enum Stmt {
  Block(Vec<Node<Stmt>>),
  Class(ClassDecl),
  Empty,
  Enum(EnumDecl),
  Export(ExportDecl),
  /// `export = expr;` or `export default expr;`
  ExportAssignment(Node<Expr>),
  Expr(Node<Expr>),
  Function(FunctionDecl),
  Global(GlobalDecl),
  Import(ImportDecl),
  Interface(InterfaceDecl),
  Module(ModuleDecl),
  Namespace(NamespaceDecl),
  /// Statements that never declare anything visible, such as `export as namespace X;`,
  /// `import x = require("y");` or control flow.
  Other,
  TypeAlias(TypeAliasDecl),
  Var(VarStmt),
}

#[derive(Debug, Serialize)]
pub enum ModuleSpecifier {
  Literal(String),
  /// Anything other than a string literal, e.g. `export * from someIdentifier`.
  NonLiteral,
}

#[derive(Debug, Serialize)]
pub struct ImportDecl {
  pub type_only: bool,
  pub specifier: Node<ModuleSpecifier>,
}

#[derive(Debug, Serialize)]
pub struct ExportDecl {
  pub type_only: bool,
  /// Absent for local re-exports like `export { a, b };`.
  pub specifier: Option<Node<ModuleSpecifier>>,
}

#[derive(Debug, Serialize)]
pub enum VarDeclMode {
  Const,
  Let,
  Var,
}

#[derive(Debug, Serialize)]
pub enum BindingName {
  Ident(String),
  /// `{ a, b }` or `[a, b]`; the pattern's contents are not kept.
  Pattern,
}

#[derive(Debug, Serialize)]
pub struct VarDeclarator {
  pub name: Node<BindingName>,
  pub type_annotation: Option<Node<TypeExpr>>,
  pub initializer: Option<Node<Expr>>,
}

#[derive(Debug, Serialize)]
pub struct VarStmt {
  pub export: bool,
  pub declare: bool,
  pub mode: VarDeclMode,
  pub declarators: Vec<Node<VarDeclarator>>,
}

#[derive(Debug, Serialize)]
pub struct FunctionDecl {
  pub export: bool,
  pub export_default: bool,
  pub declare: bool,
  // Only absent for `export default function () {}`.
  pub name: Option<Node<Ident>>,
  pub signature: Node<Signature>,
}

#[derive(Debug, Serialize)]
pub struct ClassDecl {
  pub export: bool,
  pub export_default: bool,
  pub declare: bool,
  pub abstract_: bool,
  pub name: Option<Node<Ident>>,
  pub type_parameters: Vec<Node<TypeParameter>>,
  pub extends: Option<Node<TypeExpr>>,
  pub implements: Vec<Node<TypeExpr>>,
  pub members: Vec<Node<ClassMember>>,
}

#[derive(Debug, Serialize)]
pub struct InterfaceDecl {
  pub export: bool,
  pub declare: bool,
  pub name: Node<Ident>,
  pub type_parameters: Vec<Node<TypeParameter>>,
  pub extends: Vec<Node<TypeExpr>>,
  pub members: Vec<Node<TypeMember>>,
}

#[derive(Debug, Serialize)]
pub struct TypeAliasDecl {
  pub export: bool,
  pub declare: bool,
  pub name: Node<Ident>,
  pub type_parameters: Vec<Node<TypeParameter>>,
  pub type_expr: Node<TypeExpr>,
}

#[derive(Debug, Serialize)]
pub struct EnumMember {
  pub key: Node<PropertyKey>,
  pub initializer: Option<Node<Expr>>,
}

#[derive(Debug, Serialize)]
pub struct EnumDecl {
  pub export: bool,
  pub declare: bool,
  pub const_: bool,
  pub name: Node<Ident>,
  pub members: Vec<Node<EnumMember>>,
}

#[derive(Debug, Serialize)]
pub enum NamespaceBody {
  Block(Vec<Node<Stmt>>),
  /// The rest of a dotted name: `namespace A.B {}` is `A` with a body of namespace `B`.
  Namespace(Node<NamespaceDecl>),
}

/// A declaration using the `namespace` keyword.
#[derive(Debug, Serialize)]
pub struct NamespaceDecl {
  pub export: bool,
  pub declare: bool,
  pub name: Node<Ident>,
  pub body: NamespaceBody,
}

#[derive(Debug, Serialize)]
pub enum ModuleName {
  Ident(String),
  String(String),
}

/// A declaration using the `module` keyword, e.g. `declare module "fs" {}`.
#[derive(Debug, Serialize)]
pub struct ModuleDecl {
  pub export: bool,
  pub declare: bool,
  pub name: Node<ModuleName>,
  // Absent for shorthand ambient modules like `declare module "foo";`.
  pub body: Option<Vec<Node<Stmt>>>,
}

/// `declare global { ... }`
#[derive(Debug, Serialize)]
pub struct GlobalDecl {
  pub body: Vec<Node<Stmt>>,
}
