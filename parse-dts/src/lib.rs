use ast::node::Node;
use ast::stmt::TopLevel;
use error::SyntaxResult;
use lex::Lexer;
use parse::Parser;

pub mod ast;
pub mod char;
pub mod directive;
pub mod error;
pub mod lex;
pub mod loc;
pub mod parse;
pub mod token;

/// Parses the text of a TypeScript declaration file.
///
/// The parser only keeps the structure needed to find declared names: statements, class and
/// type members, object literals and the types nested inside them. Function bodies are skipped.
///
/// # Examples
///
/// ```
/// use parse_dts::ast::stmt::Stmt;
/// use parse_dts::parse;
///
/// let top_level = parse("declare const version: string;").unwrap();
/// let Stmt::Var(var) = top_level.stx.body[0].stx.as_ref() else {
///   panic!("expected a variable statement");
/// };
/// assert!(var.declare);
/// ```
pub fn parse(source: &str) -> SyntaxResult<Node<TopLevel>> {
  let lexer = Lexer::new(source);
  let mut parser = Parser::new(lexer);
  parser.parse_top_level()
}
