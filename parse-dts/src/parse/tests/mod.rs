
use super::Parser;
use crate::ast::node::Node;
use crate::ast::stmt::Stmt;
use crate::ast::stmt::TopLevel;
use crate::error::SyntaxErrorType;
use crate::lex::Lexer;
use crate::loc::Loc;
use crate::token::TT;

pub(super) fn parse_body(source: &str) -> Vec<Node<Stmt>> {
  let top_level = crate::parse(source).unwrap();
  let TopLevel { body, .. } = *top_level.stx;
  body
}

#[test]
fn test_parser() {
  let mut p = Parser::new(Lexer::new("declare const x: string;"));
  let cp = p.checkpoint();
  assert_eq!(p.peek().typ, TT::KeywordDeclare);
  assert_eq!(p.peek_n(2).typ, TT::Identifier);

  assert_eq!(p.consume().typ, TT::KeywordDeclare);
  assert_eq!(p.next_tok_i, 1);
  assert!(p.consume_if(TT::KeywordConst).is_match());
  assert!(!p.consume_if(TT::KeywordConst).is_match());
  assert_eq!(p.since_checkpoint(&cp), Loc(0, 13));

  p.restore_checkpoint(cp);
  assert_eq!(p.next_tok_i, 0);

  // Consuming never moves past EOF.
  for _ in 0..10 {
    p.consume();
  }
  assert_eq!(p.peek().typ, TT::EOF);
  assert_eq!(p.peek_n(5).typ, TT::EOF);
}

#[test]
fn skip_balanced_consumes_nested_brackets() {
  let mut p = Parser::new(Lexer::new("{ a(b[c]) { } } d"));
  assert_eq!(p.skip_balanced().unwrap(), Loc(0, 15));
  assert_eq!(p.peek().typ, TT::Identifier);

  let mut p = Parser::new(Lexer::new("{ a"));
  let err = p.skip_balanced().unwrap_err();
  assert_eq!(err.typ, SyntaxErrorType::UnexpectedEnd);
  assert_eq!(p.peek().typ, TT::EOF);
}

#[test]
fn reports_syntax_errors() {
  let err = crate::parse("declare const = 1;").unwrap_err();
  assert_eq!(err.typ, SyntaxErrorType::ExpectedSyntax("binding name"));

  let err = crate::parse("interface A {").unwrap_err();
  assert_eq!(
    err.typ,
    SyntaxErrorType::RequiredTokenNotFound(TT::BraceClose)
  );

  let err = crate::parse(")").unwrap_err();
  assert_eq!(err.typ, SyntaxErrorType::ExpectedSyntax("statement"));
}

#[test]
fn collects_reference_directives() {
  let source = "/// <reference path=\"./other.d.ts\" />\ndeclare const a: number;";
  let top_level = crate::parse(source).unwrap();
  assert_eq!(top_level.stx.references.len(), 1);
  assert_eq!(top_level.stx.references[0].value(source), "./other.d.ts");
  assert_eq!(top_level.stx.body.len(), 1);
}

#[test]
fn serializes_ast() {
  let top_level = crate::parse("declare var x: { a: string };").unwrap();
  let json = serde_json::to_value(&top_level).unwrap();
  assert_eq!(json["body"][0]["Var"]["declare"], true);
  assert_eq!(
    json["body"][0]["Var"]["declarators"][0]["name"]["Ident"],
    "x"
  );
}
