use crate::lex::lex_next;
use crate::lex::Lexer;
use crate::token::TT;
use crate::token::TT::*;

fn check<const N: usize>(code: &str, expecteds: [TT; N]) {
  let mut lexer = Lexer::new(code);
  for expected in expecteds {
    let t = lex_next(&mut lexer);
    assert_eq!(t.typ, expected, "in {:?}", code);
  }
  let t = lex_next(&mut lexer);
  assert_eq!(EOF, t.typ);
}

#[test]
fn test_lex_keywords() {
  check("class", [KeywordClass]);
  check("instanceof", [KeywordInstanceof]);
  check("declare namespace", [KeywordDeclare, KeywordNamespace]);
  check("classy declared", [Identifier, Identifier]);
}

#[test]
fn test_lex_identifiers() {
  check("h929", [Identifier]);
  check("$_jQuery", [Identifier]);
  check("caf\u{e9}", [Identifier]);
  check("\\u0061b", [Identifier]);
  check("\\u{61}b", [Identifier]);
  check("\\x", [Invalid, Identifier]);
}

#[test]
fn test_lex_literal_numbers() {
  check("1", [LiteralNumber]);
  check("929", [LiteralNumber]);
  check(".929", [LiteralNumber]);
  check(". 929", [Dot, LiteralNumber]);
  check(". 929.2.", [Dot, LiteralNumber, Dot]);
  check(".929.2..", [LiteralNumber, LiteralNumber, Dot, Dot]);
  check("1e+10 1E-3", [LiteralNumber, LiteralNumber]);
  check("0x1e+1", [LiteralNumber, Plus, LiteralNumber]);
  check("1_000n 0b1010 0o17", [LiteralNumber, LiteralNumber, LiteralNumber]);
}

#[test]
fn test_lex_literal_strings() {
  check("'hello world'", [LiteralString]);
  check("\"it's\"", [LiteralString]);
  check("'a\\'b'", [LiteralString]);
  check("'hello world\n'", [Invalid, Invalid]);
}

#[test]
fn test_lex_templates() {
  check("`plain`", [LiteralTemplate]);
  check("`a${b}c`", [LiteralTemplate]);
  check("`a${ { x: '}' } }c` + 1", [LiteralTemplate, Plus, LiteralNumber]);
  check("`outer ${`inner ${x}`}`", [LiteralTemplate]);
  check("`never closed", [Invalid]);
}

#[test]
fn test_lex_punctuators() {
  check("=>", [EqualsChevronRight]);
  check("...rest", [DotDotDot, Identifier]);
  check("Map<K, Set<V>>", [
    Identifier,
    ChevronLeft,
    Identifier,
    Comma,
    Identifier,
    ChevronLeft,
    Identifier,
    ChevronRight,
    ChevronRight,
  ]);
  check("#secret", [PrivateMember]);
  check("\u{2603}", [Identifier]);
}

#[test]
fn test_lex_comments_and_line_terminators() {
  let mut lexer = Lexer::new("a // one\nb /* two */ c /*\n*/ d");
  let a = lex_next(&mut lexer);
  assert_eq!(a.typ, Identifier);
  assert!(!a.preceded_by_line_terminator);
  let b = lex_next(&mut lexer);
  assert_eq!(&lexer[b.loc], "b");
  assert!(b.preceded_by_line_terminator);
  let c = lex_next(&mut lexer);
  assert_eq!(&lexer[c.loc], "c");
  assert!(!c.preceded_by_line_terminator);
  let d = lex_next(&mut lexer);
  assert_eq!(&lexer[d.loc], "d");
  assert!(d.preceded_by_line_terminator);
  assert_eq!(lex_next(&mut lexer).typ, EOF);
}

#[test]
fn test_lex_byte_order_mark() {
  check("\u{feff}declare", [KeywordDeclare]);
}
