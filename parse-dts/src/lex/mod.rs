use crate::char::CharFilter;
use crate::char::DIGIT;
use crate::char::ID_CONTINUE;
use crate::char::ID_START;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;
use ahash::HashMap;
use ahash::HashMapExt;
use aho_corasick::AhoCorasick;
use aho_corasick::AhoCorasickBuilder;
use aho_corasick::AhoCorasickKind;
use aho_corasick::Anchored;
use aho_corasick::Input;
use aho_corasick::MatchKind;
use aho_corasick::StartKind;
use core::ops::Index;
use memchr::memchr;
use memchr::memchr3;
use once_cell::sync::Lazy;

#[cfg(test)]
mod tests;

#[derive(Copy, Clone)]
pub struct LexerCheckpoint {
  next: usize,
}

// Contains the match length.
#[derive(Copy, Clone)]
struct Match(usize);

impl Match {
  pub fn len(&self) -> usize {
    self.0
  }
}

struct PatternMatcher {
  patterns: Vec<TT>,
  matcher: AhoCorasick,
  anchored: bool,
}

impl PatternMatcher {
  pub fn new<D: AsRef<str>>(anchored: bool, patterns: Vec<(TT, D)>) -> Self {
    let (tts, syns): (Vec<_>, Vec<_>) = patterns.into_iter().unzip();
    let byte_syns: Vec<Vec<u8>> = syns
      .iter()
      .map(|s| s.as_ref().as_bytes().to_vec())
      .collect();
    let matcher = AhoCorasickBuilder::new()
      .start_kind(if anchored {
        StartKind::Anchored
      } else {
        StartKind::Unanchored
      })
      .kind(Some(AhoCorasickKind::DFA))
      .match_kind(MatchKind::LeftmostLongest)
      .build(byte_syns)
      .expect("token patterns are valid");
    PatternMatcher {
      patterns: tts,
      matcher,
      anchored,
    }
  }

  pub fn find(&self, lexer: &Lexer) -> Option<(TT, Match)> {
    self
      .matcher
      .find(
        Input::new(&lexer.source[lexer.next..]).anchored(if self.anchored {
          Anchored::Yes
        } else {
          Anchored::No
        }),
      )
      .map(|m| (self.patterns[m.pattern().as_usize()], Match(m.end())))
  }
}

pub struct Lexer<'a> {
  source: &'a str,
  next: usize,
}

impl<'a> Lexer<'a> {
  pub fn new(code: &'a str) -> Lexer<'a> {
    Lexer {
      source: code,
      next: 0,
    }
  }

  pub fn source(&self) -> &'a str {
    self.source
  }

  pub fn next(&self) -> usize {
    self.next
  }

  fn end(&self) -> usize {
    self.source.len()
  }

  fn remaining(&self) -> usize {
    self.end() - self.next
  }

  fn eof_range(&self) -> Loc {
    Loc(self.end(), self.end())
  }

  fn at_end(&self) -> bool {
    self.next >= self.end()
  }

  fn peek_or_eof(&self, n: usize) -> Option<char> {
    self.source[self.next..].chars().nth(n)
  }

  pub fn checkpoint(&self) -> LexerCheckpoint {
    LexerCheckpoint { next: self.next }
  }

  pub fn since_checkpoint(&self, checkpoint: LexerCheckpoint) -> Loc {
    Loc(checkpoint.next, self.next)
  }

  fn through_char_or_end(&self, c: char) -> Match {
    debug_assert!(c.is_ascii());
    memchr(c as u8, self.source[self.next..].as_bytes())
      .map(|pos| Match(pos + 1))
      .unwrap_or_else(|| Match(self.remaining()))
  }

  fn while_not_char(&self, c: char) -> Match {
    debug_assert!(c.is_ascii());
    Match(memchr(c as u8, self.source[self.next..].as_bytes()).unwrap_or(self.remaining()))
  }

  fn while_not_3_chars(&self, a: char, b: char, c: char) -> Match {
    debug_assert!(a.is_ascii() && b.is_ascii() && c.is_ascii());
    Match(
      memchr3(a as u8, b as u8, c as u8, self.source[self.next..].as_bytes())
        .unwrap_or(self.remaining()),
    )
  }

  fn while_chars(&self, chars: &CharFilter) -> Match {
    let mut len = 0;
    for ch in self.source[self.next..].chars() {
      if chars.has(ch) {
        len += ch.len_utf8();
      } else {
        break;
      }
    }
    Match(len)
  }

  fn consume(&mut self, m: Match) -> Match {
    self.next += m.len();
    m
  }

  fn skip_expect(&mut self, n: usize) {
    debug_assert!(self.next + n <= self.end());
    self.next += n;
  }

  fn skip_char(&mut self) {
    if let Some(c) = self.peek_or_eof(0) {
      self.skip_expect(c.len_utf8());
    };
  }

  fn drive(&mut self, preceded_by_line_terminator: bool, f: impl FnOnce(&mut Self) -> TT) -> Token {
    let cp = self.checkpoint();
    let typ = f(self);
    Token {
      loc: self.since_checkpoint(cp),
      typ,
      preceded_by_line_terminator,
    }
  }
}

impl<'a> Index<Loc> for Lexer<'a> {
  type Output = str;

  fn index(&self, index: Loc) -> &Self::Output {
    &self.source[index.0..index.1]
  }
}

#[rustfmt::skip]
pub static OPERATORS_MAPPING: Lazy<HashMap<TT, &'static str>> = Lazy::new(|| {
  let mut map = HashMap::<TT, &'static str>::new();
  map.insert(TT::At, "@");
  map.insert(TT::Ampersand, "&");
  map.insert(TT::Asterisk, "*");
  map.insert(TT::Bar, "|");
  map.insert(TT::BraceClose, "}");
  map.insert(TT::BraceOpen, "{");
  map.insert(TT::BracketClose, "]");
  map.insert(TT::BracketOpen, "[");
  map.insert(TT::Caret, "^");
  map.insert(TT::ChevronLeft, "<");
  // `>>` and `>=` are lexed as separate tokens so nested type arguments stay balanced.
  map.insert(TT::ChevronRight, ">");
  map.insert(TT::Colon, ":");
  map.insert(TT::Comma, ",");
  map.insert(TT::Dot, ".");
  map.insert(TT::DotDotDot, "...");
  map.insert(TT::Equals, "=");
  map.insert(TT::EqualsChevronRight, "=>");
  map.insert(TT::Exclamation, "!");
  map.insert(TT::Hyphen, "-");
  map.insert(TT::ParenthesisClose, ")");
  map.insert(TT::ParenthesisOpen, "(");
  map.insert(TT::Percent, "%");
  map.insert(TT::Plus, "+");
  map.insert(TT::Question, "?");
  map.insert(TT::Semicolon, ";");
  map.insert(TT::Slash, "/");
  map.insert(TT::Tilde, "~");
  map
});

pub static KEYWORDS_MAPPING: Lazy<HashMap<TT, &'static str>> = Lazy::new(|| {
  let mut map = HashMap::<TT, &'static str>::new();
  map.insert(TT::KeywordAs, "as");
  map.insert(TT::KeywordAsync, "async");
  map.insert(TT::KeywordAwait, "await");
  map.insert(TT::KeywordBreak, "break");
  map.insert(TT::KeywordCase, "case");
  map.insert(TT::KeywordCatch, "catch");
  map.insert(TT::KeywordClass, "class");
  map.insert(TT::KeywordConst, "const");
  map.insert(TT::KeywordConstructor, "constructor");
  map.insert(TT::KeywordContinue, "continue");
  map.insert(TT::KeywordDebugger, "debugger");
  map.insert(TT::KeywordDefault, "default");
  map.insert(TT::KeywordDelete, "delete");
  map.insert(TT::KeywordDo, "do");
  map.insert(TT::KeywordElse, "else");
  map.insert(TT::KeywordEnum, "enum");
  map.insert(TT::KeywordExport, "export");
  map.insert(TT::KeywordExtends, "extends");
  map.insert(TT::KeywordFinally, "finally");
  map.insert(TT::KeywordFor, "for");
  map.insert(TT::KeywordFrom, "from");
  map.insert(TT::KeywordFunction, "function");
  map.insert(TT::KeywordGet, "get");
  map.insert(TT::KeywordIf, "if");
  map.insert(TT::KeywordImport, "import");
  map.insert(TT::KeywordIn, "in");
  map.insert(TT::KeywordInstanceof, "instanceof");
  map.insert(TT::KeywordLet, "let");
  map.insert(TT::KeywordNew, "new");
  map.insert(TT::KeywordOf, "of");
  map.insert(TT::KeywordOut, "out");
  map.insert(TT::KeywordReturn, "return");
  map.insert(TT::KeywordSet, "set");
  map.insert(TT::KeywordStatic, "static");
  map.insert(TT::KeywordSuper, "super");
  map.insert(TT::KeywordSwitch, "switch");
  map.insert(TT::KeywordThis, "this");
  map.insert(TT::KeywordThrow, "throw");
  map.insert(TT::KeywordTry, "try");
  map.insert(TT::KeywordTypeof, "typeof");
  map.insert(TT::KeywordVar, "var");
  map.insert(TT::KeywordVoid, "void");
  map.insert(TT::KeywordWhile, "while");
  map.insert(TT::KeywordWith, "with");
  map.insert(TT::KeywordYield, "yield");
  // TypeScript keywords
  map.insert(TT::KeywordAbstract, "abstract");
  map.insert(TT::KeywordAccessor, "accessor");
  map.insert(TT::KeywordAsserts, "asserts");
  map.insert(TT::KeywordDeclare, "declare");
  map.insert(TT::KeywordGlobal, "global");
  map.insert(TT::KeywordImplements, "implements");
  map.insert(TT::KeywordInfer, "infer");
  map.insert(TT::KeywordInterface, "interface");
  map.insert(TT::KeywordIs, "is");
  map.insert(TT::KeywordKeyof, "keyof");
  map.insert(TT::KeywordModule, "module");
  map.insert(TT::KeywordNamespace, "namespace");
  map.insert(TT::KeywordOverride, "override");
  map.insert(TT::KeywordPrivate, "private");
  map.insert(TT::KeywordProtected, "protected");
  map.insert(TT::KeywordPublic, "public");
  map.insert(TT::KeywordReadonly, "readonly");
  map.insert(TT::KeywordSatisfies, "satisfies");
  map.insert(TT::KeywordType, "type");
  map.insert(TT::KeywordUnique, "unique");
  map.insert(TT::LiteralFalse, "false");
  map.insert(TT::LiteralNull, "null");
  map.insert(TT::LiteralTrue, "true");
  map
});

pub static KEYWORD_STRS: Lazy<HashMap<&'static str, TT>> = Lazy::new(|| {
  KEYWORDS_MAPPING.iter().map(|(&tt, &s)| (s, tt)).collect()
});

// Identifiers, numbers, strings, templates and private names are recognised by their first
// character before this matcher runs.
static SIG: Lazy<PatternMatcher> = Lazy::new(|| {
  let mut patterns: Vec<(TT, String)> = Vec::new();
  for (&k, &v) in OPERATORS_MAPPING.iter() {
    patterns.push((k, v.into()));
  }
  // Prevent `.` immediately followed by a digit from being recognised as the `.` operator.
  for digit in '0'..='9' {
    patterns.push((TT::LiteralNumber, format!(".{}", digit)));
  }
  PatternMatcher::new(true, patterns)
});

static ML_COMMENT: Lazy<PatternMatcher> = Lazy::new(|| {
  PatternMatcher::new::<&str>(false, vec![
    (TT::CommentMultilineEnd, "*/"),
    (TT::LineTerminator, "\r"),
    (TT::LineTerminator, "\n"),
    (TT::LineTerminator, "\u{2028}"),
    (TT::LineTerminator, "\u{2029}"),
  ])
});

static INSIG: Lazy<PatternMatcher> = Lazy::new(|| {
  PatternMatcher::new::<&str>(true, vec![
    (TT::LineTerminator, "\r"),
    (TT::LineTerminator, "\n"),
    (TT::LineTerminator, "\u{2028}"),
    (TT::LineTerminator, "\u{2029}"),
    (TT::Whitespace, "\x09"),
    (TT::Whitespace, "\x0b"),
    (TT::Whitespace, "\x0c"),
    (TT::Whitespace, "\x20"),
    (TT::Whitespace, "\u{00A0}"),
    (TT::Whitespace, "\u{1680}"),
    (TT::Whitespace, "\u{2000}"),
    (TT::Whitespace, "\u{2001}"),
    (TT::Whitespace, "\u{2002}"),
    (TT::Whitespace, "\u{2003}"),
    (TT::Whitespace, "\u{2004}"),
    (TT::Whitespace, "\u{2005}"),
    (TT::Whitespace, "\u{2006}"),
    (TT::Whitespace, "\u{2007}"),
    (TT::Whitespace, "\u{2008}"),
    (TT::Whitespace, "\u{2009}"),
    (TT::Whitespace, "\u{200A}"),
    (TT::Whitespace, "\u{202F}"),
    (TT::Whitespace, "\u{205F}"),
    (TT::Whitespace, "\u{3000}"),
    (TT::Whitespace, "\u{FEFF}"),
    (TT::CommentMultiline, "/*"),
    (TT::CommentSingle, "//"),
  ])
});

/// Returns whether the comment includes a line terminator.
fn lex_multiline_comment(lexer: &mut Lexer<'_>) -> bool {
  // Consume `/*`.
  lexer.skip_expect(2);
  let mut contains_newline = false;
  loop {
    // An unterminated comment runs to the end of the source.
    let (tt, mat) = ML_COMMENT
      .find(lexer)
      .unwrap_or((TT::EOF, Match(lexer.remaining())));
    lexer.consume(mat);
    match tt {
      TT::CommentMultilineEnd | TT::EOF => break,
      _ => contains_newline = true,
    };
  }
  contains_newline
}

fn lex_single_comment(lexer: &mut Lexer<'_>) {
  // Consume `//`.
  lexer.skip_expect(2);
  // The terminating `\n` is left for the caller so it registers as a line break.
  lexer.consume(lexer.while_not_char('\n'));
}

fn lex_identifier_rest(lexer: &mut Lexer<'_>) {
  loop {
    lexer.consume(lexer.while_chars(&ID_CONTINUE));
    match lexer.peek_or_eof(0) {
      // Unicode escape; the hex digits are identifier characters.
      Some('\\') if lexer.peek_or_eof(1) == Some('u') => lexer.skip_expect(2),
      Some('{') if lexer.source[..lexer.next].ends_with("\\u") => {
        lexer.consume(lexer.through_char_or_end('}'));
      }
      // Any non-ASCII character that isn't whitespace is assumed to continue the identifier.
      Some(c) if !c.is_ascii() && INSIG.find(lexer).is_none() => lexer.skip_expect(c.len_utf8()),
      _ => break,
    };
  }
}

fn lex_identifier(lexer: &mut Lexer<'_>) -> TT {
  let start = lexer.next;
  lex_identifier_rest(lexer);
  if lexer.next == start {
    // A lone `\` that doesn't start a Unicode escape.
    lexer.skip_char();
    return TT::Invalid;
  };
  KEYWORD_STRS
    .get(&lexer.source[start..lexer.next])
    .copied()
    .unwrap_or(TT::Identifier)
}

// Covers decimal, hex, octal, binary and bigint literals as well as numeric separators; the value
// itself is never needed.
fn lex_number(lexer: &mut Lexer<'_>, start: usize) -> TT {
  loop {
    lexer.consume(lexer.while_chars(&ID_CONTINUE));
    let token = &lexer.source[start..lexer.next];
    let hex = token.starts_with("0x") || token.starts_with("0X");
    match (lexer.peek_or_eof(0), lexer.peek_or_eof(1)) {
      (Some('.'), Some(c)) if !hex && !token.contains('.') && DIGIT.has(c) => lexer.skip_expect(1),
      (Some('+' | '-'), Some(c))
        if !hex && token.ends_with(|e: char| matches!(e, 'e' | 'E')) && DIGIT.has(c) =>
      {
        lexer.skip_expect(1)
      }
      _ => break,
    };
  }
  TT::LiteralNumber
}

fn lex_private_member(lexer: &mut Lexer<'_>) -> TT {
  // Include the `#` in the token.
  lexer.skip_expect(1);
  match lexer.peek_or_eof(0) {
    Some(c) if ID_START.has(c) || !c.is_ascii() => {
      lex_identifier_rest(lexer);
      TT::PrivateMember
    }
    _ => TT::Invalid,
  }
}

fn lex_string(lexer: &mut Lexer<'_>, quote: char) -> TT {
  lexer.skip_expect(1);
  loop {
    lexer.consume(lexer.while_not_3_chars('\\', '\n', quote));
    match lexer.peek_or_eof(0) {
      // Unterminated; stop before the line break so the rest of the source lexes normally.
      None | Some('\n') => return TT::Invalid,
      Some('\\') => {
        lexer.skip_expect(1);
        lexer.skip_char();
      }
      Some(_) => {
        lexer.skip_expect(1);
        return TT::LiteralString;
      }
    };
  }
}

// Lexes an entire template literal as one token. Substitutions are lexed as regular tokens so that
// braces, strings and nested templates inside them are balanced correctly.
fn lex_template(lexer: &mut Lexer<'_>) -> TT {
  lexer.skip_expect(1);
  loop {
    match lexer.peek_or_eof(0) {
      None => return TT::Invalid,
      Some('\\') => {
        lexer.skip_expect(1);
        lexer.skip_char();
      }
      Some('`') => {
        lexer.skip_expect(1);
        return TT::LiteralTemplate;
      }
      Some('$') if lexer.peek_or_eof(1) == Some('{') => {
        lexer.skip_expect(2);
        let mut depth = 0usize;
        loop {
          match lex_next(lexer).typ {
            TT::EOF => return TT::Invalid,
            TT::BraceOpen => depth += 1,
            TT::BraceClose if depth == 0 => break,
            TT::BraceClose => depth -= 1,
            _ => {}
          };
        }
      }
      Some(c) => lexer.skip_expect(c.len_utf8()),
    };
  }
}

pub fn lex_next(lexer: &mut Lexer<'_>) -> Token {
  // Skip whitespace and comments before the next significant token.
  let mut preceded_by_line_terminator = false;
  while let Some((tt, mat)) = INSIG.find(lexer) {
    match tt {
      TT::LineTerminator => {
        lexer.consume(mat);
        preceded_by_line_terminator = true;
      }
      TT::Whitespace => {
        lexer.consume(mat);
      }
      TT::CommentMultiline => {
        preceded_by_line_terminator |= lex_multiline_comment(lexer);
      }
      TT::CommentSingle => {
        lex_single_comment(lexer);
      }
      _ => unreachable!(),
    };
  }

  if lexer.at_end() {
    return Token {
      loc: lexer.eof_range(),
      typ: TT::EOF,
      preceded_by_line_terminator,
    };
  };

  lexer.drive(preceded_by_line_terminator, |lexer| {
    let Some(c) = lexer.peek_or_eof(0) else {
      return TT::EOF;
    };
    match c {
      c if ID_START.has(c) || c == '\\' || !c.is_ascii() => lex_identifier(lexer),
      c if DIGIT.has(c) => lex_number(lexer, lexer.next),
      '"' | '\'' => lex_string(lexer, c),
      '`' => lex_template(lexer),
      '#' => lex_private_member(lexer),
      _ => match SIG.find(lexer) {
        Some((TT::LiteralNumber, _)) => {
          // `.5`
          let start = lexer.next;
          lexer.skip_expect(1);
          lex_number(lexer, start)
        }
        Some((typ, mat)) => {
          lexer.consume(mat);
          typ
        }
        None => {
          lexer.skip_char();
          TT::Invalid
        }
      },
    }
  })
}
