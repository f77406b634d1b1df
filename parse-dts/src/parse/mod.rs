use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::lex_next;
use crate::lex::Lexer;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;

pub mod class_or_object;
pub mod drive;
pub mod expr;
pub mod import_export;
pub mod stmt;
pub mod type_expr;
#[cfg(test)]
mod tests;

#[derive(Debug)]
#[must_use]
pub struct MaybeToken {
  typ: TT,
  loc: Loc,
  matched: bool,
}

impl MaybeToken {
  pub fn is_match(&self) -> bool {
    self.matched
  }

  pub fn match_loc(&self) -> Option<Loc> {
    if self.matched {
      Some(self.loc)
    } else {
      None
    }
  }

  pub fn error(&self, err: SyntaxErrorType) -> SyntaxError {
    debug_assert!(!self.matched);
    self.loc.error(err, Some(self.typ))
  }
}

#[derive(Clone, Copy)]
pub struct ParserCheckpoint {
  next_tok_i: usize,
}

/// A recursive-descent parser over the full token list of a file.
///
/// There is no lexing mode to switch (template literals are single tokens and regular expressions
/// never occur in declarations), so the source is tokenised upfront and lookahead is just
/// indexing.
pub struct Parser<'a> {
  lexer: Lexer<'a>,
  tokens: Vec<Token>,
  next_tok_i: usize,
}

// We extend this struct with added methods in the various submodules, instead of simply using free
// functions and passing `&mut Parser` around.
impl<'a> Parser<'a> {
  pub fn new(mut lexer: Lexer<'a>) -> Parser<'a> {
    let mut tokens = Vec::new();
    loop {
      let t = lex_next(&mut lexer);
      tokens.push(t);
      if t.typ == TT::EOF {
        break;
      };
    }
    Parser {
      lexer,
      tokens,
      next_tok_i: 0,
    }
  }

  pub fn source(&self) -> &'a str {
    self.lexer.source()
  }

  pub fn str(&self, loc: Loc) -> &'a str {
    &self.source()[loc.0..loc.1]
  }

  pub fn string(&self, loc: Loc) -> String {
    self.str(loc).to_string()
  }

  pub fn checkpoint(&self) -> ParserCheckpoint {
    ParserCheckpoint {
      next_tok_i: self.next_tok_i,
    }
  }

  /// The source range covered by the tokens consumed since `checkpoint`.
  pub fn since_checkpoint(&self, checkpoint: &ParserCheckpoint) -> Loc {
    let start = self.token_at(checkpoint.next_tok_i).loc.0;
    if self.next_tok_i > checkpoint.next_tok_i {
      Loc(start, self.tokens[self.next_tok_i - 1].loc.1)
    } else {
      Loc(start, start)
    }
  }

  pub fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint) {
    self.next_tok_i = checkpoint.next_tok_i;
  }

  fn token_at(&self, i: usize) -> &Token {
    // The last token is always EOF.
    &self.tokens[i.min(self.tokens.len() - 1)]
  }

  pub fn peek(&self) -> Token {
    *self.token_at(self.next_tok_i)
  }

  /// Peeks `n` tokens past the next one; `peek_n(0)` is `peek()`.
  pub fn peek_n(&self, n: usize) -> Token {
    *self.token_at(self.next_tok_i + n)
  }

  pub fn peek_2(&self) -> (Token, Token) {
    (self.peek_n(0), self.peek_n(1))
  }

  /// The most recently consumed token.
  pub fn last_consumed(&self) -> Option<Token> {
    self.next_tok_i.checked_sub(1).map(|i| self.tokens[i])
  }

  pub fn consume(&mut self) -> Token {
    let t = self.peek();
    if t.typ != TT::EOF {
      self.next_tok_i += 1;
    };
    t
  }

  pub fn consume_as_string(&mut self) -> String {
    let loc = self.consume().loc;
    self.string(loc)
  }

  pub fn consume_if(&mut self, typ: TT) -> MaybeToken {
    self.consume_if_pred(|t| t.typ == typ)
  }

  pub fn consume_if_pred<F: FnOnce(&Token) -> bool>(&mut self, pred: F) -> MaybeToken {
    let t = self.peek();
    let matched = pred(&t);
    if matched {
      self.consume();
    };
    MaybeToken {
      typ: t.typ,
      loc: t.loc,
      matched,
    }
  }

  pub fn require(&mut self, typ: TT) -> SyntaxResult<Token> {
    let t = self.peek();
    if t.typ != typ {
      return Err(t.error(SyntaxErrorType::RequiredTokenNotFound(typ)));
    };
    Ok(self.consume())
  }

  pub fn require_predicate<P: FnOnce(TT) -> bool>(
    &mut self,
    pred: P,
    expected: &'static str,
  ) -> SyntaxResult<Token> {
    let t = self.peek();
    if !pred(t.typ) {
      return Err(t.error(SyntaxErrorType::ExpectedSyntax(expected)));
    };
    Ok(self.consume())
  }

  /// Index of the token that closes the bracket at token index `open`, counting all of `()`, `[]`
  /// and `{}`.
  fn matching_close(&self, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, t) in self.tokens.iter().enumerate().skip(open) {
      match t.typ {
        TT::ParenthesisOpen | TT::BracketOpen | TT::BraceOpen => depth += 1,
        TT::ParenthesisClose | TT::BracketClose | TT::BraceClose => {
          depth = depth.saturating_sub(1);
          if depth == 0 {
            return Some(i);
          };
        }
        TT::EOF => return None,
        _ => {}
      };
    }
    None
  }

  /// The value of a string literal token, with escapes decoded.
  pub fn lit_str_val(&self, loc: Loc) -> String {
    let raw = self.str(loc);
    unescape(&raw[1..raw.len().saturating_sub(1).max(1)])
  }
}

fn unescape(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  let mut chars = raw.chars().peekable();
  while let Some(c) = chars.next() {
    if c != '\\' {
      out.push(c);
      continue;
    };
    let Some(e) = chars.next() else {
      break;
    };
    match e {
      'n' => out.push('\n'),
      't' => out.push('\t'),
      'r' => out.push('\r'),
      'b' => out.push('\u{8}'),
      'f' => out.push('\u{c}'),
      'v' => out.push('\u{b}'),
      '0' => out.push('\0'),
      // Line continuation.
      '\r' => {
        chars.next_if_eq(&'\n');
      }
      '\n' | '\u{2028}' | '\u{2029}' => {}
      'x' | 'u' => {
        let hex: String = if e == 'u' && chars.next_if_eq(&'{').is_some() {
          chars.by_ref().take_while(|c| *c != '}').collect()
        } else {
          let len = if e == 'x' { 2 } else { 4 };
          (0..len).filter_map(|_| chars.next_if(|c| c.is_ascii_hexdigit())).collect()
        };
        match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
          Some(c) => out.push(c),
          None => {
            out.push('\\');
            out.push(e);
            out.push_str(&hex);
          }
        };
      }
      e => out.push(e),
    };
  }
  out
}
