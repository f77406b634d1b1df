use crate::loc::Loc;
use crate::token::TT;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Formatter;
use std::error::Error;
use std::fmt::Display;

/// A stable classification of syntax errors produced by the parser.
///
/// Diagnostic codes (prefix `DS`) are assigned per variant and are stable:
/// - `DS0001`: [`SyntaxErrorType::ExpectedSyntax`]
/// - `DS0002`: [`SyntaxErrorType::RequiredTokenNotFound`]
/// - `DS0003`: [`SyntaxErrorType::UnexpectedEnd`]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SyntaxErrorType {
  ExpectedSyntax(&'static str),
  RequiredTokenNotFound(TT),
  UnexpectedEnd,
}

#[derive(Clone)]
pub struct SyntaxError {
  pub typ: SyntaxErrorType,
  pub loc: Loc,
  pub actual_token: Option<TT>,
}

impl SyntaxError {
  pub fn new(typ: SyntaxErrorType, loc: Loc, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError {
      typ,
      loc,
      actual_token,
    }
  }
}

impl Debug for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{} around loc [{}:{}]", self, self.loc.0, self.loc.1)
  }
}

impl Display for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} ({})",
      self.typ.message(self.actual_token),
      self.typ.code()
    )
  }
}

impl Error for SyntaxError {}

impl PartialEq for SyntaxError {
  fn eq(&self, other: &Self) -> bool {
    self.typ == other.typ
  }
}

impl Eq for SyntaxError {}

pub type SyntaxResult<T> = Result<T, SyntaxError>;

impl SyntaxErrorType {
  /// Stable diagnostic code for this syntax error variant.
  pub fn code(&self) -> &'static str {
    match self {
      SyntaxErrorType::ExpectedSyntax(_) => "DS0001",
      SyntaxErrorType::RequiredTokenNotFound(_) => "DS0002",
      SyntaxErrorType::UnexpectedEnd => "DS0003",
    }
  }

  /// Human-readable message describing this syntax error.
  pub fn message(&self, actual_token: Option<TT>) -> String {
    match self {
      SyntaxErrorType::ExpectedSyntax(expected) => match actual_token {
        Some(actual) => format!("expected {}, found {:?}", expected, actual),
        None => format!("expected {}", expected),
      },
      SyntaxErrorType::RequiredTokenNotFound(token) => match actual_token {
        Some(actual) => format!("expected token {:?}, found {:?}", token, actual),
        None => format!("expected token {:?}", token),
      },
      SyntaxErrorType::UnexpectedEnd => "unexpected end of input".into(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_includes_code_and_tokens() {
    let err = SyntaxError::new(
      SyntaxErrorType::RequiredTokenNotFound(TT::BraceClose),
      Loc(3, 4),
      Some(TT::EOF),
    );
    assert_eq!(
      err.to_string(),
      "expected token BraceClose, found EOF (DS0002)"
    );
    assert_eq!(
      format!("{:?}", err),
      "expected token BraceClose, found EOF (DS0002) around loc [3:4]"
    );
  }
}
