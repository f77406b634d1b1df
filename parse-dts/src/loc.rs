use crate::char::is_line_terminator;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::token::TT;
use serde::Serialize;
use std::cmp::max;
use std::cmp::min;
use std::ops::Add;
use std::ops::AddAssign;

/// A half-open byte range `[start, end)` into the source text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub fn error(self, typ: SyntaxErrorType, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError::new(typ, self, actual_token)
  }

  pub fn is_empty(&self) -> bool {
    self.0 >= self.1
  }

  pub fn len(&self) -> usize {
    self.1.saturating_sub(self.0)
  }

  pub fn extend(&mut self, other: Loc) {
    self.0 = min(self.0, other.0);
    self.1 = max(self.1, other.1);
  }
}

impl Add for Loc {
  type Output = Loc;

  fn add(self, rhs: Self) -> Self::Output {
    let mut new = self;
    new.extend(rhs);
    new
  }
}

impl AddAssign for Loc {
  fn add_assign(&mut self, rhs: Self) {
    self.extend(rhs);
  }
}

/// A zero-based line and column. Columns count UTF-16 code units, as editors and the TypeScript
/// compiler do.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub struct LineCol {
  pub line: u32,
  pub column: u32,
}

/// Maps byte offsets in a source text to line and column positions.
///
/// `\r\n`, `\n`, `\r`, U+2028 and U+2029 all end a line.
#[derive(Clone, Debug)]
pub struct LineIndex<'a> {
  source: &'a str,
  line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
  pub fn new(source: &'a str) -> LineIndex<'a> {
    let mut line_starts = vec![0];
    let mut chars = source.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
      if !is_line_terminator(c) {
        continue;
      };
      if c == '\r' {
        if let Some((_, '\n')) = chars.peek() {
          chars.next();
          line_starts.push(i + 2);
          continue;
        };
      };
      line_starts.push(i + c.len_utf8());
    }
    LineIndex {
      source,
      line_starts,
    }
  }

  pub fn line_count(&self) -> usize {
    self.line_starts.len()
  }

  /// Offsets past the end of the source are clamped to the end.
  pub fn line_col(&self, offset: usize) -> LineCol {
    let mut offset = min(offset, self.source.len());
    while !self.source.is_char_boundary(offset) {
      offset -= 1;
    }
    let line = match self.line_starts.binary_search(&offset) {
      Ok(line) => line,
      Err(next) => next - 1,
    };
    let column = self.source[self.line_starts[line]..offset]
      .chars()
      .map(char::len_utf16)
      .sum::<usize>();
    LineCol {
      line: line as u32,
      column: column as u32,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn loc_extend() {
    assert_eq!(Loc(4, 6) + Loc(1, 5), Loc(1, 6));
    assert!(Loc(3, 3).is_empty());
    assert_eq!(Loc(3, 7).len(), 4);
  }

  #[test]
  fn line_col_handles_all_terminators() {
    let source = "a\nbb\r\nccc\rd\u{2028}e";
    let index = LineIndex::new(source);
    assert_eq!(index.line_count(), 5);
    assert_eq!(index.line_col(0), LineCol { line: 0, column: 0 });
    assert_eq!(index.line_col(3), LineCol { line: 1, column: 1 });
    assert_eq!(index.line_col(6), LineCol { line: 2, column: 0 });
    assert_eq!(index.line_col(10), LineCol { line: 3, column: 0 });
    assert_eq!(index.line_col(14), LineCol { line: 4, column: 0 });
  }

  #[test]
  fn columns_count_utf16_units() {
    let source = "const \u{1F600} = 1; x";
    let index = LineIndex::new(source);
    let x = source.find('x').unwrap();
    // The emoji is four bytes but two UTF-16 units.
    assert_eq!(index.line_col(x), LineCol { line: 0, column: 14 });
  }

  #[test]
  fn offsets_past_end_are_clamped() {
    let index = LineIndex::new("ab\ncd");
    assert_eq!(index.line_col(100), LineCol { line: 1, column: 2 });
  }
}
