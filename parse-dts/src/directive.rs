use crate::loc::Loc;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReferenceKind {
  /// `/// <reference path="./other.d.ts" />`
  Path,
  /// `/// <reference types="node" />`
  Types,
  /// `/// <reference lib="es2015" />`
  Lib,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferenceDirective {
  pub kind: ReferenceKind,
  /// Byte range of the attribute value, excluding quotes.
  pub value_loc: Loc,
}

impl ReferenceDirective {
  pub fn value<'a>(&self, source: &'a str) -> &'a str {
    source.get(self.value_loc.0..self.value_loc.1).unwrap_or("")
  }
}

struct Cursor<'a> {
  bytes: &'a [u8],
  offset: usize,
}

impl<'a> Cursor<'a> {
  fn peek(&self) -> Option<u8> {
    self.bytes.get(self.offset).copied()
  }

  fn at(&self, prefix: &[u8]) -> bool {
    self.bytes[self.offset..].starts_with(prefix)
  }

  fn skip_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
    let start = self.offset;
    while self.peek().is_some_and(&pred) {
      self.offset += 1;
    }
    self.offset - start
  }

  fn skip_whitespace(&mut self) {
    self.skip_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c));
  }
}

fn attribute_kind(name: &[u8]) -> Option<ReferenceKind> {
  if name.eq_ignore_ascii_case(b"path") {
    Some(ReferenceKind::Path)
  } else if name.eq_ignore_ascii_case(b"types") {
    Some(ReferenceKind::Types)
  } else if name.eq_ignore_ascii_case(b"lib") {
    Some(ReferenceKind::Lib)
  } else {
    None
  }
}

// Parses the attributes of `<reference ... />` within a single `///` comment. `line` starts right
// after the slashes.
fn parse_reference_tag(out: &mut Vec<ReferenceDirective>, line: &[u8], line_offset: usize) {
  let mut c = Cursor {
    bytes: line,
    offset: 0,
  };
  c.skip_whitespace();
  if !line[c.offset..]
    .get(..b"<reference".len())
    .is_some_and(|tag| tag.eq_ignore_ascii_case(b"<reference"))
  {
    return;
  };
  c.offset += b"<reference".len();
  loop {
    c.skip_whitespace();
    let name_start = c.offset;
    if c.skip_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_')) == 0 {
      // End of the tag (`/>` or `>`) or something unrecognisable.
      return;
    };
    let name = &line[name_start..c.offset];
    c.skip_whitespace();
    if c.peek() != Some(b'=') {
      continue;
    };
    c.offset += 1;
    c.skip_whitespace();
    let (start, end) = match c.peek() {
      Some(quote @ (b'"' | b'\'')) => {
        c.offset += 1;
        let start = c.offset;
        c.skip_while(|b| b != quote);
        let end = c.offset;
        if c.peek().is_some() {
          c.offset += 1;
        };
        (start, end)
      }
      Some(_) => {
        let start = c.offset;
        while c.peek().is_some_and(|b| !b.is_ascii_whitespace() && b != b'>') && !c.at(b"/>") {
          c.offset += 1;
        }
        (start, c.offset)
      }
      None => return,
    };
    if let Some(kind) = attribute_kind(name).filter(|_| start < end) {
      out.push(ReferenceDirective {
        kind,
        value_loc: Loc(line_offset + start, line_offset + end),
      });
    };
  }
}

/// Extracts `/// <reference ... />` directives from the comments that precede the first token of
/// `source`. Directives after any code are ignored.
pub fn scan_reference_directives(source: &str) -> Vec<ReferenceDirective> {
  let mut c = Cursor {
    bytes: source.as_bytes(),
    offset: 0,
  };
  if c.at(&[0xef, 0xbb, 0xbf]) {
    c.offset = 3;
  };
  let mut references = Vec::new();
  loop {
    c.skip_whitespace();
    if c.at(b"//") {
      // `////` and longer are plain comments.
      let triple = c.at(b"///") && !c.at(b"////");
      let start = c.offset + if triple { 3 } else { 2 };
      c.offset = start;
      c.skip_while(|b| b != b'\n' && b != b'\r');
      if triple {
        parse_reference_tag(&mut references, &c.bytes[start..c.offset], start);
      };
    } else if c.at(b"/*") {
      c.offset += 2;
      while c.peek().is_some() && !c.at(b"*/") {
        c.offset += 1;
      }
      c.offset = (c.offset + 2).min(c.bytes.len());
    } else {
      break;
    };
  }
  references
}
