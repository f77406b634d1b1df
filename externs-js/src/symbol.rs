use parse_dts::loc::Loc;
use serde::Serialize;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SymbolKind {
  /// Installed as a global when the library loads.
  Declaration,
  /// Only ever accessed as a property of something else.
  Property,
}

/// A one-based line and column, the column counted in UTF-16 code units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
  pub line: u32,
  pub column: u32,
}

impl Display for Position {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.line, self.column)
  }
}

/// A name that must survive minification, and where it was declared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExternalSymbol {
  pub name: String,
  pub kind: SymbolKind,
  /// Absolute path of the declaration file.
  pub file: Arc<Path>,
  /// Byte range of the name within the file.
  pub loc: Loc,
  pub position: Position,
}
