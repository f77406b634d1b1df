use crate::symbol::Position;
use parse_dts::error::SyntaxError;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
  #[error("failed to read {}: {source}", .path.display())]
  Read { path: PathBuf, source: io::Error },
  #[error("syntax error in {} at {position}: {error}", .path.display())]
  Syntax {
    path: PathBuf,
    position: Position,
    #[source]
    error: SyntaxError,
  },
  /// Module references must be string literals for the target to be known statically.
  #[error("module specifier in {} at {position} is not a string literal", .path.display())]
  NonLiteralModuleSpecifier { path: PathBuf, position: Position },
}

#[derive(Debug, thiserror::Error)]
#[error("extern import {} for library {module_name} does not exist", .extern_import.display())]
pub struct ExternImportError {
  pub module_name: String,
  pub extern_import: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExternsError {
  #[error(transparent)]
  Resolve(#[from] ResolveError),
  #[error("failed to write {}: {source}", .path.display())]
  Write { path: PathBuf, source: io::Error },
  #[error("invalid glob {glob}: {source}")]
  Glob {
    glob: String,
    source: globset::Error,
  },
  #[error("failed to list files under {}: {source}", .path.display())]
  Walk {
    path: PathBuf,
    source: walkdir::Error,
  },
  #[error(transparent)]
  ExternImport(#[from] ExternImportError),
  #[error("failed to get the current directory: {0}")]
  CurrentDir(#[source] io::Error),
  #[error("failed to read libraries file {}: {source}", .path.display())]
  LibrariesRead { path: PathBuf, source: io::Error },
  #[error("invalid libraries file {}: {source}", .path.display())]
  LibrariesJson {
    path: PathBuf,
    source: serde_json::Error,
  },
}
