use crate::collate::collate;
use crate::error::ExternsError;
use crate::fs::FileSystem;
use crate::path::absolute_path;
use crate::path::relative_path;
use crate::path::to_slash;
use crate::symbol::ExternalSymbol;
use crate::symbol::SymbolKind;
use ahash::AHashSet;
use std::path::Path;
use std::path::PathBuf;
use tracing::info;

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// The variable that holds the library's properties: every character outside `[A-Za-z0-9_]` is
/// replaced with `_`.
pub fn container_name(identifier: &str) -> String {
  identifier
    .chars()
    .flat_map(|c| {
      if c.is_ascii_alphanumeric() || c == '_' {
        std::iter::repeat(c).take(1)
      } else {
        // A non-BMP character is two UTF-16 units, and so two underscores.
        std::iter::repeat('_').take(c.len_utf16())
      }
    })
    .collect()
}

/// Renders an extern file:
///
/// ```text
/// // @formatter:off
/// var classNames;
/// const __classnames = {};
/// __classnames.bind;
/// __classnames.ClassArray;
/// ```
///
/// Without `debug`, names are sorted and each appears once per kind. With `debug`, symbols keep
/// their order and each line ends with its source position, like
/// `// node_modules/@types/classnames/bind.d.ts (3:17)`, relative to `base_path`.
///
/// Returns `None` if there are no symbols.
pub fn render_externs(
  symbols: &[ExternalSymbol],
  identifier: &str,
  debug: bool,
  base_path: &Path,
) -> Option<String> {
  if symbols.is_empty() {
    return None;
  };
  let container = container_name(identifier);

  let mut ordered: Vec<&ExternalSymbol> = symbols.iter().collect();
  if !debug {
    ordered.sort_by(|a, b| collate(&a.name, &b.name));
  };

  let mut seen_declarations = AHashSet::new();
  let mut seen_properties = AHashSet::new();
  let mut declarations = Vec::new();
  let mut properties = Vec::new();
  for symbol in ordered {
    let (line, seen, out) = match symbol.kind {
      SymbolKind::Declaration => (
        format!("var {};", symbol.name),
        &mut seen_declarations,
        &mut declarations,
      ),
      SymbolKind::Property => (
        format!("__{container}.{};", symbol.name),
        &mut seen_properties,
        &mut properties,
      ),
    };
    if debug {
      let file = to_slash(&relative_path(base_path, &symbol.file));
      out.push(format!("{line} // {file} ({})", symbol.position));
    } else if seen.insert(symbol.name.as_str()) {
      out.push(line);
    };
  }

  let mut lines = vec!["// @formatter:off".to_string()];
  lines.extend(declarations);
  lines.push(format!("const __{container} = {{}};"));
  lines.extend(properties);
  let mut code = lines.join(LINE_ENDING);
  code.push_str(LINE_ENDING);
  Some(code)
}

/// Writes the externs for `symbols` to `<out_path>/<identifier>.js`, creating directories as
/// needed. Returns the written path, or `None` if there was nothing to write.
pub fn write_externs(
  fs: &dyn FileSystem,
  out_path: &Path,
  identifier: &str,
  symbols: &[ExternalSymbol],
  debug: bool,
) -> Result<Option<PathBuf>, ExternsError> {
  let out_path = absolute_path(out_path).map_err(|source| ExternsError::Write {
    path: out_path.to_path_buf(),
    source,
  })?;
  let Some(code) = render_externs(symbols, identifier, debug, &out_path) else {
    return Ok(None);
  };
  let dest = out_path.join(format!("{identifier}.js"));
  // Scoped identifiers like `@scope` can contain slashes.
  let dir = dest.parent().unwrap_or(&out_path);
  fs.create_dir_all(dir).map_err(|source| ExternsError::Write {
    path: dir.to_path_buf(),
    source,
  })?;
  fs.write(&dest, &code).map_err(|source| ExternsError::Write {
    path: dest.clone(),
    source,
  })?;
  info!(file = %dest.display(), symbols = symbols.len(), "wrote externs");
  Ok(Some(dest))
}
