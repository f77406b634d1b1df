//! Node10-style module resolution over a [`FileSystem`], looking for TypeScript sources and
//! declaration files the way `tsc` does.

use crate::fs::FileSystem;
use crate::path::normalize_path;
use ahash::AHashMap;
use parking_lot::Mutex;
use serde::Deserialize;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

const EXTENSIONS: &[&str] = &[".ts", ".tsx", ".d.ts"];

/// Maps a module specifier appearing in a file to the file it refers to.
pub trait ResolveModule {
  fn resolve_module(&self, specifier: &str, containing_file: &Path) -> Option<PathBuf>;
}

impl<F> ResolveModule for F
where
  F: Fn(&str, &Path) -> Option<PathBuf>,
{
  fn resolve_module(&self, specifier: &str, containing_file: &Path) -> Option<PathBuf> {
    self(specifier, containing_file)
  }
}

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
  types: Option<String>,
  typings: Option<String>,
  main: Option<String>,
}

fn is_path_specifier(specifier: &str) -> bool {
  specifier == "."
    || specifier == ".."
    || specifier.starts_with("./")
    || specifier.starts_with("../")
    || specifier.starts_with('/')
}

/// The directory name under `@types` for a package: `@scope/name` is `scope__name`.
fn types_package_name(specifier: &str) -> String {
  match specifier.strip_prefix('@') {
    Some(unscoped) if unscoped.contains('/') => unscoped.replacen('/', "__", 1),
    _ => specifier.to_string(),
  }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
  let mut s = path.as_os_str().to_os_string();
  s.push(suffix);
  PathBuf::from(s)
}

pub struct NodeResolver<'a> {
  fs: &'a dyn FileSystem,
  package_json: Mutex<AHashMap<PathBuf, Option<Arc<PackageJson>>>>,
}

impl<'a> NodeResolver<'a> {
  pub fn new(fs: &'a dyn FileSystem) -> NodeResolver<'a> {
    NodeResolver {
      fs,
      package_json: Mutex::new(AHashMap::new()),
    }
  }

  fn package_json(&self, path: &Path) -> Option<Arc<PackageJson>> {
    if let Some(cached) = self.package_json.lock().get(path) {
      return cached.clone();
    };
    let parsed = if self.fs.is_file(path) {
      self
        .fs
        .read_to_string(path)
        .ok()
        .and_then(|raw| match serde_json::from_str::<PackageJson>(&raw) {
          Ok(pkg) => Some(Arc::new(pkg)),
          Err(err) => {
            debug!(path = %path.display(), %err, "ignoring unreadable package.json");
            None
          }
        })
    } else {
      None
    };
    self
      .package_json
      .lock()
      .insert(path.to_path_buf(), parsed.clone());
    parsed
  }

  fn resolve_file(&self, path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    if EXTENSIONS.iter().any(|ext| name.ends_with(ext)) && self.fs.is_file(path) {
      return Some(path.to_path_buf());
    };
    // `./foo.js` in TypeScript sources refers to `foo.ts`.
    if let Some(stem) = name
      .strip_suffix(".js")
      .or_else(|| name.strip_suffix(".jsx"))
    {
      let stem = path.with_file_name(stem);
      if let Some(found) = EXTENSIONS
        .iter()
        .map(|ext| with_suffix(&stem, ext))
        .find(|candidate| self.fs.is_file(candidate))
      {
        return Some(found);
      };
    };
    EXTENSIONS
      .iter()
      .map(|ext| with_suffix(path, ext))
      .find(|candidate| self.fs.is_file(candidate))
  }

  fn resolve_index(&self, dir: &Path) -> Option<PathBuf> {
    EXTENSIONS
      .iter()
      .map(|ext| dir.join(format!("index{ext}")))
      .find(|candidate| self.fs.is_file(candidate))
  }

  fn resolve_directory(&self, dir: &Path) -> Option<PathBuf> {
    if !self.fs.is_dir(dir) {
      return None;
    };
    if let Some(pkg) = self.package_json(&dir.join("package.json")) {
      for entry in [&pkg.types, &pkg.typings, &pkg.main].into_iter().flatten() {
        let target = normalize_path(&dir.join(entry));
        if let Some(found) = self
          .resolve_file(&target)
          .or_else(|| self.resolve_index(&target))
        {
          return Some(found);
        };
      }
    };
    self.resolve_index(dir)
  }

  fn resolve_path(&self, path: &Path) -> Option<PathBuf> {
    self
      .resolve_file(path)
      .or_else(|| self.resolve_directory(path))
  }
}

impl<'a> ResolveModule for NodeResolver<'a> {
  fn resolve_module(&self, specifier: &str, containing_file: &Path) -> Option<PathBuf> {
    let dir = containing_file.parent().unwrap_or_else(|| Path::new(""));
    if is_path_specifier(specifier) {
      return self.resolve_path(&normalize_path(&dir.join(specifier)));
    };
    let types_name = types_package_name(specifier);
    for ancestor in dir.ancestors() {
      let node_modules = ancestor.join("node_modules");
      if !self.fs.is_dir(&node_modules) {
        continue;
      };
      let found = self
        .resolve_path(&normalize_path(&node_modules.join(specifier)))
        .or_else(|| {
          self.resolve_path(&normalize_path(
            &node_modules.join("@types").join(&types_name),
          ))
        });
      if found.is_some() {
        return found;
      };
    }
    None
  }
}
