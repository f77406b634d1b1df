use crate::path::normalize_path;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use std::path::PathBuf;

/// File access needed to resolve declaration files and write externs.
///
/// Implementations receive absolute paths.
pub trait FileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String>;
  fn is_file(&self, path: &Path) -> bool;
  fn is_dir(&self, path: &Path) -> bool;
  fn create_dir_all(&self, path: &Path) -> io::Result<()>;
  fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path)
  }

  fn is_file(&self, path: &Path) -> bool {
    path.is_file()
  }

  fn is_dir(&self, path: &Path) -> bool {
    path.is_dir()
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    std::fs::create_dir_all(path)
  }

  fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
    std::fs::write(path, contents)
  }
}

#[derive(Debug, Default)]
struct MemoryState {
  files: BTreeMap<PathBuf, String>,
  dirs: BTreeSet<PathBuf>,
}

impl MemoryState {
  fn is_dir(&self, path: &Path) -> bool {
    path.parent().is_none()
      || self.dirs.contains(path)
      || self
        .files
        .keys()
        .any(|file| file != path && file.starts_with(path))
  }
}

/// A file system held entirely in memory. A directory exists if it was created explicitly or
/// contains a file.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
  state: Mutex<MemoryState>,
}

impl MemoryFileSystem {
  pub fn new() -> MemoryFileSystem {
    MemoryFileSystem::default()
  }

  pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<String>) -> MemoryFileSystem {
    self.insert(path, contents);
    self
  }

  pub fn insert(&self, path: impl AsRef<Path>, contents: impl Into<String>) {
    self
      .state
      .lock()
      .files
      .insert(normalize_path(path.as_ref()), contents.into());
  }

  pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
    self
      .state
      .lock()
      .files
      .get(&normalize_path(path.as_ref()))
      .cloned()
  }

  /// All file paths, sorted.
  pub fn files(&self) -> Vec<PathBuf> {
    self.state.lock().files.keys().cloned().collect()
  }
}

impl FileSystem for MemoryFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    self.file(path).ok_or_else(|| {
      io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
      )
    })
  }

  fn is_file(&self, path: &Path) -> bool {
    self
      .state
      .lock()
      .files
      .contains_key(&normalize_path(path))
  }

  fn is_dir(&self, path: &Path) -> bool {
    self.state.lock().is_dir(&normalize_path(path))
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    let mut state = self.state.lock();
    let path = normalize_path(path);
    if state.files.contains_key(&path) {
      return Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{} is a file", path.display()),
      ));
    };
    for dir in path.ancestors() {
      state.dirs.insert(dir.to_path_buf());
    }
    Ok(())
  }

  fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
    let mut state = self.state.lock();
    let path = normalize_path(path);
    let parent = path.parent().unwrap_or(Path::new(""));
    if !state.is_dir(parent) {
      return Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("directory {} does not exist", parent.display()),
      ));
    };
    state.files.insert(path, contents.to_string());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::FileSystem;
  use super::MemoryFileSystem;
  use std::io;
  use std::path::Path;

  #[test]
  fn directories_are_implied_by_files() {
    let fs = MemoryFileSystem::new().with_file("/pkg/lib/index.d.ts", "");
    assert!(fs.is_file(Path::new("/pkg/lib/index.d.ts")));
    assert!(fs.is_dir(Path::new("/pkg/lib")));
    assert!(fs.is_dir(Path::new("/pkg")));
    assert!(fs.is_dir(Path::new("/")));
    assert!(!fs.is_dir(Path::new("/pkg/lib/index.d.ts")));
    assert!(!fs.is_dir(Path::new("/pk")));
    assert!(fs.is_file(Path::new("/pkg/./lib/../lib/index.d.ts")));
  }

  #[test]
  fn write_requires_parent_directory() {
    let fs = MemoryFileSystem::new();
    let err = fs.write(Path::new("/out/a.js"), "a").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);

    fs.create_dir_all(Path::new("/out")).unwrap();
    fs.write(Path::new("/out/a.js"), "a").unwrap();
    assert_eq!(fs.file("/out/a.js").as_deref(), Some("a"));
    assert_eq!(fs.read_to_string(Path::new("/out/a.js")).unwrap(), "a");
  }
}
