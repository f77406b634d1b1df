use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::path::MAIN_SEPARATOR;

/// Resolves `.` and `..` components lexically, without consulting the file system.
pub fn normalize_path(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match out.components().next_back() {
        Some(Component::Normal(_)) => {
          out.pop();
        }
        // `/..` is `/`.
        Some(Component::RootDir | Component::Prefix(_)) => {}
        _ => out.push(".."),
      },
      c => out.push(c.as_os_str()),
    };
  }
  out
}

/// Joins a relative path onto the current directory, then normalizes it.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
  let joined = if path.is_absolute() {
    path.to_path_buf()
  } else {
    std::env::current_dir()?.join(path)
  };
  Ok(normalize_path(&joined))
}

/// The path from directory `base` to `path`, both absolute and normalized.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
  let base: Vec<Component> = base.components().collect();
  let path: Vec<Component> = path.components().collect();
  let common = base
    .iter()
    .zip(path.iter())
    .take_while(|(a, b)| a == b)
    .count();
  let mut out = PathBuf::new();
  for _ in common..base.len() {
    out.push("..");
  }
  for c in &path[common..] {
    out.push(c.as_os_str());
  }
  out
}

/// The path as a string with `/` separators on every platform.
pub fn to_slash(path: &Path) -> String {
  let s = path.to_string_lossy();
  if MAIN_SEPARATOR == '/' {
    s.into_owned()
  } else {
    s.replace(MAIN_SEPARATOR, "/")
  }
}
