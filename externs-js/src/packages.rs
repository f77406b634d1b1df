use crate::error::ExternsError;
use crate::identifier::module_name_to_identifier;
use crate::path::absolute_path;
use crate::path::to_slash;
use globset::GlobBuilder;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use walkdir::DirEntry;
use walkdir::WalkDir;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
  /// The name used to import the package, e.g. `react`.
  pub name: String,
  /// Overrides the default globs `<root>/<name>/**/*.d.ts` and `<root>/@types/<name>/**/*.d.ts`.
  #[serde(default)]
  pub declaration_globs: Option<Vec<String>>,
}

impl Package {
  pub fn new(name: impl Into<String>) -> Package {
    Package {
      name: name.into(),
      declaration_globs: None,
    }
  }

  pub fn with_declaration_globs(mut self, globs: Vec<String>) -> Package {
    self.declaration_globs = Some(globs);
    self
  }

  pub fn identifier(&self) -> String {
    module_name_to_identifier(&self.name)
  }

  pub fn declaration_globs(&self, package_root: &Path) -> Vec<String> {
    match &self.declaration_globs {
      Some(globs) => globs.clone(),
      None => vec![
        to_slash(&package_root.join(&self.name).join("**/*.d.ts")),
        to_slash(&package_root.join("@types").join(&self.name).join("**/*.d.ts")),
      ],
    }
  }
}

fn is_glob_meta(c: char) -> bool {
  matches!(c, '*' | '?' | '[' | '{')
}

/// The longest leading run of path components without glob syntax.
fn literal_base(pattern: &Path) -> PathBuf {
  pattern
    .components()
    .take_while(|c| !c.as_os_str().to_string_lossy().contains(is_glob_meta))
    .collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
  entry
    .file_name()
    .to_str()
    .is_some_and(|name| name.starts_with('.'))
}

/// Expands globs into the sorted set of files they match. Relative globs are relative to the
/// current directory. Hidden files and directories are only matched if named literally.
///
/// Matching always lists directories on the OS file system, whatever [`FileSystem`] the caller
/// reads declaration files through.
///
/// [`FileSystem`]: crate::fs::FileSystem
pub fn expand_globs<I>(globs: I) -> Result<Vec<PathBuf>, ExternsError>
where
  I: IntoIterator,
  I::Item: AsRef<str>,
{
  let mut files = BTreeSet::new();
  for glob in globs {
    let glob = glob.as_ref();
    let pattern = absolute_path(Path::new(glob)).map_err(ExternsError::CurrentDir)?;
    let matcher = GlobBuilder::new(&to_slash(&pattern))
      .literal_separator(true)
      .build()
      .map_err(|source| ExternsError::Glob {
        glob: glob.to_string(),
        source,
      })?
      .compile_matcher();
    let base = literal_base(&pattern);
    if !base.exists() {
      debug!(glob, "glob base does not exist");
      continue;
    };
    let walker = WalkDir::new(&base)
      .follow_links(true)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
    for entry in walker {
      let entry = entry.map_err(|source| ExternsError::Walk {
        path: base.clone(),
        source,
      })?;
      if entry.file_type().is_file() && matcher.is_match(entry.path()) {
        files.insert(entry.into_path());
      };
    }
  }
  Ok(files.into_iter().collect())
}
