use crate::error::ExternImportError;
use crate::error::ExternsError;
use crate::fs::FileSystem;
use crate::identifier::module_name_to_identifier;
use crate::path::absolute_path;
use crate::path::normalize_path;
use crate::path::to_slash;
use serde::Deserialize;
use std::path::Path;
use std::path::PathBuf;

/// A library as written in a libraries file, before defaults are applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryConfig {
  pub module_name: String,
  #[serde(default)]
  pub identifier: Option<String>,
  #[serde(default)]
  pub extern_imports: Vec<PathBuf>,
  #[serde(default)]
  pub declaration_globs: Vec<String>,
}

impl LibraryConfig {
  pub fn new(module_name: impl Into<String>) -> LibraryConfig {
    LibraryConfig {
      module_name: module_name.into(),
      ..LibraryConfig::default()
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Library {
  /// The name used to import the module.
  pub module_name: String,
  /// Safe to use as a file name.
  pub identifier: String,
  /// Modules that force the externs for this library to be loaded.
  pub extern_imports: Vec<PathBuf>,
  pub declaration_globs: Vec<String>,
}

/// Fills in a [`LibraryConfig`], finding packages by walking up `node_modules` directories from
/// `base_path`.
pub struct LibraryDefaults<'a> {
  fs: &'a dyn FileSystem,
  base_path: PathBuf,
}

impl<'a> LibraryDefaults<'a> {
  pub fn new(fs: &'a dyn FileSystem, base_path: impl Into<PathBuf>) -> LibraryDefaults<'a> {
    LibraryDefaults {
      fs,
      base_path: normalize_path(&base_path.into()),
    }
  }

  /// The directory of the package that `<name>/package.json` resolves to.
  fn find_package_dir(&self, name: &str) -> Option<PathBuf> {
    self.base_path.ancestors().find_map(|dir| {
      let package_dir = dir.join("node_modules").join(name);
      self
        .fs
        .is_file(&package_dir.join("package.json"))
        .then(|| normalize_path(&package_dir))
    })
  }

  fn resolve(&self, path: &Path) -> PathBuf {
    normalize_path(&self.base_path.join(path))
  }

  pub fn apply(&self, config: LibraryConfig) -> Result<Library, ExternImportError> {
    let mut extern_imports = Vec::with_capacity(config.extern_imports.len());
    for extern_import in config.extern_imports {
      let path = self.resolve(&extern_import);
      if !self.fs.is_file(&path) {
        return Err(ExternImportError {
          module_name: config.module_name,
          extern_import,
        });
      };
      extern_imports.push(path);
    }

    let mut declaration_globs: Vec<String> = [
      self.find_package_dir(&config.module_name),
      self.find_package_dir(&format!("@types/{}", config.module_name)),
    ]
    .into_iter()
    .flatten()
    .map(|dir| to_slash(&dir.join("**/*.d.ts")))
    .collect();
    declaration_globs.extend(
      config
        .declaration_globs
        .iter()
        .map(|glob| to_slash(&self.resolve(Path::new(glob)))),
    );

    let identifier = config
      .identifier
      .unwrap_or_else(|| module_name_to_identifier(&config.module_name));
    Ok(Library {
      module_name: config.module_name,
      identifier,
      extern_imports,
      declaration_globs,
    })
  }
}

/// Reads a JSON array of [`LibraryConfig`] and applies defaults relative to the file's directory.
pub fn load_libraries(fs: &dyn FileSystem, path: &Path) -> Result<Vec<Library>, ExternsError> {
  let path = absolute_path(path).map_err(ExternsError::CurrentDir)?;
  let raw = fs
    .read_to_string(&path)
    .map_err(|source| ExternsError::LibrariesRead {
      path: path.clone(),
      source,
    })?;
  let configs: Vec<LibraryConfig> =
    serde_json::from_str(&raw).map_err(|source| ExternsError::LibrariesJson {
      path: path.clone(),
      source,
    })?;
  let defaults = LibraryDefaults::new(fs, path.parent().unwrap_or_else(|| Path::new("/")));
  let mut libraries = Vec::with_capacity(configs.len());
  for config in configs {
    libraries.push(defaults.apply(config)?);
  }
  Ok(libraries)
}

#[cfg(test)]
mod tests {
  use super::load_libraries;
  use super::LibraryConfig;
  use super::LibraryDefaults;
  use crate::error::ExternsError;
  use crate::fs::MemoryFileSystem;
  use std::path::Path;
  use std::path::PathBuf;

  fn fixture() -> MemoryFileSystem {
    MemoryFileSystem::new()
      .with_file("/proj/node_modules/react/package.json", "{}")
      .with_file("/proj/node_modules/@types/react/package.json", "{}")
      .with_file("/node_modules/@scoped/pkg/package.json", "{}")
      .with_file("/proj/externs/react.js", "")
  }

  #[test]
  fn applies_defaults() {
    let fs = fixture();
    let defaults = LibraryDefaults::new(&fs, "/proj/app");
    let library = defaults.apply(LibraryConfig::new("react")).unwrap();
    assert_eq!(library.identifier, "react");
    assert!(library.extern_imports.is_empty());
    assert_eq!(library.declaration_globs, vec![
      "/proj/node_modules/react/**/*.d.ts".to_string(),
      "/proj/node_modules/@types/react/**/*.d.ts".to_string(),
    ]);

    let library = defaults
      .apply(LibraryConfig {
        identifier: Some("scoped".to_string()),
        declaration_globs: vec!["../types/*.d.ts".to_string()],
        ..LibraryConfig::new("@scoped/pkg")
      })
      .unwrap();
    assert_eq!(library.identifier, "scoped");
    assert_eq!(library.declaration_globs, vec![
      "/node_modules/@scoped/pkg/**/*.d.ts".to_string(),
      "/proj/types/*.d.ts".to_string(),
    ]);

    let library = defaults.apply(LibraryConfig::new("missing-pkg")).unwrap();
    assert_eq!(library.identifier, "missing_pkg");
    assert!(library.declaration_globs.is_empty());
  }

  #[test]
  fn checks_extern_imports() {
    let fs = fixture();
    let defaults = LibraryDefaults::new(&fs, "/proj");
    let library = defaults
      .apply(LibraryConfig {
        extern_imports: vec![PathBuf::from("externs/react.js")],
        ..LibraryConfig::new("react")
      })
      .unwrap();
    assert_eq!(library.extern_imports, vec![PathBuf::from(
      "/proj/externs/react.js"
    )]);

    let err = defaults
      .apply(LibraryConfig {
        extern_imports: vec![PathBuf::from("externs/missing.js")],
        ..LibraryConfig::new("react")
      })
      .unwrap_err();
    assert_eq!(
      err.to_string(),
      "extern import externs/missing.js for library react does not exist"
    );
  }

  #[test]
  fn loads_libraries_file() {
    let fs = fixture().with_file(
      "/proj/libraries.json",
      r#"[{"moduleName": "react", "externImports": ["externs/react.js"]}, {"moduleName": "@scoped/pkg"}]"#,
    );
    let libraries = load_libraries(&fs, Path::new("/proj/libraries.json")).unwrap();
    assert_eq!(libraries.len(), 2);
    assert_eq!(libraries[0].module_name, "react");
    assert_eq!(libraries[1].identifier, "scoped__pkg");

    fs.insert("/proj/bad.json", r#"[{"identifier": "x"}]"#);
    let err = load_libraries(&fs, Path::new("/proj/bad.json")).unwrap_err();
    assert!(matches!(err, ExternsError::LibrariesJson { .. }));

    let err = load_libraries(&fs, Path::new("/proj/none.json")).unwrap_err();
    assert!(matches!(err, ExternsError::LibrariesRead { .. }));
  }
}
