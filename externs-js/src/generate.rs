use crate::error::ExternsError;
use crate::fs::FileSystem;
use crate::library::Library;
use crate::node_resolve::ResolveModule;
use crate::packages::expand_globs;
use crate::packages::Package;
use crate::path::absolute_path;
use crate::resolve::IgnorePolicy;
use crate::resolve::SymbolResolver;
use crate::resolve::VisitedFiles;
use crate::writer::write_externs;
use ahash::AHashMap;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug_span;

/// How followed files are tracked across the libraries of one batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisitedScope {
  /// Each library starts from the batch's declaration files only, so a dependency shared by two
  /// libraries appears in both.
  #[default]
  Isolated,
  /// A file followed for one library is not followed again for a later one.
  Shared,
}

#[derive(Clone, Debug)]
pub struct GenerateOptions {
  pub out_path: PathBuf,
  /// The output file name and container variable, e.g. `react`.
  pub identifier: String,
  pub declaration_files: Vec<PathBuf>,
  /// Files that are not followed when referenced.
  pub ignore_declaration_files: Vec<PathBuf>,
  pub debug: bool,
}

impl GenerateOptions {
  pub fn new(identifier: impl Into<String>, declaration_files: Vec<PathBuf>) -> GenerateOptions {
    GenerateOptions {
      out_path: PathBuf::from("."),
      identifier: identifier.into(),
      declaration_files,
      ignore_declaration_files: Vec::new(),
      debug: false,
    }
  }

  pub fn with_out_path(mut self, out_path: impl Into<PathBuf>) -> GenerateOptions {
    self.out_path = out_path.into();
    self
  }

  pub fn with_ignore_declaration_files(mut self, files: Vec<PathBuf>) -> GenerateOptions {
    self.ignore_declaration_files = files;
    self
  }

  pub fn with_debug(mut self, debug: bool) -> GenerateOptions {
    self.debug = debug;
    self
  }
}

/// Generates externs for a set of declaration files. Returns the written file, if any symbols
/// were found.
pub fn generate_externs(
  options: &GenerateOptions,
  fs: &dyn FileSystem,
  modules: &dyn ResolveModule,
) -> Result<Option<PathBuf>, ExternsError> {
  let _span = debug_span!("generate_externs", identifier = %options.identifier).entered();
  let symbols = SymbolResolver::new(fs, modules)
    .resolve(&options.declaration_files, &options.ignore_declaration_files)?;
  write_externs(
    fs,
    &options.out_path,
    &options.identifier,
    &symbols,
    options.debug,
  )
}

#[derive(Clone, Debug)]
pub struct PackagesOptions {
  pub out_path: PathBuf,
  pub packages: Vec<Package>,
  /// Where packages are installed, e.g. `node_modules`.
  pub package_root: PathBuf,
  pub debug: bool,
  pub visited_scope: VisitedScope,
  pub ignore: IgnorePolicy,
}

impl PackagesOptions {
  pub fn new(packages: Vec<Package>) -> PackagesOptions {
    PackagesOptions {
      out_path: PathBuf::from("."),
      packages,
      package_root: PathBuf::from("node_modules"),
      debug: false,
      visited_scope: VisitedScope::default(),
      ignore: IgnorePolicy::default(),
    }
  }

  pub fn with_out_path(mut self, out_path: impl Into<PathBuf>) -> PackagesOptions {
    self.out_path = out_path.into();
    self
  }

  pub fn with_package_root(mut self, package_root: impl Into<PathBuf>) -> PackagesOptions {
    self.package_root = package_root.into();
    self
  }

  pub fn with_debug(mut self, debug: bool) -> PackagesOptions {
    self.debug = debug;
    self
  }

  pub fn with_visited_scope(mut self, visited_scope: VisitedScope) -> PackagesOptions {
    self.visited_scope = visited_scope;
    self
  }

  pub fn with_ignore_policy(mut self, ignore: IgnorePolicy) -> PackagesOptions {
    self.ignore = ignore;
    self
  }
}

/// One extern file per identifier, from the declaration files matched for it.
struct BatchEntry {
  identifier: String,
  files: Vec<PathBuf>,
}

/// Generates each entry's externs with every file of the batch excluded from following, so
/// a library that imports another library of the batch doesn't repeat its symbols.
fn generate_batch(
  entries: Vec<BatchEntry>,
  out_path: &Path,
  debug: bool,
  visited_scope: VisitedScope,
  ignore: &IgnorePolicy,
  fs: &dyn FileSystem,
  modules: &dyn ResolveModule,
) -> Result<Vec<PathBuf>, ExternsError> {
  // A later entry with the same identifier replaces the earlier one but keeps its place.
  let mut index = AHashMap::new();
  let mut deduped: Vec<BatchEntry> = Vec::new();
  for entry in entries {
    match index.get(&entry.identifier) {
      Some(&i) => deduped[i] = entry,
      None => {
        index.insert(entry.identifier.clone(), deduped.len());
        deduped.push(entry);
      }
    };
  }

  let mut batch_visited = VisitedFiles::new();
  for entry in deduped.iter() {
    for file in entry.files.iter() {
      batch_visited.insert(&absolute_path(file).map_err(ExternsError::CurrentDir)?);
    }
  }

  let resolver = SymbolResolver::new(fs, modules).with_ignore_policy(ignore.clone());
  let mut shared = batch_visited.clone();
  let mut written = Vec::new();
  for entry in deduped {
    let _span = debug_span!("generate_externs", identifier = %entry.identifier).entered();
    let symbols = match visited_scope {
      VisitedScope::Isolated => {
        let mut visited = batch_visited.clone();
        resolver.resolve_with_visited(&entry.files, &mut visited)?
      }
      VisitedScope::Shared => resolver.resolve_with_visited(&entry.files, &mut shared)?,
    };
    if let Some(path) = write_externs(fs, out_path, &entry.identifier, &symbols, debug)? {
      written.push(path);
    };
  }
  Ok(written)
}

/// Generates externs for packages, finding their declaration files with
/// [`Package::declaration_globs`]. Returns the written files.
///
/// Globs are matched against the OS file system by [`expand_globs`]; `fs` is used to read the
/// matched files and write the externs.
pub fn generate_externs_for_packages(
  options: &PackagesOptions,
  fs: &dyn FileSystem,
  modules: &dyn ResolveModule,
) -> Result<Vec<PathBuf>, ExternsError> {
  let package_root = absolute_path(&options.package_root).map_err(ExternsError::CurrentDir)?;
  let mut entries = Vec::with_capacity(options.packages.len());
  for package in options.packages.iter() {
    entries.push(BatchEntry {
      identifier: package.identifier(),
      files: expand_globs(package.declaration_globs(&package_root))?,
    });
  }
  generate_batch(
    entries,
    &options.out_path,
    options.debug,
    options.visited_scope,
    &options.ignore,
    fs,
    modules,
  )
}

/// Generates externs for libraries from a libraries file. Returns the written files.
///
/// As with [`generate_externs_for_packages`], declaration globs are matched on the OS file system
/// and `fs` only reads and writes.
pub fn process_libraries(
  out_path: &Path,
  libraries: &[Library],
  debug: bool,
  fs: &dyn FileSystem,
  modules: &dyn ResolveModule,
) -> Result<Vec<PathBuf>, ExternsError> {
  let mut entries = Vec::with_capacity(libraries.len());
  for library in libraries {
    entries.push(BatchEntry {
      identifier: library.identifier.clone(),
      files: expand_globs(&library.declaration_globs)?,
    });
  }
  generate_batch(
    entries,
    out_path,
    debug,
    VisitedScope::Isolated,
    &IgnorePolicy::default(),
    fs,
    modules,
  )
}
