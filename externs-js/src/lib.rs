//! Generates Closure Compiler externs from TypeScript declaration files.
//!
//! Names declared by a library's `.d.ts` files, and by every file they import or reference, are
//! collected by [`SymbolResolver`] and written by [`write_externs`] as a file like:
//!
//! ```text
//! // @formatter:off
//! var React;
//! const __react = {};
//! __react.createElement;
//! __react.useState;
//! ```
//!
//! Globals declared with `declare` become `var` declarations; every other name becomes a property
//! of a container object, so a minifier won't rename properties the library accesses.

pub mod collate;
pub mod error;
pub mod fs;
pub mod generate;
pub mod identifier;
pub mod library;
pub mod node_resolve;
pub mod packages;
pub mod path;
pub mod resolve;
pub mod symbol;
pub mod writer;

pub use error::ExternImportError;
pub use error::ExternsError;
pub use error::ResolveError;
pub use fs::FileSystem;
pub use fs::MemoryFileSystem;
pub use fs::OsFileSystem;
pub use generate::generate_externs;
pub use generate::generate_externs_for_packages;
pub use generate::process_libraries;
pub use generate::GenerateOptions;
pub use generate::PackagesOptions;
pub use generate::VisitedScope;
pub use identifier::module_name_to_identifier;
pub use library::load_libraries;
pub use library::Library;
pub use library::LibraryConfig;
pub use library::LibraryDefaults;
pub use node_resolve::NodeResolver;
pub use node_resolve::ResolveModule;
pub use packages::expand_globs;
pub use packages::Package;
pub use resolve::IgnorePolicy;
pub use resolve::SymbolResolver;
pub use resolve::VisitedFiles;
pub use symbol::ExternalSymbol;
pub use symbol::Position;
pub use symbol::SymbolKind;
pub use writer::render_externs;
pub use writer::write_externs;
