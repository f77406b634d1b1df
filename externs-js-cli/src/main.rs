use anyhow::Context;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use externs_js::{
  generate_externs, generate_externs_for_packages, load_libraries, process_libraries,
  GenerateOptions, NodeResolver, OsFileSystem, Package, PackagesOptions, SymbolResolver,
  VisitedScope,
};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
  name = "externs-js",
  author,
  version,
  about = "Generates Closure Compiler externs from TypeScript declaration (.d.ts) files"
)]
struct Cli {
  /// Directory to write extern files to.
  #[arg(long, global = true, default_value = ".")]
  out_path: PathBuf,

  /// Keep every symbol in source order and annotate it with where it was declared.
  #[arg(long, global = true)]
  debug: bool,

  /// Log which files are followed and written to stderr.
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate externs from the declaration files of installed packages.
  Packages(PackagesArgs),
  /// Generate externs from the given declaration files.
  Declarations(DeclarationsArgs),
  /// Generate externs for every library in a JSON libraries file.
  Libraries(LibrariesArgs),
  /// Print the symbols found in the given declaration files as JSON.
  Symbols(SymbolsArgs),
  /// Print the syntax tree of a declaration file as JSON.
  Parse(ParseArgs),
}

#[derive(Args)]
struct PackagesArgs {
  /// Package names, e.g. `react` or `@types/react-dom`.
  #[arg(required = true)]
  packages: Vec<String>,

  /// Directory packages are installed in.
  #[arg(long, default_value = "node_modules")]
  package_root: PathBuf,

  /// Share visited files across packages, so a common dependency only appears in the first
  /// package's externs.
  #[arg(long)]
  shared_visited: bool,
}

#[derive(Args)]
struct DeclarationsArgs {
  /// Name of the output file, without `.js`.
  identifier: String,

  /// Declaration files to read.
  #[arg(required = true)]
  declarations: Vec<PathBuf>,

  /// Declaration files to neither read nor follow.
  #[arg(long)]
  ignore: Vec<PathBuf>,
}

#[derive(Args)]
struct LibrariesArgs {
  /// JSON file containing an array of library descriptors.
  libraries: PathBuf,
}

#[derive(Args)]
struct SymbolsArgs {
  /// Declaration files to read.
  #[arg(required = true)]
  declarations: Vec<PathBuf>,

  /// Declaration files to neither read nor follow.
  #[arg(long)]
  ignore: Vec<PathBuf>,
}

#[derive(Args)]
struct ParseArgs {
  /// Declaration file to parse.
  file: PathBuf,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);
  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(verbose: bool) {
  let default = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_ansi(false)
    .try_init();
}

fn run(cli: Cli) -> Result<()> {
  let disk = OsFileSystem;
  let modules = NodeResolver::new(&disk);
  match cli.command {
    Commands::Packages(args) => {
      let packages = args.packages.into_iter().map(Package::new).collect();
      let scope = if args.shared_visited {
        VisitedScope::Shared
      } else {
        VisitedScope::Isolated
      };
      let options = PackagesOptions::new(packages)
        .with_out_path(cli.out_path)
        .with_package_root(args.package_root)
        .with_debug(cli.debug)
        .with_visited_scope(scope);
      let written = generate_externs_for_packages(&options, &disk, &modules)
        .context("failed to generate package externs")?;
      debug!(files = written.len(), "generated package externs");
    }
    Commands::Declarations(args) => {
      let options = GenerateOptions::new(args.identifier, args.declarations)
        .with_out_path(cli.out_path)
        .with_ignore_declaration_files(args.ignore)
        .with_debug(cli.debug);
      generate_externs(&options, &disk, &modules)
        .with_context(|| format!("failed to generate externs for {}", options.identifier))?;
    }
    Commands::Libraries(args) => {
      let libraries = load_libraries(&disk, &args.libraries)?;
      let written = process_libraries(&cli.out_path, &libraries, cli.debug, &disk, &modules)
        .context("failed to generate library externs")?;
      debug!(files = written.len(), "generated library externs");
    }
    Commands::Symbols(args) => {
      let symbols = SymbolResolver::new(&disk, &modules)
        .resolve(&args.declarations, &args.ignore)
        .context("failed to resolve symbols")?;
      println!("{}", serde_json::to_string_pretty(&symbols)?);
    }
    Commands::Parse(args) => {
      let source = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
      let top_level = parse_dts::parse(&source).map_err(|err| {
        let position = parse_dts::loc::LineIndex::new(&source).line_col(err.loc.0);
        anyhow::anyhow!(
          "{}:{}:{}: {err}",
          args.file.display(),
          position.line + 1,
          position.column + 1
        )
      })?;
      println!("{}", serde_json::to_string_pretty(&top_level)?);
    }
  };
  Ok(())
}
