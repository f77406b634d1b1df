use externs_js::generate_externs;
use externs_js::generate_externs_for_packages;
use externs_js::load_libraries;
use externs_js::process_libraries;
use externs_js::writer::LINE_ENDING;
use externs_js::GenerateOptions;
use externs_js::MemoryFileSystem;
use externs_js::NodeResolver;
use externs_js::OsFileSystem;
use externs_js::Package;
use externs_js::PackagesOptions;
use externs_js::VisitedScope;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

fn no_modules(_: &str, _: &Path) -> Option<PathBuf> {
  None
}

fn lines(lines: &[&str]) -> String {
  let mut out = lines.join(LINE_ENDING);
  out.push_str(LINE_ENDING);
  out
}

#[test]
fn writes_sorted_externs() {
  let fs = MemoryFileSystem::new().with_file(
    "/lib/index.d.ts",
    "declare namespace Lib {\n  function b(): void;\n  const a: string;\n}\ninterface Options { zoom: number; a: string }\n",
  );
  let options =
    GenerateOptions::new("my-lib", vec![PathBuf::from("/lib/index.d.ts")]).with_out_path("/out");
  let written = generate_externs(&options, &fs, &no_modules).unwrap();
  assert_eq!(written, Some(PathBuf::from("/out/my-lib.js")));
  assert_eq!(
    fs.file("/out/my-lib.js").unwrap(),
    lines(&[
      "// @formatter:off",
      "var Lib;",
      "const __my_lib = {};",
      "__my_lib.a;",
      "__my_lib.b;",
      "__my_lib.zoom;",
    ])
  );
}

#[test]
fn writes_debug_positions() {
  let fs = MemoryFileSystem::new().with_file(
    "/proj/types/a.d.ts",
    "declare const x: {\n  y: number;\n};\nexport declare const x: 1;\n",
  );
  let options = GenerateOptions::new("a", vec![PathBuf::from("/proj/types/a.d.ts")])
    .with_out_path("/proj/out")
    .with_debug(true);
  generate_externs(&options, &fs, &no_modules).unwrap();
  assert_eq!(
    fs.file("/proj/out/a.js").unwrap(),
    lines(&[
      "// @formatter:off",
      "var x; // ../types/a.d.ts (1:15)",
      "var x; // ../types/a.d.ts (4:22)",
      "const __a = {};",
      "__a.y; // ../types/a.d.ts (2:3)",
    ])
  );
}

#[test]
fn writes_nothing_without_symbols() {
  let fs = MemoryFileSystem::new().with_file("/lib/empty.d.ts", "interface Empty {}\nexport {};\n");
  let options =
    GenerateOptions::new("empty", vec![PathBuf::from("/lib/empty.d.ts")]).with_out_path("/out");
  assert_eq!(generate_externs(&options, &fs, &no_modules).unwrap(), None);
  assert_eq!(fs.files(), vec![PathBuf::from("/lib/empty.d.ts")]);
}

#[test]
fn does_not_follow_ignored_files() {
  let fs = MemoryFileSystem::new()
    .with_file("/lib/index.d.ts", "import \"./dep\";\ndeclare const own: 1;")
    .with_file("/lib/dep.d.ts", "declare const dep: 1;");
  let modules = |_: &str, _: &Path| Some(PathBuf::from("/lib/dep.d.ts"));
  let options = GenerateOptions::new("lib", vec![PathBuf::from("/lib/index.d.ts")])
    .with_out_path("/out")
    .with_ignore_declaration_files(vec![PathBuf::from("/lib/dep.d.ts")]);
  generate_externs(&options, &fs, &modules).unwrap();
  assert_eq!(
    fs.file("/out/lib.js").unwrap(),
    lines(&["// @formatter:off", "var own;", "const __lib = {};"])
  );
}

fn write_tree(root: &Path, files: &[(&str, &str)]) {
  for (path, contents) in files {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
  }
}

fn package_tree(root: &Path) {
  write_tree(root, &[
    ("node_modules/a/package.json", r#"{"types": "index.d.ts"}"#),
    (
      "node_modules/a/index.d.ts",
      "import { B } from \"b\";\nimport \"shared\";\nexport declare function aFn(): void;\n",
    ),
    (
      "node_modules/b/index.d.ts",
      "export declare class B {\n  bMember: string;\n}\n",
    ),
    (
      "node_modules/shared/index.d.ts",
      "declare const sharedThing: number;\n",
    ),
    ("node_modules/@types/c/package.json", "{}"),
    (
      "node_modules/@types/c/index.d.ts",
      "/// <reference types=\"node\" />\nimport \"shared\";\ndeclare const c: number;\n",
    ),
  ]);
}

fn read(path: &Path) -> String {
  fs::read_to_string(path).unwrap()
}

#[test]
fn generates_externs_for_packages() {
  let dir = tempfile::tempdir().unwrap();
  let root = dir.path();
  package_tree(root);
  let out = root.join("out");
  let resolver = NodeResolver::new(&OsFileSystem);
  let options = PackagesOptions::new(vec![Package::new("a"), Package::new("b"), Package::new("c")])
    .with_out_path(&out)
    .with_package_root(root.join("node_modules"));

  let written = generate_externs_for_packages(&options, &OsFileSystem, &resolver).unwrap();
  assert_eq!(written, vec![out.join("a.js"), out.join("b.js"), out.join("c.js")]);
  // `b` is part of the batch, so `a` doesn't repeat its symbols.
  assert_eq!(
    read(&out.join("a.js")),
    lines(&["// @formatter:off", "var aFn;", "var sharedThing;", "const __a = {};"])
  );
  assert_eq!(
    read(&out.join("b.js")),
    lines(&["// @formatter:off", "var B;", "const __b = {};", "__b.bMember;"])
  );
  assert_eq!(
    read(&out.join("c.js")),
    lines(&["// @formatter:off", "var c;", "var sharedThing;", "const __c = {};"])
  );

  let options = options.with_visited_scope(VisitedScope::Shared);
  generate_externs_for_packages(&options, &OsFileSystem, &resolver).unwrap();
  assert_eq!(
    read(&out.join("c.js")),
    lines(&["// @formatter:off", "var c;", "const __c = {};"])
  );
}

#[test]
fn skips_packages_without_declarations() {
  let dir = tempfile::tempdir().unwrap();
  let root = dir.path();
  package_tree(root);
  let out = root.join("out");
  let resolver = NodeResolver::new(&OsFileSystem);
  let options = PackagesOptions::new(vec![
    Package::new("missing"),
    Package::new("custom").with_declaration_globs(vec![root
      .join("node_modules/shared/*.d.ts")
      .to_string_lossy()
      .into_owned()]),
  ])
  .with_out_path(&out)
  .with_package_root(root.join("node_modules"));
  let written = generate_externs_for_packages(&options, &OsFileSystem, &resolver).unwrap();
  assert_eq!(written, vec![out.join("custom.js")]);
  assert!(!out.join("missing.js").exists());
}

#[test]
fn processes_libraries_file() {
  let dir = tempfile::tempdir().unwrap();
  let root = dir.path();
  package_tree(root);
  write_tree(root, &[(
    "libraries.json",
    r#"[{"moduleName": "a"}, {"moduleName": "c", "identifier": "see"}]"#,
  )]);
  let out = root.join("out");
  let libraries = load_libraries(&OsFileSystem, &root.join("libraries.json")).unwrap();
  let resolver = NodeResolver::new(&OsFileSystem);
  let written = process_libraries(&out, &libraries, false, &OsFileSystem, &resolver).unwrap();
  assert_eq!(written, vec![out.join("a.js"), out.join("see.js")]);
  assert_eq!(
    read(&out.join("a.js")),
    lines(&[
      "// @formatter:off",
      "var aFn;",
      "var B;",
      "var sharedThing;",
      "const __a = {};",
      "__a.bMember;",
    ])
  );
  assert_eq!(
    read(&out.join("see.js")),
    lines(&["// @formatter:off", "var c;", "var sharedThing;", "const __see = {};"])
  );
}

#[test]
fn package_globs_match_on_disk_and_read_through_file_system() {
  let dir = tempfile::tempdir().unwrap();
  let root = dir.path();
  write_tree(root, &[(
    "node_modules/lib/index.d.ts",
    "declare const onDisk: number;\n",
  )]);
  let fs = MemoryFileSystem::new().with_file(
    root.join("node_modules/lib/index.d.ts"),
    "declare const inMemory: number;\n",
  );
  let options = PackagesOptions::new(vec![Package::new("lib"), Package::new("absent")])
    .with_out_path("/out")
    .with_package_root(root.join("node_modules"));

  let written = generate_externs_for_packages(&options, &fs, &no_modules).unwrap();
  assert_eq!(written, vec![PathBuf::from("/out/lib.js")]);
  assert_eq!(
    fs.file("/out/lib.js").unwrap(),
    lines(&["// @formatter:off", "var inMemory;", "const __lib = {};"])
  );
}
