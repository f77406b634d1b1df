use assert_cmd::Command;
use predicates::str::contains;
use predicates::str::is_empty;
use serde_json::Value;
use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, contents: &str) {
  let path = root.join(rel);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, contents).unwrap();
}

fn externs_js() -> Command {
  Command::cargo_bin("externs-js").unwrap()
}

#[test]
fn declarations_writes_externs() {
  let dir = tempfile::tempdir().unwrap();
  write(
    dir.path(),
    "types/lib.d.ts",
    "declare const foo: string;\nexport interface Bar {\n  baz: number;\n}\n",
  );
  let out = dir.path().join("out");

  externs_js()
    .args(["declarations", "my_lib"])
    .arg(dir.path().join("types/lib.d.ts").as_os_str())
    .arg("--out-path")
    .arg(out.as_os_str())
    .assert()
    .success()
    .stdout(is_empty());

  let code = fs::read_to_string(out.join("my_lib.js")).unwrap();
  let lines: Vec<&str> = code.lines().collect();
  assert_eq!(lines, vec![
    "// @formatter:off",
    "var foo;",
    "const __my_lib = {};",
    "__my_lib.baz;",
  ]);
}

#[test]
fn debug_annotates_positions() {
  let dir = tempfile::tempdir().unwrap();
  write(dir.path(), "lib.d.ts", "declare const foo: string;\n");

  externs_js()
    .args(["declarations", "lib", "--debug"])
    .arg(dir.path().join("lib.d.ts").as_os_str())
    .arg("--out-path")
    .arg(dir.path().join("out").as_os_str())
    .assert()
    .success();

  let code = fs::read_to_string(dir.path().join("out/lib.js")).unwrap();
  assert!(
    code.contains("var foo; // ../lib.d.ts (1:15)"),
    "missing position in {code:?}"
  );
}

#[test]
fn symbols_prints_json() {
  let dir = tempfile::tempdir().unwrap();
  write(
    dir.path(),
    "index.d.ts",
    "import './other';\ndeclare function render(): void;\n",
  );
  write(dir.path(), "other.d.ts", "export const version: string;\n");

  let output = externs_js()
    .arg("symbols")
    .arg(dir.path().join("index.d.ts").as_os_str())
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let json: Value = serde_json::from_slice(&output).expect("parse JSON output");
  let symbols = json.as_array().expect("array of symbols");
  let summary: Vec<(&str, &str)> = symbols
    .iter()
    .map(|s| (s["name"].as_str().unwrap(), s["kind"].as_str().unwrap()))
    .collect();
  assert_eq!(summary, vec![("version", "PROPERTY"), ("render", "DECLARATION")]);
  assert_eq!(symbols[1]["position"]["line"], 2);
}

#[test]
fn packages_reads_package_root() {
  let dir = tempfile::tempdir().unwrap();
  write(
    dir.path(),
    "node_modules/left-pad/index.d.ts",
    "export declare function leftPad(s: string): string;\n",
  );
  write(
    dir.path(),
    "node_modules/@types/left-pad/extra.d.ts",
    "export interface Options { width: number }\n",
  );
  let out = dir.path().join("externs");

  externs_js()
    .args(["packages", "left-pad", "--package-root"])
    .arg(dir.path().join("node_modules").as_os_str())
    .arg("--out-path")
    .arg(out.as_os_str())
    .assert()
    .success()
    .stdout(is_empty());

  let code = fs::read_to_string(out.join("left_pad.js")).unwrap();
  assert!(code.contains("var leftPad;"), "{code:?}");
  assert!(code.contains("__left_pad.width;"), "{code:?}");
}

#[test]
fn libraries_rejects_missing_extern_import() {
  let dir = tempfile::tempdir().unwrap();
  write(
    dir.path(),
    "libraries.json",
    r#"[{ "moduleName": "widgets", "externImports": ["missing.js"] }]"#,
  );

  externs_js()
    .arg("libraries")
    .arg(dir.path().join("libraries.json").as_os_str())
    .arg("--out-path")
    .arg(dir.path().join("out").as_os_str())
    .assert()
    .failure()
    .stderr(contains("extern import"));
  assert!(!dir.path().join("out").exists());
}

#[test]
fn non_literal_specifier_fails() {
  let dir = tempfile::tempdir().unwrap();
  write(dir.path(), "entry.d.ts", "export * from foo;\n");

  externs_js()
    .args(["declarations", "entry"])
    .arg(dir.path().join("entry.d.ts").as_os_str())
    .arg("--out-path")
    .arg(dir.path().as_os_str())
    .assert()
    .failure()
    .stderr(contains("not a string literal"));
  assert!(!dir.path().join("entry.js").exists());
}

#[test]
fn missing_declarations_is_usage_error() {
  externs_js()
    .args(["declarations", "only_identifier"])
    .assert()
    .failure();
}

#[test]
fn parse_prints_syntax_tree() {
  let dir = tempfile::tempdir().unwrap();
  write(
    dir.path(),
    "lib.d.ts",
    "/// <reference path=\"./other.d.ts\" />\ndeclare namespace Lib {}\n",
  );

  let output = externs_js()
    .arg("parse")
    .arg(dir.path().join("lib.d.ts").as_os_str())
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let json: Value = serde_json::from_slice(&output).expect("parse JSON output");
  assert_eq!(json["body"].as_array().map(Vec::len), Some(1));
  assert_eq!(json["references"].as_array().map(Vec::len), Some(1));
}
