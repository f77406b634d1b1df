use externs_js::IgnorePolicy;
use externs_js::MemoryFileSystem;
use externs_js::Position;
use externs_js::ResolveError;
use externs_js::SymbolKind;
use externs_js::SymbolResolver;
use externs_js::VisitedFiles;
use std::cell::RefCell;
use std::path::Path;
use std::path::PathBuf;

use SymbolKind::Declaration;
use SymbolKind::Property;

const NO_FILES: [&str; 0] = [];

fn no_modules(_: &str, _: &Path) -> Option<PathBuf> {
  None
}

fn names(symbols: &[externs_js::ExternalSymbol]) -> Vec<(&str, SymbolKind)> {
  symbols.iter().map(|s| (s.name.as_str(), s.kind)).collect()
}

fn symbols_of(source: &str) -> Vec<(String, SymbolKind)> {
  let fs = MemoryFileSystem::new().with_file("/dummy.d.ts", source);
  let symbols = SymbolResolver::new(&fs, &no_modules)
    .resolve(["/dummy.d.ts"], NO_FILES)
    .unwrap();
  symbols.into_iter().map(|s| (s.name, s.kind)).collect()
}

fn expect(expected: &[(&str, SymbolKind)]) -> Vec<(String, SymbolKind)> {
  expected
    .iter()
    .map(|(name, kind)| (name.to_string(), *kind))
    .collect()
}

#[test]
fn follows_imports() {
  let fs = MemoryFileSystem::new()
    .with_file("/src/entry.d.ts", r#"import "./foo""#)
    .with_file("/src/foo.d.ts", "declare const foo: string;");
  let calls = RefCell::new(Vec::new());
  let modules = |specifier: &str, from: &Path| {
    calls
      .borrow_mut()
      .push((specifier.to_string(), from.to_path_buf()));
    Some(PathBuf::from("/src/foo.d.ts"))
  };
  let symbols = SymbolResolver::new(&fs, &modules)
    .resolve(["/src/entry.d.ts"], NO_FILES)
    .unwrap();
  assert_eq!(names(&symbols), vec![("foo", Declaration)]);
  assert_eq!(calls.into_inner(), vec![(
    "./foo".to_string(),
    PathBuf::from("/src/entry.d.ts")
  )]);
}

#[test]
fn follows_exports_with_module_specifiers() {
  let fs = MemoryFileSystem::new()
    .with_file("/src/entry.d.ts", r#"export { default } from "./foo""#)
    .with_file("/src/foo.d.ts", "declare const foo: string;");
  let modules = |_: &str, _: &Path| Some(PathBuf::from("/src/foo.d.ts"));
  let symbols = SymbolResolver::new(&fs, &modules)
    .resolve(["/src/entry.d.ts"], NO_FILES)
    .unwrap();
  assert_eq!(names(&symbols), vec![("foo", Declaration)]);
}

#[test]
fn follows_file_references() {
  let fs = MemoryFileSystem::new()
    .with_file(
      "/src/entry.d.ts",
      r#"/// <reference path="sub/ref.entry.d.ts" />"#,
    )
    .with_file("/src/sub/ref.entry.d.ts", "declare const foo: string;");
  let resolver = SymbolResolver::new(&fs, &no_modules);
  let symbols = resolver.resolve(["/src/entry.d.ts"], NO_FILES).unwrap();
  assert_eq!(names(&symbols), vec![("foo", Declaration)]);

  let symbols = resolver
    .resolve(["/src/entry.d.ts"], ["/src/sub/ref.entry.d.ts"])
    .unwrap();
  assert!(symbols.is_empty());
}

#[test]
fn splices_referenced_files_in_place() {
  let fs = MemoryFileSystem::new()
    .with_file(
      "/src/entry.d.ts",
      "/// <reference path=\"./ref.d.ts\" />\ndeclare const a: 1;\nimport \"./b\";\ndeclare const c: 1;\n",
    )
    .with_file("/src/ref.d.ts", "declare const ref: 1;")
    .with_file("/src/b.d.ts", "declare const b: 1;");
  let modules = |specifier: &str, _: &Path| Some(Path::new("/src").join(format!("{specifier}.d.ts")));
  let symbols = SymbolResolver::new(&fs, &modules)
    .resolve(["/src/entry.d.ts"], NO_FILES)
    .unwrap();
  assert_eq!(names(&symbols), vec![
    ("ref", Declaration),
    ("a", Declaration),
    ("b", Declaration),
    ("c", Declaration),
  ]);
  assert_eq!(&*symbols[2].file, Path::new("/src/b.d.ts"));
}

#[test]
fn visits_each_file_once() {
  let fs = MemoryFileSystem::new()
    .with_file("/a.d.ts", "import \"./b\";\ndeclare const a: 1;")
    .with_file("/b.d.ts", "import \"./a\";\nimport \"./c\";\nimport \"./c\";\ndeclare const b: 1;")
    .with_file("/c.d.ts", "import \"./b\";\ndeclare const c: 1;");
  let modules = |specifier: &str, _: &Path| {
    Some(PathBuf::from(format!("/{}.d.ts", specifier.trim_start_matches("./"))))
  };
  let symbols = SymbolResolver::new(&fs, &modules)
    .resolve(["/a.d.ts"], NO_FILES)
    .unwrap();
  assert_eq!(names(&symbols), vec![
    ("c", Declaration),
    ("b", Declaration),
    ("a", Declaration),
  ]);
}

#[test]
fn skips_unresolved_modules() {
  assert_eq!(
    symbols_of("import x from \"missing\";\nexport * from \"also-missing\";\ndeclare const y: 1;"),
    expect(&[("y", Declaration)])
  );
}

#[test]
fn rejects_non_literal_module_specifiers() {
  let fs = MemoryFileSystem::new().with_file("/entry.d.ts", "declare const a: 1;\nexport * from foo;");
  let err = SymbolResolver::new(&fs, &no_modules)
    .resolve(["/entry.d.ts"], NO_FILES)
    .unwrap_err();
  match err {
    ResolveError::NonLiteralModuleSpecifier { path, position } => {
      assert_eq!(path, PathBuf::from("/entry.d.ts"));
      assert_eq!(position, Position { line: 2, column: 15 });
    }
    err => panic!("unexpected error {err}"),
  };
}

#[test]
fn reports_unreadable_and_invalid_files() {
  let fs = MemoryFileSystem::new()
    .with_file("/bad.d.ts", "declare const a: 1;\ndeclare class {")
    .with_file("/imports-missing.d.ts", "import \"./gone\";");
  let resolver = SymbolResolver::new(&fs, &no_modules);
  let err = resolver.resolve(["/missing.d.ts"], NO_FILES).unwrap_err();
  assert!(matches!(err, ResolveError::Read { ref path, .. } if path == Path::new("/missing.d.ts")));

  let err = resolver.resolve(["/bad.d.ts"], NO_FILES).unwrap_err();
  match err {
    ResolveError::Syntax { path, position, .. } => {
      assert_eq!(path, PathBuf::from("/bad.d.ts"));
      assert_eq!(position.line, 2);
    }
    err => panic!("unexpected error {err}"),
  };

  let modules = |_: &str, _: &Path| Some(PathBuf::from("/gone.d.ts"));
  let err = SymbolResolver::new(&fs, &modules)
    .resolve(["/imports-missing.d.ts"], NO_FILES)
    .unwrap_err();
  assert!(matches!(err, ResolveError::Read { ref path, .. } if path == Path::new("/gone.d.ts")));
}

#[test]
fn ignores_node_typings_as_entries() {
  let fs = MemoryFileSystem::new()
    .with_file("/node_modules/@types/node/index.d.ts", "declare const process: any;")
    .with_file("/lib/index.d.ts", "import \"node\";\ndeclare const lib: 1;");
  let modules = |_: &str, _: &Path| Some(PathBuf::from("/node_modules/@types/node/index.d.ts"));
  let entries = ["/node_modules/@types/node/index.d.ts", "/lib/index.d.ts"];

  let symbols = SymbolResolver::new(&fs, &modules)
    .resolve(entries, NO_FILES)
    .unwrap();
  assert_eq!(names(&symbols), vec![("lib", Declaration)]);

  let symbols = SymbolResolver::new(&fs, &modules)
    .resolve(["/lib/index.d.ts"], NO_FILES)
    .unwrap();
  assert_eq!(names(&symbols), vec![("process", Declaration), ("lib", Declaration)]);

  let symbols = SymbolResolver::new(&fs, &modules)
    .with_ignore_policy(IgnorePolicy::none())
    .resolve(entries, NO_FILES)
    .unwrap();
  assert_eq!(names(&symbols), vec![("process", Declaration), ("lib", Declaration)]);
}

#[test]
fn shares_visited_files_across_calls() {
  let fs = MemoryFileSystem::new()
    .with_file("/a.d.ts", "import \"./common\";\ndeclare const a: 1;")
    .with_file("/b.d.ts", "import \"./common\";\ndeclare const b: 1;")
    .with_file("/common.d.ts", "declare const common: 1;");
  let modules = |_: &str, _: &Path| Some(PathBuf::from("/common.d.ts"));
  let resolver = SymbolResolver::new(&fs, &modules);
  let mut visited = VisitedFiles::new();
  let a = resolver.resolve_with_visited(["/a.d.ts"], &mut visited).unwrap();
  let b = resolver.resolve_with_visited(["/b.d.ts"], &mut visited).unwrap();
  assert_eq!(names(&a), vec![("common", Declaration), ("a", Declaration)]);
  assert_eq!(names(&b), vec![("b", Declaration)]);
  assert!(visited.contains(Path::new("/common.d.ts")));
  assert_eq!(visited.len(), 3);
}

#[test]
fn gets_properties_from_an_interface() {
  assert_eq!(
    symbols_of("interface Foo {\n  prop: string;\n  method(): string;\n}"),
    expect(&[("prop", Property), ("method", Property)])
  );
}

#[test]
fn gets_properties_from_a_type() {
  assert_eq!(
    symbols_of("type Foo {\n  prop: string;\n  method(): string;\n}"),
    expect(&[("prop", Property), ("method", Property)])
  );
}

#[test]
fn gets_properties_from_a_const() {
  assert_eq!(
    symbols_of("\nconst Foo = {\n  prop: 'apple';\n  method() { return 'banana' };\n}"),
    expect(&[("Foo", Property), ("prop", Property), ("method", Property)])
  );
}

#[test]
fn gets_properties_from_a_class() {
  assert_eq!(
    symbols_of(
      "\nclass Foo {\n  prop1 = 'banana'; \n  prop2: 'apple';\n  method() { return 'banana' };\n}"
    ),
    expect(&[
      ("Foo", Property),
      ("prop1", Property),
      ("prop2", Property),
      ("method", Property),
    ])
  );
}

#[test]
fn ignores_modules() {
  assert!(symbols_of("declare module Module { }").is_empty());
  assert_eq!(
    symbols_of("declare module \"x\" {\n  export function f(): void;\n}\ndeclare module \"y\";"),
    expect(&[("f", Property)])
  );
}

#[test]
fn gets_properties_and_declarations_from_namespaces() {
  assert_eq!(
    symbols_of("\ndeclare namespace Parent.Nested {\n  namespace Child { }\n}"),
    expect(&[
      ("Parent", Declaration),
      ("Nested", Property),
      ("Child", Property),
    ])
  );
}

#[test]
fn gets_properties_from_an_enum() {
  assert_eq!(
    symbols_of("\nconst enum Foo {\n  BAA = 1,\n}"),
    expect(&[("Foo", Property), ("BAA", Property)])
  );
}

#[test]
fn gets_declarations_from_declared_functions_classes_and_variables() {
  assert_eq!(
    symbols_of(
      "\ndeclare enum Enum { };\ndeclare function Function(): string;\ndeclare class Class { };\ndeclare const Const: string;\ndeclare var Var: string;\ndeclare let Let: string;\n"
    ),
    expect(&[
      ("Enum", Declaration),
      ("Function", Declaration),
      ("Class", Declaration),
      ("Const", Declaration),
      ("Var", Declaration),
      ("Let", Declaration),
    ])
  );
}

#[test]
fn gets_properties_from_non_declared_functions_classes_and_variables() {
  assert_eq!(
    symbols_of(
      "\nenum Enum { };\nfunction Function(): string;\nclass Class { };\nconst Const: string;\nvar Var: string;\nlet Let: string;\n"
    ),
    expect(&[
      ("Enum", Property),
      ("Function", Property),
      ("Class", Property),
      ("Const", Property),
      ("Var", Property),
      ("Let", Property),
    ])
  );
}

#[test]
fn finds_members_nested_in_types() {
  assert_eq!(
    symbols_of(
      "declare function f(opts: { a: string }): Promise<{ b: number }>;\ndeclare global {\n  interface Window { myGlobal: string }\n}\ntype Mapped = { [K in keyof T]: { inner: K } };"
    ),
    expect(&[
      ("f", Declaration),
      ("a", Property),
      ("b", Property),
      ("myGlobal", Property),
      ("inner", Property),
    ])
  );
}

#[test]
fn classifies_class_members() {
  assert_eq!(
    symbols_of(
      "export declare class C<T extends { bound: 1 }> extends Base implements I {\n  declare d: string;\n  static s(): void;\n  get g(): number;\n  set g(v: number);\n  constructor(param: { option: 1 });\n  [key: string]: any;\n  #hidden: 1;\n  \"quoted\": 1;\n  [Symbol.iterator](): void;\n}"
    ),
    expect(&[
      ("C", Declaration),
      ("bound", Property),
      ("d", Declaration),
      ("s", Property),
      ("g", Property),
      ("g", Property),
      ("option", Property),
    ])
  );
}

#[test]
fn skips_names_that_are_not_identifiers() {
  assert_eq!(
    symbols_of(
      "interface X {\n  \"quoted\": 1;\n  3: 2;\n  [computed]: 3;\n  (call: { fromCall: 1 }): void;\n  new (): X;\n  plain?: 4;\n}\ndeclare const { a, b }: X;"
    ),
    expect(&[("fromCall", Property), ("plain", Property)])
  );
}

#[test]
fn walks_expressions() {
  assert_eq!(
    symbols_of(
      "export default {\n  key: 1,\n  method() {},\n  get acc() { return 1 },\n  short,\n  ...spread,\n  nested: { deep: class Named { member = 1 } },\n};"
    ),
    expect(&[
      ("key", Property),
      ("method", Property),
      ("acc", Property),
      ("nested", Property),
      ("deep", Property),
      ("member", Property),
    ])
  );
}

#[test]
fn records_positions() {
  let fs = MemoryFileSystem::new().with_file(
    "/a.d.ts",
    "declare namespace NS {\n  const \u{1F600}x: 1;\n  const y: 1;\n}",
  );
  let symbols = SymbolResolver::new(&fs, &no_modules)
    .resolve(["/a.d.ts"], NO_FILES)
    .unwrap();
  let positions: Vec<_> = symbols.iter().map(|s| (s.name.as_str(), s.position)).collect();
  assert_eq!(positions, vec![
    ("NS", Position { line: 1, column: 19 }),
    ("\u{1F600}x", Position { line: 2, column: 9 }),
    ("y", Position { line: 3, column: 9 }),
  ]);
}

#[test]
fn resolving_twice_gives_the_same_symbols() {
  let fs = MemoryFileSystem::new()
    .with_file(
      "/src/entry.d.ts",
      "import \"./a\";\nimport \"./skip\";\ndeclare class Widget { render(): void; }\n",
    )
    .with_file(
      "/src/a.d.ts",
      "/// <reference path=\"b.d.ts\" />\nexport declare function a(): void;\n",
    )
    .with_file("/src/b.d.ts", "interface B { b: number; }\n")
    .with_file("/src/skip.d.ts", "declare const skipped: 1;\n");
  let modules = |specifier: &str, _: &Path| {
    Some(PathBuf::from(format!(
      "/src/{}.d.ts",
      specifier.trim_start_matches("./")
    )))
  };
  let resolver = SymbolResolver::new(&fs, &modules);
  let first = resolver
    .resolve(["/src/entry.d.ts"], ["/src/skip.d.ts"])
    .unwrap();
  let second = resolver
    .resolve(["/src/entry.d.ts"], ["/src/skip.d.ts"])
    .unwrap();
  assert_eq!(names(&first), vec![
    ("b", Property),
    ("a", Declaration),
    ("Widget", Declaration),
    ("render", Property),
  ]);
  assert_eq!(first, second);
}
