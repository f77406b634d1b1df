use crate::error::ResolveError;
use crate::fs::FileSystem;
use crate::node_resolve::ResolveModule;
use crate::path::absolute_path;
use crate::path::normalize_path;
use crate::path::to_slash;
use crate::symbol::ExternalSymbol;
use crate::symbol::Position;
use crate::symbol::SymbolKind;
use ahash::AHashSet;
use parse_dts::ast::class_or_object::ClassMember;
use parse_dts::ast::class_or_object::ObjectMember;
use parse_dts::ast::class_or_object::PropertyKey;
use parse_dts::ast::expr::Expr;
use parse_dts::ast::node::Node;
use parse_dts::ast::stmt::BindingName;
use parse_dts::ast::stmt::ClassDecl;
use parse_dts::ast::stmt::ModuleSpecifier;
use parse_dts::ast::stmt::NamespaceBody;
use parse_dts::ast::stmt::NamespaceDecl;
use parse_dts::ast::stmt::Stmt;
use parse_dts::ast::stmt::TopLevel;
use parse_dts::ast::type_expr::IndexSignature;
use parse_dts::ast::type_expr::Signature;
use parse_dts::ast::type_expr::TypeExpr;
use parse_dts::ast::type_expr::TypeMember;
use parse_dts::ast::type_expr::TypeParameter;
use parse_dts::directive::ReferenceKind;
use parse_dts::loc::LineIndex;
use parse_dts::loc::Loc;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing::debug_span;

/// Entry files whose path contains any of these fragments are skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IgnorePolicy {
  fragments: Vec<String>,
}

impl Default for IgnorePolicy {
  /// Skips Node's own typings, which libraries like `sax` pull in with
  /// `/// <reference types="node" />`.
  fn default() -> Self {
    IgnorePolicy {
      fragments: vec!["node_modules/@types/node".to_string()],
    }
  }
}

impl IgnorePolicy {
  pub fn none() -> IgnorePolicy {
    IgnorePolicy {
      fragments: Vec::new(),
    }
  }

  pub fn with_fragment(mut self, fragment: impl Into<String>) -> IgnorePolicy {
    self.fragments.push(fragment.into());
    self
  }

  pub fn is_ignored(&self, path: &Path) -> bool {
    let path = to_slash(path);
    self
      .fragments
      .iter()
      .any(|fragment| path.contains(fragment.as_str()))
  }
}

/// Files that must not be parsed again, by normalized absolute path. Only ever grows.
#[derive(Clone, Debug, Default)]
pub struct VisitedFiles {
  paths: AHashSet<PathBuf>,
}

impl VisitedFiles {
  pub fn new() -> VisitedFiles {
    VisitedFiles::default()
  }

  pub fn contains(&self, path: &Path) -> bool {
    self.paths.contains(&normalize_path(path))
  }

  /// Returns whether the path was newly added.
  pub fn insert(&mut self, path: &Path) -> bool {
    self.paths.insert(normalize_path(path))
  }

  pub fn extend<I>(&mut self, paths: I)
  where
    I: IntoIterator,
    I::Item: AsRef<Path>,
  {
    for path in paths {
      self.insert(path.as_ref());
    }
  }

  pub fn len(&self) -> usize {
    self.paths.len()
  }

  pub fn is_empty(&self) -> bool {
    self.paths.is_empty()
  }
}

fn absolute(path: &Path) -> Result<PathBuf, ResolveError> {
  absolute_path(path).map_err(|source| ResolveError::Read {
    path: path.to_path_buf(),
    source,
  })
}

fn kind_for(declare: bool) -> SymbolKind {
  if declare {
    SymbolKind::Declaration
  } else {
    SymbolKind::Property
  }
}

fn position(line_index: &LineIndex, offset: usize) -> Position {
  let line_col = line_index.line_col(offset);
  Position {
    line: line_col.line + 1,
    column: line_col.column + 1,
  }
}

/// Collects the names declared by a set of declaration files and everything they reference.
pub struct SymbolResolver<'a> {
  fs: &'a dyn FileSystem,
  modules: &'a dyn ResolveModule,
  ignore: IgnorePolicy,
}

impl<'a> SymbolResolver<'a> {
  pub fn new(fs: &'a dyn FileSystem, modules: &'a dyn ResolveModule) -> SymbolResolver<'a> {
    SymbolResolver {
      fs,
      modules,
      ignore: IgnorePolicy::default(),
    }
  }

  pub fn with_ignore_policy(mut self, ignore: IgnorePolicy) -> SymbolResolver<'a> {
    self.ignore = ignore;
    self
  }

  /// Resolves the symbols of `entries`, never following references into `dont_follow`.
  pub fn resolve<E, D>(&self, entries: E, dont_follow: D) -> Result<Vec<ExternalSymbol>, ResolveError>
  where
    E: IntoIterator,
    E::Item: AsRef<Path>,
    D: IntoIterator,
    D::Item: AsRef<Path>,
  {
    let mut visited = VisitedFiles::new();
    for path in dont_follow {
      visited.insert(&absolute(path.as_ref())?);
    }
    self.resolve_with_visited(entries, &mut visited)
  }

  /// Like [`SymbolResolver::resolve`], but records followed files in `visited` so that later calls
  /// don't parse them again.
  ///
  /// Entries are always parsed, even if already visited, and are added to `visited` before any
  /// of them is walked.
  pub fn resolve_with_visited<E>(
    &self,
    entries: E,
    visited: &mut VisitedFiles,
  ) -> Result<Vec<ExternalSymbol>, ResolveError>
  where
    E: IntoIterator,
    E::Item: AsRef<Path>,
  {
    let entries = entries
      .into_iter()
      .map(|entry| absolute(entry.as_ref()))
      .collect::<Result<Vec<_>, _>>()?;
    let _span = debug_span!("resolve_symbols", entries = entries.len()).entered();
    for entry in entries.iter() {
      visited.insert(entry);
    }
    let mut symbols = Vec::new();
    for entry in entries.iter() {
      if self.ignore.is_ignored(entry) {
        debug!(file = %entry.display(), "ignoring entry");
        continue;
      };
      self.visit_file(entry, visited, &mut symbols)?;
    }
    Ok(symbols)
  }

  fn visit_file(
    &self,
    path: &Path,
    visited: &mut VisitedFiles,
    symbols: &mut Vec<ExternalSymbol>,
  ) -> Result<(), ResolveError> {
    let source = self
      .fs
      .read_to_string(path)
      .map_err(|source| ResolveError::Read {
        path: path.to_path_buf(),
        source,
      })?;
    let line_index = LineIndex::new(&source);
    let top_level = parse_dts::parse(&source).map_err(|error| ResolveError::Syntax {
      path: path.to_path_buf(),
      position: position(&line_index, error.loc.0),
      error,
    })?;
    let mut walker = FileWalker {
      resolver: self,
      file: Arc::from(path),
      source: &source,
      line_index,
      visited,
      symbols,
      namespace_depth: 0,
    };
    walker.top_level(&top_level)
  }
}

struct FileWalker<'w> {
  resolver: &'w SymbolResolver<'w>,
  file: Arc<Path>,
  source: &'w str,
  line_index: LineIndex<'w>,
  visited: &'w mut VisitedFiles,
  symbols: &'w mut Vec<ExternalSymbol>,
  namespace_depth: usize,
}

impl<'w> FileWalker<'w> {
  fn position(&self, offset: usize) -> Position {
    position(&self.line_index, offset)
  }

  fn add(&mut self, name: &str, loc: Loc, kind: SymbolKind) {
    let position = self.position(loc.0);
    self.symbols.push(ExternalSymbol {
      name: name.to_string(),
      kind,
      file: self.file.clone(),
      loc,
      position,
    });
  }

  fn add_key(&mut self, key: &Node<PropertyKey>, kind: SymbolKind) {
    if let Some(name) = key.stx.ident() {
      self.add(name, key.loc, kind);
    };
  }

  fn follow(&mut self, target: &Path) -> Result<(), ResolveError> {
    let target = absolute(target)?;
    if !self.visited.insert(&target) {
      debug!(file = %target.display(), "already visited");
      return Ok(());
    };
    debug!(file = %target.display(), from = %self.file.display(), "following reference");
    self
      .resolver
      .visit_file(&target, &mut *self.visited, &mut *self.symbols)
  }

  fn module_reference(&mut self, specifier: &Node<ModuleSpecifier>) -> Result<(), ResolveError> {
    match specifier.stx.as_ref() {
      ModuleSpecifier::Literal(name) => {
        match self.resolver.modules.resolve_module(name, &self.file) {
          Some(target) => self.follow(&target),
          None => {
            debug!(specifier = %name, from = %self.file.display(), "module not resolved");
            Ok(())
          }
        }
      }
      ModuleSpecifier::NonLiteral => Err(ResolveError::NonLiteralModuleSpecifier {
        path: self.file.to_path_buf(),
        position: self.position(specifier.loc.0),
      }),
    }
  }

  fn top_level(&mut self, top_level: &Node<TopLevel>) -> Result<(), ResolveError> {
    let dir = self.file.parent().map(Path::to_path_buf).unwrap_or_default();
    for reference in top_level.stx.references.iter() {
      if reference.kind != ReferenceKind::Path {
        continue;
      };
      let target = dir.join(reference.value(self.source));
      self.follow(&target)?;
    }
    self.stmts(&top_level.stx.body)
  }

  fn stmts(&mut self, stmts: &[Node<Stmt>]) -> Result<(), ResolveError> {
    for stmt in stmts {
      self.stmt(stmt)?;
    }
    Ok(())
  }

  fn stmt(&mut self, stmt: &Node<Stmt>) -> Result<(), ResolveError> {
    match stmt.stx.as_ref() {
      Stmt::Block(body) => self.stmts(body)?,
      Stmt::Class(decl) => {
        if let Some(name) = &decl.name {
          self.add(&name.stx.name, name.loc, kind_for(decl.declare));
        };
        self.class(decl);
      }
      Stmt::Enum(decl) => {
        self.add(&decl.name.stx.name, decl.name.loc, kind_for(decl.declare));
        for member in decl.members.iter() {
          self.add_key(&member.stx.key, SymbolKind::Property);
          if let Some(init) = &member.stx.initializer {
            self.expr(init);
          };
        }
      }
      Stmt::Export(decl) => {
        if let Some(specifier) = &decl.specifier {
          self.module_reference(specifier)?;
        };
      }
      Stmt::ExportAssignment(expr) | Stmt::Expr(expr) => self.expr(expr),
      Stmt::Function(decl) => {
        if let Some(name) = &decl.name {
          self.add(&name.stx.name, name.loc, kind_for(decl.declare));
        };
        self.signature(&decl.signature);
      }
      Stmt::Global(decl) => self.stmts(&decl.body)?,
      Stmt::Import(decl) => self.module_reference(&decl.specifier)?,
      // The type's own name is not emitted, only its members.
      Stmt::Interface(decl) => {
        self.type_parameters(&decl.type_parameters);
        for base in decl.extends.iter() {
          self.type_expr(base);
        }
        self.type_members(&decl.members);
      }
      Stmt::TypeAlias(decl) => {
        self.type_parameters(&decl.type_parameters);
        self.type_expr(&decl.type_expr);
      }
      Stmt::Module(decl) => {
        if let Some(body) = &decl.body {
          self.stmts(body)?;
        };
      }
      Stmt::Namespace(decl) => self.namespace(decl)?,
      Stmt::Var(var) => {
        let kind = kind_for(var.declare);
        for declarator in var.declarators.iter() {
          if let BindingName::Ident(name) = declarator.stx.name.stx.as_ref() {
            self.add(name, declarator.stx.name.loc, kind);
          };
          if let Some(type_annotation) = &declarator.stx.type_annotation {
            self.type_expr(type_annotation);
          };
          if let Some(init) = &declarator.stx.initializer {
            self.expr(init);
          };
        }
      }
      Stmt::Empty | Stmt::Other => {}
    };
    Ok(())
  }

  fn namespace(&mut self, decl: &NamespaceDecl) -> Result<(), ResolveError> {
    let kind = kind_for(decl.declare && self.namespace_depth == 0);
    self.add(&decl.name.stx.name, decl.name.loc, kind);
    self.namespace_depth += 1;
    let res = match &decl.body {
      NamespaceBody::Block(body) => self.stmts(body),
      NamespaceBody::Namespace(inner) => self.namespace(&inner.stx),
    };
    self.namespace_depth -= 1;
    res
  }

  /// The members of a class declaration or expression. The class name is handled by the caller.
  fn class(&mut self, decl: &ClassDecl) {
    self.type_parameters(&decl.type_parameters);
    if let Some(extends) = &decl.extends {
      self.type_expr(extends);
    };
    for implements in decl.implements.iter() {
      self.type_expr(implements);
    }
    for member in decl.members.iter() {
      match member.stx.as_ref() {
        ClassMember::Accessor(accessor) => {
          self.add_key(&accessor.key, kind_for(accessor.declare));
          self.signature(&accessor.signature);
        }
        ClassMember::Constructor(signature) => self.signature(signature),
        ClassMember::Index(index) => self.index_signature(index),
        ClassMember::Method(method) => {
          self.add_key(&method.key, kind_for(method.declare));
          self.signature(&method.signature);
        }
        ClassMember::Property(prop) => {
          self.add_key(&prop.key, kind_for(prop.declare));
          if let Some(type_annotation) = &prop.type_annotation {
            self.type_expr(type_annotation);
          };
          if let Some(init) = &prop.initializer {
            self.expr(init);
          };
        }
        ClassMember::StaticBlock => {}
      };
    }
  }

  fn type_parameters(&mut self, params: &[Node<TypeParameter>]) {
    for param in params {
      if let Some(constraint) = &param.stx.constraint {
        self.type_expr(constraint);
      };
      if let Some(default) = &param.stx.default {
        self.type_expr(default);
      };
    }
  }

  fn signature(&mut self, signature: &Node<Signature>) {
    let signature = signature.stx.as_ref();
    self.type_parameters(&signature.type_parameters);
    for param in signature.params.iter() {
      if let Some(type_annotation) = &param.stx.type_annotation {
        self.type_expr(type_annotation);
      };
      if let Some(init) = &param.stx.initializer {
        self.expr(init);
      };
    }
    if let Some(return_type) = &signature.return_type {
      self.type_expr(return_type);
    };
  }

  fn index_signature(&mut self, index: &IndexSignature) {
    self.type_expr(&index.parameter_type);
    if let Some(type_annotation) = &index.type_annotation {
      self.type_expr(type_annotation);
    };
  }

  fn type_expr(&mut self, ty: &Node<TypeExpr>) {
    match ty.stx.as_ref() {
      TypeExpr::Function(signature) => self.signature(signature),
      TypeExpr::Literal(members) => self.type_members(members),
      TypeExpr::Mapped(mapped) => {
        self.type_expr(&mapped.constraint);
        if let Some(value) = &mapped.value {
          self.type_expr(value);
        };
      }
      TypeExpr::Compound(parts) => {
        for part in parts {
          self.type_expr(part);
        }
      }
    };
  }

  fn type_members(&mut self, members: &[Node<TypeMember>]) {
    for member in members {
      match member.stx.as_ref() {
        TypeMember::Accessor(accessor) => {
          self.add_key(&accessor.key, SymbolKind::Property);
          self.signature(&accessor.signature);
        }
        TypeMember::Call(signature) | TypeMember::Construct(signature) => {
          self.signature(signature)
        }
        TypeMember::Index(index) => self.index_signature(index),
        TypeMember::Method(method) => {
          self.add_key(&method.key, SymbolKind::Property);
          self.signature(&method.signature);
        }
        TypeMember::Property(prop) => {
          self.add_key(&prop.key, SymbolKind::Property);
          if let Some(type_annotation) = &prop.type_annotation {
            self.type_expr(type_annotation);
          };
        }
      };
    }
  }

  fn expr(&mut self, expr: &Node<Expr>) {
    match expr.stx.as_ref() {
      // Class expression names are local to the expression.
      Expr::Class(decl) => self.class(decl),
      Expr::Compound(parts) => {
        for part in parts {
          self.expr(part);
        }
      }
      Expr::Function(signature) => self.signature(signature),
      Expr::Object(members) => {
        for member in members {
          match member.stx.as_ref() {
            ObjectMember::Accessor { key, signature, .. }
            | ObjectMember::Method { key, signature } => {
              self.add_key(key, SymbolKind::Property);
              self.signature(signature);
            }
            ObjectMember::Property { key, value } => {
              self.add_key(key, SymbolKind::Property);
              self.expr(value);
            }
            ObjectMember::Shorthand { initializer, .. } => {
              if let Some(init) = initializer {
                self.expr(init);
              };
            }
            ObjectMember::Spread(value) => self.expr(value),
          };
        }
      }
    };
  }
}
