use super::stmt::is_binding_identifier;
use super::stmt::DeclModifiers;
use super::Parser;
use crate::ast::node::Node;
use crate::ast::stmt::ExportDecl;
use crate::ast::stmt::ImportDecl;
use crate::ast::stmt::ModuleSpecifier;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

impl<'a> Parser<'a> {
  pub fn module_specifier(&mut self) -> SyntaxResult<Node<ModuleSpecifier>> {
    self.with_loc(|p| {
      let t = p.peek();
      match t.typ {
        TT::LiteralString => {
          p.consume();
          Ok(ModuleSpecifier::Literal(p.lit_str_val(t.loc)))
        }
        TT::LiteralTemplate => {
          p.consume();
          Ok(ModuleSpecifier::NonLiteral)
        }
        typ if typ.is_identifier_like() => {
          p.consume();
          Ok(ModuleSpecifier::NonLiteral)
        }
        _ => Err(t.error(SyntaxErrorType::ExpectedSyntax("module specifier"))),
      }
    })
  }

  /// Skips `with { type: "json" }` or the older `assert { ... }` after a module specifier.
  fn skip_import_attributes(&mut self) -> SyntaxResult<()> {
    let (t0, t1) = self.peek_2();
    let is_attributes_keyword =
      t0.typ == TT::KeywordWith || (t0.typ == TT::Identifier && self.str(t0.loc) == "assert");
    if is_attributes_keyword && t1.typ == TT::BraceOpen && !t0.preceded_by_line_terminator {
      self.consume();
      self.skip_balanced()?;
    };
    Ok(())
  }

  pub fn import_stmt(&mut self) -> SyntaxResult<Stmt> {
    self.require(TT::KeywordImport)?;
    let (t0, t1) = self.peek_2();
    if t0.typ == TT::LiteralString {
      let specifier = self.module_specifier()?;
      self.skip_import_attributes()?;
      self.stmt_end();
      return Ok(Stmt::Import(ImportDecl {
        type_only: false,
        specifier,
      }));
    };
    let type_only = t0.typ == TT::KeywordType
      && !matches!(t1.typ, TT::KeywordFrom | TT::Equals | TT::Comma);
    if type_only {
      self.consume();
    };
    let mut has_named_bindings = true;
    if is_binding_identifier(self.peek().typ) {
      self.consume();
      // `import x = require("x");` or `import x = A.B;`
      if self.consume_if(TT::Equals).is_match() {
        self.expr()?;
        self.stmt_end();
        return Ok(Stmt::Other);
      };
      has_named_bindings = self.consume_if(TT::Comma).is_match();
    };
    if has_named_bindings {
      match self.peek().typ {
        TT::Asterisk => {
          self.consume();
          self.require(TT::KeywordAs)?;
          self.require_predicate(is_binding_identifier, "namespace import name")?;
        }
        TT::BraceOpen => {
          self.skip_balanced()?;
        }
        _ => {
          return Err(
            self
              .peek()
              .error(SyntaxErrorType::ExpectedSyntax("import bindings")),
          )
        }
      };
    };
    self.require(TT::KeywordFrom)?;
    let specifier = self.module_specifier()?;
    self.skip_import_attributes()?;
    self.stmt_end();
    Ok(Stmt::Import(ImportDecl {
      type_only,
      specifier,
    }))
  }

  /// Parses `* from "x"`, `* as ns from "x"` or `{ a, b as c } from "x"`, where the source module is
  /// optional for the braced form.
  fn export_from(&mut self, type_only: bool) -> SyntaxResult<ExportDecl> {
    if self.consume_if(TT::Asterisk).is_match() {
      if self.consume_if(TT::KeywordAs).is_match() {
        self.require_predicate(
          |typ| typ.is_identifier_like() || typ == TT::LiteralString,
          "export name",
        )?;
      };
    } else {
      self.skip_balanced()?;
    };
    let specifier = if self.consume_if(TT::KeywordFrom).is_match() {
      Some(self.module_specifier()?)
    } else {
      None
    };
    self.skip_import_attributes()?;
    self.stmt_end();
    Ok(ExportDecl {
      type_only,
      specifier,
    })
  }

  pub fn export_stmt(&mut self) -> SyntaxResult<Stmt> {
    self.require(TT::KeywordExport)?;
    let (t0, t1) = self.peek_2();
    match t0.typ {
      TT::Asterisk | TT::BraceOpen => Ok(Stmt::Export(self.export_from(false)?)),
      TT::KeywordType if matches!(t1.typ, TT::Asterisk | TT::BraceOpen) => {
        self.consume();
        Ok(Stmt::Export(self.export_from(true)?))
      }
      TT::Equals => {
        self.consume();
        let expr = self.expr()?;
        self.stmt_end();
        Ok(Stmt::ExportAssignment(expr))
      }
      // `export as namespace X;` and `export import A = B.C;`
      TT::KeywordAs | TT::KeywordImport => {
        self.skip_stmt()?;
        Ok(Stmt::Other)
      }
      TT::KeywordDefault => {
        self.consume();
        self.decl_or_expr_stmt(DeclModifiers {
          export: true,
          export_default: true,
          ..DeclModifiers::default()
        })
      }
      _ => self.decl_or_expr_stmt(DeclModifiers {
        export: true,
        ..DeclModifiers::default()
      }),
    }
  }
}
