use super::expr::completes_expr;
use super::expr::starts_stmt;
use super::Parser;
use crate::ast::node::Node;
use crate::ast::stmt::BindingName;
use crate::ast::stmt::ClassDecl;
use crate::ast::stmt::EnumDecl;
use crate::ast::stmt::EnumMember;
use crate::ast::stmt::FunctionDecl;
use crate::ast::stmt::GlobalDecl;
use crate::ast::stmt::Ident;
use crate::ast::stmt::InterfaceDecl;
use crate::ast::stmt::ModuleDecl;
use crate::ast::stmt::ModuleName;
use crate::ast::stmt::NamespaceBody;
use crate::ast::stmt::NamespaceDecl;
use crate::ast::stmt::Stmt;
use crate::ast::stmt::TopLevel;
use crate::ast::stmt::TypeAliasDecl;
use crate::ast::stmt::VarDeclMode;
use crate::ast::stmt::VarDeclarator;
use crate::ast::stmt::VarStmt;
use crate::directive::scan_reference_directives;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::token::TT;
use crate::token::UNRESERVED_KEYWORDS;

/// Modifiers seen before a declaration keyword.
#[derive(Clone, Copy, Default)]
pub struct DeclModifiers {
  pub export: bool,
  pub export_default: bool,
  pub declare: bool,
  pub abstract_: bool,
}

impl DeclModifiers {
  fn any(&self) -> bool {
    self.export || self.export_default || self.declare || self.abstract_
  }
}

pub fn is_binding_identifier(typ: TT) -> bool {
  typ == TT::Identifier || UNRESERVED_KEYWORDS.contains(&typ)
}

fn is_control_flow_keyword(typ: TT) -> bool {
  matches!(
    typ,
    TT::KeywordBreak
      | TT::KeywordCase
      | TT::KeywordCatch
      | TT::KeywordContinue
      | TT::KeywordDebugger
      | TT::KeywordDo
      | TT::KeywordElse
      | TT::KeywordFinally
      | TT::KeywordFor
      | TT::KeywordIf
      | TT::KeywordReturn
      | TT::KeywordSwitch
      | TT::KeywordThrow
      | TT::KeywordTry
      | TT::KeywordWhile
      | TT::KeywordWith
  )
}

impl<'a> Parser<'a> {
  pub fn parse_top_level(&mut self) -> SyntaxResult<Node<TopLevel>> {
    let references = scan_reference_directives(self.source());
    let body = self.stmts(TT::EOF)?;
    Ok(Node::new(Loc(0, self.source().len()), TopLevel {
      references,
      body,
    }))
  }

  /// Parses statements up to and including `end`.
  fn stmts(&mut self, end: TT) -> SyntaxResult<Vec<Node<Stmt>>> {
    let mut body = Vec::new();
    loop {
      let t = self.peek();
      if t.typ == end {
        self.consume();
        break;
      };
      if t.typ == TT::EOF {
        return Err(t.error(SyntaxErrorType::RequiredTokenNotFound(end)));
      };
      body.push(self.stmt()?);
    }
    Ok(body)
  }

  pub fn block_body(&mut self) -> SyntaxResult<Vec<Node<Stmt>>> {
    self.require(TT::BraceOpen)?;
    self.stmts(TT::BraceClose)
  }

  pub fn stmt(&mut self) -> SyntaxResult<Node<Stmt>> {
    self.with_loc(|p| p.stmt_stx())
  }

  fn stmt_stx(&mut self) -> SyntaxResult<Stmt> {
    let (t0, t1) = self.peek_2();
    match t0.typ {
      TT::Semicolon => {
        self.consume();
        Ok(Stmt::Empty)
      }
      TT::BraceOpen => Ok(Stmt::Block(self.block_body()?)),
      TT::At => {
        self.decorators()?;
        self.stmt_stx()
      }
      // `import(...)` and `import.meta` are expressions.
      TT::KeywordImport if !matches!(t1.typ, TT::ParenthesisOpen | TT::Dot) => self.import_stmt(),
      TT::KeywordExport => self.export_stmt(),
      t if is_control_flow_keyword(t) => {
        self.skip_stmt()?;
        Ok(Stmt::Other)
      }
      _ => self.decl_or_expr_stmt(DeclModifiers::default()),
    }
  }

  /// Skips a statement whose contents can never declare anything visible outside it, such as an
  /// `if` or `return` in the body of a namespace.
  pub fn skip_stmt(&mut self) -> SyntaxResult<()> {
    let mut prev = self.consume().typ;
    loop {
      let t = self.peek();
      match t.typ {
        TT::EOF | TT::BraceClose => break,
        TT::Semicolon => {
          self.consume();
          break;
        }
        TT::BraceOpen => {
          self.skip_balanced()?;
          if !matches!(
            self.peek().typ,
            TT::KeywordElse | TT::KeywordCatch | TT::KeywordFinally | TT::KeywordWhile
          ) {
            break;
          };
          prev = TT::BraceClose;
        }
        TT::ParenthesisOpen | TT::BracketOpen => {
          self.skip_balanced()?;
          prev = TT::ParenthesisClose;
        }
        typ if t.preceded_by_line_terminator && completes_expr(prev) && starts_stmt(typ) => break,
        _ => {
          prev = self.consume().typ;
        }
      };
    }
    Ok(())
  }

  pub fn decl_or_expr_stmt(&mut self, mods: DeclModifiers) -> SyntaxResult<Stmt> {
    let (t0, t1) = self.peek_2();
    let followed_on_same_line = !t1.preceded_by_line_terminator;
    match t0.typ {
      TT::KeywordDeclare if followed_on_same_line && t1.typ.is_identifier_like() => {
        self.consume();
        self.decl_or_expr_stmt(DeclModifiers {
          declare: true,
          ..mods
        })
      }
      TT::KeywordAbstract if followed_on_same_line && t1.typ == TT::KeywordClass => {
        self.consume();
        self.decl_or_expr_stmt(DeclModifiers {
          abstract_: true,
          ..mods
        })
      }
      TT::KeywordAsync if followed_on_same_line && t1.typ == TT::KeywordFunction => {
        self.consume();
        self.decl_or_expr_stmt(mods)
      }
      TT::KeywordConst if t1.typ == TT::KeywordEnum => {
        self.consume();
        Ok(Stmt::Enum(self.enum_decl(mods, true)?))
      }
      TT::KeywordConst | TT::KeywordVar => Ok(Stmt::Var(self.var_stmt(mods)?)),
      TT::KeywordLet
        if t1.typ.is_identifier_like() || matches!(t1.typ, TT::BraceOpen | TT::BracketOpen) =>
      {
        Ok(Stmt::Var(self.var_stmt(mods)?))
      }
      TT::KeywordEnum => Ok(Stmt::Enum(self.enum_decl(mods, false)?)),
      TT::KeywordFunction => Ok(Stmt::Function(self.function_decl(mods)?)),
      TT::KeywordClass => Ok(Stmt::Class(self.class_decl(mods)?)),
      TT::KeywordInterface if is_binding_identifier(t1.typ) => {
        Ok(Stmt::Interface(self.interface_decl(mods)?))
      }
      TT::KeywordType if followed_on_same_line && is_binding_identifier(t1.typ) => {
        Ok(Stmt::TypeAlias(self.type_alias_decl(mods)?))
      }
      TT::KeywordNamespace if followed_on_same_line && t1.typ.is_identifier_like() => {
        self.consume();
        Ok(Stmt::Namespace(self.namespace_decl(mods.export, mods.declare)?))
      }
      TT::KeywordModule
        if followed_on_same_line
          && (t1.typ.is_identifier_like() || t1.typ == TT::LiteralString) =>
      {
        Ok(Stmt::Module(self.module_decl(mods)?))
      }
      TT::KeywordGlobal if t1.typ == TT::BraceOpen => {
        self.consume();
        Ok(Stmt::Global(GlobalDecl {
          body: self.block_body()?,
        }))
      }
      _ if mods.export_default => {
        let expr = self.expr()?;
        self.stmt_end();
        Ok(Stmt::ExportAssignment(expr))
      }
      _ if mods.any() => Err(t0.error(SyntaxErrorType::ExpectedSyntax("declaration"))),
      _ => {
        let start = self.checkpoint();
        let expr = self.expr()?;
        if self.since_checkpoint(&start).is_empty() {
          return Err(t0.error(SyntaxErrorType::ExpectedSyntax("statement")));
        };
        self.stmt_end();
        Ok(Stmt::Expr(expr))
      }
    }
  }

  fn var_stmt(&mut self, mods: DeclModifiers) -> SyntaxResult<VarStmt> {
    let mode = match self.consume().typ {
      TT::KeywordConst => VarDeclMode::Const,
      TT::KeywordLet => VarDeclMode::Let,
      _ => VarDeclMode::Var,
    };
    let mut declarators = Vec::new();
    loop {
      declarators.push(self.with_loc(|p| {
        let name = p.binding_name()?;
        let _ = p.consume_if(TT::Exclamation);
        let type_annotation = if p.consume_if(TT::Colon).is_match() {
          Some(p.type_expr()?)
        } else {
          None
        };
        let initializer = if p.consume_if(TT::Equals).is_match() {
          Some(p.expr()?)
        } else {
          None
        };
        Ok(VarDeclarator {
          name,
          type_annotation,
          initializer,
        })
      })?);
      if !self.consume_if(TT::Comma).is_match() {
        break;
      };
    }
    self.stmt_end();
    Ok(VarStmt {
      export: mods.export,
      declare: mods.declare,
      mode,
      declarators,
    })
  }

  pub fn binding_name(&mut self) -> SyntaxResult<Node<BindingName>> {
    self.with_loc(|p| match p.peek().typ {
      TT::BraceOpen | TT::BracketOpen => {
        p.skip_balanced()?;
        Ok(BindingName::Pattern)
      }
      _ => {
        let t = p.require_predicate(TT::is_identifier_like, "binding name")?;
        Ok(BindingName::Ident(p.string(t.loc)))
      }
    })
  }

  fn decl_name(&mut self) -> SyntaxResult<Node<Ident>> {
    self.with_loc(|p| {
      let t = p.require_predicate(is_binding_identifier, "name")?;
      Ok(Ident {
        name: p.string(t.loc),
      })
    })
  }

  fn function_decl(&mut self, mods: DeclModifiers) -> SyntaxResult<FunctionDecl> {
    self.require(TT::KeywordFunction)?;
    let _ = self.consume_if(TT::Asterisk);
    let name = if is_binding_identifier(self.peek().typ) {
      Some(self.decl_name()?)
    } else if mods.export_default {
      None
    } else {
      return Err(
        self
          .peek()
          .error(SyntaxErrorType::ExpectedSyntax("function name")),
      );
    };
    let signature = self.signature()?;
    self.skip_function_body()?;
    self.stmt_end();
    Ok(FunctionDecl {
      export: mods.export,
      export_default: mods.export_default,
      declare: mods.declare,
      name,
      signature,
    })
  }

  /// Parses a class declaration or class expression, starting at the `class` keyword.
  pub fn class_decl(&mut self, mods: DeclModifiers) -> SyntaxResult<ClassDecl> {
    self.require(TT::KeywordClass)?;
    let t = self.peek();
    let name = if is_binding_identifier(t.typ) && t.typ != TT::KeywordImplements {
      Some(self.decl_name()?)
    } else {
      None
    };
    let type_parameters = self.type_parameters_opt()?;
    let extends = if self.consume_if(TT::KeywordExtends).is_match() {
      Some(self.heritage_expr()?)
    } else {
      None
    };
    let mut implements = Vec::new();
    if self.consume_if(TT::KeywordImplements).is_match() {
      loop {
        implements.push(self.heritage_expr()?);
        if !self.consume_if(TT::Comma).is_match() {
          break;
        };
      }
    };
    let members = self.class_body()?;
    Ok(ClassDecl {
      export: mods.export,
      export_default: mods.export_default,
      declare: mods.declare,
      abstract_: mods.abstract_,
      name,
      type_parameters,
      extends,
      implements,
      members,
    })
  }

  fn interface_decl(&mut self, mods: DeclModifiers) -> SyntaxResult<InterfaceDecl> {
    self.require(TT::KeywordInterface)?;
    let name = self.decl_name()?;
    let type_parameters = self.type_parameters_opt()?;
    let mut extends = Vec::new();
    if self.consume_if(TT::KeywordExtends).is_match() {
      loop {
        extends.push(self.type_expr()?);
        if !self.consume_if(TT::Comma).is_match() {
          break;
        };
      }
    };
    let members = self.type_members()?;
    Ok(InterfaceDecl {
      export: mods.export,
      declare: mods.declare,
      name,
      type_parameters,
      extends,
      members,
    })
  }

  fn type_alias_decl(&mut self, mods: DeclModifiers) -> SyntaxResult<TypeAliasDecl> {
    self.require(TT::KeywordType)?;
    let name = self.decl_name()?;
    let type_parameters = self.type_parameters_opt()?;
    // Older declaration files contain `type Foo { ... }`.
    let _ = self.consume_if(TT::Equals);
    let type_expr = self.type_expr()?;
    self.stmt_end();
    Ok(TypeAliasDecl {
      export: mods.export,
      declare: mods.declare,
      name,
      type_parameters,
      type_expr,
    })
  }

  fn enum_decl(&mut self, mods: DeclModifiers, const_: bool) -> SyntaxResult<EnumDecl> {
    self.require(TT::KeywordEnum)?;
    let name = self.decl_name()?;
    self.require(TT::BraceOpen)?;
    let members = self.list_with_loc(&[TT::Comma, TT::Semicolon], TT::BraceClose, |p| {
      let key = p.property_key()?;
      let initializer = if p.consume_if(TT::Equals).is_match() {
        Some(p.expr()?)
      } else {
        None
      };
      Ok(EnumMember { key, initializer })
    })?;
    Ok(EnumDecl {
      export: mods.export,
      declare: mods.declare,
      const_,
      name,
      members,
    })
  }

  /// Parses the rest of a namespace declaration after the `namespace` keyword (or after the dot in
  /// a dotted name).
  fn namespace_decl(&mut self, export: bool, declare: bool) -> SyntaxResult<NamespaceDecl> {
    let name = self.with_loc(|p| {
      let t = p.require_predicate(TT::is_identifier_like, "namespace name")?;
      Ok(Ident {
        name: p.string(t.loc),
      })
    })?;
    let body = if self.consume_if(TT::Dot).is_match() {
      NamespaceBody::Namespace(self.with_loc(|p| p.namespace_decl(false, false))?)
    } else {
      NamespaceBody::Block(self.block_body()?)
    };
    Ok(NamespaceDecl {
      export,
      declare,
      name,
      body,
    })
  }

  fn module_decl(&mut self, mods: DeclModifiers) -> SyntaxResult<ModuleDecl> {
    self.require(TT::KeywordModule)?;
    let name = self.with_loc(|p| {
      let t = p.consume();
      if t.typ == TT::LiteralString {
        return Ok(ModuleName::String(p.lit_str_val(t.loc)));
      };
      let mut name = p.string(t.loc);
      while p.consume_if(TT::Dot).is_match() {
        let part = p.require_predicate(TT::is_identifier_like, "module name")?;
        name.push('.');
        name.push_str(p.str(part.loc));
      }
      Ok(ModuleName::Ident(name))
    })?;
    let body = if self.peek().typ == TT::BraceOpen {
      Some(self.block_body()?)
    } else {
      self.stmt_end();
      None
    };
    Ok(ModuleDecl {
      export: mods.export,
      declare: mods.declare,
      name,
      body,
    })
  }

  pub fn decorators(&mut self) -> SyntaxResult<()> {
    while self.consume_if(TT::At).is_match() {
      self.require_predicate(TT::is_identifier_like, "decorator")?;
      loop {
        match self.peek().typ {
          TT::Dot => {
            self.consume();
            self.require_predicate(TT::is_identifier_like, "decorator")?;
          }
          TT::ParenthesisOpen => {
            self.skip_balanced()?;
          }
          _ => break,
        };
      }
    }
    Ok(())
  }
}
