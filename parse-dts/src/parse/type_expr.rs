use super::class_or_object::accessor_kind;
use super::Parser;
use crate::ast::node::Node;
use crate::ast::type_expr::AccessorSignature;
use crate::ast::type_expr::MappedType;
use crate::ast::type_expr::MethodSignature;
use crate::ast::type_expr::Param;
use crate::ast::type_expr::PropertySignature;
use crate::ast::type_expr::Signature;
use crate::ast::type_expr::TypeExpr;
use crate::ast::type_expr::TypeMember;
use crate::ast::type_expr::TypeParameter;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::Token;
use crate::token::TT;

fn is_type_terminator(typ: TT) -> bool {
  matches!(
    typ,
    TT::BraceClose
      | TT::BracketClose
      | TT::ChevronRight
      | TT::Comma
      | TT::EOF
      | TT::Equals
      | TT::EqualsChevronRight
      | TT::ParenthesisClose
      | TT::Semicolon
  )
}

/// Whether a type can end with this token. After such a token, only a binary or postfix type
/// operator continues the type; anything else starts the next member or statement.
fn completes_type(typ: TT) -> bool {
  match typ {
    TT::Identifier
    | TT::LiteralFalse
    | TT::LiteralNull
    | TT::LiteralNumber
    | TT::LiteralString
    | TT::LiteralTemplate
    | TT::LiteralTrue => true,
    TT::KeywordAbstract
    | TT::KeywordAs
    | TT::KeywordAsserts
    | TT::KeywordExtends
    | TT::KeywordImport
    | TT::KeywordIn
    | TT::KeywordInfer
    | TT::KeywordIs
    | TT::KeywordKeyof
    | TT::KeywordNew
    | TT::KeywordReadonly
    | TT::KeywordTypeof
    | TT::KeywordUnique => false,
    typ => typ.is_keyword(),
  }
}

fn continues_completed_type(t: &Token) -> bool {
  match t.typ {
    TT::Ampersand | TT::Bar | TT::Colon | TT::Dot | TT::KeywordExtends | TT::Question => true,
    TT::BracketOpen | TT::ChevronLeft | TT::KeywordAs | TT::KeywordIs => {
      !t.preceded_by_line_terminator
    }
    _ => false,
  }
}

impl<'a> Parser<'a> {
  /// Parses a type, keeping only the function types, type literals and mapped types within it.
  pub fn type_expr(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    let start = self.checkpoint();
    let mut parts = Vec::new();
    let mut completed = false;
    loop {
      let t = self.peek();
      if is_type_terminator(t.typ) || (completed && !continues_completed_type(&t)) {
        break;
      };
      match t.typ {
        TT::ParenthesisOpen if self.at_function_type() => parts.push(self.function_type()?),
        TT::ParenthesisOpen | TT::BracketOpen => parts.push(self.type_group()?),
        TT::ChevronLeft if completed => parts.push(self.type_group()?),
        TT::ChevronLeft => parts.push(self.function_type()?),
        TT::KeywordNew
          if matches!(
            self.peek_n(1).typ,
            TT::ParenthesisOpen | TT::ChevronLeft
          ) =>
        {
          parts.push(self.function_type()?)
        }
        TT::BraceOpen if self.at_mapped_type() => parts.push(self.mapped_type()?),
        TT::BraceOpen => parts.push(self.object_type()?),
        _ => {
          self.consume();
          completed = completes_type(t.typ);
          continue;
        }
      };
      completed = true;
    }
    let loc = self.since_checkpoint(&start);
    match parts.pop() {
      Some(only) if parts.is_empty() && only.loc == loc => Ok(only),
      Some(last) => {
        parts.push(last);
        Ok(Node::new(loc, TypeExpr::Compound(parts)))
      }
      None => Ok(Node::new(loc, TypeExpr::Compound(parts))),
    }
  }

  /// A parenthesised type, tuple, indexed access or type argument list.
  fn type_group(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    self.with_loc(|p| {
      let close = match p.consume().typ {
        TT::ParenthesisOpen => TT::ParenthesisClose,
        TT::BracketOpen => TT::BracketClose,
        _ => TT::ChevronRight,
      };
      let mut parts = Vec::new();
      loop {
        let t = p.peek();
        if t.typ == close {
          p.consume();
          break;
        };
        if t.typ == TT::EOF {
          return Err(t.error(SyntaxErrorType::RequiredTokenNotFound(close)));
        };
        let start = p.checkpoint();
        let part = p.type_expr()?;
        if p.since_checkpoint(&start).is_empty() {
          // Separators, named tuple labels' `?`, and stray closers.
          p.consume();
        } else {
          parts.push(part);
        };
      }
      Ok(TypeExpr::Compound(parts))
    })
  }

  fn at_function_type(&self) -> bool {
    self
      .matching_close(self.next_tok_i)
      .is_some_and(|close| self.token_at(close + 1).typ == TT::EqualsChevronRight)
  }

  /// `(a: A) => B`, `<T>(a: T) => T` or `new (a: A) => B`.
  fn function_type(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    self.with_loc(|p| {
      let _ = p.consume_if(TT::KeywordNew);
      let signature = p.with_loc(|p| {
        let type_parameters = p.type_parameters_opt()?;
        let params = p.params()?;
        p.require(TT::EqualsChevronRight)?;
        let return_type = Some(p.type_expr()?);
        Ok(Signature {
          type_parameters,
          params,
          return_type,
        })
      })?;
      Ok(TypeExpr::Function(signature))
    })
  }

  fn object_type(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    self.with_loc(|p| Ok(TypeExpr::Literal(p.type_members()?)))
  }

  /// `{ [K in T]: V }`, optionally with `readonly`, `+readonly` or `-readonly`.
  fn at_mapped_type(&self) -> bool {
    let mut i = 1;
    if matches!(self.peek_n(i).typ, TT::Plus | TT::Hyphen) {
      i += 1;
    };
    if self.peek_n(i).typ == TT::KeywordReadonly {
      i += 1;
    };
    self.peek_n(i).typ == TT::BracketOpen
      && self.peek_n(i + 1).typ.is_identifier_like()
      && self.peek_n(i + 2).typ == TT::KeywordIn
  }

  fn mapped_type(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    self.with_loc(|p| {
      p.require(TT::BraceOpen)?;
      let _ = p.consume_if_pred(|t| matches!(t.typ, TT::Plus | TT::Hyphen));
      let _ = p.consume_if(TT::KeywordReadonly);
      p.require(TT::BracketOpen)?;
      p.require_predicate(TT::is_identifier_like, "mapped type parameter")?;
      p.require(TT::KeywordIn)?;
      let constraint = p.type_expr()?;
      p.require(TT::BracketClose)?;
      let _ = p.consume_if_pred(|t| matches!(t.typ, TT::Plus | TT::Hyphen));
      let _ = p.consume_if(TT::Question);
      let value = if p.consume_if(TT::Colon).is_match() {
        Some(p.type_expr()?)
      } else {
        None
      };
      let _ = p.consume_if(TT::Semicolon);
      p.require(TT::BraceClose)?;
      Ok(TypeExpr::Mapped(MappedType { constraint, value }))
    })
  }

  /// The braced member list of an interface or type literal.
  pub fn type_members(&mut self) -> SyntaxResult<Vec<Node<TypeMember>>> {
    self.require(TT::BraceOpen)?;
    self.list_with_loc(&[TT::Comma, TT::Semicolon], TT::BraceClose, |p| {
      p.type_member()
    })
  }

  fn type_member(&mut self) -> SyntaxResult<TypeMember> {
    let (t0, t1) = self.peek_2();
    match t0.typ {
      TT::ParenthesisOpen | TT::ChevronLeft => return Ok(TypeMember::Call(self.signature()?)),
      TT::KeywordNew if matches!(t1.typ, TT::ParenthesisOpen | TT::ChevronLeft) => {
        self.consume();
        return Ok(TypeMember::Construct(self.signature()?));
      }
      _ => {}
    };
    let readonly = t0.typ == TT::KeywordReadonly && t1.typ.is_property_name_start();
    if readonly {
      self.consume();
    };
    if self.at_index_signature() {
      return Ok(TypeMember::Index(self.index_signature()?));
    };
    let (t0, t1) = self.peek_2();
    if let Some(kind) = accessor_kind(t0.typ).filter(|_| t1.typ.is_property_name_start()) {
      self.consume();
      let key = self.property_key()?;
      let signature = self.signature()?;
      return Ok(TypeMember::Accessor(AccessorSignature {
        kind,
        key,
        signature,
      }));
    };
    let key = self.property_key()?;
    let optional = self.consume_if(TT::Question).is_match();
    if matches!(self.peek().typ, TT::ParenthesisOpen | TT::ChevronLeft) {
      let signature = self.signature()?;
      return Ok(TypeMember::Method(MethodSignature {
        key,
        optional,
        signature,
      }));
    };
    let type_annotation = if self.consume_if(TT::Colon).is_match() {
      Some(self.type_expr()?)
    } else {
      None
    };
    Ok(TypeMember::Property(PropertySignature {
      readonly,
      key,
      optional,
      type_annotation,
    }))
  }

  /// Type parameters, parameters and optional return type annotation.
  pub fn signature(&mut self) -> SyntaxResult<Node<Signature>> {
    self.with_loc(|p| {
      let type_parameters = p.type_parameters_opt()?;
      let params = p.params()?;
      let return_type = if p.consume_if(TT::Colon).is_match() {
        Some(p.type_expr()?)
      } else {
        None
      };
      Ok(Signature {
        type_parameters,
        params,
        return_type,
      })
    })
  }

  pub fn type_parameters_opt(&mut self) -> SyntaxResult<Vec<Node<TypeParameter>>> {
    if !self.consume_if(TT::ChevronLeft).is_match() {
      return Ok(Vec::new());
    };
    self.list_with_loc(&[TT::Comma], TT::ChevronRight, |p| {
      while matches!(
        p.peek().typ,
        TT::KeywordConst | TT::KeywordIn | TT::KeywordOut
      ) && p.peek_n(1).typ.is_identifier_like()
      {
        p.consume();
      }
      let name = p.require_predicate(TT::is_identifier_like, "type parameter")?;
      let name = p.string(name.loc);
      let constraint = if p.consume_if(TT::KeywordExtends).is_match() {
        Some(p.type_expr()?)
      } else {
        None
      };
      let default = if p.consume_if(TT::Equals).is_match() {
        Some(p.type_expr()?)
      } else {
        None
      };
      Ok(TypeParameter {
        name,
        constraint,
        default,
      })
    })
  }

  fn params(&mut self) -> SyntaxResult<Vec<Node<Param>>> {
    self.require(TT::ParenthesisOpen)?;
    self.list_with_loc(&[TT::Comma], TT::ParenthesisClose, |p| {
      p.decorators()?;
      while matches!(
        p.peek().typ,
        TT::KeywordOverride
          | TT::KeywordPrivate
          | TT::KeywordProtected
          | TT::KeywordPublic
          | TT::KeywordReadonly
      ) && (p.peek_n(1).typ.is_identifier_like()
        || matches!(
          p.peek_n(1).typ,
          TT::BraceOpen | TT::BracketOpen | TT::DotDotDot
        ))
      {
        p.consume();
      }
      let rest = p.consume_if(TT::DotDotDot).is_match();
      let name = p.binding_name()?;
      let optional = p.consume_if(TT::Question).is_match();
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
      Ok(Param {
        rest,
        name,
        optional,
        type_annotation,
        initializer,
      })
    })
  }
}
