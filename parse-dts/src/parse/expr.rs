use super::class_or_object::accessor_kind;
use super::stmt::DeclModifiers;
use super::Parser;
use crate::ast::class_or_object::ObjectMember;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

fn is_expr_terminator(typ: TT) -> bool {
  matches!(
    typ,
    TT::BraceClose
      | TT::BracketClose
      | TT::Comma
      | TT::EOF
      | TT::ParenthesisClose
      | TT::Semicolon
  )
}

/// Whether an expression can end with this token.
pub fn completes_expr(typ: TT) -> bool {
  typ.is_identifier_like()
    || matches!(
      typ,
      TT::BraceClose
        | TT::BracketClose
        | TT::LiteralFalse
        | TT::LiteralNull
        | TT::LiteralNumber
        | TT::LiteralString
        | TT::LiteralTemplate
        | TT::LiteralTrue
        | TT::ParenthesisClose
        | TT::PrivateMember
    )
}

/// Whether this token, at the start of a new line after a complete expression, begins a new
/// statement via automatic semicolon insertion.
pub fn starts_stmt(typ: TT) -> bool {
  (typ.is_identifier_like() && !matches!(typ, TT::KeywordIn | TT::KeywordInstanceof))
    || typ == TT::At
}

impl<'a> Parser<'a> {
  /// Parses an expression, keeping only the object literals, class expressions and function
  /// expressions within it. Function bodies are skipped.
  pub fn expr(&mut self) -> SyntaxResult<Node<Expr>> {
    let start = self.checkpoint();
    let mut parts = Vec::new();
    loop {
      let t = self.peek();
      if is_expr_terminator(t.typ) {
        break;
      };
      let prev = self
        .last_consumed()
        .filter(|_| self.next_tok_i > start.next_tok_i);
      if let Some(prev) = prev {
        if t.preceded_by_line_terminator && completes_expr(prev.typ) && starts_stmt(t.typ) {
          break;
        };
      };
      match t.typ {
        // Arrow function body.
        TT::BraceOpen if prev.is_some_and(|p| p.typ == TT::EqualsChevronRight) => {
          self.skip_balanced()?;
        }
        TT::BraceOpen => parts.push(self.object_lit()?),
        TT::ParenthesisOpen | TT::BracketOpen => parts.push(self.expr_group()?),
        TT::KeywordFunction => parts.push(self.function_expr()?),
        TT::KeywordClass => parts.push(self.with_loc(|p| {
          Ok(Expr::Class(p.class_decl(DeclModifiers::default())?))
        })?),
        _ => {
          self.consume();
        }
      };
    }
    let loc = self.since_checkpoint(&start);
    match parts.pop() {
      Some(only) if parts.is_empty() && only.loc == loc => Ok(only),
      Some(last) => {
        parts.push(last);
        Ok(Node::new(loc, Expr::Compound(parts)))
      }
      None => Ok(Node::new(loc, Expr::Compound(parts))),
    }
  }

  /// A parenthesised expression, argument list, arrow function parameter list or array literal.
  fn expr_group(&mut self) -> SyntaxResult<Node<Expr>> {
    self.with_loc(|p| {
      let close = match p.consume().typ {
        TT::ParenthesisOpen => TT::ParenthesisClose,
        _ => TT::BracketClose,
      };
      let mut parts = Vec::new();
      loop {
        let t = p.peek();
        if t.typ == close {
          p.consume();
          break;
        };
        match t.typ {
          TT::EOF => return Err(t.error(SyntaxErrorType::RequiredTokenNotFound(close))),
          TT::BraceClose
          | TT::BracketClose
          | TT::Comma
          | TT::ParenthesisClose
          | TT::Semicolon => {
            p.consume();
          }
          _ => parts.push(p.expr()?),
        };
      }
      Ok(Expr::Compound(parts))
    })
  }

  fn object_lit(&mut self) -> SyntaxResult<Node<Expr>> {
    self.with_loc(|p| {
      p.require(TT::BraceOpen)?;
      let members = p.list_with_loc(&[TT::Comma, TT::Semicolon], TT::BraceClose, |p| {
        p.object_member()
      })?;
      Ok(Expr::Object(members))
    })
  }

  fn object_member(&mut self) -> SyntaxResult<ObjectMember> {
    if self.consume_if(TT::DotDotDot).is_match() {
      return Ok(ObjectMember::Spread(self.expr()?));
    };
    let (t0, t1) = self.peek_2();
    if let Some(kind) = accessor_kind(t0.typ).filter(|_| t1.typ.is_property_name_start()) {
      self.consume();
      let key = self.property_key()?;
      let signature = self.signature()?;
      self.skip_function_body()?;
      return Ok(ObjectMember::Accessor {
        kind,
        key,
        signature,
      });
    };
    if t0.typ == TT::KeywordAsync
      && !t1.preceded_by_line_terminator
      && (t1.typ.is_property_name_start() || t1.typ == TT::Asterisk)
    {
      self.consume();
    };
    let _ = self.consume_if(TT::Asterisk);
    let key = self.property_key()?;
    match self.peek().typ {
      TT::Colon => {
        self.consume();
        let value = self.expr()?;
        Ok(ObjectMember::Property { key, value })
      }
      TT::ParenthesisOpen | TT::ChevronLeft => {
        let signature = self.signature()?;
        self.skip_function_body()?;
        Ok(ObjectMember::Method { key, signature })
      }
      TT::Equals => {
        self.consume();
        let initializer = Some(self.expr()?);
        Ok(ObjectMember::Shorthand { key, initializer })
      }
      _ => Ok(ObjectMember::Shorthand {
        key,
        initializer: None,
      }),
    }
  }

  fn function_expr(&mut self) -> SyntaxResult<Node<Expr>> {
    self.with_loc(|p| {
      p.require(TT::KeywordFunction)?;
      let _ = p.consume_if(TT::Asterisk);
      let _ = p.consume_if_pred(|t| t.typ.is_identifier_like());
      let signature = p.signature()?;
      p.skip_function_body()?;
      Ok(Expr::Function(signature))
    })
  }
}
