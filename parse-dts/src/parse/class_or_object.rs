use super::Parser;
use crate::ast::class_or_object::AccessorKind;
use crate::ast::class_or_object::ClassAccessor;
use crate::ast::class_or_object::ClassMember;
use crate::ast::class_or_object::ClassMethod;
use crate::ast::class_or_object::ClassProperty;
use crate::ast::class_or_object::PropertyKey;
use crate::ast::node::Node;
use crate::ast::type_expr::IndexSignature;
use crate::ast::type_expr::TypeExpr;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

fn is_member_modifier(typ: TT) -> bool {
  matches!(
    typ,
    TT::KeywordAbstract
      | TT::KeywordAccessor
      | TT::KeywordAsync
      | TT::KeywordDeclare
      | TT::KeywordOverride
      | TT::KeywordPrivate
      | TT::KeywordProtected
      | TT::KeywordPublic
      | TT::KeywordReadonly
      | TT::KeywordStatic
  )
}

pub fn accessor_kind(typ: TT) -> Option<AccessorKind> {
  match typ {
    TT::KeywordGet => Some(AccessorKind::Get),
    TT::KeywordSet => Some(AccessorKind::Set),
    _ => None,
  }
}

impl<'a> Parser<'a> {
  /// Whether the next token is a modifier rather than the name of a member called e.g. `static`
  /// or `readonly`.
  fn at_member_modifier(&self) -> bool {
    let (t0, t1) = self.peek_2();
    is_member_modifier(t0.typ)
      && (t1.typ.is_property_name_start() || matches!(t1.typ, TT::Asterisk))
      && (t0.typ == TT::KeywordStatic || !t1.preceded_by_line_terminator)
  }

  pub fn property_key(&mut self) -> SyntaxResult<Node<PropertyKey>> {
    self.with_loc(|p| {
      let t = p.peek();
      match t.typ {
        TT::LiteralString => {
          p.consume();
          Ok(PropertyKey::String(p.lit_str_val(t.loc)))
        }
        TT::LiteralNumber => Ok(PropertyKey::Number(p.consume_as_string())),
        TT::PrivateMember => Ok(PropertyKey::Private(p.consume_as_string())),
        TT::BracketOpen => {
          p.skip_balanced()?;
          Ok(PropertyKey::Computed)
        }
        typ if typ.is_identifier_like() => Ok(PropertyKey::Ident(p.consume_as_string())),
        _ => Err(t.error(SyntaxErrorType::ExpectedSyntax("property name"))),
      }
    })
  }

  /// `[key: string]` at the start of a member, as opposed to a computed property name.
  pub fn at_index_signature(&self) -> bool {
    self.peek().typ == TT::BracketOpen
      && self.peek_n(1).typ.is_identifier_like()
      && self.peek_n(2).typ == TT::Colon
  }

  pub fn index_signature(&mut self) -> SyntaxResult<IndexSignature> {
    self.require(TT::BracketOpen)?;
    self.require_predicate(TT::is_identifier_like, "index parameter")?;
    self.require(TT::Colon)?;
    let parameter_type = self.type_expr()?;
    self.require(TT::BracketClose)?;
    let type_annotation = if self.consume_if(TT::Colon).is_match() {
      Some(self.type_expr()?)
    } else {
      None
    };
    Ok(IndexSignature {
      parameter_type,
      type_annotation,
    })
  }

  /// The type after `extends` or `implements` in a class header. Class heritage is an expression,
  /// so calls like `extends mixin(A, B)` are allowed and skipped.
  pub fn heritage_expr(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    self.with_loc(|p| {
      let mut parts = vec![p.type_expr()?];
      while p.peek().typ == TT::ParenthesisOpen {
        p.skip_balanced()?;
        if p.consume_if(TT::Dot).is_match() {
          parts.push(p.type_expr()?);
        };
      }
      Ok(TypeExpr::Compound(parts))
    })
  }

  pub fn class_body(&mut self) -> SyntaxResult<Vec<Node<ClassMember>>> {
    self.require(TT::BraceOpen)?;
    self.list_with_loc(&[TT::Semicolon], TT::BraceClose, |p| p.class_member())
  }

  fn class_member(&mut self) -> SyntaxResult<ClassMember> {
    self.decorators()?;
    if self.peek().typ == TT::KeywordStatic && self.peek_n(1).typ == TT::BraceOpen {
      self.consume();
      self.skip_balanced()?;
      return Ok(ClassMember::StaticBlock);
    };

    let mut declare = false;
    let mut static_ = false;
    while self.at_member_modifier() {
      match self.consume().typ {
        TT::KeywordDeclare => declare = true,
        TT::KeywordStatic => static_ = true,
        _ => {}
      };
    }

    if self.at_index_signature() {
      return Ok(ClassMember::Index(self.index_signature()?));
    };

    let (t0, t1) = self.peek_2();
    if t0.typ == TT::KeywordConstructor
      && matches!(t1.typ, TT::ParenthesisOpen | TT::ChevronLeft)
    {
      self.consume();
      let signature = self.signature()?;
      self.skip_function_body()?;
      return Ok(ClassMember::Constructor(signature));
    };
    if let Some(kind) = accessor_kind(t0.typ).filter(|_| t1.typ.is_property_name_start()) {
      self.consume();
      let key = self.property_key()?;
      let signature = self.signature()?;
      self.skip_function_body()?;
      return Ok(ClassMember::Accessor(ClassAccessor {
        declare,
        static_,
        kind,
        key,
        signature,
      }));
    };

    let _ = self.consume_if(TT::Asterisk);
    let key = self.property_key()?;
    let _ = self.consume_if_pred(|t| matches!(t.typ, TT::Question | TT::Exclamation));
    if matches!(self.peek().typ, TT::ParenthesisOpen | TT::ChevronLeft) {
      let signature = self.signature()?;
      self.skip_function_body()?;
      return Ok(ClassMember::Method(ClassMethod {
        declare,
        static_,
        key,
        signature,
      }));
    };
    let type_annotation = if self.consume_if(TT::Colon).is_match() {
      Some(self.type_expr()?)
    } else {
      None
    };
    let initializer = if self.consume_if(TT::Equals).is_match() {
      Some(self.expr()?)
    } else {
      None
    };
    Ok(ClassMember::Property(ClassProperty {
      declare,
      static_,
      key,
      type_annotation,
      initializer,
    }))
  }
}
