use super::Parser;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::token::TT;

impl<'a> Parser<'a> {
  pub fn with_loc<S, F>(&mut self, f: F) -> SyntaxResult<Node<S>>
  where
    F: FnOnce(&mut Self) -> SyntaxResult<S>,
  {
    let start = self.checkpoint();
    let stx = f(self)?;
    Ok(Node::new(self.since_checkpoint(&start), stx))
  }

  /// Parse items until `close`, which will also be consumed. Any number of `separators` may appear
  /// before, between and after items.
  pub fn list_with_loc<S, F>(
    &mut self,
    separators: &[TT],
    close: TT,
    f: F,
  ) -> SyntaxResult<Vec<Node<S>>>
  where
    F: Fn(&mut Self) -> SyntaxResult<S>,
  {
    let mut nodes = Vec::new();
    loop {
      while separators.contains(&self.peek().typ) {
        self.consume();
      }
      if self.consume_if(close).is_match() {
        break;
      };
      if self.peek().typ == TT::EOF {
        return Err(self.peek().error(SyntaxErrorType::RequiredTokenNotFound(close)));
      };
      let before = self.next_tok_i;
      nodes.push(self.with_loc(&f)?);
      if self.next_tok_i == before {
        return Err(self.peek().error(SyntaxErrorType::ExpectedSyntax("list item")));
      };
    }
    Ok(nodes)
  }

  /// Consume a bracketed region starting at the next token, which must be `(`, `[` or `{`,
  /// including everything nested inside it.
  pub fn skip_balanced(&mut self) -> SyntaxResult<Loc> {
    let start = self.peek();
    debug_assert!(matches!(
      start.typ,
      TT::ParenthesisOpen | TT::BracketOpen | TT::BraceOpen
    ));
    match self.matching_close(self.next_tok_i) {
      Some(close) => {
        let end = self.tokens[close].loc.1;
        self.next_tok_i = close + 1;
        Ok(Loc(start.loc.0, end))
      }
      None => {
        self.next_tok_i = self.tokens.len() - 1;
        Err(self.peek().error(SyntaxErrorType::UnexpectedEnd))
      }
    }
  }

  /// Skip the body of a function, method or accessor if it has one.
  pub fn skip_function_body(&mut self) -> SyntaxResult<()> {
    if self.peek().typ == TT::BraceOpen {
      self.skip_balanced()?;
    };
    Ok(())
  }

  /// Consume a statement-terminating semicolon if present; otherwise rely on automatic semicolon
  /// insertion.
  pub fn stmt_end(&mut self) {
    let _ = self.consume_if(TT::Semicolon);
  }
}
