use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::lex::KEYWORDS_MAPPING;
use crate::loc::Loc;
use ahash::HashSet;
use ahash::HashSetExt;
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum TT {
  // Special token used to represent the end of the source code. Easier than using and handling Option everywhere.
  EOF,
  // Source the lexer could not make sense of, such as an unterminated string. The parser skims over
  // these like any other token.
  Invalid,
  // These are only used by lexer.
  CommentMultiline,
  CommentMultilineEnd,
  CommentSingle,
  LineTerminator,
  Whitespace,

  At,
  Ampersand,
  Asterisk,
  Bar,
  BraceClose,
  BraceOpen,
  BracketClose,
  BracketOpen,
  Caret,
  ChevronLeft,
  ChevronRight,
  Colon,
  Comma,
  Dot,
  DotDotDot,
  Equals,
  EqualsChevronRight,
  Exclamation,
  Hyphen,
  Identifier,
  KeywordAs,
  KeywordAsync,
  KeywordAwait,
  KeywordBreak,
  KeywordCase,
  KeywordCatch,
  KeywordClass,
  KeywordConst,
  KeywordConstructor,
  KeywordContinue,
  KeywordDebugger,
  KeywordDefault,
  KeywordDelete,
  KeywordDo,
  KeywordElse,
  KeywordEnum,
  KeywordExport,
  KeywordExtends,
  KeywordFinally,
  KeywordFor,
  KeywordFrom,
  KeywordFunction,
  KeywordGet,
  KeywordIf,
  KeywordImport,
  KeywordIn,
  KeywordInstanceof,
  KeywordLet,
  KeywordNew,
  KeywordOf,
  KeywordOut,
  KeywordReturn,
  KeywordSet,
  KeywordStatic,
  KeywordSuper,
  KeywordSwitch,
  KeywordThis,
  KeywordThrow,
  KeywordTry,
  KeywordTypeof,
  KeywordVar,
  KeywordVoid,
  KeywordWhile,
  KeywordWith,
  KeywordYield,
  // TypeScript keywords
  KeywordAbstract,
  KeywordAccessor,
  KeywordAsserts,
  KeywordDeclare,
  KeywordGlobal,
  KeywordImplements,
  KeywordInfer,
  KeywordInterface,
  KeywordIs,
  KeywordKeyof,
  KeywordModule,
  KeywordNamespace,
  KeywordOverride,
  KeywordPrivate,
  KeywordProtected,
  KeywordPublic,
  KeywordReadonly,
  KeywordSatisfies,
  KeywordType,
  KeywordUnique,
  LiteralFalse,
  LiteralNull,
  LiteralNumber,
  LiteralString,
  // A whole template literal, substitutions included.
  LiteralTemplate,
  LiteralTrue,
  ParenthesisClose,
  ParenthesisOpen,
  Percent,
  Plus,
  PrivateMember,
  Question,
  Semicolon,
  Slash,
  Tilde,
}

impl TT {
  pub fn is_keyword(self) -> bool {
    KEYWORDS_MAPPING.contains_key(&self)
  }

  /// Whether a token of this type can be used as a property or member name.
  pub fn is_identifier_like(self) -> bool {
    self == TT::Identifier || self.is_keyword()
  }

  /// Whether a token of this type can start a property name, including computed names.
  pub fn is_property_name_start(self) -> bool {
    self.is_identifier_like()
      || matches!(
        self,
        TT::LiteralString | TT::LiteralNumber | TT::PrivateMember | TT::BracketOpen
      )
  }
}

// These can be used as parameter and variable names.
pub static UNRESERVED_KEYWORDS: Lazy<HashSet<TT>> = Lazy::new(|| {
  let mut set = HashSet::<TT>::new();
  set.insert(TT::KeywordAs);
  set.insert(TT::KeywordAsync);
  set.insert(TT::KeywordAwait);
  set.insert(TT::KeywordConstructor);
  set.insert(TT::KeywordFrom);
  set.insert(TT::KeywordGet);
  set.insert(TT::KeywordLet);
  set.insert(TT::KeywordOf);
  set.insert(TT::KeywordOut);
  set.insert(TT::KeywordSet);
  set.insert(TT::KeywordStatic);
  set.insert(TT::KeywordYield);
  // TypeScript contextual keywords
  set.insert(TT::KeywordAbstract);
  set.insert(TT::KeywordAccessor);
  set.insert(TT::KeywordAsserts);
  set.insert(TT::KeywordDeclare);
  set.insert(TT::KeywordGlobal);
  set.insert(TT::KeywordImplements);
  set.insert(TT::KeywordInfer);
  set.insert(TT::KeywordInterface);
  set.insert(TT::KeywordIs);
  set.insert(TT::KeywordKeyof);
  set.insert(TT::KeywordModule);
  set.insert(TT::KeywordNamespace);
  set.insert(TT::KeywordOverride);
  set.insert(TT::KeywordPrivate);
  set.insert(TT::KeywordProtected);
  set.insert(TT::KeywordPublic);
  set.insert(TT::KeywordReadonly);
  set.insert(TT::KeywordSatisfies);
  set.insert(TT::KeywordType);
  set.insert(TT::KeywordUnique);
  set
});

#[derive(Clone, Copy, Debug)]
pub struct Token {
  pub loc: Loc,
  // Whether one or more whitespace characters appear immediately before this token, and at least
  // one of those whitespace characters is a line terminator.
  pub preceded_by_line_terminator: bool,
  pub typ: TT,
}

impl Token {
  pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
    self.loc.error(typ, Some(self.typ))
  }
}
