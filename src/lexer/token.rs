//! Token types for lexing emitted Cypher text.

use crate::diag::Span;
use smol_str::SmolStr;
use std::fmt;

/// The kind of a lexical token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Clause keywords
    Match,
    Optional,
    Where,
    Return,
    With,
    Unwind,
    As,
    Create,
    Merge,
    On,
    Set,
    Remove,
    Delete,
    Detach,
    Order,
    By,
    Asc,
    Desc,
    Skip,
    Limit,
    Union,
    All,
    Call,
    Load,
    Csv,
    Headers,
    From,
    Fieldterminator,
    Foreach,
    Distinct,
    Exists,

    // Schema keywords
    Index,
    Constraint,
    Drop,
    For,
    Require,
    Assert,
    Unique,
    If,

    // Expression keywords
    And,
    Or,
    Xor,
    Not,
    Is,
    In,
    Starts,
    Ends,
    Contains,
    Case,
    When,
    Then,
    Else,
    End,

    // Literal keywords
    True,
    False,
    Null,

    // Identifiers
    Identifier(SmolStr),
    QuotedIdentifier(SmolStr),

    // Literals
    StringLiteral(SmolStr),
    IntegerLiteral(SmolStr),
    FloatLiteral(SmolStr),

    // Parameters
    Parameter(SmolStr), // $name

    // Operators
    Plus,       // +
    PlusEq,     // +=
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    Caret,      // ^
    Eq,         // =
    RegexMatch, // =~
    NotEq,      // <>
    Lt,         // <
    Gt,         // >
    LtEq,       // <=
    GtEq,       // >=
    Arrow,      // ->
    LeftArrow,  // <-
    Pipe,       // |
    DotDot,     // ..

    // Punctuation
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }
    Comma,    // ,
    Dot,      // .
    Colon,    // :

    // Special
    Eof,
}

impl TokenKind {
    /// Returns true if this token kind is a keyword.
    pub fn is_keyword(&self) -> bool {
        !matches!(
            self,
            TokenKind::Identifier(_)
                | TokenKind::QuotedIdentifier(_)
                | TokenKind::StringLiteral(_)
                | TokenKind::IntegerLiteral(_)
                | TokenKind::FloatLiteral(_)
                | TokenKind::Parameter(_)
                | TokenKind::Plus
                | TokenKind::PlusEq
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Caret
                | TokenKind::Eq
                | TokenKind::RegexMatch
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::LtEq
                | TokenKind::GtEq
                | TokenKind::Arrow
                | TokenKind::LeftArrow
                | TokenKind::Pipe
                | TokenKind::DotDot
                | TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::LBracket
                | TokenKind::RBracket
                | TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::Comma
                | TokenKind::Dot
                | TokenKind::Colon
                | TokenKind::Eof
        )
    }

    /// Returns the identifier name for plain or quoted identifiers.
    pub fn identifier_name(&self) -> Option<&str> {
        match self {
            TokenKind::Identifier(name) | TokenKind::QuotedIdentifier(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(name) => write!(f, "identifier `{name}`"),
            TokenKind::QuotedIdentifier(name) => write!(f, "identifier `{name}`"),
            TokenKind::StringLiteral(value) => write!(f, "string '{value}'"),
            TokenKind::IntegerLiteral(text) | TokenKind::FloatLiteral(text) => {
                write!(f, "number {text}")
            }
            TokenKind::Parameter(name) => write!(f, "${name}"),
            TokenKind::Eof => write!(f, "end of input"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// A lexical token with its source span and raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Byte span in the source.
    pub span: Span,
    /// Raw source text.
    pub text: SmolStr,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span, text: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }
}
