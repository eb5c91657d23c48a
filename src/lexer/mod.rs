//! Lexical analysis for emitted Cypher text.
//!
//! The compiler never parses Cypher, but it does need to know which words
//! are reserved (to decide when an identifier must be backtick-quoted), and
//! the round-trip tests tokenize compiled statements to check that quoting
//! and string escaping survive re-reading. The lexer is error tolerant: it
//! keeps scanning after a bad character and reports every problem it finds.

pub mod keywords;
pub mod token;

use crate::diag::Span;
pub use keywords::{is_reserved, lookup_keyword};
use smol_str::SmolStr;
pub use token::{Token, TokenKind};

/// A problem found while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexDiagnostic {
    /// What went wrong.
    pub message: String,
    /// Where in the source.
    pub span: Span,
}

/// Result of lexical analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerResult {
    /// The tokens produced, including an EOF token at the end.
    pub tokens: Vec<Token>,
    /// Problems encountered during lexing.
    pub diagnostics: Vec<LexDiagnostic>,
}

impl LexerResult {
    /// Returns true if scanning produced no diagnostics.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Token kinds without the trailing EOF.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens
            .iter()
            .map(|token| token.kind.clone())
            .filter(|kind| *kind != TokenKind::Eof)
            .collect()
    }
}

/// A lexical analyzer for Cypher text.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<LexDiagnostic>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Tokenizes the source text and returns the result.
    pub fn tokenize(mut self) -> LexerResult {
        while !self.is_at_end() {
            self.skip_whitespace_and_comments();
            if self.is_at_end() {
                break;
            }
            self.scan_token();
        }

        let eof_pos = self.source.len();
        self.tokens
            .push(Token::new(TokenKind::Eof, eof_pos..eof_pos, ""));

        LexerResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn scan_token(&mut self) {
        let start = self.pos;
        let ch = self.advance();

        match ch {
            '(' => self.add_token(TokenKind::LParen, start),
            ')' => self.add_token(TokenKind::RParen, start),
            '[' => self.add_token(TokenKind::LBracket, start),
            ']' => self.add_token(TokenKind::RBracket, start),
            '{' => self.add_token(TokenKind::LBrace, start),
            '}' => self.add_token(TokenKind::RBrace, start),
            ',' => self.add_token(TokenKind::Comma, start),
            ':' => self.add_token(TokenKind::Colon, start),
            '*' => self.add_token(TokenKind::Star, start),
            '/' => self.add_token(TokenKind::Slash, start),
            '%' => self.add_token(TokenKind::Percent, start),
            '^' => self.add_token(TokenKind::Caret, start),
            '|' => self.add_token(TokenKind::Pipe, start),

            '+' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::PlusEq, start);
                } else {
                    self.add_token(TokenKind::Plus, start);
                }
            }
            '-' => {
                if self.match_char('>') {
                    self.add_token(TokenKind::Arrow, start);
                } else {
                    self.add_token(TokenKind::Minus, start);
                }
            }
            '<' => {
                if self.match_char('-') {
                    self.add_token(TokenKind::LeftArrow, start);
                } else if self.match_char('=') {
                    self.add_token(TokenKind::LtEq, start);
                } else if self.match_char('>') {
                    self.add_token(TokenKind::NotEq, start);
                } else {
                    self.add_token(TokenKind::Lt, start);
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::GtEq, start);
                } else {
                    self.add_token(TokenKind::Gt, start);
                }
            }
            '=' => {
                if self.match_char('~') {
                    self.add_token(TokenKind::RegexMatch, start);
                } else {
                    self.add_token(TokenKind::Eq, start);
                }
            }
            '.' => {
                if self.match_char('.') {
                    self.add_token(TokenKind::DotDot, start);
                } else {
                    self.add_token(TokenKind::Dot, start);
                }
            }

            '\'' | '"' => self.scan_string_literal(start, ch),
            '$' => self.scan_parameter(start),
            '`' => self.scan_quoted_identifier(start),
            '0'..='9' => self.scan_number(start),
            c if c.is_alphabetic() || c == '_' => self.scan_identifier_or_keyword(start),

            _ => self.error(start..self.pos, format!("invalid character '{ch}'")),
        }
    }

    fn scan_identifier_or_keyword(&mut self, start: usize) {
        while is_identifier_continue(self.peek()) {
            self.advance();
        }

        let text = &self.source[start..self.pos];
        match keywords::lookup_keyword(text) {
            Some(kind) => self.add_token(kind, start),
            None => self.add_token(TokenKind::Identifier(SmolStr::new(text)), start),
        }
    }

    /// Scans a quoted string. Backslash escapes are decoded.
    fn scan_string_literal(&mut self, start: usize, quote: char) {
        let mut value = String::new();

        while self.peek() != quote && !self.is_at_end() {
            if self.peek() != '\\' {
                value.push(self.advance());
                continue;
            }

            let escape_start = self.pos;
            self.advance();
            if self.is_at_end() {
                break;
            }
            match self.advance() {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                '\'' => value.push('\''),
                '"' => value.push('"'),
                '\\' => value.push('\\'),
                other => {
                    self.error(
                        escape_start..self.pos,
                        format!("invalid escape sequence '\\{other}'"),
                    );
                    value.push(other);
                }
            }
        }

        if self.is_at_end() {
            self.error(start..self.pos, "unclosed string literal");
        } else {
            self.advance();
        }

        self.add_token(TokenKind::StringLiteral(SmolStr::new(&value)), start);
    }

    /// Scans a backtick-quoted identifier. A doubled backtick stands for one.
    fn scan_quoted_identifier(&mut self, start: usize) {
        let mut value = String::new();

        loop {
            if self.is_at_end() {
                self.error(start..self.pos, "unclosed quoted identifier");
                break;
            }
            let ch = self.advance();
            if ch == '`' {
                if self.match_char('`') {
                    value.push('`');
                } else {
                    break;
                }
            } else {
                value.push(ch);
            }
        }

        if value.is_empty() {
            self.error(start..self.pos, "empty quoted identifier");
        }
        self.add_token(TokenKind::QuotedIdentifier(SmolStr::new(&value)), start);
    }

    fn scan_parameter(&mut self, start: usize) {
        let name_start = self.pos;
        while is_identifier_continue(self.peek()) {
            self.advance();
        }
        if self.pos == name_start {
            self.error(start..self.pos, "parameter name expected after '$'");
            return;
        }
        let name = &self.source[name_start..self.pos];
        self.add_token(TokenKind::Parameter(SmolStr::new(name)), start);
    }

    /// Scans an integer or float. `1..3` lexes as integer, range, integer.
    fn scan_number(&mut self, start: usize) {
        self.consume_digits();

        let mut is_float = false;
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            is_float = true;
            self.advance();
            self.consume_digits();
        }

        if matches!(self.peek(), 'e' | 'E') {
            let saved = self.pos;
            self.advance();
            if matches!(self.peek(), '+' | '-') {
                self.advance();
            }
            if self.peek().is_ascii_digit() {
                is_float = true;
                self.consume_digits();
            } else {
                self.pos = saved;
            }
        }

        let text = SmolStr::new(&self.source[start..self.pos]);
        if is_float {
            self.add_token(TokenKind::FloatLiteral(text), start);
        } else {
            self.add_token(TokenKind::IntegerLiteral(text), start);
        }

        if is_identifier_continue(self.peek()) {
            let bad_start = self.pos;
            while is_identifier_continue(self.peek()) {
                self.advance();
            }
            self.error(bad_start..self.pos, "identifier cannot start with a digit");
        }
    }

    fn consume_digits(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                c if c.is_whitespace() => {
                    self.advance();
                }
                '/' if self.peek_next() == '/' => {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        let text = &self.source[start..self.pos];
        self.tokens.push(Token::new(kind, start..self.pos, text));
    }

    fn error(&mut self, span: Span, message: impl Into<String>) {
        self.diagnostics.push(LexDiagnostic {
            message: message.into(),
            span,
        });
    }

    fn peek(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let ch = self.peek();
        if !self.is_at_end() {
            self.pos += ch.len_utf8();
        }
        ch
    }

    fn match_char(&mut self, expected: char) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }
}

fn is_identifier_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Returns true if `name` starts with a letter or underscore and continues
/// with letters, digits, or underscores.
pub fn is_identifier_shape(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_') && chars.all(is_identifier_continue)
}

/// Returns true if `name` can be emitted without backticks.
pub fn is_plain_identifier(name: &str) -> bool {
    is_identifier_shape(name) && !is_reserved(name)
}

/// Convenience function to tokenize a source string.
pub fn tokenize(source: &str) -> LexerResult {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.into())
    }

    #[test]
    fn empty_input() {
        let result = tokenize("");
        assert_eq!(result.tokens.len(), 1);
        assert_eq!(result.tokens[0].kind, TokenKind::Eof);
        assert!(result.is_clean());
    }

    #[test]
    fn keyword_case_insensitive() {
        let result = tokenize("match Match MATCH");
        assert_eq!(
            result.kinds(),
            vec![TokenKind::Match, TokenKind::Match, TokenKind::Match]
        );
    }

    #[test]
    fn simple_statement() {
        let result = tokenize("MATCH (p:Person) WHERE p.age > $min_age RETURN p.name AS name");
        assert!(result.is_clean());
        assert_eq!(
            result.kinds(),
            vec![
                TokenKind::Match,
                TokenKind::LParen,
                ident("p"),
                TokenKind::Colon,
                ident("Person"),
                TokenKind::RParen,
                TokenKind::Where,
                ident("p"),
                TokenKind::Dot,
                ident("age"),
                TokenKind::Gt,
                TokenKind::Parameter("min_age".into()),
                TokenKind::Return,
                ident("p"),
                TokenKind::Dot,
                ident("name"),
                TokenKind::As,
                ident("name"),
            ]
        );
    }

    #[test]
    fn arrows_and_ranges() {
        let result = tokenize("(a)-[:R*1..3]->(b)<-[]-(c)");
        assert!(result.is_clean());
        let kinds = result.kinds();
        assert!(kinds.contains(&TokenKind::Arrow));
        assert!(kinds.contains(&TokenKind::LeftArrow));
        let range: Vec<_> = kinds
            .iter()
            .skip_while(|kind| **kind != TokenKind::Star)
            .take(4)
            .cloned()
            .collect();
        assert_eq!(
            range,
            vec![
                TokenKind::Star,
                TokenKind::IntegerLiteral("1".into()),
                TokenKind::DotDot,
                TokenKind::IntegerLiteral("3".into()),
            ]
        );
    }

    #[test]
    fn string_escapes_are_decoded() {
        let result = tokenize(r"'it\'s a \\ path'");
        assert!(result.is_clean());
        assert_eq!(
            result.kinds(),
            vec![TokenKind::StringLiteral(r"it's a \ path".into())]
        );
    }

    #[test]
    fn quoted_identifier_with_doubled_backtick() {
        let result = tokenize("`my var` `a``b`");
        assert!(result.is_clean());
        assert_eq!(
            result.kinds(),
            vec![
                TokenKind::QuotedIdentifier("my var".into()),
                TokenKind::QuotedIdentifier("a`b".into()),
            ]
        );
    }

    #[test]
    fn numbers() {
        let result = tokenize("42 3.5 1e10 2.5e-3");
        assert!(result.is_clean());
        assert_eq!(
            result.kinds(),
            vec![
                TokenKind::IntegerLiteral("42".into()),
                TokenKind::FloatLiteral("3.5".into()),
                TokenKind::FloatLiteral("1e10".into()),
                TokenKind::FloatLiteral("2.5e-3".into()),
            ]
        );
    }

    #[test]
    fn errors_are_collected_and_scanning_continues() {
        let result = tokenize("a # b 'open");
        assert_eq!(result.diagnostics.len(), 2);
        assert_eq!(result.diagnostics[0].span, 2..3);
        assert!(result.diagnostics[1].message.contains("unclosed"));
        assert!(result.kinds().contains(&ident("b")));
    }

    #[test]
    fn plain_identifier_rules() {
        assert!(is_plain_identifier("person_1"));
        assert!(is_plain_identifier("_tmp"));
        assert!(!is_plain_identifier(""));
        assert!(!is_plain_identifier("1abc"));
        assert!(!is_plain_identifier("has space"));
        assert!(!is_plain_identifier("order"));
        assert!(!is_plain_identifier("a-b"));
    }
}
