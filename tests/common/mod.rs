//! Common test utilities
//!
//! Shared helpers for the integration tests.
//!
//! # Compilation Helpers
//! - [`compile_ok`] - Compile a query, panicking with the rendered diagnostic on failure
//! - [`assert_error_kind`] - Assert that compilation failed with a specific error kind
//!
//! # Lexing Helpers
//! - [`lex_cleanly`] - Tokenize emitted text, panicking on lexical errors
//! - [`read_chain`] - Read node/relationship/direction groups back out of chain text

#![allow(dead_code)]

use cypher_compiler::lexer::{Token, TokenKind};
use cypher_compiler::{CompileError, CompiledStatement, ErrorKind, Query, tokenize};

// ============================================================================
// Compilation Helpers
// ============================================================================

/// Compiles `query` with the default configuration.
///
/// # Panics
/// Panics with the miette rendering of the error if compilation fails.
pub fn compile_ok(query: &Query) -> CompiledStatement {
    match query.compile() {
        Ok(compiled) => compiled,
        Err(err) => panic!("unexpected compile error: {:?}", err.to_report()),
    }
}

/// Asserts that `result` is an error of `kind` and returns it.
///
/// # Panics
/// Panics if compilation succeeded or failed with a different kind.
pub fn assert_error_kind(
    result: Result<CompiledStatement, CompileError>,
    kind: ErrorKind,
) -> CompileError {
    match result {
        Ok(compiled) => panic!("expected {kind:?} error, compiled to `{}`", compiled.text),
        Err(err) => {
            assert_eq!(err.kind, kind, "unexpected error: {err}");
            err
        }
    }
}

// ============================================================================
// Lexing Helpers
// ============================================================================

/// Tokenizes emitted text, dropping the trailing end-of-input token.
///
/// # Panics
/// Panics if the lexer reports any diagnostic.
pub fn lex_cleanly(text: &str) -> Vec<Token> {
    let result = tokenize(text);
    assert!(
        result.is_clean(),
        "lexer diagnostics for `{text}`: {:?}",
        result.diagnostics
    );
    result
        .tokens
        .into_iter()
        .filter(|token| token.kind != TokenKind::Eof)
        .collect()
}

/// One group read back out of rendered chain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainPart {
    /// Raw text between `(` and `)`.
    Node(String),
    /// Raw text between `[` and `]` and the arrow around it.
    Rel(String, &'static str),
}

/// Reads `(..)-[..]->(..)<-[..]-(..)` text back into its parts.
///
/// # Panics
/// Panics on text that is not a single chain.
pub fn read_chain(text: &str) -> Vec<ChainPart> {
    let tokens = lex_cleanly(text);
    let mut parts = Vec::new();
    let mut index = 0;

    while index < tokens.len() {
        match tokens[index].kind {
            TokenKind::LParen => {
                let (inner, next) = group(&tokens, index, TokenKind::RParen);
                parts.push(ChainPart::Node(inner));
                index = next;
            }
            TokenKind::Minus | TokenKind::LeftArrow => {
                let backward = tokens[index].kind == TokenKind::LeftArrow;
                assert_eq!(tokens[index + 1].kind, TokenKind::LBracket, "in `{text}`");
                let (inner, next) = group(&tokens, index + 1, TokenKind::RBracket);
                let forward = tokens[next].kind == TokenKind::Arrow;
                let arrow = match (backward, forward) {
                    (true, false) => "<-",
                    (false, true) => "->",
                    (false, false) => "--",
                    (true, true) => panic!("relationship points both ways in `{text}`"),
                };
                parts.push(ChainPart::Rel(inner, arrow));
                index = next + 1;
            }
            ref other => panic!("unexpected token {other:?} in chain `{text}`"),
        }
    }

    parts
}

fn group(tokens: &[Token], open: usize, close: TokenKind) -> (String, usize) {
    let mut inner = String::new();
    let mut index = open + 1;
    while tokens[index].kind != close {
        inner.push_str(&tokens[index].text);
        index += 1;
    }
    (inner, index + 1)
}
