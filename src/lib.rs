//! Cypher statement compiler with structural diagnostics.
//!
//! This library turns a typed query IR (patterns, expressions, and clauses
//! built in Rust) into parameterized Cypher text. Values captured with
//! `param` or `bound` become `$name` placeholders and are returned alongside
//! the text, together with the access mode (read or write) the statement
//! needs. Explicit literals built with `lit` are rendered inline, with
//! strings quoted and escaped. Errors are structural and reported through
//! miette.
//!
//! # Example
//!
//! ```
//! use cypher_compiler::ast::builder::{Query, node, param, prop, var};
//! use cypher_compiler::AccessMode;
//!
//! let compiled = Query::new()
//!     .match_(node("p", "Person"))
//!     .where_(prop("p", "age").gt(param("min_age", 30)))
//!     .return_([var("p")])
//!     .compile()
//!     .unwrap();
//!
//! assert_eq!(compiled.text, "MATCH (p:Person) WHERE p.age > $min_age RETURN p");
//! assert_eq!(compiled.parameters.len(), 1);
//! assert_eq!(compiled.access_mode, AccessMode::Read);
//! ```

pub mod analysis;
pub mod ast;
pub mod compiler;
pub mod diag;
pub mod lexer;
pub mod semantic;
pub mod value;

pub use analysis::AccessMode;
pub use ast::builder::Query;
pub use ast::{Clause, ClauseKind, Comprehension, Expression, Pattern};
pub use compiler::{
    CompileConfig, CompiledStatement, Compiler, compile, compile_comprehension,
};
pub use diag::{CompileError, ErrorKind};
pub use lexer::token::{Token, TokenKind};
pub use lexer::{Lexer, LexerResult, tokenize};
pub use value::Value;
