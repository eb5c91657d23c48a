//! Lowering of the query IR into parameterized Cypher text.
//!
//! A [`Compiler`] holds configuration only. Each call to
//! [`Compiler::compile`] runs one pass with its own [`ParameterRegistry`],
//! so independent compilations never share mutable state.
//!
//! # Passes
//!
//! 1. Parameter reservation: every caller-named parameter is reserved so
//!    generated names avoid it
//! 2. Statement validation: clause ordering and argument shape, fail fast
//! 3. Rendering: clauses, patterns, and expressions to text, registering
//!    parameters as they are met (nested blocks recurse with the same
//!    registry)
//! 4. Access-mode inference, unless the configuration overrides it
//!
//! No text is returned when any pass fails.

mod clause;
pub mod comprehension;
mod expression;
pub mod ident;
pub mod params;
mod pattern;
mod subquery;
pub mod validate;

use crate::analysis::{infer_access_mode, named_parameters};
use crate::ast::{Clause, ClauseKind, Comprehension};
use crate::diag::CompileError;
use crate::value::Value;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;

pub use crate::analysis::AccessMode;
pub use expression::quote_string;
pub use params::ParameterRegistry;
pub use validate::Scope;

/// Configuration for compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileConfig {
    /// Explicit access mode. When set, inference is skipped.
    pub access_mode: Option<AccessMode>,

    /// Reject step-folded chains whose direction changes at a shared node.
    pub strict_step_chains: bool,

    /// Backtick-quote identifiers that are not plain; reject them otherwise.
    pub quote_identifiers: bool,

    /// Maximum nesting of CALL, FOREACH, and EXISTS blocks.
    pub max_nesting_depth: usize,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            access_mode: None,
            strict_step_chains: true,
            quote_identifiers: true,
            max_nesting_depth: 32,
        }
    }
}

impl CompileConfig {
    /// Forces the access mode of every compiled statement.
    pub fn with_access_mode(mut self, mode: AccessMode) -> Self {
        self.access_mode = Some(mode);
        self
    }

    /// Sets strict step-chain checking.
    pub fn with_strict_step_chains(mut self, strict: bool) -> Self {
        self.strict_step_chains = strict;
        self
    }

    /// Sets identifier quoting.
    pub fn with_quote_identifiers(mut self, quote: bool) -> Self {
        self.quote_identifiers = quote;
        self
    }

    /// Sets the nesting limit.
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

/// The output of one compilation: statement text, parameter bindings, and
/// access mode. Ownership passes entirely to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledStatement {
    /// Statement text with `$name` placeholders.
    pub text: String,
    /// Parameter bindings in first-registration order.
    pub parameters: IndexMap<String, Value>,
    /// Whether the statement reads or writes.
    pub access_mode: AccessMode,
}

/// Compiles clause lists into [`CompiledStatement`]s.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompileConfig,
}

impl Compiler {
    /// Creates a compiler with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a compiler with custom configuration.
    pub fn with_config(config: CompileConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    /// Compiles an ordered clause list.
    pub fn compile(&self, clauses: &[Clause]) -> Result<CompiledStatement, CompileError> {
        debug!("compiling statement with {} clauses", clauses.len());

        let mut pass = CompilePass::new(&self.config);
        pass.params.reserve(named_parameters(clauses));
        let text = pass.statement(clauses, Scope::Statement)?;

        let access_mode = match self.config.access_mode {
            Some(mode) => mode,
            None => infer_access_mode(clauses),
        };
        let returns_rows = clauses
            .iter()
            .any(|clause| clause.kind() == ClauseKind::Return);
        if access_mode == AccessMode::Read && !returns_rows {
            warn!("read-only statement without RETURN produces no rows: {text}");
        }

        let parameters = pass.finish();
        debug!(
            "compiled {:?} statement: {} bytes, {} parameters",
            access_mode,
            text.len(),
            parameters.len()
        );

        Ok(CompiledStatement {
            text,
            parameters,
            access_mode,
        })
    }

    /// Desugars and compiles a comprehension.
    pub fn compile_comprehension(
        &self,
        comprehension: &Comprehension,
    ) -> Result<CompiledStatement, CompileError> {
        let clauses = comprehension::desugar(comprehension)?;
        self.compile(&clauses)
    }
}

/// Compiles with the default configuration.
pub fn compile(clauses: &[Clause]) -> Result<CompiledStatement, CompileError> {
    Compiler::new().compile(clauses)
}

/// Compiles a comprehension with the default configuration.
pub fn compile_comprehension(
    comprehension: &Comprehension,
) -> Result<CompiledStatement, CompileError> {
    Compiler::new().compile_comprehension(comprehension)
}

/// State of one compilation pass.
///
/// Rendering methods live in the submodules as `impl CompilePass` blocks;
/// they all share this pass's registry and nesting depth.
pub(crate) struct CompilePass<'c> {
    pub(crate) config: &'c CompileConfig,
    pub(crate) params: ParameterRegistry,
    pub(crate) depth: usize,
}

impl<'c> CompilePass<'c> {
    pub(crate) fn new(config: &'c CompileConfig) -> Self {
        Self {
            config,
            params: ParameterRegistry::new(),
            depth: 0,
        }
    }

    /// Renders an identifier under the pass's quoting policy.
    pub(crate) fn ident(&self, name: &str, what: &str) -> Result<String, CompileError> {
        ident::identifier(name, self.config.quote_identifiers, what)
    }

    pub(crate) fn finish(self) -> IndexMap<String, Value> {
        self.params.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::{Query, node, param, prop};

    #[test]
    fn default_config() {
        let config = CompileConfig::default();
        assert_eq!(config.access_mode, None);
        assert!(config.strict_step_chains);
        assert!(config.quote_identifiers);
        assert_eq!(config.max_nesting_depth, 32);
    }

    #[test]
    fn override_wins_over_inference() {
        let query = Query::new()
            .match_(node("p", "Person"))
            .return_([prop("p", "name")]);
        let compiler =
            Compiler::with_config(CompileConfig::default().with_access_mode(AccessMode::Write));
        let compiled = query.compile_with(&compiler).unwrap();
        assert_eq!(compiled.access_mode, AccessMode::Write);
    }

    #[test]
    fn compiled_statement_serializes() {
        let compiled = Query::new()
            .match_(node("p", "Person"))
            .where_(prop("p", "age").gt(param("min_age", 30)))
            .return_([prop("p", "name")])
            .compile()
            .unwrap();
        let json = serde_json::to_value(&compiled).unwrap();
        assert_eq!(json["parameters"]["min_age"], 30);
        assert_eq!(json["access_mode"], "Read");
    }
}
