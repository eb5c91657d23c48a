//! Nested blocks: `CALL { ... }`, `FOREACH (... | ...)`, and `EXISTS { ... }`.
//!
//! Each body is validated and assembled by the same pass, so parameter
//! names stay unique and anonymous values keep one numbering across every
//! nesting level.

use super::CompilePass;
use super::validate::Scope;
use crate::ast::{Clause, Expression};
use crate::diag::CompileError;
use log::debug;

impl CompilePass<'_> {
    fn nested(&mut self, body: &[Clause], scope: Scope) -> Result<String, CompileError> {
        let limit = self.config.max_nesting_depth;
        if self.depth >= limit {
            return Err(CompileError::malformed_subquery(format!(
                "{} nested deeper than the limit of {limit}",
                scope.describe()
            ))
            .with_help("raise `max_nesting_depth` in the compile configuration"));
        }

        self.depth += 1;
        debug!("entering {} at depth {}", scope.describe(), self.depth);
        let result = self.statement(body, scope);
        self.depth -= 1;
        result
    }

    pub(crate) fn call_subquery(&mut self, body: &[Clause]) -> Result<String, CompileError> {
        Ok(format!("CALL {{ {} }}", self.nested(body, Scope::CallBody)?))
    }

    pub(crate) fn foreach(
        &mut self,
        binding: &str,
        source: &Expression,
        body: &[Clause],
    ) -> Result<String, CompileError> {
        let binding = self.ident(binding, "variable")?;
        let source = self.expression(source)?;
        let body = self.nested(body, Scope::ForeachBody)?;
        Ok(format!("FOREACH ({binding} IN {source} | {body})"))
    }

    pub(crate) fn exists_block(&mut self, body: &[Clause]) -> Result<String, CompileError> {
        Ok(format!("EXISTS {{ {} }}", self.nested(body, Scope::ExistsBody)?))
    }
}
