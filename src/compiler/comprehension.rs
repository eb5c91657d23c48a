//! Comprehension desugaring.

use crate::ast::{Clause, Comprehension, NodeRef, Pattern, Projection};
use crate::diag::CompileError;
use log::trace;

/// Expands a comprehension into `MATCH (binding:Label) [WHERE filter] RETURN projection`.
pub fn desugar(comprehension: &Comprehension) -> Result<Vec<Clause>, CompileError> {
    if comprehension.binding.is_empty() {
        return Err(CompileError::malformed_subquery(
            "comprehension needs a binding variable",
        ));
    }
    if comprehension.label.is_empty() {
        return Err(CompileError::malformed_subquery(
            "comprehension needs a label to scan",
        ));
    }

    let node = NodeRef::new(comprehension.binding.clone(), comprehension.label.clone());
    let mut clauses = vec![Clause::Match(vec![Pattern::Node(node)])];
    if let Some(filter) = &comprehension.filter {
        clauses.push(Clause::Where(filter.clone()));
    }
    clauses.push(Clause::Return(Projection::new([comprehension.projection.clone()])));

    trace!("comprehension desugared into {} clauses", clauses.len());
    Ok(clauses)
}
