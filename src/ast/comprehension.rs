//! Comprehension shorthand: `projection for binding in Label if filter`.

use crate::ast::expression::Expression;
use smol_str::SmolStr;

/// A single-expression query shorthand.
///
/// Desugars to `MATCH (binding:Label) [WHERE filter] RETURN projection`.
#[derive(Debug, Clone, PartialEq)]
pub struct Comprehension {
    /// Projected expression.
    pub projection: Expression,
    /// Node binding variable.
    pub binding: SmolStr,
    /// Node label to scan.
    pub label: SmolStr,
    /// Optional filter.
    pub filter: Option<Expression>,
}

impl Comprehension {
    /// Creates an unfiltered comprehension.
    pub fn new(
        projection: Expression,
        binding: impl Into<SmolStr>,
        label: impl Into<SmolStr>,
    ) -> Self {
        Self {
            projection,
            binding: binding.into(),
            label: label.into(),
            filter: None,
        }
    }

    /// Adds a filter.
    pub fn filter(mut self, filter: Expression) -> Self {
        self.filter = Some(filter);
        self
    }
}
