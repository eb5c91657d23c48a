//! Query IR: patterns, expressions, clauses, and construction helpers.

pub mod builder;
pub mod clause;
pub mod comprehension;
pub mod expression;
pub mod pattern;

pub use clause::{
    Clause, ClauseKind, ConstraintKind, ConstraintSpec, IndexSpec, LoadCsv, OrderTerm, Projection,
    ProjectionItem, RemoveItem, SetItem,
};
pub use comprehension::Comprehension;
pub use expression::{
    BinaryOperator, CaseExpression, Expression, FunctionCall, Literal, UnaryOperator,
};
pub use pattern::{
    Chain, Direction, HopRange, NodeRef, Pattern, PropertyMap, RelRef, Segment, StepChain,
    StepElement,
};
