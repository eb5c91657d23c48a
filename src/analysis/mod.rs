//! Statement analysis over the clause IR.

pub mod access_mode;
pub mod parameters;

pub use access_mode::{AccessMode, infer_access_mode, mutating_clauses};
pub use parameters::named_parameters;
