//! Read/write classification of clause lists.
//!
//! A statement writes if any clause of a mutation kind appears at any
//! nesting level reachable through `CALL { ... }` bodies. FOREACH is itself
//! a mutation kind, and EXISTS bodies cannot contain mutations, so neither
//! needs to be searched.

use crate::ast::{Clause, ClauseKind};
use log::trace;
use serde::Serialize;
use std::fmt;

/// How the executor should route a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum AccessMode {
    /// Read-only.
    #[default]
    Read,
    /// Read-write.
    Write,
}

impl AccessMode {
    /// Returns true for [`AccessMode::Write`].
    pub fn is_write(self) -> bool {
        self == AccessMode::Write
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessMode::Read => f.write_str("READ"),
            AccessMode::Write => f.write_str("WRITE"),
        }
    }
}

/// Infers the access mode of a clause list.
pub fn infer_access_mode(clauses: &[Clause]) -> AccessMode {
    let mutating = mutating_clauses(clauses);
    if mutating.is_empty() {
        AccessMode::Read
    } else {
        trace!("statement writes because of {mutating:?}");
        AccessMode::Write
    }
}

/// Mutation-kind clauses in statement order, including those inside
/// `CALL { ... }` bodies.
pub fn mutating_clauses(clauses: &[Clause]) -> Vec<ClauseKind> {
    let mut found = Vec::new();
    collect_mutations(clauses, &mut found);
    found
}

fn collect_mutations(clauses: &[Clause], found: &mut Vec<ClauseKind>) {
    for clause in clauses {
        let kind = clause.kind();
        if kind.is_mutation() {
            found.push(kind);
        }
        if let Clause::CallSubquery(body) = clause {
            collect_mutations(body, found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::{Query, lit, node, prop, var};
    use crate::ast::IndexSpec;

    #[test]
    fn reading_statement_is_read() {
        let query = Query::new().match_(node("n", "A")).return_([var("n")]);
        assert_eq!(infer_access_mode(query.clauses()), AccessMode::Read);
    }

    #[test]
    fn any_mutation_kind_is_write() {
        let set = Query::new()
            .match_(node("n", "A"))
            .set(prop("n", "x"), lit(1));
        assert_eq!(infer_access_mode(set.clauses()), AccessMode::Write);

        let ddl = Query::new().create_index(IndexSpec::new("A", ["x"]));
        assert_eq!(infer_access_mode(ddl.clauses()), AccessMode::Write);
    }

    #[test]
    fn mutation_inside_call_is_write() {
        let inner = Query::new().create(node("m", "B")).return_([var("m")]);
        let query = Query::new().call(inner).return_([var("m")]);
        assert_eq!(
            mutating_clauses(query.clauses()),
            vec![ClauseKind::Create]
        );
        assert!(infer_access_mode(query.clauses()).is_write());
    }

    #[test]
    fn display() {
        assert_eq!(AccessMode::Read.to_string(), "READ");
        assert_eq!(AccessMode::default(), AccessMode::Read);
    }
}
