//! Statement-level structural validation.
//!
//! Runs before any text is rendered for a clause list. Nested bodies
//! (CALL, FOREACH, EXISTS) are validated when the renderer reaches them,
//! with the [`Scope`] of the block they appear in.

use crate::ast::{Clause, ClauseKind, ConstraintKind, OrderTerm};
use crate::diag::CompileError;

/// Where a clause list appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// A top-level statement.
    Statement,
    /// The body of `CALL { ... }`.
    CallBody,
    /// The body of `FOREACH (... | ...)`.
    ForeachBody,
    /// The body of `EXISTS { ... }`.
    ExistsBody,
}

impl Scope {
    /// Human-readable name for diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            Scope::Statement => "statement",
            Scope::CallBody => "CALL subquery",
            Scope::ForeachBody => "FOREACH body",
            Scope::ExistsBody => "EXISTS subquery",
        }
    }

    /// Returns true for nested blocks.
    pub fn is_nested(self) -> bool {
        self != Scope::Statement
    }
}

/// Validates a clause list in the given scope.
pub fn validate_statement(clauses: &[Clause], scope: Scope) -> Result<(), CompileError> {
    if clauses.is_empty() {
        return Err(if scope.is_nested() {
            CompileError::malformed_subquery(format!("{} is empty", scope.describe()))
        } else {
            CompileError::clause_shape("statement has no clauses")
        });
    }

    run_scope_validation(clauses, scope)?;

    for (index, clause) in clauses.iter().enumerate() {
        check_shape(clause).map_err(|err| err.in_clause(clause.kind()))?;
        check_position(clauses, index, scope).map_err(|err| err.in_clause(clause.kind()))?;
    }

    run_union_validation(clauses)
}

fn run_scope_validation(clauses: &[Clause], scope: Scope) -> Result<(), CompileError> {
    for clause in clauses {
        let kind = clause.kind();
        match scope {
            Scope::ForeachBody if !kind.is_updating() => {
                return Err(CompileError::malformed_subquery(format!(
                    "FOREACH body may only contain updating clauses, found {kind}"
                ))
                .in_clause(kind));
            }
            Scope::ExistsBody if kind.is_mutation() => {
                return Err(CompileError::malformed_subquery(format!(
                    "EXISTS subquery cannot modify the graph, found {kind}"
                ))
                .in_clause(kind));
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_shape(clause: &Clause) -> Result<(), CompileError> {
    match clause {
        Clause::Match(patterns) | Clause::OptionalMatch(patterns) | Clause::Create(patterns) => {
            require_non_empty(patterns, "at least one pattern")
        }
        Clause::Return(projection) | Clause::With(projection) => {
            require_non_empty(&projection.items, "at least one projection item")
        }
        Clause::Set(items) | Clause::OnCreateSet(items) | Clause::OnMatchSet(items) => {
            require_non_empty(items, "at least one assignment")
        }
        Clause::Remove(items) => require_non_empty(items, "at least one item to remove"),
        Clause::Delete(exprs) | Clause::DetachDelete(exprs) => {
            require_non_empty(exprs, "at least one expression")
        }
        Clause::OrderBy(terms) => check_order_terms(terms),
        Clause::CreateIndex(spec) | Clause::DropIndex(spec) => {
            require_non_empty(&spec.properties, "at least one property")
        }
        Clause::CreateConstraint(spec) | Clause::DropConstraint(spec) => {
            require_non_empty(&spec.properties, "at least one property")?;
            if spec.kind == ConstraintKind::NotNull && spec.properties.len() != 1 {
                return Err(CompileError::clause_shape(format!(
                    "a NOT NULL constraint names exactly one property, got {}",
                    spec.properties.len()
                )));
            }
            Ok(())
        }
        Clause::Where(_)
        | Clause::Unwind { .. }
        | Clause::Merge(_)
        | Clause::Skip(_)
        | Clause::Limit(_)
        | Clause::Union
        | Clause::UnionAll
        | Clause::CallSubquery(_)
        | Clause::LoadCsv(_)
        | Clause::LoadCsvHeaders(_)
        | Clause::Foreach { .. } => Ok(()),
    }
}

fn require_non_empty<T>(items: &[T], what: &str) -> Result<(), CompileError> {
    if items.is_empty() {
        Err(CompileError::clause_shape(format!("needs {what}")))
    } else {
        Ok(())
    }
}

fn check_order_terms(terms: &[OrderTerm]) -> Result<(), CompileError> {
    match terms.first() {
        None => return Err(CompileError::clause_shape("needs at least one sort key")),
        Some(OrderTerm::Key(_)) => {}
        Some(_) => {
            return Err(CompileError::clause_shape(
                "must start with a sort key, not a direction",
            ));
        }
    }
    for pair in terms.windows(2) {
        if !matches!(pair[0], OrderTerm::Key(_)) && !matches!(pair[1], OrderTerm::Key(_)) {
            return Err(CompileError::clause_shape(
                "each sort key takes at most one direction",
            ));
        }
    }
    Ok(())
}

fn check_position(clauses: &[Clause], index: usize, scope: Scope) -> Result<(), CompileError> {
    let kind = clauses[index].kind();
    let previous = index.checked_sub(1).map(|prev| clauses[prev].kind());

    if kind.is_schema_command() && (clauses.len() > 1 || scope.is_nested()) {
        return Err(CompileError::clause_order(
            "schema commands must be the only clause in their statement",
        ));
    }

    match kind {
        ClauseKind::Where => match previous {
            Some(ClauseKind::Match | ClauseKind::OptionalMatch | ClauseKind::With) => Ok(()),
            _ => Err(CompileError::clause_order(
                "must directly follow MATCH, OPTIONAL MATCH, or WITH",
            )),
        },
        ClauseKind::OnCreateSet | ClauseKind::OnMatchSet => {
            let anchor = clauses[..index]
                .iter()
                .rev()
                .map(Clause::kind)
                .find(|kind| !matches!(kind, ClauseKind::OnCreateSet | ClauseKind::OnMatchSet));
            if anchor == Some(ClauseKind::Merge) {
                Ok(())
            } else {
                Err(CompileError::clause_order("must follow a MERGE clause"))
            }
        }
        _ => check_after_return(clauses, index),
    }
}

/// Within one union branch, only ORDER BY, SKIP, and LIMIT may follow RETURN.
fn check_after_return(clauses: &[Clause], index: usize) -> Result<(), CompileError> {
    let kind = clauses[index].kind();
    if kind.is_union()
        || matches!(
            kind,
            ClauseKind::OrderBy | ClauseKind::Skip | ClauseKind::Limit
        )
    {
        return Ok(());
    }
    let returned = clauses[..index]
        .iter()
        .rev()
        .map(Clause::kind)
        .take_while(|kind| !kind.is_union())
        .any(|kind| kind == ClauseKind::Return);
    if returned {
        Err(CompileError::clause_order(
            "cannot follow RETURN; start a new query part with WITH or UNION",
        ))
    } else {
        Ok(())
    }
}

fn run_union_validation(clauses: &[Clause]) -> Result<(), CompileError> {
    let unions: Vec<ClauseKind> = clauses
        .iter()
        .map(Clause::kind)
        .filter(|kind| kind.is_union())
        .collect();
    let Some(&first) = unions.first() else {
        return Ok(());
    };
    if unions.iter().any(|kind| *kind != first) {
        return Err(CompileError::clause_order("cannot mix UNION and UNION ALL").in_clause(first));
    }

    for branch in clauses.split(|clause| clause.kind().is_union()) {
        if branch.is_empty() {
            return Err(CompileError::clause_shape("needs a query on both sides").in_clause(first));
        }
        if !branch.iter().any(|clause| clause.kind() == ClauseKind::Return) {
            return Err(
                CompileError::clause_shape("every query combined by a union must RETURN")
                    .in_clause(first),
            );
        }
    }
    Ok(())
}
