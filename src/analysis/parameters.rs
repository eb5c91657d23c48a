//! Collection of caller-named parameters.
//!
//! The compiler reserves every name collected here before rendering, so
//! generated names for bound values (`p0`, `p1`, ...) never take a name the
//! caller uses later in the statement.

use crate::ast::{
    Clause, Expression, NodeRef, OrderTerm, Pattern, RelRef, RemoveItem, SetItem, StepElement,
};
use smol_str::SmolStr;
use std::collections::HashSet;

/// Names of all named parameters reachable from `clauses`, including those
/// inside nested bodies and pattern property maps.
pub fn named_parameters(clauses: &[Clause]) -> HashSet<SmolStr> {
    let mut names = HashSet::new();
    visit_clauses(clauses, &mut names);
    names
}

fn visit_clauses(clauses: &[Clause], names: &mut HashSet<SmolStr>) {
    for clause in clauses {
        visit_clause(clause, names);
    }
}

fn visit_clause(clause: &Clause, names: &mut HashSet<SmolStr>) {
    match clause {
        Clause::Match(patterns) | Clause::OptionalMatch(patterns) | Clause::Create(patterns) => {
            for pattern in patterns {
                visit_pattern(pattern, names);
            }
        }
        Clause::Merge(pattern) => visit_pattern(pattern, names),
        Clause::Where(expr) | Clause::Skip(expr) | Clause::Limit(expr) => {
            visit_expression(expr, names)
        }
        Clause::Return(projection) | Clause::With(projection) => {
            for item in &projection.items {
                visit_expression(&item.expr, names);
            }
        }
        Clause::Unwind { source, .. } => visit_expression(source, names),
        Clause::Set(items) | Clause::OnCreateSet(items) | Clause::OnMatchSet(items) => {
            for item in items {
                visit_set_item(item, names);
            }
        }
        Clause::Remove(items) => {
            for item in items {
                if let RemoveItem::Property(target) = item {
                    visit_expression(target, names);
                }
            }
        }
        Clause::Delete(targets) | Clause::DetachDelete(targets) => {
            for target in targets {
                visit_expression(target, names);
            }
        }
        Clause::OrderBy(terms) => {
            for term in terms {
                if let OrderTerm::Key(key) = term {
                    visit_expression(key, names);
                }
            }
        }
        Clause::CallSubquery(body) => visit_clauses(body, names),
        Clause::LoadCsv(load) | Clause::LoadCsvHeaders(load) => {
            visit_expression(&load.source, names)
        }
        Clause::Foreach { source, body, .. } => {
            visit_expression(source, names);
            visit_clauses(body, names);
        }
        Clause::Union
        | Clause::UnionAll
        | Clause::CreateIndex(_)
        | Clause::DropIndex(_)
        | Clause::CreateConstraint(_)
        | Clause::DropConstraint(_) => {}
    }
}

fn visit_set_item(item: &SetItem, names: &mut HashSet<SmolStr>) {
    match item {
        SetItem::Property { target, value } => {
            visit_expression(target, names);
            visit_expression(value, names);
        }
        SetItem::Replace { value, .. } | SetItem::Merge { value, .. } => {
            visit_expression(value, names)
        }
        SetItem::AddLabel { .. } => {}
    }
}

fn visit_pattern(pattern: &Pattern, names: &mut HashSet<SmolStr>) {
    match pattern {
        Pattern::Node(node) => visit_node(node, names),
        Pattern::Chain(chain) => {
            visit_node(&chain.start, names);
            for segment in &chain.segments {
                visit_rel(&segment.rel, names);
                visit_node(&segment.node, names);
            }
        }
        Pattern::Steps(steps) => {
            let elements =
                std::iter::once(&steps.head).chain(steps.steps.iter().map(|(_, element)| element));
            for element in elements {
                match element {
                    StepElement::Node(node) => visit_node(node, names),
                    StepElement::Rel(rel) => visit_rel(rel, names),
                }
            }
        }
        Pattern::Path { pattern, .. } => visit_pattern(pattern, names),
    }
}

fn visit_node(node: &NodeRef, names: &mut HashSet<SmolStr>) {
    for (_, value) in &node.properties {
        visit_expression(value, names);
    }
}

fn visit_rel(rel: &RelRef, names: &mut HashSet<SmolStr>) {
    for (_, value) in &rel.properties {
        visit_expression(value, names);
    }
}

fn visit_expression(expr: &Expression, names: &mut HashSet<SmolStr>) {
    match expr {
        Expression::Parameter { name, .. } => {
            names.insert(name.clone());
        }
        Expression::Property(owner, _) => visit_expression(owner, names),
        Expression::Unary(_, operand) => visit_expression(operand, names),
        Expression::Binary(_, lhs, rhs) => {
            visit_expression(lhs, names);
            visit_expression(rhs, names);
        }
        Expression::FunctionCall(call) => {
            for arg in &call.args {
                visit_expression(arg, names);
            }
        }
        Expression::Case(case) => {
            if let Some(operand) = &case.operand {
                visit_expression(operand, names);
            }
            for (condition, result) in &case.branches {
                visit_expression(condition, names);
                visit_expression(result, names);
            }
            if let Some(default) = &case.default {
                visit_expression(default, names);
            }
        }
        Expression::List(items) => {
            for item in items {
                visit_expression(item, names);
            }
        }
        Expression::Map(entries) => {
            for (_, value) in entries {
                visit_expression(value, names);
            }
        }
        Expression::PatternPredicate(pattern) => visit_pattern(pattern, names),
        Expression::Exists(body) => visit_clauses(body, names),
        Expression::Literal(_)
        | Expression::Variable(_)
        | Expression::Bound(_)
        | Expression::HasLabel(..)
        | Expression::Star => {}
    }
}
