//! Schema-checked construction of mutation clauses.
//!
//! The helpers check property keys against the registered schema, if one
//! exists for the label or type, and then build ordinary clauses for the
//! compiler. Node helpers consult node label schemas and the relationship
//! helper consults relationship type schemas. Names without a schema of the
//! matching kind pass through unchecked.
//!
//! | Helper                | Missing required | Undeclared key |
//! |-----------------------|------------------|----------------|
//! | [`create_node`]       | error            | error          |
//! | [`merge_node`]        | error            | error          |
//! | [`create_relationship`] | error          | error          |
//! | [`set_properties`]    | allowed          | error          |

use super::schema::{ElementKind, ElementSchema, SchemaLookup};
use crate::ast::{
    Chain, Clause, ClauseKind, Expression, NodeRef, Pattern, PropertyMap, RelRef, SetItem,
};
use crate::diag::CompileError;
use log::trace;
use smol_str::SmolStr;

/// Builds `CREATE (variable:Label {props})`.
pub fn create_node(
    schema: &dyn SchemaLookup,
    variable: impl Into<SmolStr>,
    label: impl Into<SmolStr>,
    properties: PropertyMap,
) -> Result<Clause, CompileError> {
    let label = label.into();
    check_properties(schema, &label, ElementKind::Node, &properties, true)
        .map_err(|err| err.in_clause(ClauseKind::Create))?;
    let node = node_with(variable.into(), label, properties);
    Ok(Clause::Create(vec![Pattern::Node(node)]))
}

/// Builds `MERGE (variable:Label {props})`.
pub fn merge_node(
    schema: &dyn SchemaLookup,
    variable: impl Into<SmolStr>,
    label: impl Into<SmolStr>,
    properties: PropertyMap,
) -> Result<Clause, CompileError> {
    let label = label.into();
    check_properties(schema, &label, ElementKind::Node, &properties, true)
        .map_err(|err| err.in_clause(ClauseKind::Merge))?;
    let node = node_with(variable.into(), label, properties);
    Ok(Clause::Merge(Pattern::Node(node)))
}

/// Builds `CREATE (from)-[:TYPE {props}]->(to)` between bound variables.
pub fn create_relationship(
    schema: &dyn SchemaLookup,
    from: impl Into<SmolStr>,
    rel_type: impl Into<SmolStr>,
    to: impl Into<SmolStr>,
    properties: PropertyMap,
) -> Result<Clause, CompileError> {
    let rel_type = rel_type.into();
    check_properties(schema, &rel_type, ElementKind::Relationship, &properties, true)
        .map_err(|err| err.in_clause(ClauseKind::Create))?;
    let rel = RelRef {
        rel_type: Some(rel_type),
        properties,
        ..RelRef::default()
    };
    let chain = Chain::new(NodeRef::named(from)).forward(rel, NodeRef::named(to));
    Ok(Clause::Create(vec![Pattern::Chain(chain)]))
}

/// Builds `SET variable.k = v, ...` for a node of the given label.
pub fn set_properties(
    schema: &dyn SchemaLookup,
    variable: impl Into<SmolStr>,
    label: &str,
    assignments: PropertyMap,
) -> Result<Clause, CompileError> {
    if assignments.is_empty() {
        return Err(
            CompileError::clause_shape("needs at least one assignment").in_clause(ClauseKind::Set),
        );
    }
    check_properties(schema, label, ElementKind::Node, &assignments, false)
        .map_err(|err| err.in_clause(ClauseKind::Set))?;

    let variable = variable.into();
    let items = assignments
        .into_iter()
        .map(|(key, value)| {
            let target = Expression::Variable(variable.clone()).dot(key);
            SetItem::property(target, value)
        })
        .collect();
    Ok(Clause::Set(items))
}

fn node_with(variable: SmolStr, label: SmolStr, properties: PropertyMap) -> NodeRef {
    NodeRef {
        name: Some(variable),
        label: Some(label),
        properties,
    }
}

fn check_properties(
    schema: &dyn SchemaLookup,
    name: &str,
    kind: ElementKind,
    properties: &PropertyMap,
    require_complete: bool,
) -> Result<(), CompileError> {
    let Some(declared) = schema.lookup(kind, name) else {
        trace!("no schema for {kind} `{name}`, properties unchecked");
        return Ok(());
    };

    let undeclared: Vec<&str> = properties
        .iter()
        .map(|(key, _)| key.as_str())
        .filter(|key| !declared.declares(key))
        .collect();
    if !undeclared.is_empty() {
        return Err(CompileError::schema_violation(format!(
            "{kind} `{name}` does not declare {}",
            quoted_list(&undeclared)
        ))
        .with_help(declared_help(&declared)));
    }

    if require_complete {
        let missing: Vec<&str> = declared
            .required_properties()
            .map(SmolStr::as_str)
            .filter(|required| !properties.iter().any(|(key, _)| key.as_str() == *required))
            .collect();
        if !missing.is_empty() {
            return Err(CompileError::schema_violation(format!(
                "{kind} `{name}` is missing required {}",
                quoted_list(&missing)
            )));
        }
    }

    Ok(())
}

fn quoted_list(names: &[&str]) -> String {
    let quoted: Vec<String> = names.iter().map(|name| format!("`{name}`")).collect();
    let noun = if names.len() == 1 { "property" } else { "properties" };
    format!("{noun} {}", quoted.join(", "))
}

fn declared_help(schema: &ElementSchema) -> String {
    let names: Vec<&str> = schema.properties.keys().map(SmolStr::as_str).collect();
    format!("declared properties: {}", names.join(", "))
}
