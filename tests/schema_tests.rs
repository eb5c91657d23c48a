//! Schema registry and schema-checked mutation helpers.

use std::sync::Arc;

use cypher_compiler::ast::builder::{lit, param};
use cypher_compiler::ast::{ClauseKind, Expression, PropertyMap};
use cypher_compiler::semantic::{
    ElementKind, ElementSchema, SchemaLookup, SchemaRegistry, create_node, create_relationship,
    merge_node, set_properties,
};
use cypher_compiler::{AccessMode, ErrorKind, compile};

fn registry() -> SchemaRegistry {
    let registry = SchemaRegistry::new();
    registry.register(
        ElementSchema::node("Person")
            .required("name")
            .required("email")
            .optional("age"),
    );
    registry.register(ElementSchema::relationship("FOLLOWS").optional("since"));
    registry
}

fn props(entries: &[(&str, Expression)]) -> PropertyMap {
    entries
        .iter()
        .map(|(key, value)| ((*key).into(), value.clone()))
        .collect()
}

#[test]
fn checked_create_compiles() {
    let registry = registry();
    let clause = create_node(
        &registry,
        "p",
        "Person",
        props(&[
            ("name", param("name", "Ada")),
            ("email", param("email", "ada@example.com")),
        ]),
    )
    .unwrap();

    let compiled = compile(&[clause]).unwrap();
    assert_eq!(compiled.text, "CREATE (p:Person {name: $name, email: $email})");
    assert_eq!(compiled.access_mode, AccessMode::Write);
}

#[test]
fn missing_required_properties_are_listed() {
    let err = create_node(&registry(), "p", "Person", props(&[("age", lit(3))])).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SchemaViolation);
    assert_eq!(
        err.to_string(),
        "CREATE: node label `Person` is missing required properties `email`, `name`"
    );
}

#[test]
fn merge_and_set_statement() {
    let registry = registry();
    let merge = merge_node(
        &registry,
        "p",
        "Person",
        props(&[("name", param("name", "Ada")), ("email", param("email", "a@b"))]),
    )
    .unwrap();
    let set =
        set_properties(&registry, "p", "Person", props(&[("age", param("age", 36))])).unwrap();

    let compiled = compile(&[merge, set]).unwrap();
    assert_eq!(
        compiled.text,
        "MERGE (p:Person {name: $name, email: $email}) SET p.age = $age"
    );
    assert_eq!(compiled.parameters.len(), 3);

    let err = set_properties(&registry, "p", "Person", Vec::new()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ClauseShape);
    assert_eq!(err.clause, Some(ClauseKind::Set));
}

#[test]
fn relationship_creation() {
    let clause = create_relationship(
        &registry(),
        "a",
        "FOLLOWS",
        "b",
        props(&[("since", param("since", 2020))]),
    )
    .unwrap();
    assert_eq!(
        compile(&[clause]).unwrap().text,
        "CREATE (a)-[:FOLLOWS {since: $since}]->(b)"
    );
}

#[test]
fn snapshots_serve_lookups() {
    let registry = Arc::new(registry());
    let snapshot = registry.snapshot();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || registry.lookup(ElementKind::Node, "Person").is_some())
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }

    registry.register(ElementSchema::node("Company").required("name"));
    assert!(snapshot.lookup(ElementKind::Node, "Company").is_none());
    assert!(create_node(&snapshot, "c", "Company", Vec::new()).is_ok());
    assert!(create_node(&*registry, "c", "Company", Vec::new()).is_err());
}

#[test]
fn node_label_and_relationship_type_share_a_name() {
    let registry = registry();
    registry.register(ElementSchema::relationship("Person").required("weight"));
    assert_eq!(registry.len(), 3);

    let node = create_node(
        &registry,
        "p",
        "Person",
        props(&[("name", param("name", "Ada")), ("email", param("email", "a@x"))]),
    )
    .unwrap();
    let rel = create_relationship(
        &registry,
        "a",
        "Person",
        "b",
        props(&[("weight", param("weight", 2))]),
    )
    .unwrap();
    let compiled = compile(&[node, rel]).unwrap();
    assert_eq!(
        compiled.text,
        "CREATE (p:Person {name: $name, email: $email}) CREATE (a)-[:Person {weight: $weight}]->(b)"
    );

    let err = create_relationship(&registry, "a", "Person", "b", Vec::new()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SchemaViolation);
    assert!(err.message.contains("`weight`"));
}
