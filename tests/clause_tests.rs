//! Clause assembly, statement-level validation, and schema DDL.

mod common;

use common::{assert_error_kind, compile_ok};
use cypher_compiler::ast::builder::{count_star, lit, node, param, prop, var};
use cypher_compiler::ast::{
    Chain, Clause, ClauseKind, ConstraintSpec, IndexSpec, NodeRef, OrderTerm, Pattern, RelRef,
    RemoveItem, SetItem,
};
use cypher_compiler::{AccessMode, ErrorKind, Query, compile};
use miette::Diagnostic;

#[test]
fn multiple_patterns_join_with_commas() {
    let read = compile_ok(
        &Query::new()
            .match_all([node("a", "A").into(), node("b", "B").into()])
            .return_([var("a"), var("b")]),
    );
    assert_eq!(read.text, "MATCH (a:A), (b:B) RETURN a, b");

    let link = Chain::new(NodeRef::named("a")).forward(RelRef::typed("R"), NodeRef::named("b"));
    let write = compile_ok(
        &Query::new()
            .match_all([node("a", "A").into(), node("b", "B").into()])
            .create_all([Pattern::Chain(link), Pattern::Node(NodeRef::labeled("C"))]),
    );
    assert_eq!(
        write.text,
        "MATCH (a:A), (b:B) CREATE (a)-[:R]->(b), (:C)"
    );
    assert_eq!(write.access_mode, AccessMode::Write);

    let empty = Query::new().match_all(Vec::<Pattern>::new()).return_([var("a")]).compile();
    let err = assert_error_kind(empty, ErrorKind::ClauseShape);
    assert_eq!(err.clause, Some(ClauseKind::Match));
}

#[test]
fn union_branches() {
    let compiled = compile_ok(
        &Query::new()
            .match_(node("a", "Actor"))
            .return_([prop("a", "name").alias("name")])
            .union()
            .match_(node("d", "Director"))
            .return_([prop("d", "name").alias("name")]),
    );
    assert_eq!(
        compiled.text,
        "MATCH (a:Actor) RETURN a.name AS name UNION MATCH (d:Director) RETURN d.name AS name"
    );
    assert_eq!(compiled.access_mode, AccessMode::Read);
}

#[test]
fn union_validation() {
    let mixed = Query::new()
        .match_(node("a", "A"))
        .return_([var("a")])
        .union()
        .match_(node("b", "B"))
        .return_([var("b")])
        .union_all()
        .match_(node("c", "C"))
        .return_([var("c")]);
    assert_error_kind(mixed.compile(), ErrorKind::ClauseOrder);

    let missing_return = Query::new()
        .match_(node("a", "A"))
        .return_([var("a")])
        .union()
        .match_(node("b", "B"));
    assert_error_kind(missing_return.compile(), ErrorKind::ClauseShape);

    let empty_side = Query::new().union().match_(node("b", "B")).return_([var("b")]);
    assert_error_kind(empty_side.compile(), ErrorKind::ClauseShape);
}

#[test]
fn paging_after_return() {
    let compiled = compile_ok(
        &Query::new()
            .match_(node("p", "Person"))
            .return_distinct([prop("p", "name")])
            .order_by([prop("p", "name").into(), OrderTerm::Descending])
            .skip(param("offset", 20))
            .limit(param("page", 10)),
    );
    assert_eq!(
        compiled.text,
        "MATCH (p:Person) RETURN DISTINCT p.name ORDER BY p.name DESC SKIP $offset LIMIT $page"
    );
    let names: Vec<&str> = compiled.parameters.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["offset", "page"]);
}

#[test]
fn ordering_validation() {
    let leading_marker = Query::new()
        .match_(node("p", "Person"))
        .return_([var("p")])
        .order_by([OrderTerm::Ascending, prop("p", "name").into()]);
    let err = assert_error_kind(leading_marker.compile(), ErrorKind::ClauseShape);
    assert_eq!(err.clause, Some(ClauseKind::OrderBy));

    let double_marker = Query::new()
        .match_(node("p", "Person"))
        .return_([var("p")])
        .order_by([
            prop("p", "name").into(),
            OrderTerm::Ascending,
            OrderTerm::Descending,
        ]);
    assert_error_kind(double_marker.compile(), ErrorKind::ClauseShape);
}

#[test]
fn clause_position_errors() {
    let dangling_where = Query::new().where_(lit(true)).return_([lit(1)]);
    let err = assert_error_kind(dangling_where.compile(), ErrorKind::ClauseOrder);
    assert_eq!(err.clause, Some(ClauseKind::Where));

    let unanchored = Query::new()
        .create(node("n", "A"))
        .on_create_set([SetItem::property(prop("n", "x"), lit(1))]);
    let err = assert_error_kind(unanchored.compile(), ErrorKind::ClauseOrder);
    assert_eq!(err.clause, Some(ClauseKind::OnCreateSet));

    let after_return = Query::new()
        .match_(node("n", "A"))
        .return_([var("n")])
        .create(node("m", "B"));
    assert_error_kind(after_return.compile(), ErrorKind::ClauseOrder);
}

#[test]
fn empty_lists_are_rejected() {
    assert_error_kind(compile(&[]), ErrorKind::ClauseShape);

    let err = assert_error_kind(compile(&[Clause::Match(Vec::new())]), ErrorKind::ClauseShape);
    assert_eq!(err.to_string(), "MATCH: needs at least one pattern");

    assert_error_kind(
        Query::new().match_(node("n", "A")).delete([]).compile(),
        ErrorKind::ClauseShape,
    );
}

#[test]
fn removal_and_deletion() {
    let compiled = compile_ok(
        &Query::new()
            .match_(node("n", "Person"))
            .remove([
                RemoveItem::Property(prop("n", "temp")),
                RemoveItem::Label {
                    variable: "n".into(),
                    label: "Draft".into(),
                },
            ])
            .detach_delete([var("n")]),
    );
    assert_eq!(
        compiled.text,
        "MATCH (n:Person) REMOVE n.temp, n:Draft DETACH DELETE n"
    );
    assert_eq!(compiled.access_mode, AccessMode::Write);
}

#[test]
fn optional_match_and_with() {
    let compiled = compile_ok(
        &Query::new()
            .match_(node("p", "Person"))
            .optional_match(node("c", "Car"))
            .with([var("p").into(), count_star().alias("cars")])
            .where_(var("cars").gt(lit(1)))
            .return_([var("p")]),
    );
    assert_eq!(
        compiled.text,
        "MATCH (p:Person) OPTIONAL MATCH (c:Car) WITH p, count(*) AS cars WHERE cars > 1 RETURN p"
    );
}

#[test]
fn index_ddl() {
    let cases = [
        (
            IndexSpec::new("Person", ["name"]),
            "CREATE INDEX FOR (n:Person) ON (n.name)",
        ),
        (
            IndexSpec::new("Person", ["first", "last"]).named("person_names").idempotent(),
            "CREATE INDEX person_names IF NOT EXISTS FOR (n:Person) ON (n.first, n.last)",
        ),
    ];
    for (spec, expected) in cases {
        let compiled = compile_ok(&Query::new().create_index(spec));
        assert_eq!(compiled.text, expected);
        assert_eq!(compiled.access_mode, AccessMode::Write);
    }

    let dropped = compile_ok(&Query::new().drop_index(IndexSpec::new("Person", ["name"])));
    assert_eq!(dropped.text, "DROP INDEX ON :Person(name)");
}

#[test]
fn constraint_ddl() {
    let unique = compile_ok(
        &Query::new()
            .create_constraint(ConstraintSpec::unique("Person", ["email"]).named("uniq_email")),
    );
    assert_eq!(
        unique.text,
        "CREATE CONSTRAINT uniq_email FOR (n:Person) REQUIRE n.email IS UNIQUE"
    );

    let dropped = compile_ok(
        &Query::new().drop_constraint(ConstraintSpec::not_null("Person", "name")),
    );
    assert_eq!(
        dropped.text,
        "DROP CONSTRAINT ON (n:Person) ASSERT n.name IS NOT NULL"
    );

    let idempotent_unnamed = Query::new()
        .drop_constraint(ConstraintSpec::unique("Person", ["email"]).idempotent());
    assert_error_kind(idempotent_unnamed.compile(), ErrorKind::ClauseShape);
}

#[test]
fn schema_commands_stand_alone() {
    let mixed = Query::new()
        .create_index(IndexSpec::new("Person", ["name"]))
        .match_(node("n", "Person"))
        .return_([var("n")]);
    let err = assert_error_kind(mixed.compile(), ErrorKind::ClauseOrder);
    assert_eq!(err.clause, Some(ClauseKind::CreateIndex));
}

#[test]
fn errors_render_as_miette_reports() {
    let err = assert_error_kind(
        Query::new().return_([prop("p", "x").alias("")]).compile(),
        ErrorKind::InvalidIdentifier,
    );
    assert_eq!(
        err.code().map(|code| code.to_string()).as_deref(),
        Some("cypher::invalid_identifier")
    );
    let rendered = format!("{:?}", err.to_report());
    assert!(rendered.contains("alias name is empty"), "{rendered}");
}
