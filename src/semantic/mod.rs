//! Schema-aware construction of mutation clauses.
//!
//! The compiler is schema-agnostic. This module layers an optional check on
//! top: register an [`ElementSchema`] per label or relationship type in a
//! [`SchemaRegistry`], then build CREATE, MERGE, and SET clauses through the
//! helpers in [`mutation`], which reject missing required properties and
//! undeclared keys before anything reaches the compiler. Node labels and
//! relationship types are separate namespaces: a `Link` label schema never
//! constrains a `Link` relationship.
//!
//! # Example
//!
//! ```
//! use cypher_compiler::ast::builder::param;
//! use cypher_compiler::semantic::{ElementSchema, SchemaRegistry, create_node};
//!
//! let registry = SchemaRegistry::new();
//! registry.register(ElementSchema::node("Person").required("name"));
//!
//! let clause = create_node(&registry, "n", "Person", vec![("name".into(), param("name", "Ada"))])
//!     .unwrap();
//! let compiled = cypher_compiler::compile(&[clause]).unwrap();
//! assert_eq!(compiled.text, "CREATE (n:Person {name: $name})");
//! ```

pub mod mutation;
pub mod schema;

pub use mutation::{create_node, create_relationship, merge_node, set_properties};
pub use schema::{
    ElementKind, ElementSchema, PropertyDecl, SchemaLookup, SchemaRegistry, SchemaSnapshot,
};
