//! Element schemas and the registry that holds them.
//!
//! Schemas declare which properties a node label or relationship type
//! carries and which of them are required. They are consulted only by the
//! mutation helpers in [`crate::semantic::mutation`]; the compiler itself
//! never reads them.
//!
//! The registry is read-mostly: populate it during startup, then share it
//! (typically behind an `Arc`) with request handlers. Late registration is
//! safe because lookups go through a reader-writer lock; callers that want
//! a frozen view take a [`SchemaSnapshot`].

use log::debug;
use parking_lot::RwLock;
use smol_str::SmolStr;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// What a schema describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A node label.
    Node,
    /// A relationship type.
    Relationship,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Node => f.write_str("node label"),
            ElementKind::Relationship => f.write_str("relationship type"),
        }
    }
}

/// A declared property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDecl {
    /// Whether the property must be supplied on creation.
    pub required: bool,
}

/// Property declarations for one label or relationship type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSchema {
    /// Label or type name.
    pub name: SmolStr,
    /// Whether `name` is a node label or relationship type.
    pub kind: ElementKind,
    /// Declared properties by name.
    pub properties: BTreeMap<SmolStr, PropertyDecl>,
}

impl ElementSchema {
    /// Starts a node label schema.
    pub fn node(name: impl Into<SmolStr>) -> Self {
        Self::new(name, ElementKind::Node)
    }

    /// Starts a relationship type schema.
    pub fn relationship(name: impl Into<SmolStr>) -> Self {
        Self::new(name, ElementKind::Relationship)
    }

    fn new(name: impl Into<SmolStr>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            properties: BTreeMap::new(),
        }
    }

    /// Declares a required property.
    pub fn required(mut self, property: impl Into<SmolStr>) -> Self {
        self.properties
            .insert(property.into(), PropertyDecl { required: true });
        self
    }

    /// Declares an optional property.
    pub fn optional(mut self, property: impl Into<SmolStr>) -> Self {
        self.properties
            .insert(property.into(), PropertyDecl { required: false });
        self
    }

    /// Returns true if `property` is declared.
    pub fn declares(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    /// Required property names in sorted order.
    pub fn required_properties(&self) -> impl Iterator<Item = &SmolStr> {
        self.properties
            .iter()
            .filter(|(_, decl)| decl.required)
            .map(|(name, _)| name)
    }
}

/// Schema lookup by element kind and name.
///
/// Node labels and relationship types live in separate namespaces, so a
/// label and a type may share a name.
pub trait SchemaLookup {
    /// Returns the schema registered for `name` under `kind`, if any.
    fn lookup(&self, kind: ElementKind, name: &str) -> Option<Arc<ElementSchema>>;
}

/// One map per element kind.
#[derive(Debug, Clone, Default)]
struct SchemaTables {
    nodes: HashMap<SmolStr, Arc<ElementSchema>>,
    relationships: HashMap<SmolStr, Arc<ElementSchema>>,
}

impl SchemaTables {
    fn table(&self, kind: ElementKind) -> &HashMap<SmolStr, Arc<ElementSchema>> {
        match kind {
            ElementKind::Node => &self.nodes,
            ElementKind::Relationship => &self.relationships,
        }
    }

    fn table_mut(&mut self, kind: ElementKind) -> &mut HashMap<SmolStr, Arc<ElementSchema>> {
        match kind {
            ElementKind::Node => &mut self.nodes,
            ElementKind::Relationship => &mut self.relationships,
        }
    }

    fn len(&self) -> usize {
        self.nodes.len() + self.relationships.len()
    }

    fn get(&self, kind: ElementKind, name: &str) -> Option<Arc<ElementSchema>> {
        self.table(kind).get(name).cloned()
    }
}

/// Thread-safe, read-mostly schema registry.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    tables: RwLock<SchemaTables>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema, returning the one of the same kind it replaced.
    pub fn register(&self, schema: ElementSchema) -> Option<Arc<ElementSchema>> {
        debug!(
            "registering schema for {} `{}` with {} properties",
            schema.kind,
            schema.name,
            schema.properties.len()
        );
        self.tables
            .write()
            .table_mut(schema.kind)
            .insert(schema.name.clone(), Arc::new(schema))
    }

    /// Removes a schema.
    pub fn unregister(&self, kind: ElementKind, name: &str) -> Option<Arc<ElementSchema>> {
        self.tables.write().table_mut(kind).remove(name)
    }

    /// Number of registered schemas across both kinds.
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the current contents into an immutable snapshot.
    pub fn snapshot(&self) -> SchemaSnapshot {
        SchemaSnapshot {
            tables: self.tables.read().clone(),
        }
    }
}

impl SchemaLookup for SchemaRegistry {
    fn lookup(&self, kind: ElementKind, name: &str) -> Option<Arc<ElementSchema>> {
        self.tables.read().get(kind, name)
    }
}

/// An immutable view of a registry at one point in time.
#[derive(Debug, Clone, Default)]
pub struct SchemaSnapshot {
    tables: SchemaTables,
}

impl SchemaLookup for SchemaSnapshot {
    fn lookup(&self, kind: ElementKind, name: &str) -> Option<Arc<ElementSchema>> {
        self.tables.get(kind, name)
    }
}
