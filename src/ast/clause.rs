//! Clause IR: the ordered pipeline a statement is assembled from.
//!
//! A statement is a `Vec<Clause>` processed in order. Each clause carries a
//! small kind-specific argument list; nested clause lists appear in
//! [`Clause::CallSubquery`] and [`Clause::Foreach`].
//!
//! # Examples
//!
//! ```text
//! MATCH (p:Person) WHERE p.age > $min_age RETURN p.name AS name
//! CREATE (n:Person) SET n.name = $name, n.age = $age RETURN n
//! MERGE (n:Person {id: $id}) ON CREATE SET n.created = timestamp()
//! CALL { MATCH (n) RETURN count(n) AS c } RETURN c
//! FOREACH (x IN $xs | CREATE (:Item {v: x}))
//! ```

use crate::ast::expression::Expression;
use crate::ast::pattern::Pattern;
use smol_str::SmolStr;
use std::fmt;

// ============================================================================
// Clause
// ============================================================================

/// One top-level statement fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `MATCH p1, p2`
    Match(Vec<Pattern>),
    /// `OPTIONAL MATCH p1, p2`
    OptionalMatch(Vec<Pattern>),
    /// `WHERE cond`
    Where(Expression),
    /// `RETURN [DISTINCT] items`
    Return(Projection),
    /// `WITH [DISTINCT] items`
    With(Projection),
    /// `UNWIND source AS alias`
    Unwind { source: Expression, alias: SmolStr },
    /// `CREATE p1, p2`
    Create(Vec<Pattern>),
    /// `MERGE p`
    Merge(Pattern),
    /// `SET items`; consecutive Set clauses merge into one fragment.
    Set(Vec<SetItem>),
    /// `REMOVE items`
    Remove(Vec<RemoveItem>),
    /// `DELETE exprs`
    Delete(Vec<Expression>),
    /// `DETACH DELETE exprs`
    DetachDelete(Vec<Expression>),
    /// `ORDER BY` over interleaved keys and direction markers.
    OrderBy(Vec<OrderTerm>),
    /// `SKIP n`
    Skip(Expression),
    /// `LIMIT n`
    Limit(Expression),
    /// `ON CREATE SET items`, directly after MERGE.
    OnCreateSet(Vec<SetItem>),
    /// `ON MATCH SET items`, directly after MERGE.
    OnMatchSet(Vec<SetItem>),
    /// `UNION` separator.
    Union,
    /// `UNION ALL` separator.
    UnionAll,
    /// `CALL { sub-statement }`
    CallSubquery(Vec<Clause>),
    /// `LOAD CSV FROM source AS alias`
    LoadCsv(LoadCsv),
    /// `LOAD CSV WITH HEADERS FROM source AS alias`
    LoadCsvHeaders(LoadCsv),
    /// `FOREACH (binding IN source | body)`
    Foreach {
        binding: SmolStr,
        source: Expression,
        body: Vec<Clause>,
    },
    /// `CREATE INDEX ...`
    CreateIndex(IndexSpec),
    /// `DROP INDEX ...`
    DropIndex(IndexSpec),
    /// `CREATE CONSTRAINT ...`
    CreateConstraint(ConstraintSpec),
    /// `DROP CONSTRAINT ...`
    DropConstraint(ConstraintSpec),
}

impl Clause {
    /// Returns the kind tag of this clause.
    pub fn kind(&self) -> ClauseKind {
        match self {
            Clause::Match(_) => ClauseKind::Match,
            Clause::OptionalMatch(_) => ClauseKind::OptionalMatch,
            Clause::Where(_) => ClauseKind::Where,
            Clause::Return(_) => ClauseKind::Return,
            Clause::With(_) => ClauseKind::With,
            Clause::Unwind { .. } => ClauseKind::Unwind,
            Clause::Create(_) => ClauseKind::Create,
            Clause::Merge(_) => ClauseKind::Merge,
            Clause::Set(_) => ClauseKind::Set,
            Clause::Remove(_) => ClauseKind::Remove,
            Clause::Delete(_) => ClauseKind::Delete,
            Clause::DetachDelete(_) => ClauseKind::DetachDelete,
            Clause::OrderBy(_) => ClauseKind::OrderBy,
            Clause::Skip(_) => ClauseKind::Skip,
            Clause::Limit(_) => ClauseKind::Limit,
            Clause::OnCreateSet(_) => ClauseKind::OnCreateSet,
            Clause::OnMatchSet(_) => ClauseKind::OnMatchSet,
            Clause::Union => ClauseKind::Union,
            Clause::UnionAll => ClauseKind::UnionAll,
            Clause::CallSubquery(_) => ClauseKind::CallSubquery,
            Clause::LoadCsv(_) => ClauseKind::LoadCsv,
            Clause::LoadCsvHeaders(_) => ClauseKind::LoadCsvHeaders,
            Clause::Foreach { .. } => ClauseKind::Foreach,
            Clause::CreateIndex(_) => ClauseKind::CreateIndex,
            Clause::DropIndex(_) => ClauseKind::DropIndex,
            Clause::CreateConstraint(_) => ClauseKind::CreateConstraint,
            Clause::DropConstraint(_) => ClauseKind::DropConstraint,
        }
    }
}

/// Field-less tag for each clause variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Match,
    OptionalMatch,
    Where,
    Return,
    With,
    Unwind,
    Create,
    Merge,
    Set,
    Remove,
    Delete,
    DetachDelete,
    OrderBy,
    Skip,
    Limit,
    OnCreateSet,
    OnMatchSet,
    Union,
    UnionAll,
    CallSubquery,
    LoadCsv,
    LoadCsvHeaders,
    Foreach,
    CreateIndex,
    DropIndex,
    CreateConstraint,
    DropConstraint,
}

impl ClauseKind {
    /// Leading keyword(s) of the clause in statement text.
    pub fn keyword(self) -> &'static str {
        match self {
            ClauseKind::Match => "MATCH",
            ClauseKind::OptionalMatch => "OPTIONAL MATCH",
            ClauseKind::Where => "WHERE",
            ClauseKind::Return => "RETURN",
            ClauseKind::With => "WITH",
            ClauseKind::Unwind => "UNWIND",
            ClauseKind::Create => "CREATE",
            ClauseKind::Merge => "MERGE",
            ClauseKind::Set => "SET",
            ClauseKind::Remove => "REMOVE",
            ClauseKind::Delete => "DELETE",
            ClauseKind::DetachDelete => "DETACH DELETE",
            ClauseKind::OrderBy => "ORDER BY",
            ClauseKind::Skip => "SKIP",
            ClauseKind::Limit => "LIMIT",
            ClauseKind::OnCreateSet => "ON CREATE SET",
            ClauseKind::OnMatchSet => "ON MATCH SET",
            ClauseKind::Union => "UNION",
            ClauseKind::UnionAll => "UNION ALL",
            ClauseKind::CallSubquery => "CALL",
            ClauseKind::LoadCsv => "LOAD CSV",
            ClauseKind::LoadCsvHeaders => "LOAD CSV WITH HEADERS",
            ClauseKind::Foreach => "FOREACH",
            ClauseKind::CreateIndex => "CREATE INDEX",
            ClauseKind::DropIndex => "DROP INDEX",
            ClauseKind::CreateConstraint => "CREATE CONSTRAINT",
            ClauseKind::DropConstraint => "DROP CONSTRAINT",
        }
    }

    /// Clause kinds whose presence makes a statement mutating.
    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            ClauseKind::Create
                | ClauseKind::Merge
                | ClauseKind::Set
                | ClauseKind::Remove
                | ClauseKind::Delete
                | ClauseKind::DetachDelete
                | ClauseKind::OnCreateSet
                | ClauseKind::OnMatchSet
                | ClauseKind::CreateIndex
                | ClauseKind::DropIndex
                | ClauseKind::CreateConstraint
                | ClauseKind::DropConstraint
                | ClauseKind::Foreach
        )
    }

    /// Schema DDL clauses, which must stand alone in a statement.
    pub fn is_schema_command(self) -> bool {
        matches!(
            self,
            ClauseKind::CreateIndex
                | ClauseKind::DropIndex
                | ClauseKind::CreateConstraint
                | ClauseKind::DropConstraint
        )
    }

    /// Clauses allowed inside a FOREACH body.
    pub fn is_updating(self) -> bool {
        matches!(
            self,
            ClauseKind::Create
                | ClauseKind::Merge
                | ClauseKind::Set
                | ClauseKind::Remove
                | ClauseKind::Delete
                | ClauseKind::DetachDelete
                | ClauseKind::OnCreateSet
                | ClauseKind::OnMatchSet
                | ClauseKind::Foreach
        )
    }

    /// UNION / UNION ALL separators.
    pub fn is_union(self) -> bool {
        matches!(self, ClauseKind::Union | ClauseKind::UnionAll)
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// ============================================================================
// Projections and ordering
// ============================================================================

/// Projection list for RETURN and WITH.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection {
    /// Leading DISTINCT marker.
    pub distinct: bool,
    /// Projected items; at least one is required.
    pub items: Vec<ProjectionItem>,
}

impl Projection {
    /// Creates a projection from items.
    pub fn new(items: impl IntoIterator<Item = impl Into<ProjectionItem>>) -> Self {
        Self {
            distinct: false,
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Marks the projection DISTINCT.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

/// A projected expression, optionally aliased with `AS`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionItem {
    /// The projected expression.
    pub expr: Expression,
    /// Optional alias.
    pub alias: Option<SmolStr>,
}

impl From<Expression> for ProjectionItem {
    fn from(expr: Expression) -> Self {
        ProjectionItem { expr, alias: None }
    }
}

/// One term of an ORDER BY list.
///
/// Keys and direction markers are interleaved; a marker applies to the key
/// immediately before it and each key takes at most one marker.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderTerm {
    /// Sort key.
    Key(Expression),
    /// `ASC` marker.
    Ascending,
    /// `DESC` marker.
    Descending,
}

impl From<Expression> for OrderTerm {
    fn from(expr: Expression) -> Self {
        OrderTerm::Key(expr)
    }
}

// ============================================================================
// Mutation items
// ============================================================================

/// One assignment inside SET, ON CREATE SET, or ON MATCH SET.
#[derive(Debug, Clone, PartialEq)]
pub enum SetItem {
    /// `owner.prop = value`; the target must be a property access.
    Property { target: Expression, value: Expression },
    /// `var = map`, replacing all properties.
    Replace { variable: SmolStr, value: Expression },
    /// `var += map`, merging properties.
    Merge { variable: SmolStr, value: Expression },
    /// `var:Label`
    AddLabel { variable: SmolStr, label: SmolStr },
}

impl SetItem {
    /// `target = value` for a property-access target.
    pub fn property(target: Expression, value: impl Into<Expression>) -> Self {
        SetItem::Property {
            target,
            value: value.into(),
        }
    }
}

/// One item inside REMOVE.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveItem {
    /// `owner.prop`
    Property(Expression),
    /// `var:Label`
    Label { variable: SmolStr, label: SmolStr },
}

// ============================================================================
// CSV import and schema DDL
// ============================================================================

/// Arguments of LOAD CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadCsv {
    /// URL expression, usually a string literal or parameter.
    pub source: Expression,
    /// Row variable.
    pub alias: SmolStr,
    /// Optional FIELDTERMINATOR character.
    pub field_terminator: Option<char>,
}

/// Index DDL arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    /// Index name; required by the named DROP form.
    pub name: Option<SmolStr>,
    /// Indexed label.
    pub label: SmolStr,
    /// Indexed property keys; at least one is required.
    pub properties: Vec<SmolStr>,
    /// Adds `IF NOT EXISTS` / `IF EXISTS`.
    pub idempotent: bool,
}

impl IndexSpec {
    /// Creates an unnamed index spec.
    pub fn new(
        label: impl Into<SmolStr>,
        properties: impl IntoIterator<Item = impl Into<SmolStr>>,
    ) -> Self {
        Self {
            name: None,
            label: label.into(),
            properties: properties.into_iter().map(Into::into).collect(),
            idempotent: false,
        }
    }

    /// Names the index.
    pub fn named(mut self, name: impl Into<SmolStr>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds the existence guard.
    pub fn idempotent(mut self) -> Self {
        self.idempotent = true;
        self
    }
}

/// Constraint kinds supported by the DDL clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Property (or property tuple) uniqueness.
    Unique,
    /// Single-property existence.
    NotNull,
}

/// Constraint DDL arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSpec {
    /// Constraint name.
    pub name: Option<SmolStr>,
    /// Constrained label.
    pub label: SmolStr,
    /// Constrained property keys.
    pub properties: Vec<SmolStr>,
    /// Constraint kind.
    pub kind: ConstraintKind,
    /// Adds `IF NOT EXISTS` / `IF EXISTS`.
    pub idempotent: bool,
}

impl ConstraintSpec {
    /// Uniqueness constraint over `properties`.
    pub fn unique(
        label: impl Into<SmolStr>,
        properties: impl IntoIterator<Item = impl Into<SmolStr>>,
    ) -> Self {
        Self {
            name: None,
            label: label.into(),
            properties: properties.into_iter().map(Into::into).collect(),
            kind: ConstraintKind::Unique,
            idempotent: false,
        }
    }

    /// Existence constraint over a single property.
    pub fn not_null(label: impl Into<SmolStr>, property: impl Into<SmolStr>) -> Self {
        Self {
            name: None,
            label: label.into(),
            properties: vec![property.into()],
            kind: ConstraintKind::NotNull,
            idempotent: false,
        }
    }

    /// Names the constraint.
    pub fn named(mut self, name: impl Into<SmolStr>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds the existence guard.
    pub fn idempotent(mut self) -> Self {
        self.idempotent = true;
        self
    }
}
