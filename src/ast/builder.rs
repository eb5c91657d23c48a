//! Caller-facing construction helpers.
//!
//! The free functions build expression and pattern leaves; [`Query`]
//! accumulates an ordered clause list with a fluent API.
//!
//! ```
//! use cypher_compiler::ast::builder::{Query, node, param, prop};
//!
//! let compiled = Query::new()
//!     .match_(node("p", "Person"))
//!     .where_(prop("p", "age").gt(param("min_age", 30)))
//!     .return_([prop("p", "name").alias("name")])
//!     .compile()
//!     .unwrap();
//!
//! assert_eq!(
//!     compiled.text,
//!     "MATCH (p:Person) WHERE p.age > $min_age RETURN p.name AS name"
//! );
//! ```

use crate::ast::clause::{
    Clause, ConstraintSpec, IndexSpec, LoadCsv, OrderTerm, Projection, ProjectionItem, RemoveItem,
    SetItem,
};
use crate::ast::expression::{Expression, FunctionCall, Literal};
use crate::ast::pattern::{NodeRef, Pattern, RelRef};
use crate::compiler::{CompiledStatement, Compiler};
use crate::diag::CompileError;
use crate::value::Value;
use smol_str::SmolStr;

// ============================================================================
// Leaf helpers
// ============================================================================

/// `(name:Label)`
pub fn node(name: impl Into<SmolStr>, label: impl Into<SmolStr>) -> NodeRef {
    NodeRef::new(name, label)
}

/// `[name:TYPE]`
pub fn rel(name: impl Into<SmolStr>, rel_type: impl Into<SmolStr>) -> RelRef {
    RelRef::new(name, rel_type)
}

/// Variable reference.
pub fn var(name: impl Into<SmolStr>) -> Expression {
    Expression::Variable(name.into())
}

/// `owner.name` where `owner` is a variable.
pub fn prop(owner: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Expression {
    Expression::Property(Box::new(var(owner)), name.into())
}

/// Named parameter `$name` bound to `value`.
pub fn param(name: impl Into<SmolStr>, value: impl Into<Value>) -> Expression {
    Expression::Parameter {
        name: name.into(),
        value: value.into(),
    }
}

/// Anonymous parameter bound to `value`; named `p0`, `p1`, ... at compile time.
pub fn bound(value: impl Into<Value>) -> Expression {
    Expression::Bound(value.into())
}

/// Inline literal.
pub fn lit(value: impl Into<Literal>) -> Expression {
    Expression::Literal(value.into())
}

/// `null`
pub fn null() -> Expression {
    Expression::Literal(Literal::Null)
}

/// `name(args...)`
pub fn call(name: impl Into<SmolStr>, args: impl IntoIterator<Item = Expression>) -> Expression {
    Expression::FunctionCall(FunctionCall {
        name: name.into(),
        distinct: false,
        args: args.into_iter().collect(),
    })
}

/// `name(DISTINCT args...)`
pub fn call_distinct(
    name: impl Into<SmolStr>,
    args: impl IntoIterator<Item = Expression>,
) -> Expression {
    Expression::FunctionCall(FunctionCall {
        name: name.into(),
        distinct: true,
        args: args.into_iter().collect(),
    })
}

/// `count(*)`
pub fn count_star() -> Expression {
    call("count", [Expression::Star])
}

/// `[a, b, ...]`
pub fn list(items: impl IntoIterator<Item = Expression>) -> Expression {
    Expression::List(items.into_iter().collect())
}

/// `{key: value, ...}`
pub fn map<K: Into<SmolStr>>(entries: impl IntoIterator<Item = (K, Expression)>) -> Expression {
    Expression::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
}

/// `variable:Label`
pub fn has_label(variable: impl Into<SmolStr>, label: impl Into<SmolStr>) -> Expression {
    Expression::HasLabel(variable.into(), label.into())
}

/// `EXISTS { sub-statement }`
pub fn exists(query: Query) -> Expression {
    Expression::Exists(query.into_clauses())
}

/// Pattern used as a predicate.
pub fn pattern_predicate(pattern: impl Into<Pattern>) -> Expression {
    Expression::PatternPredicate(Box::new(pattern.into()))
}

// ============================================================================
// Query builder
// ============================================================================

/// Fluent builder accumulating an ordered clause list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    clauses: Vec<Clause>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an arbitrary clause.
    pub fn clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// `MATCH pattern`
    pub fn match_(self, pattern: impl Into<Pattern>) -> Self {
        self.clause(Clause::Match(vec![pattern.into()]))
    }

    /// `MATCH p1, p2, ...`
    pub fn match_all(self, patterns: impl IntoIterator<Item = Pattern>) -> Self {
        self.clause(Clause::Match(patterns.into_iter().collect()))
    }

    /// `OPTIONAL MATCH pattern`
    pub fn optional_match(self, pattern: impl Into<Pattern>) -> Self {
        self.clause(Clause::OptionalMatch(vec![pattern.into()]))
    }

    /// `WHERE condition`
    pub fn where_(self, condition: Expression) -> Self {
        self.clause(Clause::Where(condition))
    }

    /// `RETURN items`
    pub fn return_(self, items: impl IntoIterator<Item = impl Into<ProjectionItem>>) -> Self {
        self.clause(Clause::Return(Projection::new(items)))
    }

    /// `RETURN DISTINCT items`
    pub fn return_distinct(
        self,
        items: impl IntoIterator<Item = impl Into<ProjectionItem>>,
    ) -> Self {
        self.clause(Clause::Return(Projection::new(items).distinct()))
    }

    /// `WITH items`
    pub fn with(self, items: impl IntoIterator<Item = impl Into<ProjectionItem>>) -> Self {
        self.clause(Clause::With(Projection::new(items)))
    }

    /// `WITH DISTINCT items`
    pub fn with_distinct(self, items: impl IntoIterator<Item = impl Into<ProjectionItem>>) -> Self {
        self.clause(Clause::With(Projection::new(items).distinct()))
    }

    /// `UNWIND source AS alias`
    pub fn unwind(self, source: Expression, alias: impl Into<SmolStr>) -> Self {
        self.clause(Clause::Unwind {
            source,
            alias: alias.into(),
        })
    }

    /// `CREATE pattern`
    pub fn create(self, pattern: impl Into<Pattern>) -> Self {
        self.clause(Clause::Create(vec![pattern.into()]))
    }

    /// `CREATE p1, p2, ...`
    pub fn create_all(self, patterns: impl IntoIterator<Item = Pattern>) -> Self {
        self.clause(Clause::Create(patterns.into_iter().collect()))
    }

    /// `MERGE pattern`
    pub fn merge(self, pattern: impl Into<Pattern>) -> Self {
        self.clause(Clause::Merge(pattern.into()))
    }

    /// `ON CREATE SET items`
    pub fn on_create_set(self, items: impl IntoIterator<Item = SetItem>) -> Self {
        self.clause(Clause::OnCreateSet(items.into_iter().collect()))
    }

    /// `ON MATCH SET items`
    pub fn on_match_set(self, items: impl IntoIterator<Item = SetItem>) -> Self {
        self.clause(Clause::OnMatchSet(items.into_iter().collect()))
    }

    /// `SET target = value`; consecutive calls merge into one SET.
    pub fn set(self, target: Expression, value: impl Into<Expression>) -> Self {
        self.clause(Clause::Set(vec![SetItem::property(target, value)]))
    }

    /// `SET items`
    pub fn set_items(self, items: impl IntoIterator<Item = SetItem>) -> Self {
        self.clause(Clause::Set(items.into_iter().collect()))
    }

    /// `REMOVE items`
    pub fn remove(self, items: impl IntoIterator<Item = RemoveItem>) -> Self {
        self.clause(Clause::Remove(items.into_iter().collect()))
    }

    /// `DELETE exprs`
    pub fn delete(self, exprs: impl IntoIterator<Item = Expression>) -> Self {
        self.clause(Clause::Delete(exprs.into_iter().collect()))
    }

    /// `DETACH DELETE exprs`
    pub fn detach_delete(self, exprs: impl IntoIterator<Item = Expression>) -> Self {
        self.clause(Clause::DetachDelete(exprs.into_iter().collect()))
    }

    /// `ORDER BY terms`
    pub fn order_by(self, terms: impl IntoIterator<Item = OrderTerm>) -> Self {
        self.clause(Clause::OrderBy(terms.into_iter().collect()))
    }

    /// `SKIP n`
    pub fn skip(self, count: impl Into<Expression>) -> Self {
        self.clause(Clause::Skip(count.into()))
    }

    /// `LIMIT n`
    pub fn limit(self, count: impl Into<Expression>) -> Self {
        self.clause(Clause::Limit(count.into()))
    }

    /// `UNION`
    pub fn union(self) -> Self {
        self.clause(Clause::Union)
    }

    /// `UNION ALL`
    pub fn union_all(self) -> Self {
        self.clause(Clause::UnionAll)
    }

    /// `CALL { sub }`
    pub fn call(self, sub: Query) -> Self {
        self.clause(Clause::CallSubquery(sub.into_clauses()))
    }

    /// `FOREACH (binding IN source | body)`
    pub fn foreach(self, binding: impl Into<SmolStr>, source: Expression, body: Query) -> Self {
        self.clause(Clause::Foreach {
            binding: binding.into(),
            source,
            body: body.into_clauses(),
        })
    }

    /// `LOAD CSV FROM source AS alias`
    pub fn load_csv(self, source: Expression, alias: impl Into<SmolStr>) -> Self {
        self.clause(Clause::LoadCsv(LoadCsv {
            source,
            alias: alias.into(),
            field_terminator: None,
        }))
    }

    /// `LOAD CSV WITH HEADERS FROM source AS alias`
    pub fn load_csv_with_headers(self, source: Expression, alias: impl Into<SmolStr>) -> Self {
        self.clause(Clause::LoadCsvHeaders(LoadCsv {
            source,
            alias: alias.into(),
            field_terminator: None,
        }))
    }

    /// `CREATE INDEX ...`
    pub fn create_index(self, spec: IndexSpec) -> Self {
        self.clause(Clause::CreateIndex(spec))
    }

    /// `DROP INDEX ...`
    pub fn drop_index(self, spec: IndexSpec) -> Self {
        self.clause(Clause::DropIndex(spec))
    }

    /// `CREATE CONSTRAINT ...`
    pub fn create_constraint(self, spec: ConstraintSpec) -> Self {
        self.clause(Clause::CreateConstraint(spec))
    }

    /// `DROP CONSTRAINT ...`
    pub fn drop_constraint(self, spec: ConstraintSpec) -> Self {
        self.clause(Clause::DropConstraint(spec))
    }

    /// Borrows the accumulated clauses.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Consumes the builder, returning the clause list.
    pub fn into_clauses(self) -> Vec<Clause> {
        self.clauses
    }

    /// Compiles with the default configuration.
    pub fn compile(&self) -> Result<CompiledStatement, CompileError> {
        Compiler::new().compile(&self.clauses)
    }

    /// Compiles with a specific compiler.
    pub fn compile_with(&self, compiler: &Compiler) -> Result<CompiledStatement, CompileError> {
        compiler.compile(&self.clauses)
    }
}

impl From<Query> for Vec<Clause> {
    fn from(query: Query) -> Self {
        query.clauses
    }
}
