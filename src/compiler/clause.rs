//! Clause assembly.
//!
//! Clauses render in order and join with single spaces. Consecutive `Set`
//! clauses are buffered and emitted as one `SET a = x, b = y` fragment,
//! flushed before the next non-`Set` clause and at the end of the list.
//! `ON CREATE SET` / `ON MATCH SET` belong to their MERGE and are never
//! merged.

use super::CompilePass;
use super::expression::quote_string;
use super::validate::{Scope, validate_statement};
use crate::ast::{
    Clause, ClauseKind, ConstraintKind, ConstraintSpec, Expression, IndexSpec, LoadCsv, OrderTerm,
    Projection, RemoveItem, SetItem,
};
use crate::diag::CompileError;
use log::debug;
use smol_str::SmolStr;

/// Variable bound in DDL patterns.
const DDL_VARIABLE: &str = "n";

impl CompilePass<'_> {
    /// Validates and renders a clause list.
    pub(crate) fn statement(
        &mut self,
        clauses: &[Clause],
        scope: Scope,
    ) -> Result<String, CompileError> {
        validate_statement(clauses, scope)?;

        let mut parts = Vec::with_capacity(clauses.len());
        let mut pending_set = Vec::new();
        for clause in clauses {
            if let Clause::Set(items) = clause {
                let rendered = self
                    .set_items(items)
                    .map_err(|err| err.in_clause(ClauseKind::Set))?;
                pending_set.extend(rendered);
                continue;
            }
            flush_set(&mut parts, &mut pending_set);
            let text = self
                .clause(clause)
                .map_err(|err| err.in_clause(clause.kind()))?;
            parts.push(text);
        }
        flush_set(&mut parts, &mut pending_set);

        Ok(parts.join(" "))
    }

    fn clause(&mut self, clause: &Clause) -> Result<String, CompileError> {
        let keyword = clause.kind().keyword();
        match clause {
            Clause::Match(patterns)
            | Clause::OptionalMatch(patterns)
            | Clause::Create(patterns) => {
                Ok(format!("{keyword} {}", self.pattern_list(patterns)?))
            }
            Clause::Merge(pattern) => Ok(format!("{keyword} {}", self.pattern(pattern)?)),
            Clause::Where(condition) => Ok(format!("{keyword} {}", self.expression(condition)?)),
            Clause::Return(projection) | Clause::With(projection) => {
                Ok(format!("{keyword} {}", self.projection(projection)?))
            }
            Clause::Unwind { source, alias } => {
                let source = self.expression(source)?;
                let alias = self.ident(alias, "alias")?;
                Ok(format!("{keyword} {source} AS {alias}"))
            }
            Clause::Set(items) | Clause::OnCreateSet(items) | Clause::OnMatchSet(items) => {
                Ok(format!("{keyword} {}", self.set_items(items)?.join(", ")))
            }
            Clause::Remove(items) => {
                let items = items
                    .iter()
                    .map(|item| self.remove_item(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("{keyword} {}", items.join(", ")))
            }
            Clause::Delete(exprs) | Clause::DetachDelete(exprs) => {
                Ok(format!("{keyword} {}", self.expression_list(exprs)?))
            }
            Clause::OrderBy(terms) => Ok(format!("{keyword} {}", self.order_terms(terms)?)),
            Clause::Skip(count) | Clause::Limit(count) => {
                Ok(format!("{keyword} {}", self.expression(count)?))
            }
            Clause::Union | Clause::UnionAll => Ok(keyword.to_string()),
            Clause::CallSubquery(body) => self.call_subquery(body),
            Clause::LoadCsv(load) | Clause::LoadCsvHeaders(load) => self.load_csv(keyword, load),
            Clause::Foreach {
                binding,
                source,
                body,
            } => self.foreach(binding, source, body),
            Clause::CreateIndex(spec) => self.create_index(spec),
            Clause::DropIndex(spec) => self.drop_index(spec),
            Clause::CreateConstraint(spec) => self.create_constraint(spec),
            Clause::DropConstraint(spec) => self.drop_constraint(spec),
        }
    }

    fn projection(&mut self, projection: &Projection) -> Result<String, CompileError> {
        let mut items = Vec::with_capacity(projection.items.len());
        for item in &projection.items {
            let text = match (&item.expr, &item.alias) {
                (Expression::Star, None) => "*".to_string(),
                (Expression::Star, Some(alias)) => {
                    return Err(CompileError::clause_shape(format!(
                        "`*` cannot be aliased as `{alias}`"
                    )));
                }
                (expr, None) => self.expression(expr)?,
                (expr, Some(alias)) => {
                    let expr = self.expression(expr)?;
                    format!("{expr} AS {}", self.ident(alias, "alias")?)
                }
            };
            items.push(text);
        }
        let distinct = if projection.distinct { "DISTINCT " } else { "" };
        Ok(format!("{distinct}{}", items.join(", ")))
    }

    fn set_items(&mut self, items: &[SetItem]) -> Result<Vec<String>, CompileError> {
        items.iter().map(|item| self.set_item(item)).collect()
    }

    fn set_item(&mut self, item: &SetItem) -> Result<String, CompileError> {
        match item {
            SetItem::Property { target, value } => {
                if !matches!(target, Expression::Property(..)) {
                    return Err(CompileError::clause_shape(
                        "assignment target must be a property access",
                    )
                    .with_help("use SetItem::Replace or SetItem::Merge to assign a whole map"));
                }
                let target = self.expression(target)?;
                let value = self.expression(value)?;
                Ok(format!("{target} = {value}"))
            }
            SetItem::Replace { variable, value } => {
                let variable = self.ident(variable, "variable")?;
                Ok(format!("{variable} = {}", self.expression(value)?))
            }
            SetItem::Merge { variable, value } => {
                let variable = self.ident(variable, "variable")?;
                Ok(format!("{variable} += {}", self.expression(value)?))
            }
            SetItem::AddLabel { variable, label } => Ok(format!(
                "{}:{}",
                self.ident(variable, "variable")?,
                self.ident(label, "label")?
            )),
        }
    }

    fn remove_item(&mut self, item: &RemoveItem) -> Result<String, CompileError> {
        match item {
            RemoveItem::Property(target @ Expression::Property(..)) => self.expression(target),
            RemoveItem::Property(_) => Err(CompileError::clause_shape(
                "removed item must be a property access",
            )),
            RemoveItem::Label { variable, label } => Ok(format!(
                "{}:{}",
                self.ident(variable, "variable")?,
                self.ident(label, "label")?
            )),
        }
    }

    fn order_terms(&mut self, terms: &[OrderTerm]) -> Result<String, CompileError> {
        let mut keys: Vec<String> = Vec::new();
        for term in terms {
            let marker = match term {
                OrderTerm::Key(expr) => {
                    keys.push(self.expression(expr)?);
                    continue;
                }
                OrderTerm::Ascending => " ASC",
                OrderTerm::Descending => " DESC",
            };
            match keys.last_mut() {
                Some(key) => key.push_str(marker),
                None => return Err(CompileError::clause_shape("direction without a sort key")),
            }
        }
        Ok(keys.join(", "))
    }

    fn load_csv(&mut self, keyword: &str, load: &LoadCsv) -> Result<String, CompileError> {
        let source = self.expression(&load.source)?;
        let alias = self.ident(&load.alias, "alias")?;
        let mut text = format!("{keyword} FROM {source} AS {alias}");
        if let Some(terminator) = load.field_terminator {
            text.push_str(" FIELDTERMINATOR ");
            text.push_str(&quote_string(&terminator.to_string()));
        }
        Ok(text)
    }

    // ========================================================================
    // Schema DDL
    // ========================================================================

    fn ddl_target(&self, label: &str) -> Result<String, CompileError> {
        Ok(format!("({DDL_VARIABLE}:{})", self.ident(label, "label")?))
    }

    fn ddl_properties(&self, properties: &[SmolStr]) -> Result<Vec<String>, CompileError> {
        properties
            .iter()
            .map(|property| {
                self.ident(property, "property")
                    .map(|name| format!("{DDL_VARIABLE}.{name}"))
            })
            .collect()
    }

    fn constraint_predicate(&self, spec: &ConstraintSpec) -> Result<String, CompileError> {
        let properties = self.ddl_properties(&spec.properties)?;
        let subject = match properties.as_slice() {
            [single] => single.clone(),
            many => format!("({})", many.join(", ")),
        };
        let predicate = match spec.kind {
            ConstraintKind::Unique => "IS UNIQUE",
            ConstraintKind::NotNull => "IS NOT NULL",
        };
        Ok(format!("{subject} {predicate}"))
    }

    fn create_index(&self, spec: &IndexSpec) -> Result<String, CompileError> {
        let mut text = String::from("CREATE INDEX");
        if let Some(name) = &spec.name {
            text.push(' ');
            text.push_str(&self.ident(name, "index")?);
        }
        if spec.idempotent {
            text.push_str(" IF NOT EXISTS");
        }
        let target = self.ddl_target(&spec.label)?;
        let properties = self.ddl_properties(&spec.properties)?;
        text.push_str(&format!(" FOR {target} ON ({})", properties.join(", ")));
        Ok(text)
    }

    fn drop_index(&self, spec: &IndexSpec) -> Result<String, CompileError> {
        match &spec.name {
            Some(name) => {
                let exists = if spec.idempotent { " IF EXISTS" } else { "" };
                Ok(format!("DROP INDEX {}{exists}", self.ident(name, "index")?))
            }
            None => {
                reject_unnamed_idempotent(spec.idempotent, "index")?;
                let label = self.ident(&spec.label, "label")?;
                let properties = spec
                    .properties
                    .iter()
                    .map(|property| self.ident(property, "property"))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("DROP INDEX ON :{label}({})", properties.join(", ")))
            }
        }
    }

    fn create_constraint(&self, spec: &ConstraintSpec) -> Result<String, CompileError> {
        let mut text = String::from("CREATE CONSTRAINT");
        if let Some(name) = &spec.name {
            text.push(' ');
            text.push_str(&self.ident(name, "constraint")?);
        }
        if spec.idempotent {
            text.push_str(" IF NOT EXISTS");
        }
        let target = self.ddl_target(&spec.label)?;
        let predicate = self.constraint_predicate(spec)?;
        text.push_str(&format!(" FOR {target} REQUIRE {predicate}"));
        Ok(text)
    }

    fn drop_constraint(&self, spec: &ConstraintSpec) -> Result<String, CompileError> {
        match &spec.name {
            Some(name) => {
                let exists = if spec.idempotent { " IF EXISTS" } else { "" };
                Ok(format!("DROP CONSTRAINT {}{exists}", self.ident(name, "constraint")?))
            }
            None => {
                reject_unnamed_idempotent(spec.idempotent, "constraint")?;
                let target = self.ddl_target(&spec.label)?;
                let predicate = self.constraint_predicate(spec)?;
                Ok(format!("DROP CONSTRAINT ON {target} ASSERT {predicate}"))
            }
        }
    }
}

fn flush_set(parts: &mut Vec<String>, pending: &mut Vec<String>) {
    if pending.is_empty() {
        return;
    }
    if pending.len() > 1 {
        debug!("merging {} assignments into one SET clause", pending.len());
    }
    parts.push(format!("SET {}", pending.join(", ")));
    pending.clear();
}

fn reject_unnamed_idempotent(idempotent: bool, what: &str) -> Result<(), CompileError> {
    if idempotent {
        Err(CompileError::clause_shape(format!(
            "dropping an unnamed {what} cannot be made idempotent"
        ))
        .with_help(format!("give the {what} a name to use IF EXISTS")))
    } else {
        Ok(())
    }
}
