//! Pass-scoped parameter registry.
//!
//! Every parameter reference met during one compilation pass is registered
//! here, in first-seen order. Named parameters keep the caller's name and
//! deduplicate on it; anonymous bound values get generated names `p0`,
//! `p1`, ... that never collide with a named parameter. Names reserved up
//! front are skipped too, so a caller name that appears after a bound value
//! in rendering order still keeps its own placeholder.

use crate::diag::{CompileError, ErrorKind};
use crate::lexer::is_identifier_shape;
use crate::value::Value;
use indexmap::IndexMap;
use log::trace;
use smol_str::SmolStr;
use std::collections::HashSet;

/// Insertion-ordered, deduplicating map from parameter name to bound value.
#[derive(Debug, Default)]
pub struct ParameterRegistry {
    bindings: IndexMap<String, Value>,
    generated: HashSet<String>,
    reserved: HashSet<SmolStr>,
    next_anonymous: usize,
}

impl ParameterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps `names` out of the generated name sequence.
    pub fn reserve(&mut self, names: impl IntoIterator<Item = SmolStr>) {
        self.reserved.extend(names);
    }

    /// Registers a named parameter and returns its placeholder (`$name`).
    ///
    /// Registering a name again with an identical value (see
    /// [`Value::is_same_as`]) returns the same placeholder without adding a
    /// binding. A different value is a conflict, and so is a name already
    /// handed out to an anonymous value when it was not reserved first.
    pub fn register(&mut self, name: &str, value: &Value) -> Result<String, CompileError> {
        if !is_identifier_shape(name) {
            return Err(CompileError::invalid_identifier(format!(
                "parameter name `{name}` is not a valid identifier"
            ))
            .with_help("use letters, digits, and `_`, starting with a letter or `_`"));
        }

        match self.bindings.get(name) {
            Some(_) if self.generated.contains(name) => Err(CompileError::new(
                ErrorKind::ParameterConflict,
                format!("parameter name `{name}` is already used by an anonymous value"),
            )
            .with_help(
                "rename the parameter; names of the form `p<N>` are generated for bound values",
            )),
            Some(existing) if existing.is_same_as(value) => {
                trace!("parameter ${name} reused");
                Ok(placeholder(name))
            }
            Some(existing) => Err(CompileError::new(
                ErrorKind::ParameterConflict,
                format!("parameter `{name}` is bound to two different values"),
            )
            .with_note(format!("first bound to {existing:?}"))
            .with_note(format!("then bound to {value:?}"))),
            None => {
                trace!("parameter ${name} registered");
                self.bindings.insert(name.to_string(), value.clone());
                Ok(placeholder(name))
            }
        }
    }

    /// Registers an anonymous value under the next free generated name.
    pub fn register_anonymous(&mut self, value: &Value) -> String {
        let name = loop {
            let candidate = format!("p{}", self.next_anonymous);
            self.next_anonymous += 1;
            if !self.bindings.contains_key(&candidate)
                && !self.reserved.contains(candidate.as_str())
            {
                break candidate;
            }
        };
        trace!("anonymous parameter ${name} registered");
        let token = placeholder(&name);
        self.generated.insert(name.clone());
        self.bindings.insert(name, value.clone());
        token
    }

    /// Number of distinct bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns true if `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Consumes the registry and returns the bindings in registration order.
    pub fn finalize(self) -> IndexMap<String, Value> {
        self.bindings
    }
}

fn placeholder(name: &str) -> String {
    format!("${name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_name_is_deduplicated() {
        let mut registry = ParameterRegistry::new();
        let first = registry.register("min_age", &Value::Integer(30)).unwrap();
        let second = registry.register("min_age", &Value::Integer(30)).unwrap();
        assert_eq!(first, "$min_age");
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn conflicting_values_are_rejected() {
        let mut registry = ParameterRegistry::new();
        registry.register("x", &Value::Integer(1)).unwrap();
        let err = registry.register("x", &Value::Integer(2)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParameterConflict);
        assert_eq!(err.notes.len(), 2);
    }

    #[test]
    fn anonymous_names_skip_taken_names() {
        let mut registry = ParameterRegistry::new();
        registry.register("p0", &Value::from("named")).unwrap();
        assert_eq!(registry.register_anonymous(&Value::Integer(1)), "$p1");
        assert_eq!(registry.register_anonymous(&Value::Integer(1)), "$p2");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn nan_values_deduplicate() {
        let mut registry = ParameterRegistry::new();
        let first = registry.register("v", &Value::Float(f64::NAN)).unwrap();
        let second = registry.register("v", &Value::Float(f64::NAN)).unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn anonymous_names_skip_reserved_names() {
        let mut registry = ParameterRegistry::new();
        registry.reserve([SmolStr::new("p0"), SmolStr::new("p2")]);
        assert_eq!(registry.register_anonymous(&Value::Integer(1)), "$p1");
        assert_eq!(registry.register("p0", &Value::Integer(5)).unwrap(), "$p0");
        assert_eq!(registry.register_anonymous(&Value::Integer(2)), "$p3");
        let names: Vec<_> = registry.finalize().into_keys().collect();
        assert_eq!(names, vec!["p1", "p0", "p3"]);
    }

    #[test]
    fn named_after_unreserved_generated_name_conflicts() {
        let mut registry = ParameterRegistry::new();
        registry.register_anonymous(&Value::Integer(7));
        let err = registry.register("p0", &Value::Integer(7)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParameterConflict);
        assert!(err.help.is_some());
    }

    #[test]
    fn invalid_names_are_rejected() {
        let mut registry = ParameterRegistry::new();
        for name in ["", "1st", "has space", "a-b"] {
            let err = registry.register(name, &Value::Null).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidIdentifier, "{name}");
        }
    }

    #[test]
    fn finalize_preserves_registration_order() {
        let mut registry = ParameterRegistry::new();
        registry.register("b", &Value::Integer(2)).unwrap();
        registry.register("a", &Value::Integer(1)).unwrap();
        registry.register_anonymous(&Value::Bool(true));
        let names: Vec<_> = registry.finalize().into_keys().collect();
        assert_eq!(names, vec!["b", "a", "p0"]);
    }
}
