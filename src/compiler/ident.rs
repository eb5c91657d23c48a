//! Identifier emission.

use crate::diag::CompileError;
use crate::lexer::{is_identifier_shape, is_plain_identifier};

/// Renders a variable, label, type, property, or alias name.
///
/// Plain names are emitted as-is. Anything else is backtick-quoted when
/// `quote` is set and rejected otherwise. `what` names the role of the
/// identifier for error messages.
pub fn identifier(name: &str, quote: bool, what: &str) -> Result<String, CompileError> {
    if name.is_empty() {
        return Err(CompileError::invalid_identifier(format!("{what} name is empty")));
    }
    if is_plain_identifier(name) {
        return Ok(name.to_string());
    }
    if quote {
        return Ok(quote_identifier(name));
    }
    Err(CompileError::invalid_identifier(format!(
        "{what} name `{name}` needs quoting"
    ))
    .with_help("enable `quote_identifiers` or use a plain identifier that is not a keyword"))
}

/// Wraps `name` in backticks, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Validates a possibly namespaced function name such as `apoc.coll.sum`.
///
/// Keywords are allowed per segment (`exists`, `count`), but every segment
/// must have identifier shape.
pub fn function_name(name: &str) -> Result<String, CompileError> {
    if name.split('.').all(is_identifier_shape) {
        Ok(name.to_string())
    } else {
        Err(CompileError::invalid_identifier(format!(
            "function name `{name}` is not a valid dotted identifier"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::ErrorKind;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(identifier("person", true, "variable").unwrap(), "person");
    }

    #[test]
    fn keywords_and_odd_names_are_quoted() {
        assert_eq!(identifier("order", true, "property").unwrap(), "`order`");
        assert_eq!(identifier("first name", true, "property").unwrap(), "`first name`");
        assert_eq!(identifier("a`b", true, "label").unwrap(), "`a``b`");
    }

    #[test]
    fn quoting_disabled_rejects() {
        let err = identifier("first name", false, "property").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidIdentifier);
        assert!(err.help.is_some());
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = identifier("", true, "label").unwrap_err();
        assert_eq!(err.message, "label name is empty");
    }

    #[test]
    fn dotted_function_names() {
        assert_eq!(function_name("apoc.coll.sum").unwrap(), "apoc.coll.sum");
        assert_eq!(function_name("exists").unwrap(), "exists");
        assert!(function_name("apoc..sum").is_err());
        assert!(function_name("").is_err());
    }
}
