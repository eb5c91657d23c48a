//! Structural compile errors with miette diagnostics.
//!
//! Every failure the compiler can produce is a [`CompileError`]: the input
//! tree was malformed, so the error is never retryable. Errors name the
//! offending clause kind and, where one exists, carry a rendered fragment
//! of the input with a labelled span so miette can point at the exact
//! segment or sub-expression.

use crate::ast::ClauseKind;
use miette::{Diagnostic, LabeledSpan, Report, Severity, SourceCode};
use std::fmt;
use std::ops::Range;

/// Byte range inside a diagnostic fragment.
pub type Span = Range<usize>;

/// Category of a structural error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A pattern is missing required parts or has the wrong shape.
    MalformedPattern,
    /// Step operators around a relationship or shared node disagree.
    InconsistentDirection,
    /// An expression node cannot be rendered in its position.
    MalformedExpression,
    /// An identifier is empty or cannot be emitted.
    InvalidIdentifier,
    /// A clause's arguments do not match its contract.
    ClauseShape,
    /// A clause appears where the statement grammar forbids it.
    ClauseOrder,
    /// One parameter name was bound to two different values.
    ParameterConflict,
    /// A nested statement (subquery, FOREACH, EXISTS, comprehension) is malformed.
    MalformedSubquery,
    /// Properties do not satisfy a registered schema.
    SchemaViolation,
}

impl ErrorKind {
    /// Stable diagnostic code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::MalformedPattern => "cypher::malformed_pattern",
            ErrorKind::InconsistentDirection => "cypher::inconsistent_direction",
            ErrorKind::MalformedExpression => "cypher::malformed_expression",
            ErrorKind::InvalidIdentifier => "cypher::invalid_identifier",
            ErrorKind::ClauseShape => "cypher::clause_shape",
            ErrorKind::ClauseOrder => "cypher::clause_order",
            ErrorKind::ParameterConflict => "cypher::parameter_conflict",
            ErrorKind::MalformedSubquery => "cypher::malformed_subquery",
            ErrorKind::SchemaViolation => "cypher::schema_violation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A rendered piece of the input with a labelled span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Rendered text of the offending construct.
    pub text: String,
    /// Span inside `text` the label points at.
    pub span: Span,
    /// Label text.
    pub label: String,
}

/// A structural compilation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    /// Error category.
    pub kind: ErrorKind,
    /// Main message.
    pub message: String,
    /// Innermost clause the error was raised in.
    pub clause: Option<ClauseKind>,
    /// Offending fragment, if one can be rendered.
    pub fragment: Option<Fragment>,
    /// Suggested fix.
    pub help: Option<String>,
    /// Additional context, surfaced as related advice diagnostics.
    pub notes: Vec<Note>,
}

impl CompileError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            clause: None,
            fragment: None,
            help: None,
            notes: Vec::new(),
        }
    }

    pub fn malformed_pattern(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedPattern, message)
    }

    pub fn inconsistent_direction(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InconsistentDirection, message)
    }

    pub fn malformed_expression(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedExpression, message)
    }

    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidIdentifier, message)
    }

    pub fn clause_shape(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ClauseShape, message)
    }

    pub fn clause_order(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ClauseOrder, message)
    }

    pub fn malformed_subquery(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedSubquery, message)
    }

    pub fn schema_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchemaViolation, message)
    }

    /// Records the clause the error occurred in.
    ///
    /// The innermost clause wins: once set, outer clauses do not overwrite it.
    pub fn in_clause(mut self, clause: ClauseKind) -> Self {
        if self.clause.is_none() {
            self.clause = Some(clause);
        }
        self
    }

    /// Attaches a labelled fragment.
    pub fn with_fragment(
        mut self,
        text: impl Into<String>,
        span: Span,
        label: impl Into<String>,
    ) -> Self {
        self.fragment = Some(Fragment {
            text: text.into(),
            span,
            label: label.into(),
        });
        self
    }

    /// Sets the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Adds a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(Note(note.into()));
        self
    }

    /// Converts into a miette report for rendering.
    pub fn to_report(&self) -> Report {
        Report::new(self.clone())
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.clause {
            Some(clause) => write!(f, "{clause}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for CompileError {}

/// A note attached to a [`CompileError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note(pub String);

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Note {}

impl Diagnostic for Note {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Advice)
    }
}

impl Diagnostic for CompileError {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.fragment
            .as_ref()
            .map(|fragment| &fragment.text as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let fragment = self.fragment.as_ref()?;
        let len = fragment.text.len();
        let start = fragment.span.start.min(len);
        let end = fragment.span.end.min(len).max(start);
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some(fragment.label.clone()), (start, end - start)),
        )))
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        if self.notes.is_empty() {
            None
        } else {
            Some(Box::new(self.notes.iter().map(|note| note as &dyn Diagnostic)))
        }
    }
}
