//! Expression IR nodes.
//!
//! This module defines the closed expression tree the compiler lowers:
//! - Literals, variables, property access, and parameter references
//! - Unary and binary operators (comparison, logical, arithmetic, string)
//! - Function calls, CASE, list and map constructors
//! - Subquery and pattern predicates (EXISTS, pattern predicates, label tests)
//!
//! Expressions are normally built with the helpers in
//! [`crate::ast::builder`] and the fluent methods defined here.

use crate::ast::clause::{Clause, ProjectionItem};
use crate::ast::pattern::Pattern;
use crate::value::Value;
use smol_str::SmolStr;

// ============================================================================
// Expression - Top-level expression type
// ============================================================================

/// Any expression accepted by the compiler.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Inline literal rendered directly into the statement text.
    Literal(Literal),

    /// Variable reference.
    Variable(SmolStr),

    /// Property access (`owner.name`).
    Property(Box<Expression>, SmolStr),

    /// Named parameter (`$name`) with its captured value.
    Parameter { name: SmolStr, value: Value },

    /// Anonymous captured value, bound to an auto-numbered parameter.
    Bound(Value),

    /// Unary operator application.
    Unary(UnaryOperator, Box<Expression>),

    /// Binary operator application.
    Binary(BinaryOperator, Box<Expression>, Box<Expression>),

    /// Function call, rendered generically as `name(args)`.
    FunctionCall(FunctionCall),

    /// CASE expression (simple or searched).
    Case(CaseExpression),

    /// List constructor `[a, b, ...]`.
    List(Vec<Expression>),

    /// Map constructor `{key: value, ...}`.
    Map(Vec<(SmolStr, Expression)>),

    /// Label predicate `variable:Label`.
    HasLabel(SmolStr, SmolStr),

    /// Pattern predicate, e.g. `(a)-[:KNOWS]->(b)` inside WHERE.
    PatternPredicate(Box<Pattern>),

    /// Existential subquery `EXISTS { ... }`.
    Exists(Vec<Clause>),

    /// `*`, valid only as a function argument or projection item.
    Star,
}

// ============================================================================
// Literals
// ============================================================================

/// Literal values rendered inline.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean(bool),
    /// Integer literal.
    Integer(i64),
    /// Float literal; must be finite.
    Float(f64),
    /// String literal, escaped on output.
    String(String),
    /// List of literals.
    List(Vec<Literal>),
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Boolean(v)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Literal::Integer(i64::from(v))
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Integer(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::String(v.to_string())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::String(v)
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(v: Vec<T>) -> Self {
        Literal::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Expression::Literal(literal)
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Logical NOT; the operand is always parenthesized.
    Not,
    /// Arithmetic negation (`-x`).
    Minus,
    /// Postfix `IS NULL`.
    IsNull,
    /// Postfix `IS NOT NULL`.
    IsNotNull,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `=`
    Eq,
    /// `<>`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `XOR`
    Xor,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
    /// `^`
    Power,
    /// `STARTS WITH`
    StartsWith,
    /// `ENDS WITH`
    EndsWith,
    /// `CONTAINS`
    Contains,
    /// `IN`
    In,
    /// `=~`
    RegexMatch,
}

impl BinaryOperator {
    /// Target-syntax spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
            BinaryOperator::Xor => "XOR",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Power => "^",
            BinaryOperator::StartsWith => "STARTS WITH",
            BinaryOperator::EndsWith => "ENDS WITH",
            BinaryOperator::Contains => "CONTAINS",
            BinaryOperator::In => "IN",
            BinaryOperator::RegexMatch => "=~",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::Xor => 2,
            BinaryOperator::And => 3,
            BinaryOperator::Eq
            | BinaryOperator::NotEq
            | BinaryOperator::Lt
            | BinaryOperator::LtEq
            | BinaryOperator::Gt
            | BinaryOperator::GtEq => 5,
            BinaryOperator::StartsWith
            | BinaryOperator::EndsWith
            | BinaryOperator::Contains
            | BinaryOperator::In
            | BinaryOperator::RegexMatch => 6,
            BinaryOperator::Add | BinaryOperator::Subtract => 7,
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => 8,
            BinaryOperator::Power => 9,
        }
    }

    /// Whether `a op (b op c)` may drop its parentheses.
    ///
    /// Only the logical connectives qualify. `+` doubles as string and list
    /// concatenation, so `'x' + (1 + 2)` and `'x' + 1 + 2` differ, and float
    /// `*` is not associative under rounding.
    pub fn is_associative(self) -> bool {
        matches!(
            self,
            BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Xor
        )
    }
}

// ============================================================================
// Function calls and CASE
// ============================================================================

/// A function call such as `count(DISTINCT n)` or `apoc.coll.sum(xs)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Function name, optionally namespaced with dots.
    pub name: SmolStr,
    /// Whether the arguments are prefixed with DISTINCT.
    pub distinct: bool,
    /// Arguments.
    pub args: Vec<Expression>,
}

/// A CASE expression.
///
/// With an operand it is a simple CASE (`CASE x WHEN 1 THEN ...`), without
/// one it is a searched CASE (`CASE WHEN x > 1 THEN ...`).
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpression {
    /// Operand for simple CASE.
    pub operand: Option<Box<Expression>>,
    /// WHEN/THEN pairs; at least one is required.
    pub branches: Vec<(Expression, Expression)>,
    /// ELSE result.
    pub default: Option<Box<Expression>>,
}

impl CaseExpression {
    /// Starts a searched CASE.
    pub fn searched() -> Self {
        Self {
            operand: None,
            branches: Vec::new(),
            default: None,
        }
    }

    /// Starts a simple CASE on `operand`.
    pub fn simple(operand: Expression) -> Self {
        Self {
            operand: Some(Box::new(operand)),
            branches: Vec::new(),
            default: None,
        }
    }

    /// Adds a WHEN/THEN branch.
    pub fn when(mut self, condition: Expression, result: Expression) -> Self {
        self.branches.push((condition, result));
        self
    }

    /// Sets the ELSE result.
    pub fn otherwise(mut self, result: Expression) -> Self {
        self.default = Some(Box::new(result));
        self
    }
}

impl From<CaseExpression> for Expression {
    fn from(case: CaseExpression) -> Self {
        Expression::Case(case)
    }
}

// ============================================================================
// Fluent construction
// ============================================================================

impl Expression {
    fn binary(self, op: BinaryOperator, rhs: impl Into<Expression>) -> Expression {
        Expression::Binary(op, Box::new(self), Box::new(rhs.into()))
    }

    /// Property access on this expression.
    pub fn dot(self, name: impl Into<SmolStr>) -> Expression {
        Expression::Property(Box::new(self), name.into())
    }

    /// `self = rhs`
    pub fn eq(self, rhs: impl Into<Expression>) -> Expression {
        self.binary(BinaryOperator::Eq, rhs)
    }

    /// `self <> rhs`
    pub fn not_eq(self, rhs: impl Into<Expression>) -> Expression {
        self.binary(BinaryOperator::NotEq, rhs)
    }

    /// `self < rhs`
    pub fn lt(self, rhs: impl Into<Expression>) -> Expression {
        self.binary(BinaryOperator::Lt, rhs)
    }

    /// `self <= rhs`
    pub fn lt_eq(self, rhs: impl Into<Expression>) -> Expression {
        self.binary(BinaryOperator::LtEq, rhs)
    }

    /// `self > rhs`
    pub fn gt(self, rhs: impl Into<Expression>) -> Expression {
        self.binary(BinaryOperator::Gt, rhs)
    }

    /// `self >= rhs`
    pub fn gt_eq(self, rhs: impl Into<Expression>) -> Expression {
        self.binary(BinaryOperator::GtEq, rhs)
    }

    /// `self AND rhs`
    pub fn and(self, rhs: impl Into<Expression>) -> Expression {
        self.binary(BinaryOperator::And, rhs)
    }

    /// `self OR rhs`
    pub fn or(self, rhs: impl Into<Expression>) -> Expression {
        self.binary(BinaryOperator::Or, rhs)
    }

    /// `self XOR rhs`
    pub fn xor(self, rhs: impl Into<Expression>) -> Expression {
        self.binary(BinaryOperator::Xor, rhs)
    }

    /// `self ^ rhs`
    pub fn pow(self, rhs: impl Into<Expression>) -> Expression {
        self.binary(BinaryOperator::Power, rhs)
    }

    /// `self STARTS WITH rhs`
    pub fn starts_with(self, rhs: impl Into<Expression>) -> Expression {
        self.binary(BinaryOperator::StartsWith, rhs)
    }

    /// `self ENDS WITH rhs`
    pub fn ends_with(self, rhs: impl Into<Expression>) -> Expression {
        self.binary(BinaryOperator::EndsWith, rhs)
    }

    /// `self CONTAINS rhs`
    pub fn contains(self, rhs: impl Into<Expression>) -> Expression {
        self.binary(BinaryOperator::Contains, rhs)
    }

    /// `self IN rhs`
    pub fn in_list(self, rhs: impl Into<Expression>) -> Expression {
        self.binary(BinaryOperator::In, rhs)
    }

    /// `self =~ rhs`
    pub fn matches_regex(self, rhs: impl Into<Expression>) -> Expression {
        self.binary(BinaryOperator::RegexMatch, rhs)
    }

    /// `self IS NULL`
    pub fn is_null(self) -> Expression {
        Expression::Unary(UnaryOperator::IsNull, Box::new(self))
    }

    /// `self IS NOT NULL`
    pub fn is_not_null(self) -> Expression {
        Expression::Unary(UnaryOperator::IsNotNull, Box::new(self))
    }

    /// Projects this expression under `alias`.
    pub fn alias(self, alias: impl Into<SmolStr>) -> ProjectionItem {
        ProjectionItem {
            expr: self,
            alias: Some(alias.into()),
        }
    }

    /// Returns true for the postfix null checks.
    pub fn is_null_check(&self) -> bool {
        matches!(
            self,
            Expression::Unary(UnaryOperator::IsNull | UnaryOperator::IsNotNull, _)
        )
    }
}

impl std::ops::Not for Expression {
    type Output = Expression;

    fn not(self) -> Expression {
        Expression::Unary(UnaryOperator::Not, Box::new(self))
    }
}

impl std::ops::Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        Expression::Unary(UnaryOperator::Minus, Box::new(self))
    }
}

macro_rules! arithmetic_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl std::ops::$trait for Expression {
            type Output = Expression;

            fn $method(self, rhs: Expression) -> Expression {
                self.binary($op, rhs)
            }
        }
    };
}

arithmetic_operator!(Add, add, BinaryOperator::Add);
arithmetic_operator!(Sub, sub, BinaryOperator::Subtract);
arithmetic_operator!(Mul, mul, BinaryOperator::Multiply);
arithmetic_operator!(Div, div, BinaryOperator::Divide);
arithmetic_operator!(Rem, rem, BinaryOperator::Modulo);
