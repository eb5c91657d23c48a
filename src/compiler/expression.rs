//! Expression rendering.
//!
//! Expressions render with minimal parentheses derived from operator
//! precedence, with three deliberate exceptions that keep the output
//! unambiguous to a reader:
//! - an OR operand of any operator is always parenthesized
//! - comparison and predicate operands of equal precedence are parenthesized
//!   on both sides (`a = b = c` means something else in Cypher)
//! - `NOT` always parenthesizes its operand

use super::CompilePass;
use super::ident;
use crate::ast::expression::{
    BinaryOperator, CaseExpression, Expression, FunctionCall, Literal, UnaryOperator,
};
use crate::ast::pattern::Pattern;
use crate::diag::CompileError;

// Precedence levels. Binary operators use `BinaryOperator::precedence`.
const NOT: u8 = 4;
const COMPARISON: u8 = 5;
const PREDICATE: u8 = 6;
const UNARY: u8 = 10;
const ATOM: u8 = 11;

/// Quotes a string literal: backslashes are escaped first, then single
/// quotes, then the result is wrapped in single quotes.
pub fn quote_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

impl CompilePass<'_> {
    /// Renders an expression, registering any parameters it references.
    pub(crate) fn expression(&mut self, expr: &Expression) -> Result<String, CompileError> {
        self.render(expr).map(|(text, _)| text)
    }

    /// Renders a comma-separated expression list.
    pub(crate) fn expression_list(&mut self, exprs: &[Expression]) -> Result<String, CompileError> {
        let parts = exprs
            .iter()
            .map(|expr| self.expression(expr))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(", "))
    }

    /// Renders an inline property map: `{key: expr, ...}`.
    pub(crate) fn property_map(
        &mut self,
        entries: &[(smol_str::SmolStr, Expression)],
    ) -> Result<String, CompileError> {
        let mut parts = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let key = self.ident(key, "map key")?;
            let value = self.expression(value)?;
            parts.push(format!("{key}: {value}"));
        }
        Ok(format!("{{{}}}", parts.join(", ")))
    }

    /// Returns the rendered text and its precedence level.
    fn render(&mut self, expr: &Expression) -> Result<(String, u8), CompileError> {
        match expr {
            Expression::Literal(literal) => render_literal(literal),
            Expression::Variable(name) => Ok((self.ident(name, "variable")?, ATOM)),
            Expression::Property(owner, name) => Ok((self.property(owner, name)?, ATOM)),
            Expression::Parameter { name, value } => Ok((self.params.register(name, value)?, ATOM)),
            Expression::Bound(value) => Ok((self.params.register_anonymous(value), ATOM)),
            Expression::Unary(op, operand) => self.unary(*op, operand),
            Expression::Binary(op, lhs, rhs) => self.binary(*op, lhs, rhs),
            Expression::FunctionCall(call) => Ok((self.function_call(call)?, ATOM)),
            Expression::Case(case) => Ok((self.case(case)?, ATOM)),
            Expression::List(items) => Ok((format!("[{}]", self.expression_list(items)?), ATOM)),
            Expression::Map(entries) => Ok((self.property_map(entries)?, ATOM)),
            Expression::HasLabel(variable, label) => {
                let variable = self.ident(variable, "variable")?;
                let label = self.ident(label, "label")?;
                Ok((format!("{variable}:{label}"), UNARY))
            }
            Expression::PatternPredicate(pattern) => {
                if let Pattern::Path { name, .. } = pattern.as_ref() {
                    return Err(CompileError::malformed_expression(format!(
                        "named path `{name}` cannot be used as a predicate"
                    )));
                }
                Ok((self.pattern(pattern)?, ATOM))
            }
            Expression::Exists(body) => Ok((self.exists_block(body)?, ATOM)),
            Expression::Star => Err(CompileError::malformed_expression(
                "`*` is only valid as a function argument or projection item",
            )),
        }
    }

    fn property(&mut self, owner: &Expression, name: &str) -> Result<String, CompileError> {
        if matches!(owner, Expression::Star) {
            return Err(CompileError::malformed_expression(
                "cannot access a property of `*`",
            ));
        }
        let (owner_text, owner_prec) = self.render(owner)?;
        if name.is_empty() {
            return Err(CompileError::malformed_expression(format!(
                "property access on `{owner_text}` is missing a property name"
            )));
        }
        let owner_text = parenthesize_if(owner_text, owner_prec < ATOM);
        let name = self.ident(name, "property")?;
        Ok(format!("{owner_text}.{name}"))
    }

    fn unary(
        &mut self,
        op: UnaryOperator,
        operand: &Expression,
    ) -> Result<(String, u8), CompileError> {
        let (inner, inner_prec) = self.render(operand)?;
        Ok(match op {
            UnaryOperator::Not => (format!("NOT ({inner})"), NOT),
            UnaryOperator::Minus => (
                format!("-{}", parenthesize_if(inner, inner_prec < ATOM)),
                UNARY,
            ),
            UnaryOperator::IsNull => (
                format!("{} IS NULL", parenthesize_if(inner, inner_prec <= PREDICATE)),
                PREDICATE,
            ),
            UnaryOperator::IsNotNull => (
                format!("{} IS NOT NULL", parenthesize_if(inner, inner_prec <= PREDICATE)),
                PREDICATE,
            ),
        })
    }

    fn binary(
        &mut self,
        op: BinaryOperator,
        lhs: &Expression,
        rhs: &Expression,
    ) -> Result<(String, u8), CompileError> {
        let (left, left_prec) = self.render(lhs)?;
        let (right, right_prec) = self.render(rhs)?;

        let left = parenthesize_if(left, operand_needs_parens(op, lhs, left_prec, false));
        let right = parenthesize_if(right, operand_needs_parens(op, rhs, right_prec, true));

        Ok((format!("{left} {} {right}", op.symbol()), op.precedence()))
    }

    fn function_call(&mut self, call: &FunctionCall) -> Result<String, CompileError> {
        let name = ident::function_name(&call.name)?;
        if call.distinct && call.args.is_empty() {
            return Err(CompileError::malformed_expression(format!(
                "`{name}(DISTINCT)` needs an argument"
            )));
        }

        let args = match call.args.as_slice() {
            [Expression::Star] if !call.distinct => "*".to_string(),
            args => self.expression_list(args)?,
        };
        let distinct = if call.distinct { "DISTINCT " } else { "" };
        Ok(format!("{name}({distinct}{args})"))
    }

    fn case(&mut self, case: &CaseExpression) -> Result<String, CompileError> {
        if case.branches.is_empty() {
            return Err(CompileError::malformed_expression(
                "CASE needs at least one WHEN branch",
            ));
        }

        let mut text = String::from("CASE");
        if let Some(operand) = &case.operand {
            text.push(' ');
            text.push_str(&self.expression(operand)?);
        }
        for (condition, result) in &case.branches {
            let condition = self.expression(condition)?;
            let result = self.expression(result)?;
            text.push_str(&format!(" WHEN {condition} THEN {result}"));
        }
        if let Some(default) = &case.default {
            text.push_str(&format!(" ELSE {}", self.expression(default)?));
        }
        text.push_str(" END");
        Ok(text)
    }
}

fn operand_needs_parens(
    op: BinaryOperator,
    operand: &Expression,
    operand_prec: u8,
    is_right: bool,
) -> bool {
    if matches!(operand, Expression::Binary(BinaryOperator::Or, _, _)) {
        return true;
    }
    let prec = op.precedence();
    if operand_prec != prec {
        return operand_prec < prec;
    }
    if prec == COMPARISON || prec == PREDICATE {
        return true;
    }
    if !is_right {
        return false;
    }
    let same_op = matches!(operand, Expression::Binary(inner, _, _) if *inner == op);
    !(same_op && op.is_associative())
}

fn parenthesize_if(text: String, wrap: bool) -> String {
    if wrap { format!("({text})") } else { text }
}

fn render_literal(literal: &Literal) -> Result<(String, u8), CompileError> {
    match literal {
        Literal::Null => Ok(("null".to_string(), ATOM)),
        Literal::Boolean(value) => Ok((value.to_string(), ATOM)),
        Literal::Integer(value) => {
            let prec = if *value < 0 { UNARY } else { ATOM };
            Ok((value.to_string(), prec))
        }
        Literal::Float(value) => {
            if !value.is_finite() {
                return Err(CompileError::malformed_expression(format!(
                    "float literal `{value}` is not finite"
                ))
                .with_help("bind non-finite values as parameters instead"));
            }
            let prec = if value.is_sign_negative() { UNARY } else { ATOM };
            Ok((format!("{value:?}"), prec))
        }
        Literal::String(value) => Ok((quote_string(value), ATOM)),
        Literal::List(items) => {
            let parts = items
                .iter()
                .map(|item| render_literal(item).map(|(text, _)| text))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((format!("[{}]", parts.join(", ")), ATOM))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::{
        bound, call, call_distinct, count_star, lit, map, null, param, prop, var,
    };
    use crate::compiler::CompileConfig;
    use crate::diag::ErrorKind;

    fn render(expr: Expression) -> Result<String, CompileError> {
        let config = CompileConfig::default();
        let mut pass = CompilePass::new(&config);
        pass.expression(&expr)
    }

    #[test]
    fn comparison_with_parameter() {
        let expr = prop("p", "age").gt(param("min_age", 30));
        assert_eq!(render(expr).unwrap(), "p.age > $min_age");
    }

    #[test]
    fn or_is_parenthesized_as_operand() {
        let expr = var("a").or(var("b")).and(var("c"));
        assert_eq!(render(expr).unwrap(), "(a OR b) AND c");

        let top = var("a").or(var("b"));
        assert_eq!(render(top).unwrap(), "a OR b");

        let nested = var("a").and(var("b")).or(var("c"));
        assert_eq!(render(nested).unwrap(), "a AND b OR c");
    }

    #[test]
    fn not_parenthesizes_operand() {
        assert_eq!(render(!var("a").eq(lit(1))).unwrap(), "NOT (a = 1)");
        assert_eq!(render(!var("flag")).unwrap(), "NOT (flag)");
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(render((var("a") + var("b")) * var("c")).unwrap(), "(a + b) * c");
        assert_eq!(render(var("a") + var("b") * var("c")).unwrap(), "a + b * c");
        assert_eq!(render(var("a") - (var("b") - var("c"))).unwrap(), "a - (b - c)");
        assert_eq!(render(var("a") + (var("b") + var("c"))).unwrap(), "a + (b + c)");
        assert_eq!(render((var("a") + var("b")) + var("c")).unwrap(), "a + b + c");
        assert_eq!(render((var("a") - var("b")) - var("c")).unwrap(), "a - b - c");
    }

    #[test]
    fn chained_comparisons_are_parenthesized() {
        let expr = var("a").eq(var("b").eq(var("c")));
        assert_eq!(render(expr).unwrap(), "a = (b = c)");
    }

    #[test]
    fn unary_minus_and_null_checks() {
        assert_eq!(render(-var("x")).unwrap(), "-x");
        assert_eq!(render(-(var("a") + var("b"))).unwrap(), "-(a + b)");
        assert_eq!(render(prop("n", "x").is_null()).unwrap(), "n.x IS NULL");
        assert_eq!(
            render((var("a") + var("b")).is_not_null()).unwrap(),
            "(a + b) IS NOT NULL"
        );
    }

    #[test]
    fn string_predicates() {
        let expr = prop("n", "name")
            .starts_with(lit("A"))
            .and(prop("n", "tags").contains(lit("x")));
        assert_eq!(
            render(expr).unwrap(),
            "n.name STARTS WITH 'A' AND n.tags CONTAINS 'x'"
        );
        let expr = var("x").in_list(crate::ast::builder::list([lit(1), lit(2)]));
        assert_eq!(render(expr).unwrap(), "x IN [1, 2]");
    }

    #[test]
    fn literals() {
        assert_eq!(render(null()).unwrap(), "null");
        assert_eq!(render(lit(true)).unwrap(), "true");
        assert_eq!(render(lit(2.5)).unwrap(), "2.5");
        assert_eq!(render(lit(1.0)).unwrap(), "1.0");
        assert_eq!(render(lit(vec![1_i64, 2, 3])).unwrap(), "[1, 2, 3]");
        assert_eq!(render(lit("it's a \\ test")).unwrap(), r"'it\'s a \\ test'");
    }

    #[test]
    fn non_finite_float_is_rejected() {
        let err = render(lit(f64::NAN)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedExpression);
        assert!(render(lit(f64::INFINITY)).is_err());
    }

    #[test]
    fn function_calls() {
        assert_eq!(render(count_star()).unwrap(), "count(*)");
        assert_eq!(render(call_distinct("count", [var("n")])).unwrap(), "count(DISTINCT n)");
        assert_eq!(
            render(call("apoc.coll.sum", [var("xs")])).unwrap(),
            "apoc.coll.sum(xs)"
        );
        assert_eq!(render(call("timestamp", std::iter::empty())).unwrap(), "timestamp()");
    }

    #[test]
    fn star_outside_call_is_rejected() {
        let err = render(Expression::Star).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedExpression);
        let err = render(call("f", [Expression::Star, var("x")])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedExpression);
    }

    #[test]
    fn missing_property_name_is_rejected() {
        let err = render(prop("n", "")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedExpression);
        assert!(err.message.contains("`n`"));
    }

    #[test]
    fn case_and_map() {
        let case = CaseExpression::searched()
            .when(var("x").gt(lit(1)), lit("big"))
            .otherwise(lit("small"));
        assert_eq!(
            render(case.into()).unwrap(),
            "CASE WHEN x > 1 THEN 'big' ELSE 'small' END"
        );

        let simple = CaseExpression::simple(var("x")).when(lit(1), lit("one"));
        assert_eq!(render(simple.into()).unwrap(), "CASE x WHEN 1 THEN 'one' END");

        let err = render(CaseExpression::searched().into()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedExpression);

        assert_eq!(
            render(map([("name", var("a")), ("age", lit(3))])).unwrap(),
            "{name: a, age: 3}"
        );
    }

    #[test]
    fn anonymous_values_are_numbered() {
        let config = CompileConfig::default();
        let mut pass = CompilePass::new(&config);
        let text = pass
            .expression(&var("a").eq(bound(1)).and(var("b").eq(bound("x"))))
            .unwrap();
        assert_eq!(text, "a = $p0 AND b = $p1");
        assert_eq!(pass.finish().len(), 2);
    }

    #[test]
    fn keyword_property_is_quoted() {
        assert_eq!(render(prop("n", "order")).unwrap(), "n.`order`");
    }
}
