//! Predicate Compiler: filter spec to one boolean expression.

use super::clause::{FilterClause, FilterSpec};
use super::operator::{BooleanMode, OperatorKind};
use crate::error::QueryError;
use crate::schema::TableSchema;
use crate::sql::expr::{col, param, BinaryOperator, Expr, ExprExt, Literal};

/// Escape character for patterns built by CONTAINS / STARTSWITH / ENDSWITH.
pub const LIKE_ESCAPE: char = '/';

/// Compile `spec` against `schema`, joining clauses with `mode`.
///
/// Clauses are folded left in input order. Returns `None` for an empty
/// clause list.
pub fn compile(
    schema: &TableSchema,
    spec: &FilterSpec,
    mode: BooleanMode,
) -> Result<Option<Expr>, QueryError> {
    let connective = match mode {
        BooleanMode::And => BinaryOperator::And,
        BooleanMode::Or => BinaryOperator::Or,
    };

    let mut predicate: Option<Expr> = None;
    for clause in spec.clauses() {
        let next = compile_clause(schema, clause)?;
        predicate = Some(match predicate {
            Some(acc) => acc.binary(connective, next),
            None => next,
        });
    }
    Ok(predicate)
}

/// Compile one clause.
pub fn compile_clause(schema: &TableSchema, clause: &FilterClause) -> Result<Expr, QueryError> {
    let column = schema.require(&clause.column)?;
    let op = OperatorKind::parse(&clause.operator)?;
    let value = &clause.value;
    if !value.is_finite() {
        return Err(QueryError::NonFiniteValue(column.name.clone()));
    }
    let target = col(&column.name);

    let expr = match op {
        OperatorKind::Eq if value.is_null() => target.is_null(),
        OperatorKind::Ne if value.is_null() => target.is_not_null(),
        OperatorKind::Eq => target.eq(param(value.clone())),
        OperatorKind::Ne => target.ne(param(value.clone())),
        OperatorKind::Gt => target.gt(param(value.clone())),
        OperatorKind::Ge => target.gte(param(value.clone())),
        OperatorKind::Lt => target.lt(param(value.clone())),
        OperatorKind::Le => target.lte(param(value.clone())),
        OperatorKind::Like => pattern(target, param(value.clone()), false, false, None),
        OperatorKind::NotLike => pattern(target, param(value.clone()), false, true, None),
        OperatorKind::ILike => pattern(target, param(value.clone()), true, false, None),
        OperatorKind::NotILike => pattern(target, param(value.clone()), true, true, None),
        OperatorKind::Contains | OperatorKind::StartsWith | OperatorKind::EndsWith => {
            match value.as_pattern_text() {
                Some(text) => {
                    let (escaped, changed) = escape_like(&text);
                    let wrapped = match op {
                        OperatorKind::Contains => format!("%{}%", escaped),
                        OperatorKind::StartsWith => format!("{}%", escaped),
                        _ => format!("%{}", escaped),
                    };
                    let escape = changed.then_some(LIKE_ESCAPE);
                    pattern(target, param(wrapped), false, false, escape)
                }
                // NULL pattern; the database decides
                None => pattern(target, param(Literal::Null), false, false, None),
            }
        }
    };
    Ok(expr)
}

fn pattern(
    target: Expr,
    pattern: Expr,
    case_insensitive: bool,
    negated: bool,
    escape_char: Option<char>,
) -> Expr {
    Expr::Like {
        expr: Box::new(target),
        pattern: Box::new(pattern),
        case_insensitive,
        escape_char,
        negated,
    }
}

/// Escape LIKE wildcards and the escape character itself.
///
/// Returns the escaped text and whether anything was escaped.
pub fn escape_like(text: &str) -> (String, bool) {
    let mut out = String::with_capacity(text.len());
    let mut changed = false;
    for c in text.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            out.push(LIKE_ESCAPE);
            changed = true;
        }
        out.push(c);
    }
    (out, changed)
}
