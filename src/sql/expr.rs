//! Expression AST - the core of SQL expression building.
//!
//! This module provides a strongly-typed AST for SQL expressions
//! with exhaustive pattern matching enforced by the compiler.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

use super::dialect::{Dialect, SqlDialect};
use super::token::{Token, TokenStream};

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
///
/// Every variant must be handled in `to_tokens_for_dialect()` - the compiler enforces this.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference: optional_table.column
    Column {
        table: Option<String>,
        column: String,
    },

    /// Literal value rendered inline (trusted, e.g. catalog queries)
    Literal(Literal),

    /// Caller-supplied value; inline or bound depending on serialization
    Param(Literal),

    /// Binary operation: left op right
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// Unary operation: op expr
    UnaryOp { op: UnaryOperator, expr: Box<Expr> },

    /// Function call: name(args...)
    Function { name: String, args: Vec<Expr> },

    /// IS NULL / IS NOT NULL
    IsNull { expr: Box<Expr>, negated: bool },

    /// Pattern match: expr [NOT] LIKE|ILIKE pattern [ESCAPE c]
    ///
    /// Case-insensitive matches fall back to `LOWER(expr) LIKE LOWER(pattern)`
    /// on dialects without ILIKE.
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        case_insensitive: bool,
        escape_char: Option<char>,
        negated: bool,
    },

    /// Wildcard: *
    Star,

    /// Parenthesized expression
    Paren(Box<Expr>),
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    /// ISO-8601 date, e.g. `2021-06-01`
    Date(String),
    /// ISO-8601 timestamp, e.g. `2021-06-01 10:00:00`
    Timestamp(String),
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    // Logical
    And,
    Or,
}

impl BinaryOperator {
    fn is_logical(self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
}

/// Sort direction (shared with query ORDER BY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

// =============================================================================
// Literal
// =============================================================================

impl Literal {
    /// Token for inline rendering.
    pub fn to_token(&self) -> Token {
        match self {
            Literal::Int(n) => Token::LitInt(*n),
            Literal::Float(f) => Token::LitFloat(*f),
            Literal::String(s) => Token::LitString(s.clone()),
            Literal::Bool(b) => Token::LitBool(*b),
            Literal::Date(d) => Token::LitDate(d.clone()),
            Literal::Timestamp(ts) => Token::LitTimestamp(ts.clone()),
            Literal::Null => Token::LitNull,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }

    /// False for NaN and infinite floats, which have no SQL literal.
    pub fn is_finite(&self) -> bool {
        match self {
            Literal::Float(f) => f.is_finite(),
            _ => true,
        }
    }

    /// Text form used for pattern building (`CONTAINS` and friends).
    ///
    /// Returns `None` for NULL.
    pub fn as_pattern_text(&self) -> Option<String> {
        match self {
            Literal::Int(n) => Some(n.to_string()),
            Literal::Float(f) => Some(f.to_string()),
            Literal::String(s) | Literal::Date(s) | Literal::Timestamp(s) => Some(s.clone()),
            Literal::Bool(b) => Some(b.to_string()),
            Literal::Null => None,
        }
    }

    /// Infer a literal from untyped text (command-line values).
    ///
    /// `null`, `true`/`false`, integers and floats are recognised;
    /// everything else is a string. Surrounding single or double quotes
    /// force a string.
    pub fn infer(text: &str) -> Literal {
        let t = text.trim();
        if t.len() >= 2
            && ((t.starts_with('\'') && t.ends_with('\''))
                || (t.starts_with('"') && t.ends_with('"')))
        {
            return Literal::String(t[1..t.len() - 1].to_string());
        }
        match t.to_lowercase().as_str() {
            "null" => return Literal::Null,
            "true" => return Literal::Bool(true),
            "false" => return Literal::Bool(false),
            _ => {}
        }
        if let Ok(n) = t.parse::<i64>() {
            return Literal::Int(n);
        }
        match t.parse::<f64>() {
            Ok(f) if f.is_finite() => Literal::Float(f),
            _ => Literal::String(t.to_string()),
        }
    }
}

impl fmt::Display for Literal {
    /// Display-only rendering (not SQL-escaped).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(x) => write!(f, "{}", x),
            Literal::String(s) | Literal::Date(s) | Literal::Timestamp(s) => write!(f, "{}", s),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "NULL"),
        }
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Int(n)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Int(n as i64)
    }
}

impl From<f64> for Literal {
    fn from(f: f64) -> Self {
        Literal::Float(f)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.into())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Literal::Null)
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Literal::Int(n) => serializer.serialize_i64(*n),
            Literal::Float(f) => serializer.serialize_f64(*f),
            Literal::String(s) | Literal::Date(s) | Literal::Timestamp(s) => {
                serializer.serialize_str(s)
            }
            Literal::Bool(b) => serializer.serialize_bool(*b),
            Literal::Null => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for Literal {
    /// Scalars only: numbers, strings, booleans and null.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LiteralVisitor;

        impl<'de> Visitor<'de> for LiteralVisitor {
            type Value = Literal;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a number, string, boolean or null")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Literal, E> {
                Ok(Literal::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Literal, E> {
                Ok(Literal::Int(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Literal, E> {
                i64::try_from(v)
                    .map(Literal::Int)
                    .map_err(|_| E::custom(format!("integer {} is out of range", v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Literal, E> {
                Ok(Literal::Float(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Literal, E> {
                Ok(Literal::String(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Literal, E> {
                Ok(Literal::String(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Literal, E> {
                Ok(Literal::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Literal, E> {
                Ok(Literal::Null)
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Literal, D::Error> {
                Literal::deserialize(d)
            }
        }

        deserializer.deserialize_any(LiteralVisitor)
    }
}

// =============================================================================
// Expression to Tokens
// =============================================================================

impl Expr {
    /// Convert this expression to a token stream (default dialect).
    pub fn to_tokens(&self) -> TokenStream {
        self.to_tokens_for_dialect(Dialect::default())
    }

    /// Convert this expression to a token stream for a specific dialect.
    ///
    /// This handles dialect-specific features like ILIKE support.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { table, column } => {
                if let Some(t) = table {
                    ts.push(Token::Ident(t.clone()));
                    ts.push(Token::Dot);
                }
                ts.push(Token::Ident(column.clone()));
            }

            Expr::Literal(lit) => {
                ts.push(lit.to_token());
            }

            Expr::Param(lit) => {
                ts.push(Token::Param(lit.clone()));
            }

            Expr::BinaryOp { left, op, right } => {
                emit_operand(&mut ts, left, *op, dialect);
                ts.space();
                ts.push(binary_op_to_token(*op));
                ts.space();
                emit_operand(&mut ts, right, *op, dialect);
            }

            Expr::UnaryOp { op, expr } => {
                ts.push(match op {
                    UnaryOperator::Not => Token::Not,
                });
                ts.space();
                let needs_paren = matches!(**expr, Expr::BinaryOp { .. });
                if needs_paren {
                    ts.lparen();
                }
                ts.append(&expr.to_tokens_for_dialect(dialect));
                if needs_paren {
                    ts.rparen();
                }
            }

            Expr::Function { name, args } => {
                ts.push(Token::FunctionName(name.clone()));
                ts.lparen();
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&arg.to_tokens_for_dialect(dialect));
                }
                ts.rparen();
            }

            Expr::IsNull { expr, negated } => {
                ts.append(&expr.to_tokens_for_dialect(dialect));
                ts.space();
                ts.push(if *negated {
                    Token::IsNotNull
                } else {
                    Token::IsNull
                });
            }

            Expr::Like {
                expr,
                pattern,
                case_insensitive,
                escape_char,
                negated,
            } => {
                let native = !*case_insensitive || dialect.supports_ilike();
                if native {
                    ts.append(&expr.to_tokens_for_dialect(dialect));
                } else {
                    ts.append(&lower(expr).to_tokens_for_dialect(dialect));
                }
                if *negated {
                    ts.space().push(Token::Not);
                }
                ts.space();
                ts.push(if *case_insensitive && native {
                    Token::ILike
                } else {
                    Token::Like
                });
                ts.space();
                if native {
                    ts.append(&pattern.to_tokens_for_dialect(dialect));
                } else {
                    ts.append(&lower(pattern).to_tokens_for_dialect(dialect));
                }
                if let Some(c) = escape_char {
                    ts.space()
                        .push(Token::Escape)
                        .space()
                        .push(Token::LitString(c.to_string()));
                }
            }

            Expr::Star => {
                ts.push(Token::Star);
            }

            Expr::Paren(inner) => {
                ts.lparen();
                ts.append(&inner.to_tokens_for_dialect(dialect));
                ts.rparen();
            }
        }

        ts
    }
}

/// Emit an operand of a binary operation, parenthesizing a nested logical
/// operation whose connective differs from the parent's.
fn emit_operand(ts: &mut TokenStream, operand: &Expr, parent: BinaryOperator, dialect: Dialect) {
    let needs_paren = match operand {
        Expr::BinaryOp { op, .. } => parent.is_logical() && op.is_logical() && *op != parent,
        _ => false,
    };
    if needs_paren {
        ts.lparen();
    }
    ts.append(&operand.to_tokens_for_dialect(dialect));
    if needs_paren {
        ts.rparen();
    }
}

fn lower(expr: &Expr) -> Expr {
    func("LOWER", vec![expr.clone()])
}

fn binary_op_to_token(op: BinaryOperator) -> Token {
    match op {
        BinaryOperator::Eq => Token::Eq,
        BinaryOperator::Ne => Token::Ne,
        BinaryOperator::Lt => Token::Lt,
        BinaryOperator::Gt => Token::Gt,
        BinaryOperator::Lte => Token::Lte,
        BinaryOperator::Gte => Token::Gte,
        BinaryOperator::And => Token::And,
        BinaryOperator::Or => Token::Or,
    }
}

// =============================================================================
// Expression Constructors
// =============================================================================

/// Create a column reference.
pub fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        column: name.into(),
    }
}

/// Create a qualified column reference (table.column).
pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column {
        table: Some(table.into()),
        column: column.into(),
    }
}

/// Create an integer literal.
pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

/// Create a string literal.
pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

/// Create a bound parameter.
pub fn param(value: impl Into<Literal>) -> Expr {
    Expr::Param(value.into())
}

/// Create a star (*) expression.
pub fn star() -> Expr {
    Expr::Star
}

/// Generic function call.
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
    }
}

// =============================================================================
// Aggregate Functions
// =============================================================================

/// COUNT(expr)
pub fn count(expr: Expr) -> Expr {
    func("COUNT", vec![expr])
}

/// SUM(expr)
pub fn sum(expr: Expr) -> Expr {
    func("SUM", vec![expr])
}

/// AVG(expr)
pub fn avg(expr: Expr) -> Expr {
    func("AVG", vec![expr])
}

/// MIN(expr)
pub fn min(expr: Expr) -> Expr {
    func("MIN", vec![expr])
}

/// MAX(expr)
pub fn max(expr: Expr) -> Expr {
    func("MAX", vec![expr])
}

// =============================================================================
// Fluent Builder Extension
// =============================================================================

/// Extension trait for fluent expression building.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    fn binary(self, op: BinaryOperator, other: impl Into<Expr>) -> Expr {
        Expr::BinaryOp {
            left: Box::new(self.into_expr()),
            op,
            right: Box::new(other.into()),
        }
    }

    // Comparison operators
    fn eq(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Eq, other)
    }

    fn ne(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Ne, other)
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Lt, other)
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gt, other)
    }

    fn lte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Lte, other)
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gte, other)
    }

    // Logical operators
    fn and(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::And, other)
    }

    fn or(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Or, other)
    }

    fn not(self) -> Expr {
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(self.into_expr()),
        }
    }

    // Pattern matching
    fn like(self, pattern: impl Into<Expr>) -> Expr {
        Expr::Like {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
            case_insensitive: false,
            escape_char: None,
            negated: false,
        }
    }

    fn ilike(self, pattern: impl Into<Expr>) -> Expr {
        Expr::Like {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
            case_insensitive: true,
            escape_char: None,
            negated: false,
        }
    }

    // NULL checks
    #[allow(clippy::wrong_self_convention)]
    fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: false,
        }
    }

    #[allow(clippy::wrong_self_convention)]
    fn is_not_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: true,
        }
    }

    /// Alias this expression (for SELECT list).
    fn alias(self, name: &str) -> super::query::SelectExpr {
        super::query::SelectExpr {
            expr: self.into_expr(),
            alias: Some(name.into()),
        }
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<Literal> for Expr {
    fn from(lit: Literal) -> Self {
        Expr::Literal(lit)
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        lit_int(n as i64)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Expr::Literal(Literal::Bool(b))
    }
}

// =============================================================================
// Tests
// =============================================================================
