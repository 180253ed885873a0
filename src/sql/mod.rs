//! SQL generation module.
//!
//! This module provides a type-safe SQL builder that generates multi-dialect SQL.
//! It includes:
//!
//! - [`query`] - SELECT query builder
//! - [`expr`] - Expression AST and builder DSL
//! - [`dml`] - Data Manipulation Language (UPDATE, DELETE)
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod dialect;
pub mod dml;
pub mod expr;
pub mod query;
pub mod token;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect};
pub use expr::{
    avg, col, count, func, lit_int, lit_str, max, min, param, star, sum, table_col,
    BinaryOperator, Expr, ExprExt, Literal, SortDir, UnaryOperator,
};
pub use query::{LimitOffset, OrderByExpr, Query, SelectExpr, TableRef};
pub use token::{Token, TokenStream};

// Re-export DML types
pub use dml::{Delete, Update};
