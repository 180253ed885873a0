//! DML (Data Manipulation Language) support.
//!
//! UPDATE and DELETE builders. Both render on one line; values assigned
//! with [`Update::set`] are usually [`Expr::Param`] so they can be bound.
//!
//! # Examples
//!
//! ```ignore
//! use tabula::sql::dml::{Update, Delete};
//! use tabula::sql::dialect::Dialect;
//! use tabula::sql::expr::{col, param, ExprExt};
//! use tabula::sql::query::TableRef;
//!
//! // UPDATE
//! let update = Update::table(TableRef::new("users"))
//!     .set("status", param("active"))
//!     .filter(col("id").eq(param(1)));
//!
//! // DELETE
//! let delete = Delete::from(TableRef::new("users"))
//!     .filter(col("status").eq(param("inactive")));
//! ```

use super::dialect::Dialect;
use super::expr::{Expr, ExprExt, Literal};
use super::query::TableRef;
use super::token::{Token, TokenStream};

// ============================================================================
// UPDATE
// ============================================================================

/// UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Update {
    pub table: TableRef,
    pub set: Vec<(String, Expr)>,
    pub filter: Option<Expr>,
}

impl Update {
    /// Create a new UPDATE statement.
    pub fn table(table: TableRef) -> Self {
        Self {
            table,
            set: Vec::new(),
            filter: None,
        }
    }

    /// Set a column to a value.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.set.push((column.into(), value.into()));
        self
    }

    /// Set multiple columns.
    pub fn set_many(
        mut self,
        assignments: impl IntoIterator<Item = (impl Into<String>, impl Into<Expr>)>,
    ) -> Self {
        self.set
            .extend(assignments.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add WHERE clause (ANDed with an existing one).
    pub fn filter(mut self, expr: Expr) -> Self {
        self.filter = Some(match self.filter {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Convert to SQL for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens(dialect).serialize(dialect)
    }

    /// Convert to SQL with bind placeholders plus the bound values.
    pub fn to_sql_with_params(&self, dialect: Dialect) -> (String, Vec<Literal>) {
        self.to_tokens(dialect).serialize_with_params(dialect)
    }

    /// Convert to token stream.
    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        // UPDATE table
        ts.push(Token::Update).space();
        ts.append(&self.table.to_tokens_for_dialect(dialect));

        // SET clause
        ts.space().push(Token::Set).space();
        for (i, (col, expr)) in self.set.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(Token::Ident(col.clone()))
                .space()
                .push(Token::Eq)
                .space()
                .append(&expr.to_tokens_for_dialect(dialect));
        }

        // WHERE clause
        if let Some(ref filter) = self.filter {
            ts.space()
                .push(Token::Where)
                .space()
                .append(&filter.to_tokens_for_dialect(dialect));
        }

        ts
    }
}

// ============================================================================
// DELETE
// ============================================================================

/// DELETE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Delete {
    pub table: TableRef,
    pub filter: Option<Expr>,
}

impl Delete {
    /// Create a new DELETE statement.
    pub fn from(table: TableRef) -> Self {
        Self {
            table,
            filter: None,
        }
    }

    /// Add WHERE clause (ANDed with an existing one).
    pub fn filter(mut self, expr: Expr) -> Self {
        self.filter = Some(match self.filter {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Convert to SQL for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens(dialect).serialize(dialect)
    }

    /// Convert to SQL with bind placeholders plus the bound values.
    pub fn to_sql_with_params(&self, dialect: Dialect) -> (String, Vec<Literal>) {
        self.to_tokens(dialect).serialize_with_params(dialect)
    }

    /// Convert to token stream.
    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        // DELETE FROM table
        ts.push(Token::Delete).space().push(Token::From).space();
        ts.append(&self.table.to_tokens_for_dialect(dialect));

        // WHERE clause
        if let Some(ref filter) = self.filter {
            ts.space()
                .push(Token::Where)
                .space()
                .append(&filter.to_tokens_for_dialect(dialect));
        }

        ts
    }
}
