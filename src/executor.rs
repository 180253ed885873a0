//! Statement executor collaborator.
//!
//! The builder produces [`Statement`]s; something else runs them. An executor
//! owns the physical connection, picks the dialect it renders with, and
//! returns either rows (SELECT) or an affected-row count (UPDATE/DELETE).

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::builder::Statement;
use crate::error::ExecutionError;
use crate::sql::dialect::Dialect;
use crate::sql::expr::Literal;

/// Result type for executor operations.
pub type ExecutionResultOf<T> = Result<T, ExecutionError>;

/// Tabular result of a SELECT.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Literal>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Literal>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name` in the column list, ignoring ASCII case.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Value at (`row`, `column`), or `None` if either is out of range.
    pub fn get(&self, row: usize, column: &str) -> Option<&Literal> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Iterate rows as `(column, value)` pairs.
    pub fn records(&self) -> impl Iterator<Item = Vec<(&str, &Literal)>> {
        self.rows.iter().map(|row| {
            self.columns
                .iter()
                .map(String::as_str)
                .zip(row.iter())
                .collect()
        })
    }
}

/// What an executor hands back.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    /// Rows from a SELECT.
    Rows(ResultSet),
    /// Row count from an UPDATE or DELETE.
    Affected(u64),
}

impl ExecutionResult {
    pub fn kind(&self) -> &'static str {
        match self {
            ExecutionResult::Rows(_) => "rows",
            ExecutionResult::Affected(_) => "affected row count",
        }
    }

    /// Expect rows; anything else is [`ExecutionError::UnexpectedResult`].
    pub fn into_rows(self) -> ExecutionResultOf<ResultSet> {
        match self {
            ExecutionResult::Rows(rs) => Ok(rs),
            other => Err(ExecutionError::UnexpectedResult {
                expected: "rows",
                actual: other.kind(),
            }),
        }
    }

    /// Expect an affected-row count.
    pub fn into_affected(self) -> ExecutionResultOf<u64> {
        match self {
            ExecutionResult::Affected(n) => Ok(n),
            other => Err(ExecutionError::UnexpectedResult {
                expected: "affected row count",
                actual: other.kind(),
            }),
        }
    }
}

/// Runs assembled statements against a database.
///
/// Implementations render with [`Statement::to_sql_with_params`] using
/// their own [`dialect`](StatementExecutor::dialect) and bind the returned
/// values in order.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Dialect this executor renders statements in.
    fn dialect(&self) -> Dialect;

    /// Execute one statement.
    async fn execute(&self, statement: &Statement) -> ExecutionResultOf<ExecutionResult>;
}

#[async_trait]
impl<E: StatementExecutor + ?Sized> StatementExecutor for Arc<E> {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    async fn execute(&self, statement: &Statement) -> ExecutionResultOf<ExecutionResult> {
        (**self).execute(statement).await
    }
}
