//! Error types for schema resolution, statement construction and execution.

use thiserror::Error;

/// Errors from a [`SchemaSource`](crate::schema::SchemaSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The table does not exist in the database catalog.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// The catalog could not be read.
    #[error("schema source failed: {0}")]
    Source(String),
}

/// Errors raised while building or lowering a statement.
///
/// All of these are caller errors: nothing reaches the executor when one
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("unsupported filter operator: '{0}'")]
    UnsupportedOperator(String),

    #[error("unsupported aggregate function: '{0}' (expected count, sum, avg, min or max)")]
    UnsupportedAggregate(String),

    #[error("invalid sort direction: '{0}' (expected asc or desc)")]
    InvalidSortDirection(String),

    /// A float value that SQL cannot represent (NaN or infinity).
    #[error("non-finite value for column '{0}'")]
    NonFiniteValue(String),

    /// An update was requested without any column values.
    #[error("update requires at least one column value")]
    MissingValues,

    /// A SELECT-only clause was attached to an UPDATE or DELETE.
    #[error("{clause} is not supported on {statement} statements")]
    ClauseNotSupported {
        statement: &'static str,
        clause: &'static str,
    },

    /// Schema resolution failed for a reason other than a missing table.
    #[error("schema resolution failed: {0}")]
    Schema(String),
}

impl From<SchemaError> for QueryError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::TableNotFound(table) => QueryError::TableNotFound(table),
            SchemaError::Source(msg) => QueryError::Schema(msg),
        }
    }
}

/// Errors from a [`StatementExecutor`](crate::executor::StatementExecutor).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The database driver reported a failure.
    #[error("execution failed: {0}")]
    Backend(String),

    /// The executor returned a result that does not fit the statement kind.
    #[error("unexpected result: expected {expected}, got {actual}")]
    UnexpectedResult {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Errors from the [`Database`](crate::database::Database) facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl From<SchemaError> for DatabaseError {
    fn from(err: SchemaError) -> Self {
        DatabaseError::Query(err.into())
    }
}
