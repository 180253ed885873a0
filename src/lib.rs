//! # Tabula
//!
//! Schema-aware SELECT, UPDATE and DELETE construction over live database
//! tables.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                QueryParams (caller input)                │
//! │  (select, where, group_by, aggregate, order_by, values)  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [schema resolver]
//! ┌─────────────────────────────────────────────────────────┐
//! │          TableSchema (fresh from the SchemaSource)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [predicate compiler + builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Statement (SELECT / UPDATE / DELETE, typed)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [lowering + dialect rendering]
//! ┌─────────────────────────────────────────────────────────┐
//! │           SQL text + bound parameters (executor)          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Every column reference in the input is checked against the table's
//! current columns before anything is rendered. Values never reach the SQL
//! text; they travel as bound parameters.

pub mod builder;
pub mod config;
pub mod database;
pub mod error;
pub mod executor;
pub mod filter;
pub mod schema;
pub mod sql;

pub use builder::{OneOrMany, QueryBuilder, QueryParams, Statement, StatementKind};
pub use database::Database;
pub use error::{DatabaseError, ExecutionError, QueryError, SchemaError};
pub use executor::{ExecutionResult, ResultSet, StatementExecutor};
pub use filter::{BooleanMode, FilterClause, FilterSpec, OperatorKind};
pub use schema::{
    CatalogSchemaSource, ColumnRef, ColumnType, SchemaResolver, SchemaSource, StaticSchemaSource,
    TableSchema,
};
pub use sql::{Dialect, Literal};
