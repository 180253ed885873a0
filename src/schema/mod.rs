//! Schema Resolver and the table metadata it produces.
//!
//! - [`types`] - database column types
//! - [`column`] - [`ColumnRef`] and the per-table [`TableSchema`] snapshot
//! - [`source`] - the [`SchemaSource`] collaborator trait
//! - [`static_source`] - in-memory source (settings file, tests)
//! - [`catalog`] - live source over `information_schema`
//! - [`resolver`] - [`SchemaResolver`]

pub mod catalog;
pub mod column;
pub mod resolver;
pub mod source;
pub mod static_source;
pub mod types;

pub use catalog::CatalogSchemaSource;
pub use column::{ColumnRef, TableSchema};
pub use resolver::SchemaResolver;
pub use source::{SchemaResult, SchemaSource};
pub use static_source::StaticSchemaSource;
pub use types::ColumnType;
