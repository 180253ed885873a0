//! Schema Resolver: table name to validated column snapshot.

use super::column::TableSchema;
use super::source::{SchemaResult, SchemaSource};
use crate::error::SchemaError;

/// Resolves table names to [`TableSchema`] snapshots through a [`SchemaSource`].
///
/// Every call performs a fresh lookup. Nothing is cached, so tables created
/// or dropped between builds are seen immediately.
#[derive(Debug, Clone)]
pub struct SchemaResolver<S> {
    source: S,
}

impl<S: SchemaSource> SchemaResolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Resolve one table.
    ///
    /// A source that reports a table with zero columns is treated as
    /// reporting it missing.
    pub async fn resolve(&self, table: &str) -> SchemaResult<TableSchema> {
        let columns = self.source.get_columns(table).await?;
        if columns.is_empty() {
            return Err(SchemaError::TableNotFound(table.to_string()));
        }
        Ok(TableSchema::new(table, columns))
    }

    /// Resolve several tables concurrently, failing if any is missing.
    pub async fn resolve_many(&self, tables: &[&str]) -> SchemaResult<Vec<TableSchema>> {
        let batches = self.source.get_columns_batch(tables).await?;
        tables
            .iter()
            .zip(batches)
            .map(|(name, columns)| {
                if columns.is_empty() {
                    Err(SchemaError::TableNotFound(name.to_string()))
                } else {
                    Ok(TableSchema::new(*name, columns))
                }
            })
            .collect()
    }
}
