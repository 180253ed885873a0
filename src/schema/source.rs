//! SchemaSource trait definition.
//!
//! A schema source answers "which columns does this table have right now".
//! The builder never caches the answer, so a source is asked once per
//! statement build.

use async_trait::async_trait;

use super::column::ColumnRef;
use crate::error::SchemaError;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Trait for reading table metadata.
///
/// # Example
///
/// ```ignore
/// use tabula::schema::SchemaSource;
///
/// async fn example(source: &impl SchemaSource) -> SchemaResult<()> {
///     let tables = source.list_tables().await?;
///     let columns = source.get_columns("orders").await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Ordered columns of `table`.
    ///
    /// Fails with [`SchemaError::TableNotFound`] when the table is absent.
    async fn get_columns(&self, table: &str) -> SchemaResult<Vec<ColumnRef>>;

    /// Names of all tables visible to this source.
    async fn list_tables(&self) -> SchemaResult<Vec<String>>;

    /// Whether `table` exists.
    ///
    /// Default implementation asks for the columns and maps
    /// `TableNotFound` to `false`.
    async fn has_table(&self, table: &str) -> SchemaResult<bool> {
        match self.get_columns(table).await {
            Ok(_) => Ok(true),
            Err(SchemaError::TableNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Batch fetch multiple tables.
    ///
    /// Default implementation fetches tables in parallel using `join_all`.
    async fn get_columns_batch(&self, tables: &[&str]) -> SchemaResult<Vec<Vec<ColumnRef>>> {
        let futures: Vec<_> = tables.iter().map(|t| self.get_columns(t)).collect();

        let results = futures::future::join_all(futures).await;

        // Collect results, failing if any failed
        results.into_iter().collect()
    }
}

#[async_trait]
impl<S: SchemaSource + ?Sized> SchemaSource for std::sync::Arc<S> {
    async fn get_columns(&self, table: &str) -> SchemaResult<Vec<ColumnRef>> {
        (**self).get_columns(table).await
    }

    async fn list_tables(&self) -> SchemaResult<Vec<String>> {
        (**self).list_tables().await
    }

    async fn has_table(&self, table: &str) -> SchemaResult<bool> {
        (**self).has_table(table).await
    }
}
