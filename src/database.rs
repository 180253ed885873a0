//! Database facade: build a statement, run it, check the result shape.

use std::collections::BTreeMap;

use crate::builder::{QueryBuilder, QueryParams, Statement};
use crate::error::{DatabaseError, ExecutionError};
use crate::executor::{ExecutionResult, ResultSet, StatementExecutor};
use crate::filter::FilterSpec;
use crate::schema::{CatalogSchemaSource, ColumnRef, SchemaSource};
use crate::sql::dialect::Dialect;
use crate::sql::expr::Literal;

/// Schema-aware access to one database.
///
/// `S` answers schema questions, `E` runs statements. With a live connection
/// they are usually the same executor; see [`Database::with_catalog`].
#[derive(Debug, Clone)]
pub struct Database<S, E> {
    builder: QueryBuilder<S>,
    executor: E,
}

impl<E: StatementExecutor + Clone> Database<CatalogSchemaSource<E>, E> {
    /// Reflect schemas through the same executor that runs statements.
    pub fn with_catalog(executor: E) -> Self {
        Self::new(CatalogSchemaSource::new(executor.clone()), executor)
    }
}

impl<S: SchemaSource, E: StatementExecutor> Database<S, E> {
    pub fn new(source: S, executor: E) -> Self {
        Self {
            builder: QueryBuilder::new(source),
            executor,
        }
    }

    pub fn builder(&self) -> &QueryBuilder<S> {
        &self.builder
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn dialect(&self) -> Dialect {
        self.executor.dialect()
    }

    /// Build without executing.
    pub async fn build(&self, table: &str, params: &QueryParams) -> Result<Statement, DatabaseError> {
        Ok(self.builder.build(table, params).await?)
    }

    /// Run an already-built statement.
    ///
    /// The statement is lowered first, so SELECT-only clauses on an UPDATE
    /// or DELETE fail here without reaching the executor.
    pub async fn execute(&self, statement: &Statement) -> Result<ExecutionResult, DatabaseError> {
        let (sql, params) = statement.to_sql_with_params(self.dialect())?;
        tracing::debug!(
            "executing {} on {} ({} params): {}",
            statement.kind,
            statement.table,
            params.len(),
            sql
        );
        Ok(self.executor.execute(statement).await?)
    }

    /// Run a SELECT.
    ///
    /// `update` and `delete` flags in `params` are ignored.
    pub async fn select(&self, table: &str, params: &QueryParams) -> Result<ResultSet, DatabaseError> {
        let params = QueryParams {
            update: false,
            delete: false,
            ..params.clone()
        };
        let statement = self.build(table, &params).await?;
        let result = self.execute(&statement).await?;
        expect_rows(&statement, result)
    }

    /// Run an UPDATE and return the affected row count.
    pub async fn update(
        &self,
        table: &str,
        filter: Option<FilterSpec>,
        where_boolean: Option<&str>,
        values: BTreeMap<String, Literal>,
    ) -> Result<u64, DatabaseError> {
        let params = QueryParams {
            filter,
            where_boolean: where_boolean.map(String::from),
            update: true,
            values: Some(values),
            ..QueryParams::default()
        };
        let statement = self.build(table, &params).await?;
        let result = self.execute(&statement).await?;
        expect_affected(&statement, result)
    }

    /// Run a DELETE and return the affected row count.
    pub async fn delete(
        &self,
        table: &str,
        filter: Option<FilterSpec>,
        where_boolean: Option<&str>,
    ) -> Result<u64, DatabaseError> {
        let params = QueryParams {
            filter,
            where_boolean: where_boolean.map(String::from),
            delete: true,
            ..QueryParams::default()
        };
        let statement = self.build(table, &params).await?;
        let result = self.execute(&statement).await?;
        expect_affected(&statement, result)
    }

    pub async fn has_table(&self, table: &str) -> Result<bool, DatabaseError> {
        Ok(self.builder.resolver().source().has_table(table).await?)
    }

    /// Columns of `table` in catalog order.
    pub async fn columns(&self, table: &str) -> Result<Vec<ColumnRef>, DatabaseError> {
        let schema = self.builder.resolver().resolve(table).await?;
        tracing::debug!("resolved {} columns for {}", schema.len(), table);
        Ok(schema.into_columns())
    }

    pub async fn tables(&self) -> Result<Vec<String>, DatabaseError> {
        Ok(self.builder.resolver().source().list_tables().await?)
    }
}

fn expect_rows(statement: &Statement, result: ExecutionResult) -> Result<ResultSet, DatabaseError> {
    result.into_rows().map_err(|e| shape_mismatch(statement, e))
}

fn expect_affected(statement: &Statement, result: ExecutionResult) -> Result<u64, DatabaseError> {
    result.into_affected().map_err(|e| shape_mismatch(statement, e))
}

fn shape_mismatch(statement: &Statement, err: ExecutionError) -> DatabaseError {
    tracing::warn!("{} on {}: {}", statement.kind, statement.table, err);
    err.into()
}
