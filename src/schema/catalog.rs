//! Live schema source reading the database catalog.
//!
//! Column metadata comes from `information_schema.columns` (or
//! `pragma_table_info` on SQLite). The catalog query is assembled with the
//! crate's own [`Statement`] and handed to the same [`StatementExecutor`]
//! that runs user statements, so it is rendered and bound like any other.
//!
//! Unqualified table names are looked up in the connection's current schema.
//! Primary keys come from `table_constraints` and `key_column_usage` on
//! Postgres, DuckDB and T-SQL; MySQL and SQLite report them with the columns.
//! Snowflake has no `key_column_usage` view, so its columns never carry the
//! key flag.

use async_trait::async_trait;

use super::column::ColumnRef;
use super::source::{SchemaResult, SchemaSource};
use super::types::ColumnType;
use crate::builder::Statement;
use crate::error::SchemaError;
use crate::executor::{ResultSet, StatementExecutor};
use crate::sql::dialect::Dialect;
use crate::sql::expr::{col, func, lit_str, param, Expr, ExprExt, Literal};
use crate::sql::query::{OrderByExpr, SelectExpr, TableRef};

/// Schema source that reflects tables through an executor.
#[derive(Debug, Clone)]
pub struct CatalogSchemaSource<E> {
    executor: E,
    schema: Option<String>,
}

impl<E: StatementExecutor> CatalogSchemaSource<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            schema: None,
        }
    }

    /// Restrict lookups to one database schema.
    ///
    /// A `schema.table` name passed to [`get_columns`](SchemaSource::get_columns)
    /// overrides this.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Catalog statement listing the columns of `table` in ordinal order.
    pub fn columns_statement(&self, table: &str) -> Statement {
        let dialect = self.executor.dialect();
        let target = TableRef::parse(table);

        if dialect == Dialect::Sqlite {
            let mut args = vec![param(target.table.as_str())];
            if let Some(schema) = target.schema.clone().or_else(|| self.schema.clone()) {
                args.push(param(schema));
            }
            let mut stmt = Statement::select(TableRef::function("pragma_table_info", args));
            stmt.projection = vec![
                col("name").alias("column_name"),
                col("type").alias("data_type"),
                SelectExpr::new(col("notnull")),
                SelectExpr::new(col("pk")),
            ];
            stmt.order_by = vec![OrderByExpr::asc(col("cid"))];
            return stmt;
        }

        let ident = CatalogIdent(dialect);
        let mut projection = vec![
            SelectExpr::new(ident.col("column_name")),
            SelectExpr::new(ident.col("data_type")),
            SelectExpr::new(ident.col("is_nullable")),
        ];
        match dialect {
            Dialect::Postgres | Dialect::Snowflake => {
                projection.push(SelectExpr::new(ident.col("is_identity")));
            }
            Dialect::MySql => {
                projection.push(SelectExpr::new(ident.col("column_key")));
                projection.push(SelectExpr::new(ident.col("extra")));
            }
            _ => {}
        }

        let mut stmt = Statement::select(ident.information_schema("columns"));
        stmt.projection = projection;
        stmt.filter = Some(self.table_filter(ident, &target));
        stmt.order_by = vec![OrderByExpr::asc(ident.col("ordinal_position"))];
        stmt
    }

    /// Catalog statement naming the primary-key constraint of `table`.
    ///
    /// `None` where the columns statement already reports keys, or where the
    /// catalog cannot say (Snowflake).
    pub fn primary_key_statement(&self, table: &str) -> Option<Statement> {
        let dialect = self.executor.dialect();
        if !matches!(dialect, Dialect::Postgres | Dialect::DuckDb | Dialect::TSql) {
            return None;
        }

        let target = TableRef::parse(table);
        let ident = CatalogIdent(dialect);
        let mut stmt = Statement::select(ident.information_schema("table_constraints"));
        stmt.projection = vec![SelectExpr::new(ident.col("constraint_name"))];
        stmt.filter = Some(
            self.table_filter(ident, &target)
                .and(ident.col("constraint_type").eq(lit_str("PRIMARY KEY"))),
        );
        Some(stmt)
    }

    /// Catalog statement listing the columns of `constraint` on `table`.
    pub fn key_columns_statement(&self, table: &str, constraint: &str) -> Statement {
        let dialect = self.executor.dialect();
        let target = TableRef::parse(table);
        let ident = CatalogIdent(dialect);

        let mut stmt = Statement::select(ident.information_schema("key_column_usage"));
        stmt.projection = vec![SelectExpr::new(ident.col("column_name"))];
        stmt.filter = Some(
            self.table_filter(ident, &target)
                .and(ident.col("constraint_name").eq(param(constraint))),
        );
        stmt.order_by = vec![OrderByExpr::asc(ident.col("ordinal_position"))];
        stmt
    }

    /// `table_name = ? AND table_schema = ?`, defaulting the schema to the
    /// connection's current one.
    fn table_filter(&self, ident: CatalogIdent, target: &TableRef) -> Expr {
        let schema = match target.schema.clone().or_else(|| self.schema.clone()) {
            Some(schema) => param(schema),
            None => current_schema(ident.0),
        };
        ident
            .col("table_name")
            .eq(param(target.table.as_str()))
            .and(ident.col("table_schema").eq(schema))
    }

    /// Catalog statement listing table names.
    pub fn tables_statement(&self) -> Statement {
        let dialect = self.executor.dialect();

        if dialect == Dialect::Sqlite {
            let mut stmt = Statement::select(TableRef::new("sqlite_master"));
            stmt.projection = vec![col("name").alias("table_name")];
            stmt.filter = Some(
                col("type")
                    .eq(lit_str("table"))
                    .and(col("name").like(lit_str("sqlite_%")).not()),
            );
            stmt.order_by = vec![OrderByExpr::asc(col("name"))];
            return stmt;
        }

        let ident = CatalogIdent(dialect);
        let schema = match &self.schema {
            Some(schema) => param(schema.as_str()),
            None => current_schema(dialect),
        };
        let filter = ident.col("table_schema").eq(schema);

        let mut stmt = Statement::select(ident.information_schema("tables"));
        stmt.projection = vec![SelectExpr::new(ident.col("table_name"))];
        stmt.filter = Some(filter);
        stmt.order_by = vec![OrderByExpr::asc(ident.col("table_name"))];
        stmt
    }

    /// Names of the primary-key columns of `table`, where the catalog
    /// reports them separately from the columns.
    async fn primary_key_columns(&self, table: &str) -> SchemaResult<Vec<String>> {
        let Some(statement) = self.primary_key_statement(table) else {
            return Ok(Vec::new());
        };
        let constraints = self.fetch(&statement).await?;
        let Some(constraint) = text(&constraints, 0, "constraint_name") else {
            return Ok(Vec::new());
        };

        let rows = self
            .fetch(&self.key_columns_statement(table, &constraint))
            .await?;
        Ok((0..rows.len())
            .filter_map(|row| text(&rows, row, "column_name"))
            .collect())
    }

    async fn fetch(&self, statement: &Statement) -> SchemaResult<ResultSet> {
        self.executor
            .execute(statement)
            .await
            .and_then(|result| result.into_rows())
            .map_err(|e| SchemaError::Source(e.to_string()))
    }
}

#[async_trait]
impl<E: StatementExecutor> SchemaSource for CatalogSchemaSource<E> {
    async fn get_columns(&self, table: &str) -> SchemaResult<Vec<ColumnRef>> {
        let rows = self.fetch(&self.columns_statement(table)).await?;
        if rows.is_empty() {
            return Err(SchemaError::TableNotFound(table.to_string()));
        }

        let mut columns = (0..rows.len())
            .map(|row| decode_column(&rows, row))
            .collect::<SchemaResult<Vec<_>>>()?;

        let keys = self.primary_key_columns(table).await?;
        for column in columns.iter_mut() {
            if keys.contains(&column.name) {
                column.primary_key = true;
                column.nullable = false;
            }
        }
        tracing::debug!(
            "catalog reported {} columns ({} key) for {}",
            columns.len(),
            keys.len(),
            table
        );
        Ok(columns)
    }

    async fn list_tables(&self) -> SchemaResult<Vec<String>> {
        let rows = self.fetch(&self.tables_statement()).await?;
        Ok((0..rows.len())
            .filter_map(|row| text(&rows, row, "table_name"))
            .collect())
    }
}

/// Identifier spelling for catalog objects.
///
/// Snowflake stores unquoted identifiers upper-case, so its quoted
/// `information_schema` names must be upper-case too.
#[derive(Clone, Copy)]
struct CatalogIdent(Dialect);

impl CatalogIdent {
    fn name(self, name: &str) -> String {
        match self.0 {
            Dialect::Snowflake => name.to_ascii_uppercase(),
            _ => name.to_string(),
        }
    }

    fn col(self, name: &str) -> Expr {
        col(&self.name(name))
    }

    fn information_schema(self, view: &str) -> TableRef {
        TableRef::new(&self.name(view)).with_schema(&self.name("information_schema"))
    }
}

/// The connection's default schema.
fn current_schema(dialect: Dialect) -> Expr {
    match dialect {
        Dialect::MySql => func("DATABASE", vec![]),
        Dialect::TSql => func("SCHEMA_NAME", vec![]),
        _ => func("CURRENT_SCHEMA", vec![]),
    }
}

fn decode_column(rows: &ResultSet, row: usize) -> SchemaResult<ColumnRef> {
    let name = text(rows, row, "column_name").ok_or_else(|| {
        SchemaError::Source(format!("catalog row {} has no column_name", row))
    })?;
    let data_type = text(rows, row, "data_type")
        .map(|t| ColumnType::parse(&t))
        .unwrap_or(ColumnType::Other(String::new()));

    let mut column = ColumnRef::new(name, data_type);

    let nullable = flag(rows, row, "is_nullable")
        .or_else(|| flag(rows, row, "notnull").map(|not_null| !not_null))
        .unwrap_or(true);
    if !nullable {
        column = column.not_null();
    }

    let primary_key = text(rows, row, "column_key").is_some_and(|k| k.eq_ignore_ascii_case("PRI"))
        || flag(rows, row, "pk").unwrap_or(false);
    if primary_key {
        column = column.primary_key();
    }

    let autoincrement = flag(rows, row, "is_identity").unwrap_or(false)
        || text(rows, row, "extra")
            .is_some_and(|e| e.to_ascii_lowercase().contains("auto_increment"));
    if autoincrement {
        column = column.autoincrement();
    }

    Ok(column)
}

fn text(rows: &ResultSet, row: usize, column: &str) -> Option<String> {
    match rows.get(row, column)? {
        Literal::Null => None,
        value => Some(value.to_string()),
    }
}

/// Catalog booleans arrive as `YES`/`NO`, 0/1 or real booleans.
fn flag(rows: &ResultSet, row: usize, column: &str) -> Option<bool> {
    match rows.get(row, column)? {
        Literal::Bool(b) => Some(*b),
        Literal::Int(n) => Some(*n != 0),
        Literal::String(s) => Some(matches!(
            s.trim().to_ascii_uppercase().as_str(),
            "YES" | "Y" | "TRUE" | "1"
        )),
        _ => None,
    }
}
