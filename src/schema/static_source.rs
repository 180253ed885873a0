//! In-memory schema source.
//!
//! Holds a fixed table map. Used by the CLI (tables declared in the settings
//! file) and as a test collaborator.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::column::ColumnRef;
use super::source::{SchemaResult, SchemaSource};
use crate::error::SchemaError;

/// A schema source backed by a fixed map of table name to columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticSchemaSource {
    tables: BTreeMap<String, Vec<ColumnRef>>,
}

impl StaticSchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a table.
    pub fn with_table(mut self, name: impl Into<String>, columns: Vec<ColumnRef>) -> Self {
        self.insert(name, columns);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, columns: Vec<ColumnRef>) {
        self.tables.insert(name.into(), columns);
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<ColumnRef>> {
        self.tables.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<(String, Vec<ColumnRef>)> for StaticSchemaSource {
    fn from_iter<I: IntoIterator<Item = (String, Vec<ColumnRef>)>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl SchemaSource for StaticSchemaSource {
    async fn get_columns(&self, table: &str) -> SchemaResult<Vec<ColumnRef>> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| SchemaError::TableNotFound(table.to_string()))
    }

    async fn list_tables(&self) -> SchemaResult<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }

    async fn has_table(&self, table: &str) -> SchemaResult<bool> {
        Ok(self.tables.contains_key(table))
    }
}
