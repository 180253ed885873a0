//! Resolved column definitions and the per-table schema snapshot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::ColumnType;
use crate::error::QueryError;

/// One column of one table, as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ColumnSpec")]
pub struct ColumnRef {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    pub autoincrement: bool,
}

impl ColumnRef {
    /// A nullable, non-key column.
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            primary_key: false,
            autoincrement: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark as primary key (implies NOT NULL).
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }
}

/// Settings-file form of a column: a bare name or a full table.
///
/// ```toml
/// columns = ["name", { name = "id", type = "bigint", primary_key = true }]
/// ```
#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnSpec {
    Name(String),
    Full {
        name: String,
        #[serde(rename = "type", default)]
        data_type: Option<String>,
        #[serde(default)]
        nullable: Option<bool>,
        #[serde(default)]
        primary_key: bool,
        #[serde(default)]
        autoincrement: bool,
    },
}

impl From<ColumnSpec> for ColumnRef {
    fn from(spec: ColumnSpec) -> Self {
        match spec {
            ColumnSpec::Name(name) => ColumnRef::new(name, ColumnType::Text),
            ColumnSpec::Full {
                name,
                data_type,
                nullable,
                primary_key,
                autoincrement,
            } => ColumnRef {
                name,
                data_type: data_type
                    .map(|t| ColumnType::parse(&t))
                    .unwrap_or(ColumnType::Text),
                nullable: nullable.unwrap_or(!primary_key),
                primary_key,
                autoincrement,
            },
        }
    }
}

/// Ordered columns of one table plus a name index.
///
/// Built fresh per resolution; lookups are exact (case-sensitive) name matches.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnRef>,
    index: HashMap<String, usize>,
}

impl TableSchema {
    /// Build a schema. If a name repeats, lookups resolve to the first one.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnRef>) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            index.entry(column.name.clone()).or_insert(i);
        }
        Self {
            name: name.into(),
            columns,
            index,
        }
    }

    /// Table name as requested.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in catalog order.
    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&ColumnRef> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up a column, failing with [`QueryError::UnknownColumn`].
    pub fn require(&self, name: &str) -> Result<&ColumnRef, QueryError> {
        self.column(name).ok_or_else(|| QueryError::UnknownColumn {
            table: self.name.clone(),
            column: name.to_string(),
        })
    }

    pub fn primary_key(&self) -> impl Iterator<Item = &ColumnRef> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn into_columns(self) -> Vec<ColumnRef> {
        self.columns
    }
}
