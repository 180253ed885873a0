//! Caller-facing build parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::filter::FilterSpec;
use crate::sql::expr::Literal;

/// A bare value or an ordered list of values.
///
/// Every single-or-list parameter is normalized through [`as_slice`](Self::as_slice)
/// before the builder looks at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }

    /// A bare value, as opposed to a list (even a one-element list).
    pub fn is_one(&self) -> bool {
        matches!(self, OneOrMany::One(_))
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(s: &str) -> Self {
        OneOrMany::One(s.to_string())
    }
}

impl From<String> for OneOrMany<String> {
    fn from(s: String) -> Self {
        OneOrMany::One(s)
    }
}

impl From<Vec<&str>> for OneOrMany<String> {
    fn from(v: Vec<&str>) -> Self {
        OneOrMany::Many(v.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for OneOrMany<String> {
    fn from(v: Vec<String>) -> Self {
        OneOrMany::Many(v)
    }
}

impl<const N: usize> From<[&str; N]> for OneOrMany<String> {
    fn from(v: [&str; N]) -> Self {
        OneOrMany::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

/// Everything a caller can ask of one `build` call.
///
/// Deserializes from JSON or TOML with the same field names the builder
/// methods use (`where` for the filter):
///
/// ```json
/// {"select": "name", "where": [["n", ">", 2]], "order_by": ["name", "n"], "order_by_sort": "desc"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Columns to select; all columns when absent.
    pub select: Option<OneOrMany<String>>,
    #[serde(rename = "where")]
    pub filter: Option<FilterSpec>,
    /// `"and"` or `"or"`; anything else is AND.
    pub where_boolean: Option<String>,
    pub group_by: Option<OneOrMany<String>>,
    pub aggregate: Option<OneOrMany<String>>,
    /// Defaults to `count`.
    pub aggregate_func: Option<OneOrMany<String>>,
    pub order_by: Option<OneOrMany<String>>,
    /// Defaults to `asc`.
    pub order_by_sort: Option<OneOrMany<String>>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub update: bool,
    pub delete: bool,
    pub values: Option<BTreeMap<String, Literal>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, columns: impl Into<OneOrMany<String>>) -> Self {
        self.select = Some(columns.into());
        self
    }

    pub fn filter(mut self, spec: impl Into<FilterSpec>) -> Self {
        self.filter = Some(spec.into());
        self
    }

    pub fn where_boolean(mut self, mode: &str) -> Self {
        self.where_boolean = Some(mode.to_string());
        self
    }

    pub fn group_by(mut self, columns: impl Into<OneOrMany<String>>) -> Self {
        self.group_by = Some(columns.into());
        self
    }

    pub fn aggregate(mut self, columns: impl Into<OneOrMany<String>>) -> Self {
        self.aggregate = Some(columns.into());
        self
    }

    pub fn aggregate_func(mut self, funcs: impl Into<OneOrMany<String>>) -> Self {
        self.aggregate_func = Some(funcs.into());
        self
    }

    pub fn order_by(mut self, columns: impl Into<OneOrMany<String>>) -> Self {
        self.order_by = Some(columns.into());
        self
    }

    pub fn order_by_sort(mut self, dirs: impl Into<OneOrMany<String>>) -> Self {
        self.order_by_sort = Some(dirs.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Request an UPDATE. Values are given with [`set`](Self::set).
    pub fn update(mut self) -> Self {
        self.update = true;
        self
    }

    /// Request a DELETE. Wins over [`update`](Self::update).
    pub fn delete(mut self) -> Self {
        self.delete = true;
        self
    }

    /// Add one update value.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Literal>) -> Self {
        self.values
            .get_or_insert_with(BTreeMap::new)
            .insert(column.into(), value.into());
        self
    }

    pub fn values(mut self, values: BTreeMap<String, Literal>) -> Self {
        self.values = Some(values);
        self
    }
}
