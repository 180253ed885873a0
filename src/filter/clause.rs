//! Filter input: clauses and the single-or-list spec.

use serde::Deserialize;

use crate::sql::expr::Literal;

/// One `(column, operator, value)` filter clause.
///
/// The operator is kept as the caller wrote it and checked when the filter
/// is compiled, so an unknown token surfaces as
/// [`QueryError::UnsupportedOperator`](crate::error::QueryError::UnsupportedOperator)
/// rather than as a deserialization failure.
///
/// Deserializes from a triple or an object:
///
/// ```json
/// ["n", ">", 2]
/// {"column": "n", "operator": ">", "value": 2}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawClause")]
pub struct FilterClause {
    pub column: String,
    pub operator: String,
    pub value: Literal,
}

impl FilterClause {
    pub fn new(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Literal>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

impl<C, O, V> From<(C, O, V)> for FilterClause
where
    C: Into<String>,
    O: Into<String>,
    V: Into<Literal>,
{
    fn from((column, operator, value): (C, O, V)) -> Self {
        FilterClause::new(column, operator, value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawClause {
    Triple(String, String, Literal),
    Object {
        column: String,
        operator: String,
        value: Literal,
    },
}

impl From<RawClause> for FilterClause {
    fn from(raw: RawClause) -> Self {
        match raw {
            RawClause::Triple(column, operator, value)
            | RawClause::Object {
                column,
                operator,
                value,
            } => FilterClause {
                column,
                operator,
                value,
            },
        }
    }
}

/// One clause or an ordered list of clauses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FilterSpec {
    One(FilterClause),
    Many(Vec<FilterClause>),
}

impl FilterSpec {
    /// The clauses in input order; a single clause is a one-element slice.
    pub fn clauses(&self) -> &[FilterClause] {
        match self {
            FilterSpec::One(clause) => std::slice::from_ref(clause),
            FilterSpec::Many(clauses) => clauses,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses().is_empty()
    }
}

impl From<FilterClause> for FilterSpec {
    fn from(clause: FilterClause) -> Self {
        FilterSpec::One(clause)
    }
}

impl From<Vec<FilterClause>> for FilterSpec {
    fn from(clauses: Vec<FilterClause>) -> Self {
        FilterSpec::Many(clauses)
    }
}
