//! Aggregate functions, sort directions, and parallel-list pairing.

use std::fmt;
use std::str::FromStr;

use super::params::OneOrMany;
use crate::error::QueryError;
use crate::sql::expr::{avg, count, max, min, sum, Expr, SortDir};

/// Aggregate functions the builder knows how to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunc {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunc::Count => "count",
            AggregateFunc::Sum => "sum",
            AggregateFunc::Avg => "avg",
            AggregateFunc::Min => "min",
            AggregateFunc::Max => "max",
        }
    }

    /// Wrap `expr` in this aggregate.
    pub fn apply(&self, expr: Expr) -> Expr {
        match self {
            AggregateFunc::Count => count(expr),
            AggregateFunc::Sum => sum(expr),
            AggregateFunc::Avg => avg(expr),
            AggregateFunc::Min => min(expr),
            AggregateFunc::Max => max(expr),
        }
    }
}

impl FromStr for AggregateFunc {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(AggregateFunc::Count),
            "sum" => Ok(AggregateFunc::Sum),
            "avg" => Ok(AggregateFunc::Avg),
            "min" => Ok(AggregateFunc::Min),
            "max" => Ok(AggregateFunc::Max),
            _ => Err(QueryError::UnsupportedAggregate(s.to_string())),
        }
    }
}

impl fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse `asc` / `desc` in any case.
pub fn parse_sort_dir(token: &str) -> Result<SortDir, QueryError> {
    match token.trim().to_ascii_lowercase().as_str() {
        "asc" => Ok(SortDir::Asc),
        "desc" => Ok(SortDir::Desc),
        _ => Err(QueryError::InvalidSortDirection(token.to_string())),
    }
}

/// Pair `items` with `partners`.
///
/// A bare partner applies to every item. A list is zipped, and pairs beyond
/// the shorter side are dropped.
pub fn pair<'a, A, B>(items: &'a [A], partners: &'a OneOrMany<B>) -> Vec<(&'a A, &'a B)> {
    match partners {
        OneOrMany::One(partner) => items.iter().map(|item| (item, partner)).collect(),
        OneOrMany::Many(list) => items.iter().zip(list.iter()).collect(),
    }
}
