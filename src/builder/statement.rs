//! The assembled, not-yet-executed statement.

use std::fmt;

use crate::error::QueryError;
use crate::sql::dialect::Dialect;
use crate::sql::dml::{Delete, Update};
use crate::sql::expr::{param, Expr, Literal};
use crate::sql::query::{OrderByExpr, Query, SelectExpr, TableRef};
use crate::sql::token::TokenStream;

/// Statement shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A select, update or delete over one table.
///
/// Produced by [`QueryBuilder::build`](super::QueryBuilder::build) and handed
/// to a [`StatementExecutor`](crate::executor::StatementExecutor).
/// Lowering to SQL is where SELECT-only clauses on an UPDATE or DELETE are
/// rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub table: TableRef,
    /// SELECT list. Ignored for UPDATE and DELETE.
    pub projection: Vec<SelectExpr>,
    pub filter: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// UPDATE values. Emitted in column-name order.
    pub assignments: Vec<(String, Literal)>,
}

/// A statement lowered to the SQL layer's builders.
#[derive(Debug, Clone, PartialEq)]
pub enum Lowered {
    Select(Query),
    Update(Update),
    Delete(Delete),
}

impl Lowered {
    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        match self {
            Lowered::Select(query) => query.to_tokens_for_dialect(dialect),
            Lowered::Update(update) => update.to_tokens(dialect),
            Lowered::Delete(delete) => delete.to_tokens(dialect),
        }
    }
}

impl Statement {
    pub fn new(kind: StatementKind, table: TableRef) -> Self {
        Self {
            kind,
            table,
            projection: Vec::new(),
            filter: None,
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            assignments: Vec::new(),
        }
    }

    pub fn select(table: TableRef) -> Self {
        Self::new(StatementKind::Select, table)
    }

    pub fn update(table: TableRef) -> Self {
        Self::new(StatementKind::Update, table)
    }

    pub fn delete(table: TableRef) -> Self {
        Self::new(StatementKind::Delete, table)
    }

    /// Output column names of a SELECT, where they are known.
    pub fn output_names(&self) -> Vec<Option<&str>> {
        self.projection.iter().map(SelectExpr::output_name).collect()
    }

    /// Lower to a SQL-layer builder.
    pub fn lower(&self) -> Result<Lowered, QueryError> {
        match self.kind {
            StatementKind::Select => {
                let mut query = Query::new().from(self.table.clone());
                query = if self.projection.is_empty() {
                    query.select_star()
                } else {
                    query.select(self.projection.clone())
                };
                if let Some(filter) = &self.filter {
                    query = query.filter(filter.clone());
                }
                query = query
                    .group_by(self.group_by.clone())
                    .order_by(self.order_by.clone());
                if let Some(offset) = self.offset {
                    query = query.offset(offset);
                }
                if let Some(limit) = self.limit {
                    query = query.limit(limit);
                }
                Ok(Lowered::Select(query))
            }
            StatementKind::Update => {
                self.check_select_only_clauses()?;
                if self.assignments.is_empty() {
                    return Err(QueryError::MissingValues);
                }
                let mut assignments = self.assignments.clone();
                assignments.sort_by(|a, b| a.0.cmp(&b.0));

                let mut update = Update::table(self.table.clone())
                    .set_many(assignments.into_iter().map(|(c, v)| (c, param(v))));
                if let Some(filter) = &self.filter {
                    update = update.filter(filter.clone());
                }
                Ok(Lowered::Update(update))
            }
            StatementKind::Delete => {
                self.check_select_only_clauses()?;
                let mut delete = Delete::from(self.table.clone());
                if let Some(filter) = &self.filter {
                    delete = delete.filter(filter.clone());
                }
                Ok(Lowered::Delete(delete))
            }
        }
    }

    pub fn to_tokens(&self, dialect: Dialect) -> Result<TokenStream, QueryError> {
        Ok(self.lower()?.to_tokens(dialect))
    }

    /// SQL with values inlined as literals.
    pub fn to_sql(&self, dialect: Dialect) -> Result<String, QueryError> {
        Ok(self.to_tokens(dialect)?.serialize(dialect))
    }

    /// SQL with dialect placeholders, plus the values to bind in order.
    pub fn to_sql_with_params(&self, dialect: Dialect) -> Result<(String, Vec<Literal>), QueryError> {
        Ok(self.to_tokens(dialect)?.serialize_with_params(dialect))
    }

    fn check_select_only_clauses(&self) -> Result<(), QueryError> {
        let clause = if !self.group_by.is_empty() {
            Some("GROUP BY")
        } else if !self.order_by.is_empty() {
            Some("ORDER BY")
        } else if self.offset.is_some() {
            Some("OFFSET")
        } else if self.limit.is_some() {
            Some("LIMIT")
        } else {
            None
        };
        match clause {
            Some(clause) => Err(QueryError::ClauseNotSupported {
                statement: self.kind.as_str(),
                clause,
            }),
            None => Ok(()),
        }
    }
}
