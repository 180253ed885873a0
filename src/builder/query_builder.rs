//! Query Builder: parameters plus live schema to a [`Statement`].

use super::aggregate::{pair, parse_sort_dir, AggregateFunc};
use super::params::{OneOrMany, QueryParams};
use super::statement::{Statement, StatementKind};
use crate::error::QueryError;
use crate::filter::{compile, BooleanMode};
use crate::schema::{SchemaResolver, SchemaSource, TableSchema};
use crate::sql::expr::{col, ExprExt};
use crate::sql::query::{OrderByExpr, SelectExpr, TableRef};

const DEFAULT_AGGREGATE: &str = "count";
const DEFAULT_SORT: &str = "asc";

/// Builds statements against live table schemas.
///
/// Holds no per-call state: every [`build`](Self::build) resolves the table
/// afresh, so one builder can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct QueryBuilder<S> {
    resolver: SchemaResolver<S>,
}

impl<S: SchemaSource> QueryBuilder<S> {
    pub fn new(source: S) -> Self {
        Self {
            resolver: SchemaResolver::new(source),
        }
    }

    pub fn resolver(&self) -> &SchemaResolver<S> {
        &self.resolver
    }

    /// Resolve `table` and assemble a statement from `params`.
    pub async fn build(&self, table: &str, params: &QueryParams) -> Result<Statement, QueryError> {
        let schema = self.resolver.resolve(table).await?;
        assemble(&schema, params)
    }
}

/// Assemble a statement against an already-resolved schema.
pub fn assemble(schema: &TableSchema, params: &QueryParams) -> Result<Statement, QueryError> {
    let kind = if params.delete {
        StatementKind::Delete
    } else if params.update {
        StatementKind::Update
    } else {
        StatementKind::Select
    };

    let mut stmt = Statement::new(kind, TableRef::parse(schema.name()));

    // Projection is validated for every kind, kept only for SELECT
    let projection = projection(schema, params)?;
    if kind == StatementKind::Select {
        stmt.projection = projection;
    }

    if kind == StatementKind::Update {
        let values = params
            .values
            .as_ref()
            .filter(|v| !v.is_empty())
            .ok_or(QueryError::MissingValues)?;
        stmt.assignments = values
            .iter()
            .map(|(column, value)| {
                schema.require(column)?;
                if !value.is_finite() {
                    return Err(QueryError::NonFiniteValue(column.clone()));
                }
                Ok((column.clone(), value.clone()))
            })
            .collect::<Result<_, QueryError>>()?;
    }

    if let Some(spec) = &params.filter {
        let mode = BooleanMode::parse(params.where_boolean.as_deref());
        stmt.filter = compile(schema, spec, mode)?;
    }

    if let Some(group_by) = &params.group_by {
        stmt.group_by = group_by
            .as_slice()
            .iter()
            .map(|name| Ok(col(&schema.require(name)?.name)))
            .collect::<Result<_, QueryError>>()?;
    }

    if let Some(order_by) = &params.order_by {
        let default_sort = OneOrMany::One(DEFAULT_SORT.to_string());
        let sorts = params.order_by_sort.as_ref().unwrap_or(&default_sort);
        stmt.order_by = pair(order_by.as_slice(), sorts)
            .into_iter()
            .map(|(name, dir)| {
                let column = schema.require(name)?;
                Ok(OrderByExpr {
                    expr: col(&column.name),
                    dir: Some(parse_sort_dir(dir)?),
                })
            })
            .collect::<Result<_, QueryError>>()?;
    }

    stmt.offset = params.offset;
    stmt.limit = params.limit;

    Ok(stmt)
}

/// Base columns plus labelled aggregates.
fn projection(schema: &TableSchema, params: &QueryParams) -> Result<Vec<SelectExpr>, QueryError> {
    let mut projection = match &params.select {
        None => schema
            .columns()
            .iter()
            .map(|c| SelectExpr::new(col(&c.name)))
            .collect(),
        Some(select) => select
            .as_slice()
            .iter()
            .map(|name| Ok(SelectExpr::new(col(&schema.require(name)?.name))))
            .collect::<Result<Vec<_>, QueryError>>()?,
    };

    if let Some(aggregate) = &params.aggregate {
        let default_func = OneOrMany::One(DEFAULT_AGGREGATE.to_string());
        let funcs = params.aggregate_func.as_ref().unwrap_or(&default_func);
        for (name, func_name) in pair(aggregate.as_slice(), funcs) {
            let column = schema.require(name)?;
            let func: AggregateFunc = func_name.parse()?;
            let label = format!("{}_{}", column.name, func_name.trim());
            projection.push(func.apply(col(&column.name)).alias(&label));
        }
    }

    Ok(projection)
}
