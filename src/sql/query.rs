//! Query builder - construct SELECT statements with a fluent API.

use super::dialect::{Dialect, SqlDialect};
use super::expr::{Expr, ExprExt, Literal, SortDir};
use super::token::{Token, TokenStream};

// =============================================================================
// Select Expression (column with optional alias)
// =============================================================================

/// A SELECT list item: expression with optional alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Output column name: the alias, or the bare column name.
    pub fn output_name(&self) -> Option<&str> {
        match (&self.alias, &self.expr) {
            (Some(alias), _) => Some(alias),
            (None, Expr::Column { column, .. }) => Some(column),
            _ => None,
        }
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = self.expr.to_tokens_for_dialect(dialect);
        if let Some(alias) = &self.alias {
            ts.space()
                .push(Token::As)
                .space()
                .push(Token::Ident(alias.clone()));
        }
        ts
    }
}

impl From<Expr> for SelectExpr {
    fn from(expr: Expr) -> Self {
        SelectExpr::new(expr)
    }
}

// =============================================================================
// Table Reference
// =============================================================================

/// A table reference with optional schema.
///
/// `args` turns the reference into a table-valued function call
/// (`pragma_table_info(?)` on SQLite).
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub schema: Option<String>,
    pub table: String,
    pub args: Option<Vec<Expr>>,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            schema: None,
            table: table.into(),
            args: None,
        }
    }

    /// Parse `schema.table` or `table`.
    pub fn parse(name: &str) -> Self {
        match name.split_once('.') {
            Some((schema, table)) if !schema.is_empty() && !table.is_empty() => {
                Self::new(table).with_schema(schema)
            }
            _ => Self::new(name),
        }
    }

    /// Table-valued function call: `name(args...)`.
    pub fn function(name: &str, args: Vec<Expr>) -> Self {
        Self {
            schema: None,
            table: name.into(),
            args: Some(args),
        }
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        match &self.args {
            Some(args) => {
                ts.push(Token::FunctionName(self.table.clone())).lparen();
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&arg.to_tokens_for_dialect(dialect));
                }
                ts.rparen();
            }
            None => {
                ts.push(Token::QualifiedIdent {
                    schema: self.schema.clone(),
                    name: self.table.clone(),
                });
            }
        }
        ts
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.table),
            None => write!(f, "{}", self.table),
        }
    }
}

// =============================================================================
// ORDER BY
// =============================================================================

/// An ORDER BY expression.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct OrderByExpr {
    pub expr: Expr,
    pub dir: Option<SortDir>,
}

impl OrderByExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, dir: None }
    }

    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            dir: Some(SortDir::Asc),
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            dir: Some(SortDir::Desc),
        }
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = self.expr.to_tokens_for_dialect(dialect);

        if let Some(dir) = &self.dir {
            ts.space().push(match dir {
                SortDir::Asc => Token::Asc,
                SortDir::Desc => Token::Desc,
            });
        }

        ts
    }
}

// =============================================================================
// LIMIT / OFFSET
// =============================================================================

/// LIMIT and OFFSET clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LimitOffset {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl LimitOffset {
    /// Convert to token stream using dialect-specific pagination.
    ///
    /// Delegates to `SqlDialect::emit_limit_offset()` for the actual formatting.
    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        dialect.emit_limit_offset(self.limit, self.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none()
    }
}

// =============================================================================
// Query
// =============================================================================

/// A SELECT query.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until converted to SQL with to_sql() or to_tokens()"]
pub struct Query {
    pub select: Vec<SelectExpr>,
    pub from: Option<TableRef>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit_offset: Option<LimitOffset>,
}

impl Query {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SELECT list.
    pub fn select(mut self, exprs: Vec<impl Into<SelectExpr>>) -> Self {
        self.select = exprs.into_iter().map(|e| e.into()).collect();
        self
    }

    /// SELECT *
    pub fn select_star(mut self) -> Self {
        self.select = vec![SelectExpr::new(Expr::Star)];
        self
    }

    /// Set the FROM table.
    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table);
        self
    }

    /// Add a WHERE condition (ANDed with existing conditions).
    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    /// Set the GROUP BY clause.
    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by = exprs;
        self
    }

    /// Set the ORDER BY clause.
    pub fn order_by(mut self, exprs: Vec<OrderByExpr>) -> Self {
        self.order_by = exprs;
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_offset.get_or_insert_with(LimitOffset::default).limit = Some(limit);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, offset: u64) -> Self {
        self.limit_offset.get_or_insert_with(LimitOffset::default).offset = Some(offset);
        self
    }

    /// Convert to token stream for a specific dialect.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        // SELECT
        ts.push(Token::Select);

        // Columns
        for (i, select_expr) in self.select.iter().enumerate() {
            if i == 0 {
                ts.newline().indent(1);
            } else {
                ts.comma().newline().indent(1);
            }
            ts.append(&select_expr.to_tokens_for_dialect(dialect));
        }

        // FROM
        if let Some(from) = &self.from {
            ts.newline().push(Token::From).space();
            ts.append(&from.to_tokens_for_dialect(dialect));
        }

        // WHERE
        if let Some(where_clause) = &self.where_clause {
            ts.newline().push(Token::Where).space();
            ts.append(&where_clause.to_tokens_for_dialect(dialect));
        }

        // GROUP BY
        if !self.group_by.is_empty() {
            ts.newline().push(Token::GroupBy).space();
            for (i, expr) in self.group_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&expr.to_tokens_for_dialect(dialect));
            }
        }

        // ORDER BY
        let has_paging = self
            .limit_offset
            .as_ref()
            .is_some_and(|lo| !lo.is_empty());
        let needs_order_by_placeholder =
            dialect.requires_order_by_for_offset() && self.order_by.is_empty() && has_paging;

        if !self.order_by.is_empty() {
            ts.newline().push(Token::OrderBy).space();
            for (i, order_expr) in self.order_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&order_expr.to_tokens_for_dialect(dialect));
            }
        } else if needs_order_by_placeholder {
            // OFFSET FETCH is only legal after ORDER BY. Row order is then
            // unspecified, same as a bare LIMIT elsewhere.
            ts.newline()
                .push(Token::OrderBy)
                .space()
                .lparen()
                .push(Token::Select)
                .space()
                .push(Token::Null)
                .rparen();
        }

        // LIMIT / OFFSET
        if let Some(lo) = self.limit_offset.as_ref().filter(|lo| !lo.is_empty()) {
            ts.newline();
            ts.append(&lo.to_tokens(dialect));
        }

        ts
    }

    /// Generate SQL string for a specific dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }

    /// Generate SQL with bind placeholders plus the bound values.
    pub fn to_sql_with_params(&self, dialect: Dialect) -> (String, Vec<Literal>) {
        self.to_tokens_for_dialect(dialect)
            .serialize_with_params(dialect)
    }
}

impl std::fmt::Display for Query {
    /// Formats the query using the default dialect (Postgres).
    ///
    /// For dialect-specific SQL, use [`Query::to_sql`] instead.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql(Dialect::default()))
    }
}

// =============================================================================
// Tests
// =============================================================================
