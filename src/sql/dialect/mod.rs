//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for SQL dialect differences.
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: `"` (PG/DuckDB/SQLite/Snowflake), `` ` `` (MySQL), `[]` (T-SQL)
//! - Pagination: LIMIT/OFFSET vs OFFSET FETCH
//! - Boolean literals: true/false vs 1/0
//! - Bind placeholders: `$1` vs `@P1` vs `?`
//! - Case-insensitive matching: native ILIKE vs LOWER(..) LIKE LOWER(..)
//!
//! # Usage
//!
//! ```ignore
//! use tabula::sql::dialect::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Postgres;
//! let quoted = dialect.quote_identifier("user");  // "user"
//! ```

mod duckdb;
pub mod helpers;
mod mysql;
mod postgres;
mod snowflake;
mod sqlite;
mod tsql;

pub use duckdb::DuckDb;
pub use mysql::MySql;
pub use postgres::Postgres;
pub use snowflake::Snowflake;
pub use sqlite::Sqlite;
pub use tsql::TSql;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::token::TokenStream;

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Implementations handle dialect-specific syntax differences.
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (table, column, alias).
    ///
    /// - PostgreSQL/DuckDB/SQLite/Snowflake: `"identifier"`
    /// - MySQL: `` `identifier` ``
    /// - T-SQL: `[identifier]`
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// All dialects use single quotes with `''` for escaping.
    /// Override for Unicode prefix (T-SQL N'...') or backslash escapes (MySQL).
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    ///
    /// - PostgreSQL/DuckDB/Snowflake: `true`/`false`
    /// - MySQL/T-SQL/SQLite: `1`/`0`
    fn format_bool(&self, b: bool) -> &'static str;

    /// Format a NULL literal.
    fn format_null(&self) -> &'static str {
        "NULL"
    }

    /// Format a date literal.
    ///
    /// - PostgreSQL/DuckDB/MySQL/Snowflake: `DATE 'YYYY-MM-DD'`
    /// - T-SQL/SQLite: `'YYYY-MM-DD'` (no DATE keyword)
    fn format_date_literal(&self, date: &str) -> String {
        format!("DATE {}", self.quote_string(date))
    }

    /// Format a timestamp literal.
    fn format_timestamp_literal(&self, ts: &str) -> String {
        format!("TIMESTAMP {}", self.quote_string(ts))
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Bind placeholder for the 1-based parameter `index`.
    ///
    /// - PostgreSQL: `$1`, `$2`, ...
    /// - T-SQL: `@P1`, `@P2`, ...
    /// - Everything else: `?`
    fn placeholder(&self, index: usize) -> String {
        let _ = index;
        "?".into()
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Emit LIMIT/OFFSET or equivalent pagination clause.
    ///
    /// - PostgreSQL/DuckDB/Snowflake: `LIMIT n OFFSET m` (default)
    /// - MySQL/SQLite: sentinel LIMIT when only OFFSET is given
    /// - T-SQL: `OFFSET m ROWS FETCH NEXT n ROWS ONLY` (override)
    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_standard(limit, offset)
    }

    /// Whether this dialect requires ORDER BY for OFFSET/LIMIT.
    ///
    /// T-SQL requires ORDER BY when using OFFSET FETCH.
    fn requires_order_by_for_offset(&self) -> bool {
        false
    }

    // =========================================================================
    // Pattern Matching
    // =========================================================================

    /// Whether this dialect has a native case-insensitive `ILIKE`.
    ///
    /// Dialects without it get `LOWER(col) LIKE LOWER(pattern)`.
    fn supports_ilike(&self) -> bool {
        false
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    MySql,
    Sqlite,
    TSql,
    DuckDb,
    Snowflake,
}

impl Dialect {
    /// All dialects, in declaration order.
    pub const ALL: [Dialect; 6] = [
        Dialect::Postgres,
        Dialect::MySql,
        Dialect::Sqlite,
        Dialect::TSql,
        Dialect::DuckDb,
        Dialect::Snowflake,
    ];

    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Postgres => &Postgres,
            Dialect::MySql => &MySql,
            Dialect::Sqlite => &Sqlite,
            Dialect::TSql => &TSql,
            Dialect::DuckDb => &DuckDb,
            Dialect::Snowflake => &Snowflake,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn format_null(&self) -> &'static str {
        self.dialect().format_null()
    }

    fn format_date_literal(&self, date: &str) -> String {
        self.dialect().format_date_literal(date)
    }

    fn format_timestamp_literal(&self, ts: &str) -> String {
        self.dialect().format_timestamp_literal(ts)
    }

    fn placeholder(&self, index: usize) -> String {
        self.dialect().placeholder(index)
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        self.dialect().emit_limit_offset(limit, offset)
    }

    fn requires_order_by_for_offset(&self) -> bool {
        self.dialect().requires_order_by_for_offset()
    }

    fn supports_ilike(&self) -> bool {
        self.dialect().supports_ilike()
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

/// Unknown dialect name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown SQL dialect '{0}' (expected one of postgres, mysql, sqlite, tsql, duckdb, snowflake)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlite" => Ok(Dialect::Sqlite),
            "tsql" | "mssql" | "sqlserver" => Ok(Dialect::TSql),
            "duckdb" => Ok(Dialect::DuckDb),
            "snowflake" => Ok(Dialect::Snowflake),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}
