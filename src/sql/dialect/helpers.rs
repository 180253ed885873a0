//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use super::super::token::{Token, TokenStream};

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres, DuckDB, SQLite, Snowflake
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quote identifier with square brackets.
/// Used by: T-SQL (SQL Server, Azure SQL)
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote string with N prefix for Unicode (T-SQL).
pub fn quote_string_unicode(s: &str) -> String {
    format!("N'{}'", s.replace('\'', "''"))
}

/// Quote string for MySQL, where backslash is an escape character
/// inside literals under the default sql_mode.
pub fn quote_string_backslash(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "''"))
}

// =============================================================================
// Boolean Formatting
// =============================================================================

/// Format boolean as literal true/false.
/// Used by: Postgres, DuckDB, Snowflake
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Format boolean as numeric 1/0.
/// Used by: T-SQL, MySQL, SQLite
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit LIMIT ... OFFSET ... (standard SQL).
/// Used by: Postgres, DuckDB, Snowflake
pub fn emit_limit_offset_standard(limit: Option<u64>, offset: Option<u64>) -> TokenStream {
    let mut ts = TokenStream::new();

    if let Some(lim) = limit {
        ts.push(Token::Limit).space().push(Token::LitUInt(lim));
    }

    if let Some(off) = offset {
        if limit.is_some() {
            ts.space();
        }
        ts.push(Token::Offset).space().push(Token::LitUInt(off));
    }

    ts
}

/// Emit LIMIT ... OFFSET ..., substituting `sentinel` as the LIMIT when only
/// an OFFSET is given.
/// Used by: MySQL (max u64), SQLite (-1)
pub fn emit_limit_offset_with_sentinel(
    limit: Option<u64>,
    offset: Option<u64>,
    sentinel: Token,
) -> TokenStream {
    match (limit, offset) {
        (None, Some(off)) => {
            let mut ts = TokenStream::new();
            ts.push(Token::Limit)
                .space()
                .push(sentinel)
                .space()
                .push(Token::Offset)
                .space()
                .push(Token::LitUInt(off));
            ts
        }
        _ => emit_limit_offset_standard(limit, offset),
    }
}

/// Emit OFFSET ... ROWS FETCH NEXT ... ROWS ONLY (T-SQL style).
/// Used by: T-SQL
/// Note: Requires ORDER BY clause in T-SQL
pub fn emit_limit_offset_tsql(limit: Option<u64>, offset: Option<u64>) -> TokenStream {
    let mut ts = TokenStream::new();

    let off = offset.unwrap_or(0);
    ts.push(Token::Offset)
        .space()
        .push(Token::LitUInt(off))
        .space()
        .push(Token::Rows);

    if let Some(lim) = limit {
        ts.space()
            .push(Token::Fetch)
            .space()
            .push(Token::Next)
            .space()
            .push(Token::LitUInt(lim))
            .space()
            .push(Token::Rows)
            .space()
            .push(Token::Only);
    }

    ts
}

// =============================================================================
// Placeholders
// =============================================================================

/// `$n` placeholders.
/// Used by: Postgres
pub fn placeholder_dollar(index: usize) -> String {
    format!("${}", index)
}

/// `@Pn` placeholders.
/// Used by: T-SQL
pub fn placeholder_at(index: usize) -> String {
    format!("@P{}", index)
}
