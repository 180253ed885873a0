//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features:
//! - ANSI identifier quoting (`"`)
//! - Lowercase case folding for unquoted identifiers
//! - Native boolean type (true/false)
//! - Native ILIKE
//! - Numbered `$n` bind parameters

use super::helpers;
use super::SqlDialect;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    // Uses default emit_limit_offset (LIMIT ... OFFSET ...)

    fn placeholder(&self, index: usize) -> String {
        helpers::placeholder_dollar(index)
    }

    fn supports_ilike(&self) -> bool {
        true
    }
}
