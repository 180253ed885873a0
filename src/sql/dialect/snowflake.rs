//! Snowflake SQL dialect.
//!
//! Snowflake features:
//! - ANSI identifier quoting (`"`)
//! - Native ILIKE
//! - Unquoted identifiers fold to upper case

use super::helpers;
use super::SqlDialect;

/// Snowflake SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Snowflake;

impl SqlDialect for Snowflake {
    fn name(&self) -> &'static str {
        "snowflake"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn supports_ilike(&self) -> bool {
        true
    }
}
