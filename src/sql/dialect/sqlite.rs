//! SQLite SQL dialect.
//!
//! SQLite differences from ANSI:
//! - No boolean type, uses 1/0
//! - No DATE/TIMESTAMP literal keywords (dates are text)
//! - OFFSET is only valid after LIMIT (`LIMIT -1` means unbounded)
//! - No ILIKE (LIKE is already ASCII case-insensitive)

use super::helpers;
use super::SqlDialect;
use crate::sql::token::{Token, TokenStream};

/// SQLite SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn format_date_literal(&self, date: &str) -> String {
        self.quote_string(date)
    }

    fn format_timestamp_literal(&self, ts: &str) -> String {
        self.quote_string(ts)
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_with_sentinel(limit, offset, Token::LitInt(-1))
    }
}
