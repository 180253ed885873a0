//! MySQL SQL dialect.
//!
//! MySQL differences from ANSI:
//! - Backtick identifier quoting (`` `name` ``)
//! - Boolean is TINYINT(1), returns 1/0
//! - Backslash escapes inside string literals
//! - OFFSET is only valid after LIMIT
//! - No ILIKE (LIKE follows the column collation)

use super::helpers;
use super::SqlDialect;
use crate::sql::token::{Token, TokenStream};

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_backslash(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        // Documented idiom for "all remaining rows"
        helpers::emit_limit_offset_with_sentinel(limit, offset, Token::LitUInt(u64::MAX))
    }
}
