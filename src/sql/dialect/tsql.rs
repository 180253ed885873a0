//! T-SQL (SQL Server / Azure SQL) dialect.
//!
//! T-SQL has significant differences from ANSI:
//! - Square bracket identifier quoting (`[name]`)
//! - No boolean literals (BIT 1/0)
//! - OFFSET FETCH for pagination (requires ORDER BY)
//! - N'...' prefix for Unicode strings
//! - Named `@Pn` bind parameters
//! - No ILIKE

use super::helpers;
use super::SqlDialect;
use crate::sql::token::TokenStream;

/// T-SQL (SQL Server) dialect.
#[derive(Debug, Clone, Copy)]
pub struct TSql;

impl SqlDialect for TSql {
    fn name(&self) -> &'static str {
        "tsql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_bracket(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        // N prefix only when the literal needs it
        if !s.is_ascii() {
            helpers::quote_string_unicode(s)
        } else {
            helpers::quote_string_single(s)
        }
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn format_date_literal(&self, date: &str) -> String {
        // T-SQL doesn't support DATE 'YYYY-MM-DD' syntax
        self.quote_string(date)
    }

    fn format_timestamp_literal(&self, ts: &str) -> String {
        self.quote_string(ts)
    }

    fn placeholder(&self, index: usize) -> String {
        helpers::placeholder_at(index)
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_tsql(limit, offset)
    }

    fn requires_order_by_for_offset(&self) -> bool {
        true
    }
}
