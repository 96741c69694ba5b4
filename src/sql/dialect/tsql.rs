//! SQL Server (T-SQL).
//!
//! - `[name]` identifiers
//! - `@pn` placeholders
//! - `OFFSET ... FETCH` pagination, which is only valid after ORDER BY
//! - `N'...'` for strings outside ASCII

use super::style::{self, IdentQuote, Pagination, Placeholder};
use super::SqlDialect;

#[derive(Debug, Clone, Copy)]
pub struct TSql;

impl SqlDialect for TSql {
    fn name(&self) -> &'static str {
        "tsql"
    }

    fn ident_quote(&self) -> IdentQuote {
        IdentQuote::Bracket
    }

    fn placeholder_style(&self) -> Placeholder {
        Placeholder::AtP
    }

    fn pagination(&self) -> Pagination {
        Pagination::OffsetFetch
    }

    fn quote_string(&self, s: &str) -> String {
        style::quote_string(s, false, !s.is_ascii())
    }
}
