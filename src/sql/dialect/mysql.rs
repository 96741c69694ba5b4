//! MySQL: backtick identifiers, `?` placeholders, TINYINT booleans.
//! Backslash is an escape character inside string literals.

use super::style::{self, IdentQuote, Placeholder};
use super::SqlDialect;

#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn ident_quote(&self) -> IdentQuote {
        IdentQuote::Backtick
    }

    fn placeholder_style(&self) -> Placeholder {
        Placeholder::Question
    }

    fn quote_string(&self, s: &str) -> String {
        style::quote_string(s, true, false)
    }
}
