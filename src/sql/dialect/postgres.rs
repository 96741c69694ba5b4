//! PostgreSQL: ANSI identifiers, native booleans, `$n` placeholders and
//! `ILIKE`.

use super::style::{BoolStyle, IdentQuote, Placeholder};
use super::SqlDialect;

#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn ident_quote(&self) -> IdentQuote {
        IdentQuote::Double
    }

    fn placeholder_style(&self) -> Placeholder {
        Placeholder::Dollar
    }

    fn bool_style(&self) -> BoolStyle {
        BoolStyle::Keyword
    }

    fn supports_ilike(&self) -> bool {
        true
    }
}
