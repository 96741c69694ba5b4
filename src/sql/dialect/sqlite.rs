use super::style::{IdentQuote, Placeholder};
use super::SqlDialect;

/// SQLite: ANSI identifiers, `?` placeholders, integer booleans.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn ident_quote(&self) -> IdentQuote {
        IdentQuote::Double
    }

    fn placeholder_style(&self) -> Placeholder {
        Placeholder::Question
    }
}
