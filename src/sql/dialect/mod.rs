//! SQL dialects.
//!
//! Each dialect implements [`SqlDialect`] by choosing a rendering style
//! for identifiers, booleans, placeholders and pagination:
//!
//! | dialect  | identifiers | booleans | placeholders | pagination      |
//! |----------|-------------|----------|--------------|-----------------|
//! | MySQL    | `` `x` ``   | 1/0      | `?`          | LIMIT/OFFSET    |
//! | Postgres | `"x"`       | true/false | `$n`       | LIMIT/OFFSET    |
//! | SQLite   | `"x"`       | 1/0      | `?`          | LIMIT/OFFSET    |
//! | T-SQL    | `[x]`       | 1/0      | `@pn`        | OFFSET/FETCH    |
//!
//! ```ignore
//! use related_plus::dialect::{Dialect, SqlDialect};
//!
//! assert_eq!(Dialect::TSql.quote_identifier("order"), "[order]");
//! ```

mod mysql;
mod postgres;
mod sqlite;
pub mod style;
mod tsql;

pub use mysql::MySql;
pub use postgres::Postgres;
pub use sqlite::Sqlite;
pub use tsql::TSql;

use serde::{Deserialize, Serialize};

use style::{BoolStyle, IdentQuote, Pagination, Placeholder};

/// Rendering rules of one SQL dialect.
pub trait SqlDialect: std::fmt::Debug {
    /// Lower-case name, as written in configuration files.
    fn name(&self) -> &'static str;

    fn ident_quote(&self) -> IdentQuote;

    fn placeholder_style(&self) -> Placeholder;

    fn bool_style(&self) -> BoolStyle {
        BoolStyle::Numeric
    }

    fn pagination(&self) -> Pagination {
        Pagination::LimitOffset
    }

    /// Whether `ILIKE` exists. Others fall back to `LIKE`, which is
    /// case-insensitive under their default collations.
    fn supports_ilike(&self) -> bool {
        false
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.ident_quote().quote(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        style::quote_string(s, false, false)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.bool_style().format(b)
    }

    /// Placeholder for the bound value at zero-based `index`.
    fn placeholder(&self, index: usize) -> String {
        self.placeholder_style().render(index)
    }
}

/// Supported SQL dialects. MySQL is the default connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    MySql,
    Postgres,
    Sqlite,
    TSql,
}

impl Dialect {
    /// The concrete dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::MySql => &MySql,
            Dialect::Postgres => &Postgres,
            Dialect::Sqlite => &Sqlite,
            Dialect::TSql => &TSql,
        }
    }
}

impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn ident_quote(&self) -> IdentQuote {
        self.dialect().ident_quote()
    }

    fn placeholder_style(&self) -> Placeholder {
        self.dialect().placeholder_style()
    }

    fn bool_style(&self) -> BoolStyle {
        self.dialect().bool_style()
    }

    fn pagination(&self) -> Pagination {
        self.dialect().pagination()
    }

    fn supports_ilike(&self) -> bool {
        self.dialect().supports_ilike()
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
