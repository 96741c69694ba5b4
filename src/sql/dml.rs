//! `INSERT INTO ... SELECT ...`, for copying the rows of a relation-aware
//! query into another table without a round trip through the client.
//!
//! ```ignore
//! use related_plus::dml::Insert;
//! use related_plus::query::{Query, TableRef};
//!
//! let insert = Insert::into("customer_snapshots")
//!     .columns(["id", "name"])
//!     .from_select(Query::new().select_star().from(TableRef::new("customers")));
//! ```

use super::dialect::Dialect;
use super::expr::Literal;
use super::query::Query;
use super::token::TokenStream;

#[derive(Debug, Clone)]
#[must_use = "statements have no effect until rendered with to_sql()"]
pub struct Insert {
    pub table: String,
    /// Target columns; empty means every column in table order.
    pub columns: Vec<String>,
    pub source: Query,
}

impl Insert {
    pub fn into(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            source: Query::new(),
        }
    }

    pub fn columns(mut self, cols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = cols.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_select(mut self, query: Query) -> Self {
        self.source = query;
        self
    }

    /// Render with bound values inlined.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens(dialect).serialize(dialect)
    }

    /// Render with placeholders plus the bound values of the SELECT.
    pub fn to_sql_with_params(&self, dialect: Dialect) -> (String, Vec<Literal>) {
        self.to_tokens(dialect).serialize_with_params(dialect)
    }

    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.keyword_space("INSERT INTO").ident(&self.table);
        if !self.columns.is_empty() {
            ts.space().lparen();
            ts.comma_separated(&self.columns, |column, ts| {
                ts.ident(column);
            });
            ts.rparen();
        }
        ts.newline();
        self.source.write_to(&mut ts, dialect);
        ts
    }
}
