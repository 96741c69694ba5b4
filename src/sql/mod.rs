//! Multi-dialect SQL builder.
//!
//! - [`query`]: SELECT statements
//! - [`expr`]: expression tree and combinators
//! - [`dml`]: INSERT ... SELECT
//! - [`params`]: inlining `?` bindings into SQL text
//! - [`token`]: flat token stream that dialects serialize
//! - [`dialect`]: MySQL, PostgreSQL, SQLite and SQL Server rules

pub mod dialect;
pub mod dml;
pub mod expr;
pub mod params;
pub mod query;
pub mod token;

#[cfg(test)]
pub mod test_utils;

pub use dialect::{Dialect, SqlDialect};
pub use dml::Insert;
pub use expr::{
    bind, col, exists, lit, max, min, raw_sql, star, table_col, table_star, BinaryOperator, Expr,
    ExprExt, Literal,
};
pub use params::sql_with_bindings;
pub use query::{FromItem, Join, JoinType, OrderByExpr, Query, SelectExpr, SortDir, TableRef};
pub use token::{Token, TokenStream};
