//! # Related Plus
//!
//! Relation-aware SQL building: join relations by name, order by
//! configured keys and search configured columns without spelling out
//! join columns by hand.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │      Catalog (models, relations, scopes, columns)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [relation]
//! ┌─────────────────────────────────────────────────────────┐
//! │   RelationDescriptor per hop of "customer.contact"       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!            ┌─────────────┼──────────────┐
//!            ▼ [join]      ▼ [order]      ▼ [search]
//! ┌─────────────────────────────────────────────────────────┐
//! │          RelatedQuery (facade) over sql::Query           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql]
//! ┌─────────────────────────────────────────────────────────┐
//! │        MySQL / PostgreSQL / SQLite / SQL Server          │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod attributes;
pub mod config;
pub mod error;
pub mod facade;
pub mod join;
pub mod order;
pub mod relation;
pub mod schema;
pub mod search;
pub mod sql;

// Re-export SQL submodules at crate level
pub use sql::dialect;
pub use sql::dml;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::attributes::normalize_nullable;
    pub use crate::config::Settings;
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::error::{BindingError, ConfigurationError, RelatedPlusError};
    pub use crate::expr::{
        bind, col, exists, lit, raw_sql, star, table_col, table_star, Expr, ExprExt, Literal,
    };
    pub use crate::facade::RelatedQuery;
    pub use crate::join::JoinOptions;
    pub use crate::order::{OrderConfiguration, OrderField};
    pub use crate::query::{JoinType, OrderByExpr, Query, SelectExpr, SortDir, TableRef};
    pub use crate::relation::{Constraint, Operator};
    pub use crate::schema::{
        Catalog, GlobalScope, ModelCatalog, ModelDefinition, RelationDefinition,
        RelationMetadata, SchemaIntrospector,
    };
    pub use crate::search::{SearchConfiguration, SearchField};
    pub use crate::sql::sql_with_bindings;
}

// Also export at crate root for convenience
pub use dialect::Dialect;
pub use error::{RelatedPlusError, Result};
pub use facade::RelatedQuery;
pub use schema::Catalog;
