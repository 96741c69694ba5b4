//! Relation-aware query building for one root model.
//!
//! [`RelatedQuery`] owns a [`Query`] over the model's table and exposes the
//! operations that need model metadata: joining relations by name,
//! configured ordering, free-text search and derived-table wrapping.
//!
//! # Example
//!
//! ```ignore
//! use related_plus::prelude::*;
//!
//! let sql = RelatedQuery::new(&catalog, "Customer")?
//!     .model_join("contact", JoinOptions::default())?
//!     .order_by_custom("contact", "desc")?
//!     .search("acme")?
//!     .to_sql(Dialect::MySql);
//! ```

use tracing::debug;

use crate::error::{BindingError, ConfigurationError};
use crate::join::{JoinBuilder, JoinOptions};
use crate::order::RawOrder;
use crate::relation::{combine_grouped, RelationPathResolver};
use crate::schema::{ModelCatalog, ModelDefinition};
use crate::search::SearchEngine;
use crate::sql::dialect::style::Placeholder;
use crate::sql::dialect::{Dialect, SqlDialect};
use crate::sql::dml::Insert;
use crate::sql::expr::{table_col, table_star, ExprExt, Literal};
use crate::sql::params::sql_with_bindings;
use crate::sql::query::{FromItem, OrderByExpr, Query};

/// Global scope removed by custom ordering.
const ORDER_SCOPE: &str = "order";

/// A query rooted at one model of a catalog.
#[derive(Clone)]
pub struct RelatedQuery<'c> {
    catalog: &'c dyn ModelCatalog,
    model: &'c ModelDefinition,
    query: Query,
    eager_loads: Vec<String>,
    removed_scopes: Vec<String>,
}

impl<'c> RelatedQuery<'c> {
    /// Start a query over `model_name`'s table.
    pub fn new(catalog: &'c dyn ModelCatalog, model_name: &str) -> Result<Self, ConfigurationError> {
        let model = catalog
            .model(model_name)
            .ok_or_else(|| ConfigurationError::UnknownModel(model_name.to_string()))?;

        Ok(Self {
            catalog,
            model,
            query: Query::new().from(model.table_ref()),
            eager_loads: Vec::new(),
            removed_scopes: Vec::new(),
        })
    }

    pub fn model(&self) -> &ModelDefinition {
        self.model
    }

    /// The query built so far, without global scopes.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Apply a plain query-builder step (select, filter, limit, ...).
    pub fn map(mut self, f: impl FnOnce(Query) -> Query) -> Self {
        self.query = f(self.query);
        self
    }

    fn reference(&self) -> &'c str {
        self.model.reference_name()
    }

    // ========================================================================
    // Joins
    // ========================================================================

    /// Join every hop of a dotted relation path.
    ///
    /// Selects `root.*` first when nothing is selected yet. With
    /// [`JoinOptions::select_related`], every listed column of each joined
    /// table is added as `alias.column AS "alias.column"`. Hops whose alias
    /// is already joined are skipped, so repeating a call is harmless.
    pub fn model_join(mut self, path: &str, options: JoinOptions) -> Result<Self, ConfigurationError> {
        let reference = self.reference();
        let hops =
            RelationPathResolver::new(self.catalog.metadata()).resolve(self.model, reference, path)?;

        for hop in hops {
            if self.query.select.is_empty() {
                self.query = self.query.select(vec![table_star(reference)]);
            }

            let alias = hop.target.alias.as_str();
            if self.is_joined(alias) {
                debug!(relation = %hop.name, alias, "relation already joined");
                continue;
            }

            if options.select_related {
                for column in self.catalog.column_listing(&hop.target.name) {
                    let label = format!("{alias}.{column}");
                    self.query = self
                        .query
                        .add_select(table_col(alias, &column).alias(&label));
                }
            }

            self.query = JoinBuilder::new(&hop, options).apply(self.query);
            debug!(
                relation = %hop.name,
                table = %hop.target.table_with_alias(),
                kind = %hop.kind,
                "relation joined"
            );
        }

        Ok(self)
    }

    fn is_joined(&self, alias: &str) -> bool {
        self.query
            .joins
            .iter()
            .any(|j| j.table.reference_name() == alias)
    }

    /// Whether a join already references `name` as a table or alias.
    pub fn has_join(&self, name: &str) -> bool {
        self.query.has_join(name)
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Order by a configured key, falling back to the defaults for an
    /// unknown key or direction.
    ///
    /// Removes the model's `order` global scope, then joins the relations
    /// the order columns need unless they are joined or eager-loaded.
    pub fn order_by_custom(mut self, field: &str, direction: &str) -> Result<Self, ConfigurationError> {
        let model = self.model;
        let applied = RawOrder::new(field, direction)
            .validate(&model.name, model.order.as_ref())?
            .apply();

        self = self.without_global_scope(ORDER_SCOPE);

        for path in &applied.relation_joins {
            if self.is_eager_loaded(path) {
                continue;
            }
            self = self.model_join(path, JoinOptions::default().select_related(false))?;
        }

        debug!(
            model = %model.name,
            key = %applied.key,
            direction = ?applied.direction,
            columns = applied.order_by.len(),
            "custom order applied"
        );
        for order in applied.order_by {
            self.query = self.query.then_order_by(order);
        }
        Ok(self)
    }

    /// Eager-load and join whatever order key `key` is configured to need,
    /// without ordering by it. Joins happen even when the relation is also
    /// eager-loaded. A model without order configuration is left unchanged.
    pub fn order_by_with(mut self, key: &str) -> Result<Self, ConfigurationError> {
        let model = self.model;
        let Some(config) = model.order.as_ref() else {
            return Ok(self);
        };

        for relation in config.eager_loads_for(key) {
            self = self.with(relation);
        }
        for path in config.joins_for(key) {
            self = self.model_join(path, JoinOptions::default().select_related(false))?;
        }
        Ok(self)
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// AND one OR-group of search conditions onto the query.
    pub fn search(mut self, text: &str) -> Result<Self, ConfigurationError> {
        let engine = SearchEngine::new(self.catalog.metadata(), self.model, self.reference());
        self.query = engine.apply(self.query, text)?;
        Ok(self)
    }

    // ========================================================================
    // Subqueries
    // ========================================================================

    /// Select from `(inner) AS table` instead of the table itself.
    ///
    /// Bound values of `inner` stay bound.
    pub fn set_subquery(mut self, inner: Query) -> Self {
        let reference = self.reference();
        self.query.from = Some(FromItem::Subquery {
            query: Box::new(inner),
            alias: reference.to_string(),
        });
        self.query = self.query.select(vec![table_star(reference)]);
        self
    }

    // ========================================================================
    // Eager loads and scopes
    // ========================================================================

    /// Record `relation` as eager-loaded.
    pub fn with(mut self, relation: &str) -> Self {
        if !self.is_eager_loaded(relation) {
            self.eager_loads.push(relation.to_string());
        }
        self
    }

    pub fn is_eager_loaded(&self, relation: &str) -> bool {
        self.eager_loads.iter().any(|r| r == relation)
    }

    pub fn eager_loads(&self) -> &[String] {
        &self.eager_loads
    }

    /// Remove the global scope `name`, if the model has one.
    ///
    /// Scope names compare case-insensitively here and in
    /// [`Self::without_global_scopes_matching`].
    pub fn without_global_scope(mut self, name: &str) -> Self {
        let model = self.model;
        let found = model
            .global_scopes
            .iter()
            .find(|s| s.name.to_lowercase() == name.to_lowercase());
        if let Some(scope) = found {
            if !self.removed_scopes.contains(&scope.name) {
                self.removed_scopes.push(scope.name.clone());
            }
        }
        self
    }

    /// Remove every global scope whose name contains `fragment`,
    /// case-insensitively.
    pub fn without_global_scopes_matching(mut self, fragment: &str) -> Self {
        let model = self.model;
        let names: Vec<&str> = model
            .global_scopes
            .iter()
            .filter(|s| s.name_contains(fragment))
            .map(|s| s.name.as_str())
            .collect();
        for name in names {
            self = self.without_global_scope(name);
        }
        self
    }

    pub fn removed_scopes(&self) -> &[String] {
        &self.removed_scopes
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// The final query: everything built so far plus the active global
    /// scopes of the root model.
    pub fn to_query(&self) -> Query {
        let reference = self.reference();
        let mut query = self.query.clone();

        let active = self
            .model
            .global_scopes
            .iter()
            .filter(|scope| !self.removed_scopes.contains(&scope.name));
        for scope in active {
            if let Some(condition) = combine_grouped(&scope.constraints, &self.model.table, reference) {
                query = query.filter(condition);
            }
            for order in &scope.orders {
                let column = order.column.qualify_if_absent(&self.model.table, reference);
                query = query.then_order_by(OrderByExpr::with_dir(column.to_expr(), order.direction));
            }
        }

        if query.select.is_empty() {
            query = query.select(vec![table_star(reference)]);
        }
        query
    }

    /// SQL with bound values inlined as escaped literals.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_query().to_sql(dialect)
    }

    /// SQL with placeholders, plus the bound values in order.
    pub fn to_sql_with_params(&self, dialect: Dialect) -> (String, Vec<Literal>) {
        self.to_query().to_sql_with_params(dialect)
    }

    /// Render with `?` placeholders and substitute the bindings.
    ///
    /// Dialects with numbered placeholders get the same result through
    /// [`Query::to_sql`].
    pub fn sql_with_bindings(&self, dialect: Dialect) -> Result<String, BindingError> {
        if dialect.placeholder_style() != Placeholder::Question {
            return Ok(self.to_sql(dialect));
        }
        let (sql, bindings) = self.to_sql_with_params(dialect);
        sql_with_bindings(&sql, &bindings, dialect)
    }

    /// `INSERT INTO table (columns) <this query>`.
    pub fn insert_select(&self, table: &str, columns: &[&str]) -> Insert {
        Insert::into(table)
            .columns(columns.iter().copied())
            .from_select(self.to_query())
    }
}

impl std::fmt::Debug for RelatedQuery<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelatedQuery")
            .field("model", &self.model.name)
            .field("query", &self.query)
            .field("eager_loads", &self.eager_loads)
            .field("removed_scopes", &self.removed_scopes)
            .finish()
    }
}
