//! Model definitions: tables, relations, global scopes and the
//! order/search configuration that drives query building.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::order::OrderConfiguration;
use crate::relation::{Constraint, OrderClause, RelationKind};
use crate::search::SearchConfiguration;
use crate::sql::query::{SortDir, TableRef};

fn default_primary_key() -> String {
    "id".to_string()
}

// ============================================================================
// Relations
// ============================================================================

/// A named relation as declared on its owning model.
///
/// Keys default the usual way: a belongs-to is keyed by
/// `<relation>_<owner pk>` on the source, a has-one/has-many by
/// `<source model>_<source pk>` on the related table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RelationDefinition {
    pub kind: RelationKind,
    /// Name of the related model.
    pub related: String,
    #[serde(default)]
    pub foreign_key: Option<String>,
    /// Key on the related model (belongs-to).
    #[serde(default)]
    pub owner_key: Option<String>,
    /// Key on the source model (has-one / has-many).
    #[serde(default)]
    pub local_key: Option<String>,
    /// Alias for the related table in joins.
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub wheres: Vec<Constraint>,
    #[serde(default)]
    pub orders: Vec<OrderClause>,
}

impl RelationDefinition {
    fn new(kind: RelationKind, related: &str) -> Self {
        Self {
            kind,
            related: related.into(),
            foreign_key: None,
            owner_key: None,
            local_key: None,
            alias: None,
            wheres: Vec::new(),
            orders: Vec::new(),
        }
    }

    pub fn belongs_to(related: &str) -> Self {
        Self::new(RelationKind::BelongsTo, related)
    }

    pub fn has_one(related: &str) -> Self {
        Self::new(RelationKind::HasOne, related)
    }

    pub fn has_many(related: &str) -> Self {
        Self::new(RelationKind::HasMany, related)
    }

    pub fn foreign_key(mut self, key: &str) -> Self {
        self.foreign_key = Some(key.into());
        self
    }

    pub fn owner_key(mut self, key: &str) -> Self {
        self.owner_key = Some(key.into());
        self
    }

    pub fn local_key(mut self, key: &str) -> Self {
        self.local_key = Some(key.into());
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn constrain(mut self, constraint: Constraint) -> Self {
        self.wheres.push(constraint);
        self
    }

    pub fn order_by(mut self, column: &str, direction: SortDir) -> Self {
        self.orders.push(OrderClause::new(column, direction));
        self
    }
}

// ============================================================================
// Global scopes
// ============================================================================

/// A named filter/order applied to every query of a model until removed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GlobalScope {
    pub name: String,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub orders: Vec<OrderClause>,
}

impl GlobalScope {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
            orders: Vec::new(),
        }
    }

    pub fn constrain(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn order_by(mut self, column: &str, direction: SortDir) -> Self {
        self.orders.push(OrderClause::new(column, direction));
        self
    }

    /// Case-insensitive substring match on the scope name.
    pub fn name_contains(&self, fragment: &str) -> bool {
        self.name
            .to_lowercase()
            .contains(&fragment.to_lowercase())
    }
}

// ============================================================================
// Models
// ============================================================================

/// One entity: its table and everything queries against it may use.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelDefinition {
    /// Filled from the catalog key when loaded from TOML.
    #[serde(default)]
    pub name: String,
    /// Defaults to the pluralized snake-case model name.
    #[serde(default)]
    pub table: String,
    /// Alias used when the table appears in a FROM or JOIN.
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    #[serde(default)]
    pub relations: HashMap<String, RelationDefinition>,
    #[serde(default)]
    pub global_scopes: Vec<GlobalScope>,
    #[serde(default)]
    pub order: Option<OrderConfiguration>,
    #[serde(default)]
    pub search: Option<SearchConfiguration>,
    /// Attributes stored as NULL when blank.
    #[serde(default)]
    pub nullable: Vec<String>,
}

impl ModelDefinition {
    pub fn new(name: &str, table: &str) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            alias: None,
            primary_key: default_primary_key(),
            relations: HashMap::new(),
            global_scopes: Vec::new(),
            order: None,
            search: None,
            nullable: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn primary_key(mut self, key: &str) -> Self {
        self.primary_key = key.into();
        self
    }

    pub fn relation(mut self, name: &str, relation: RelationDefinition) -> Self {
        self.relations.insert(name.into(), relation);
        self
    }

    pub fn global_scope(mut self, scope: GlobalScope) -> Self {
        self.global_scopes.push(scope);
        self
    }

    pub fn order(mut self, order: OrderConfiguration) -> Self {
        self.order = Some(order);
        self
    }

    pub fn search(mut self, search: SearchConfiguration) -> Self {
        self.search = Some(search);
        self
    }

    pub fn nullable(mut self, columns: &[&str]) -> Self {
        self.nullable = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Name used to reference this model's table in a query.
    pub fn reference_name(&self) -> &str {
        match &self.alias {
            Some(alias) if !alias.is_empty() => alias,
            _ => &self.table,
        }
    }

    pub fn table_ref(&self) -> TableRef {
        TableRef::new(&self.table).with_alias(self.reference_name())
    }

    /// Fill in names left implicit in configuration.
    pub(crate) fn normalize(&mut self, name: &str) {
        if self.name.is_empty() {
            self.name = name.to_string();
        }
        if self.table.is_empty() {
            self.table = super::naming::default_table(&self.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_name() {
        let model = ModelDefinition::new("Contact", "contacts");
        assert_eq!(model.reference_name(), "contacts");
        assert_eq!(model.table_ref().alias, None);

        let aliased = model.with_alias("c");
        assert_eq!(aliased.reference_name(), "c");
        assert_eq!(aliased.table_ref().alias.as_deref(), Some("c"));
    }

    #[test]
    fn test_normalize_defaults() {
        let mut model: ModelDefinition = toml::from_str("").unwrap();
        model.normalize("CustomerContact");
        assert_eq!(model.name, "CustomerContact");
        assert_eq!(model.table, "customer_contacts");
        assert_eq!(model.primary_key, "id");
    }

    #[test]
    fn test_scope_name_contains() {
        let scope = GlobalScope::new("DefaultOrderScope");
        assert!(scope.name_contains("order"));
        assert!(!scope.name_contains("active"));
    }

    #[test]
    fn test_relation_from_toml() {
        let rel: RelationDefinition = toml::from_str(
            r#"
kind = "has_one"
related = "Contact"
alias = "latest_contact"
orders = [{ column = "created_at", direction = "desc" }]
"#,
        )
        .unwrap();
        assert_eq!(rel.kind, RelationKind::HasOne);
        assert_eq!(rel.orders[0].direction, SortDir::Desc);
        assert_eq!(rel.orders[0].column.column, "created_at");
    }
}
