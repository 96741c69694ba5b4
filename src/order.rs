//! Configurable ordering.
//!
//! A model exposes named order keys (`name`, `contact`, ...) that map to
//! one or more columns. Requests name a key and a direction as free text;
//! anything invalid falls back to the configured default.
//!
//! ```text
//! RawOrder ──validate──▶ ValidatedOrder ──apply──▶ AppliedOrder
//! ```
//!
//! Columns qualified with a table prefix listed under `relations` require
//! that relation to be joined; [`AppliedOrder::relation_joins`] lists them.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigurationError;
use crate::relation::QualifiedColumn;
use crate::sql::expr::{raw_sql, Expr};
use crate::sql::query::{OrderByExpr, SortDir};

/// `column` or `table.column`; anything else is an expression.
static COLUMN_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$").unwrap());

/// Parse `asc` / `desc` in any case.
pub fn parse_direction(s: &str) -> Option<SortDir> {
    match s.trim().to_ascii_lowercase().as_str() {
        "asc" => Some(SortDir::Asc),
        "desc" => Some(SortDir::Desc),
        _ => None,
    }
}

fn direction_from_str<'de, D>(deserializer: D) -> Result<SortDir, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_direction(&s)
        .ok_or_else(|| serde::de::Error::custom(ConfigurationError::InvalidDirection(s)))
}

// ============================================================================
// Configuration
// ============================================================================

/// One column or several, ordered in sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OrderField {
    Single(String),
    Multi(Vec<String>),
}

impl OrderField {
    pub fn columns(&self) -> Vec<&str> {
        match self {
            OrderField::Single(c) => vec![c.as_str()],
            OrderField::Multi(cs) => cs.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for OrderField {
    fn from(s: &str) -> Self {
        OrderField::Single(s.into())
    }
}

impl From<Vec<&str>> for OrderField {
    fn from(v: Vec<&str>) -> Self {
        OrderField::Multi(v.into_iter().map(String::from).collect())
    }
}

/// Fallback key and direction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderDefaults {
    pub field: String,
    #[serde(default, deserialize_with = "direction_from_str")]
    pub direction: SortDir,
}

#[derive(Deserialize)]
struct RawOrderConfiguration {
    fields: HashMap<String, OrderField>,
    defaults: OrderDefaults,
    #[serde(default)]
    relations: HashMap<String, String>,
    #[serde(default)]
    with: HashMap<String, OrderField>,
}

/// Order keys of a model. Always has at least one field and a default
/// that names one of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "RawOrderConfiguration")]
pub struct OrderConfiguration {
    pub fields: HashMap<String, OrderField>,
    pub defaults: OrderDefaults,
    /// Table prefix used in order columns -> relation path to join.
    pub relations: HashMap<String, String>,
    /// Order key -> relations to eager-load.
    pub with: HashMap<String, OrderField>,
}

impl TryFrom<RawOrderConfiguration> for OrderConfiguration {
    type Error = ConfigurationError;

    fn try_from(raw: RawOrderConfiguration) -> Result<Self, Self::Error> {
        let config = OrderConfiguration {
            fields: raw.fields,
            defaults: raw.defaults,
            relations: raw.relations,
            with: raw.with,
        };
        config.validate()?;
        Ok(config)
    }
}

impl OrderConfiguration {
    pub fn new<K, F>(
        fields: impl IntoIterator<Item = (K, F)>,
        default_field: &str,
        default_direction: SortDir,
    ) -> Result<Self, ConfigurationError>
    where
        K: Into<String>,
        F: Into<OrderField>,
    {
        let config = OrderConfiguration {
            fields: fields
                .into_iter()
                .map(|(k, f)| (k.into(), f.into()))
                .collect(),
            defaults: OrderDefaults {
                field: default_field.into(),
                direction: default_direction,
            },
            relations: HashMap::new(),
            with: HashMap::new(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn relation(mut self, table_prefix: &str, relation_path: &str) -> Self {
        self.relations
            .insert(table_prefix.into(), relation_path.into());
        self
    }

    pub fn with(mut self, key: &str, relations: impl Into<OrderField>) -> Self {
        self.with.insert(key.into(), relations.into());
        self
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.fields.is_empty() {
            return Err(ConfigurationError::EmptyOrderFields);
        }
        if !self.fields.contains_key(&self.defaults.field) {
            return Err(ConfigurationError::DefaultFieldNotInFields(
                self.defaults.field.clone(),
            ));
        }
        Ok(())
    }

    /// Relation path to join for an order column, if its table prefix (or
    /// the whole column) is a configured relation.
    pub fn relation_for_column(&self, column: &str) -> Option<&str> {
        let prefix = column.split('.').next().unwrap_or(column);
        if !column.contains('.') && !self.relations.contains_key(column) {
            return None;
        }
        self.relations.get(prefix).map(String::as_str)
    }

    /// Relations eager-loaded for an order key.
    pub fn eager_loads_for(&self, key: &str) -> Vec<&str> {
        self.with.get(key).map(OrderField::columns).unwrap_or_default()
    }

    /// Relations joined for an order key.
    pub fn joins_for(&self, key: &str) -> Vec<&str> {
        let mut joins: Vec<&str> = Vec::new();
        if let Some(field) = self.fields.get(key) {
            for column in field.columns() {
                let prefix = column.split('.').next().unwrap_or(column);
                if let Some(path) = self.relations.get(prefix) {
                    if !joins.contains(&path.as_str()) {
                        joins.push(path);
                    }
                }
            }
        }
        joins
    }
}

// ============================================================================
// Typestate
// ============================================================================

/// An order request as received: free-text key and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOrder {
    pub field: String,
    pub direction: String,
}

impl RawOrder {
    pub fn new(field: &str, direction: &str) -> Self {
        Self {
            field: field.into(),
            direction: direction.into(),
        }
    }

    /// Resolve against `config`, substituting defaults for an unknown key
    /// or direction.
    pub fn validate<'c>(
        self,
        model: &str,
        config: Option<&'c OrderConfiguration>,
    ) -> Result<ValidatedOrder<'c>, ConfigurationError> {
        let config =
            config.ok_or_else(|| ConfigurationError::MissingOrderConfiguration(model.into()))?;

        let key = if config.fields.contains_key(&self.field) {
            self.field
        } else {
            config.defaults.field.clone()
        };
        let direction = parse_direction(&self.direction).unwrap_or(config.defaults.direction);

        Ok(ValidatedOrder {
            config,
            key,
            direction,
        })
    }
}

/// A key known to exist in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrder<'c> {
    config: &'c OrderConfiguration,
    pub key: String,
    pub direction: SortDir,
}

impl<'c> ValidatedOrder<'c> {
    pub fn columns(&self) -> Vec<&'c str> {
        self.config
            .fields
            .get(&self.key)
            .map(OrderField::columns)
            .unwrap_or_default()
    }

    /// Build ORDER BY items and collect the relations they need.
    pub fn apply(self) -> AppliedOrder {
        let mut order_by = Vec::new();
        let mut relation_joins: Vec<String> = Vec::new();

        for column in self.columns() {
            order_by.push(OrderByExpr::with_dir(order_expr(column), self.direction));
            if let Some(path) = self.config.relation_for_column(column) {
                if !relation_joins.iter().any(|p| p == path) {
                    relation_joins.push(path.to_string());
                }
            }
        }

        AppliedOrder {
            key: self.key,
            direction: self.direction,
            order_by,
            relation_joins,
        }
    }
}

/// ORDER BY items ready to append, plus relation paths to join first.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedOrder {
    pub key: String,
    pub direction: SortDir,
    pub order_by: Vec<OrderByExpr>,
    pub relation_joins: Vec<String>,
}

fn order_expr(column: &str) -> Expr {
    let column = column.trim();
    if COLUMN_REFERENCE.is_match(column) {
        QualifiedColumn::parse(column).to_expr()
    } else {
        raw_sql(column)
    }
}
