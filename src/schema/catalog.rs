//! Metadata traits and the in-memory catalog.
//!
//! Query building needs two things from the host application: model
//! definitions (relations, scopes, order/search configuration) and the
//! column listing of a table. Both are traits so a host can back them with
//! its own registry or live schema introspection.
//!
//! # Example
//!
//! ```ignore
//! use related_plus::schema::Catalog;
//!
//! let catalog = Catalog::from_toml_str(r#"
//!     [models.Customer]
//!     table = "customers"
//!
//!     [models.Customer.relations.contact]
//!     kind = "belongs_to"
//!     related = "Contact"
//!
//!     [models.Contact]
//!
//!     [tables]
//!     contacts = ["id", "name", "email"]
//! "#)?;
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::model::ModelDefinition;
use crate::config::SettingsError;

/// Lookup of model definitions by name.
pub trait RelationMetadata {
    fn model(&self, name: &str) -> Option<&ModelDefinition>;
}

/// Column listing of a table, in declaration order.
pub trait SchemaIntrospector {
    fn column_listing(&self, table: &str) -> Vec<String>;
}

/// Everything the query facade consumes.
pub trait ModelCatalog: RelationMetadata + SchemaIntrospector {
    fn metadata(&self) -> &dyn RelationMetadata;
}

impl<T: RelationMetadata + SchemaIntrospector> ModelCatalog for T {
    fn metadata(&self) -> &dyn RelationMetadata {
        self
    }
}

/// In-memory models and table column listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    models: HashMap<String, ModelDefinition>,
    tables: HashMap<String, Vec<String>>,
}

#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    models: HashMap<String, ModelDefinition>,
    #[serde(default)]
    tables: HashMap<String, Vec<String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under its own name.
    pub fn with_model(mut self, model: ModelDefinition) -> Self {
        self.insert_model(model);
        self
    }

    /// Register the columns of a table.
    pub fn with_table(mut self, table: &str, columns: &[&str]) -> Self {
        self.tables.insert(
            table.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    pub fn insert_model(&mut self, mut model: ModelDefinition) {
        let name = model.name.clone();
        model.normalize(&name);
        self.models.insert(name, model);
    }

    /// Parse a catalog from TOML. Order and search configuration is
    /// validated while parsing.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let raw: RawCatalog = toml::from_str(content)?;
        let mut catalog = Catalog {
            models: HashMap::with_capacity(raw.models.len()),
            tables: raw.tables,
        };
        for (name, mut model) in raw.models {
            model.normalize(&name);
            catalog.models.insert(name, model);
        }
        Ok(catalog)
    }

    /// Load a catalog from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelDefinition> {
        self.models.values()
    }
}

impl RelationMetadata for Catalog {
    fn model(&self, name: &str) -> Option<&ModelDefinition> {
        self.models.get(name)
    }
}

impl SchemaIntrospector for Catalog {
    fn column_listing(&self, table: &str) -> Vec<String> {
        self.tables.get(table).cloned().unwrap_or_default()
    }
}
