//! Error types.
//!
//! Configuration problems are reported as values; nothing reachable from
//! model configuration panics.

use crate::config::SettingsError;

// ============================================================================
// Error Types
// ============================================================================

/// Invalid or missing model configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Model '{model}' has no relation named '{relation}'")]
    UnknownRelation { model: String, relation: String },

    #[error("Model '{0}' has no order configuration")]
    MissingOrderConfiguration(String),

    #[error("Model '{0}' has no search configuration")]
    MissingSearchConfiguration(String),

    #[error("Default order field '{0}' is not one of the order fields")]
    DefaultFieldNotInFields(String),

    #[error("Order configuration must define at least one field")]
    EmptyOrderFields,

    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    #[error("Invalid sort direction: {0}")]
    InvalidDirection(String),

    #[error("Invalid search pattern for field '{field}': {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
}

/// `sql_with_bindings` could not pair placeholders with values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("SQL has {placeholders} placeholders but {bindings} bindings were supplied")]
    CountMismatch { placeholders: usize, bindings: usize },
}

/// Any error surfaced by this crate.
#[derive(Debug, thiserror::Error)]
pub enum RelatedPlusError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

pub type Result<T> = std::result::Result<T, RelatedPlusError>;
