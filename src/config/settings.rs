//! TOML-based settings.
//!
//! Example configuration:
//! ```toml
//! dialect = "postgres"
//! catalog_path = "${APP_ROOT}/models.toml"
//!
//! [join]
//! operator = "="
//! join_type = "left"
//! select_related = true
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::join::JoinOptions;
use crate::relation::Operator;
use crate::schema::Catalog;
use crate::sql::dialect::Dialect;
use crate::sql::query::JoinType;

/// Environment variable naming the settings file.
pub const CONFIG_ENV_VAR: &str = "RELATED_PLUS_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Dialect used when rendering SQL.
    pub dialect: Dialect,

    /// Defaults for `model_join`.
    pub join: JoinSettings,

    /// Model catalog file (supports ${ENV_VAR} expansion).
    pub catalog_path: Option<String>,
}

/// Join defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct JoinSettings {
    pub operator: Operator,
    pub join_type: JoinType,
    /// Select every column of joined tables as `"alias.column"`.
    pub select_related: bool,
}

impl Default for JoinSettings {
    fn default() -> Self {
        Self {
            operator: Operator::Eq,
            join_type: JoinType::Left,
            select_related: true,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `RELATED_PLUS_CONFIG`
    /// 2. `./related_plus.toml`
    /// 3. `~/.config/related_plus/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(expand_env_vars(&path)?);
        }

        let local_config = PathBuf::from("related_plus.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("related_plus").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Load the model catalog named by `catalog_path`.
    pub fn catalog(&self) -> Result<Catalog, SettingsError> {
        let path = self
            .catalog_path
            .as_deref()
            .ok_or_else(|| SettingsError::InvalidConfig("catalog_path is not set".into()))?;
        Catalog::from_file(expand_env_vars(path)?)
    }

    /// Join options seeded from the `[join]` table.
    pub fn join_options(&self) -> JoinOptions {
        JoinOptions::default()
            .operator(self.join.operator)
            .join_type(self.join.join_type)
            .select_related(self.join.select_related)
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.peek() == Some(&'{') {
            chars.next();
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                // Lone $
                result.push('$');
                continue;
            }
            name
        };

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
