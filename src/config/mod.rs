//! Configuration: dialect, join defaults and where the model catalog lives.

mod settings;

pub use settings::{expand_env_vars, JoinSettings, Settings, SettingsError};
