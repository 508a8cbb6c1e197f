//! Layered Healthlog configuration.
//!
//! Storage location, the placeholder user profile and the add-form defaults
//! are read from JSON5 layers (user, project, cwd, runtime overrides), each
//! checked against an explicit key schema before the layers are merged and
//! decoded into [`HealthlogConfig`].

mod error;
mod loader;
mod model;

/// Config loading error.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
/// Config schema.
pub use model::{
    FormDefaults, HealthlogConfig, HealthlogConfigBuilder, StorageConfig, UserConfig,
};
