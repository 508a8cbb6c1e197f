//! Configuration schema for Healthlog.

use directories::{BaseDirs, ProjectDirs};
use healthlog_rs_core::{Category, DEFAULT_SLOT, NewHealthRecord};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fallback data directory when no platform directory is available.
const FALLBACK_DATA_DIR: &str = ".healthlog/data";

/// Root config for Healthlog.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HealthlogConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub user: UserConfig,
    #[serde(default)]
    pub form: FormDefaults,
}

impl HealthlogConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> HealthlogConfigBuilder {
        HealthlogConfigBuilder::new()
    }
}

/// Builder for assembling a `HealthlogConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct HealthlogConfigBuilder {
    config: HealthlogConfig,
}

impl HealthlogConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: HealthlogConfig::default(),
        }
    }

    /// Replace the storage configuration.
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.config.storage = storage;
        self
    }

    /// Replace the placeholder user profile.
    pub fn user(mut self, user: UserConfig) -> Self {
        self.config.user = user;
        self
    }

    /// Replace the form defaults.
    pub fn form(mut self, form: FormDefaults) -> Self {
        self.config.form = form;
        self
    }

    /// Finalize and return the built `HealthlogConfig`.
    pub fn build(self) -> HealthlogConfig {
        self.config
    }
}

/// Where the record collection is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding slot files; `~/` expands to the home directory.
    #[serde(default)]
    pub path: Option<String>,
    /// Slot name, used as the file stem.
    #[serde(default = "default_slot")]
    pub slot: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            slot: default_slot(),
        }
    }
}

impl StorageConfig {
    /// Resolve the storage directory, relative paths against `cwd`.
    pub fn resolve_root(&self, cwd: &Path) -> PathBuf {
        match self.path.as_deref() {
            Some(path) => {
                let expanded = expand_home(path);
                if expanded.is_absolute() {
                    expanded
                } else {
                    cwd.join(expanded)
                }
            }
            None => ProjectDirs::from("", "", "healthlog")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| cwd.join(FALLBACK_DATA_DIR)),
        }
    }
}

fn default_slot() -> String {
    DEFAULT_SLOT.to_string()
}

/// Expand a leading `~/` to the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(dirs) = BaseDirs::new()
    {
        return dirs.home_dir().join(rest);
    }
    PathBuf::from(path)
}

/// Placeholder profile shown in the UI header.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl UserConfig {
    /// Up to two uppercase initials of the name, or `?` when unnamed.
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect();
        if initials.is_empty() {
            "?".to_string()
        } else {
            initials
        }
    }
}

/// Values prefilled in the add-record form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDefaults {
    #[serde(default)]
    pub category: Category,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_heart_rate")]
    pub heart_rate: u32,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            category: Category::default(),
            temperature: default_temperature(),
            heart_rate: default_heart_rate(),
        }
    }
}

impl FormDefaults {
    /// Blank record carrying the defaults; date and blood pressure are empty.
    pub fn blank_record(&self) -> NewHealthRecord {
        NewHealthRecord {
            date: String::new(),
            category: self.category,
            temperature: self.temperature,
            blood_pressure: String::new(),
            heart_rate: self.heart_rate,
        }
    }
}

fn default_temperature() -> f64 {
    36.5
}

fn default_heart_rate() -> u32 {
    70
}
