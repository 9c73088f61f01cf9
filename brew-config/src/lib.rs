//! Shared configuration loader for the brew preview tools.
//!
//! `defaults/brew.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`BrewConfig`].
//!
//! The per-brew settings (which documents are brews, and their themes) are
//! user data rather than configuration and live in a JSON file handled by
//! [`store`].

pub mod store;

use brew_preview::remote::ParserCache;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use config::ConfigError;
pub use store::{Configurable, JsonSettingsStore, SettingsError};

const DEFAULT_TOML: &str = include_str!("../defaults/brew.default.toml");

/// File name picked up from the working directory when present
pub const LOCAL_CONFIG_FILE: &str = "brew.toml";

/// Top-level configuration consumed by brew applications.
#[derive(Debug, Clone, Deserialize)]
pub struct BrewConfig {
    pub remote: RemoteConfig,
    pub parser: ParserConfig,
    pub preview: PreviewConfig,
}

/// Where the Homebrewery server lives.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Location of the cached parser bundle.
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub dir: PathBuf,
    pub file_name: String,
}

impl ParserConfig {
    pub fn script_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    pub fn cache(&self) -> ParserCache {
        ParserCache::new(&self.dir, &self.file_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewConfig {
    pub renderer: String,
    pub theme: String,
    pub settings_file: PathBuf,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<BrewConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<BrewConfig, ConfigError> {
    Loader::new().build()
}
