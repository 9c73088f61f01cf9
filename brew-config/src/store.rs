//! JSON persistence for user settings

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings from '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write settings to '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load and save a settings value.
pub trait Configurable<T> {
    /// Load the stored value. An absent store yields `T::default()`.
    fn load(&self) -> Result<T, SettingsError>;

    fn save(&self, value: &T) -> Result<(), SettingsError>;
}

/// Settings kept as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> Configurable<T> for JsonSettingsStore
where
    T: Serialize + DeserializeOwned + Default,
{
    fn load(&self) -> Result<T, SettingsError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No settings file, using defaults");
                return Ok(T::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, value: &T) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(value).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json + "\n").map_err(write_err)?;
        tracing::debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brew_preview::settings::{BrewSettings, LinkedBrew};

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("brew-settings.json"));

        let settings: BrewSettings = store.load().unwrap();
        assert_eq!(settings, BrewSettings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("nested/brew-settings.json"));

        let mut settings = BrewSettings::default();
        settings.add(LinkedBrew::new("campaign/Dragons").with_theme("5eDMG"));
        store.save(&settings).unwrap();

        let loaded: BrewSettings = store.load().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn reads_plugin_style_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(
            &path,
            r#"{"linkedFiles":[{"filepath":"Dragons","theme":"5ePHB"}]}"#,
        )
        .unwrap();

        let settings: BrewSettings = JsonSettingsStore::new(&path).load().unwrap();
        assert_eq!(settings.linked_files.len(), 1);
        assert!(settings.find("Dragons.md").is_some());
    }

    #[test]
    fn invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brew-settings.json");
        fs::write(&path, "{ not json").unwrap();

        let result: Result<BrewSettings, _> = JsonSettingsStore::new(&path).load();
        assert!(matches!(result, Err(SettingsError::Parse { .. })));
    }
}
