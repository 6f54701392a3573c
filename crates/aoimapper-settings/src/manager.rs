//! Settings file location and lifecycle.

use crate::config::Config;
use crate::error::{SettingsError, SettingsResult};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "aoimapper";
const CONFIG_FILE: &str = "config.toml";

/// Owns the loaded [`Config`] and the directory it came from.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    dir: PathBuf,
    config: Config,
}

impl SettingsManager {
    /// Load settings from the platform config directory, creating it if
    /// needed.
    pub fn new() -> SettingsResult<Self> {
        Self::with_config_dir(Self::ensure_config_dir()?)
    }

    /// Load settings from `dir/config.toml`. A missing or invalid file
    /// yields defaults; only directory problems are errors.
    pub fn with_config_dir(dir: impl Into<PathBuf>) -> SettingsResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(SettingsError::create_dir(&dir))?;
        let config = Self::load_or_default(&dir.join(CONFIG_FILE));
        Ok(Self { dir, config })
    }

    /// `<platform config dir>/aoimapper`, falling back to the home
    /// directory.
    pub fn default_config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .map(|base| base.join(APP_DIR))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Resolve and create the default config directory.
    pub fn ensure_config_dir() -> SettingsResult<PathBuf> {
        let dir = Self::default_config_dir()?;
        std::fs::create_dir_all(&dir).map_err(SettingsError::create_dir(&dir))?;
        Ok(dir)
    }

    fn load_or_default(path: &Path) -> Config {
        if !path.exists() {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Config::default();
        }
        match Config::load_from_file(path) {
            Ok(config) => {
                tracing::info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring settings at {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_file_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Where the feature store file lives.
    pub fn store_file(&self) -> PathBuf {
        self.config.storage.store_file(&self.dir)
    }

    /// Write the current config to `config.toml`.
    pub fn save(&self) -> SettingsResult<()> {
        let path = self.config_file_path();
        self.config.save_to_file(&path)?;
        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Re-read `config.toml`, replacing in-memory changes.
    pub fn reload(&mut self) {
        self.config = Self::load_or_default(&self.config_file_path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = SettingsManager::with_config_dir(temp.path()).unwrap();
        assert_eq!(manager.config(), &Config::default());
        assert_eq!(manager.store_file(), temp.path().join("map-store.json"));
    }

    #[test]
    fn test_creates_nested_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");
        let manager = SettingsManager::with_config_dir(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(manager.config_file_path(), dir.join("config.toml"));
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let mut manager = SettingsManager::with_config_dir(temp.path()).unwrap();
        manager.config_mut().viewport.default_zoom = 15;
        manager.save().unwrap();

        manager.config_mut().viewport.default_zoom = 3;
        manager.reload();
        assert_eq!(manager.config().viewport.default_zoom, 15);

        let fresh = SettingsManager::with_config_dir(temp.path()).unwrap();
        assert_eq!(fresh.config().viewport.default_zoom, 15);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.toml"), "viewport = 'nope'").unwrap();
        let manager = SettingsManager::with_config_dir(temp.path()).unwrap();
        assert_eq!(manager.config(), &Config::default());
    }
}
