//! # Configuration
//!
//! The persisted settings of the CLI, stored as pretty JSON in the platform config directory.
//!
//! The `mode` stored here is the process-level debug mode every call starts from. A missing or
//! unreadable file yields the defaults, which keep debugging shut down.
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use standin_core::{DebugMode, EnvelopeKeys};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub mode: DebugMode,
    pub envelope: EnvelopeKeys,
    pub timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: DebugMode::Shutdown,
            envelope: EnvelopeKeys::default(),
            timeout_secs: None,
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "standin", "standin")
            .context("Could not determine config directory")?;
        let config_dir = proj_dirs.config_dir();
        fs::create_dir_all(config_dir)
            .with_context(|| format!("Could not create '{}'", config_dir.display()))?;

        Ok(Self::at(config_dir.join("config.json")))
    }

    pub fn at(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            return Ok(AppConfig::default());
        }
        let content = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Could not read '{}'", self.config_path.display()))?;
        let config = serde_json::from_str(&content).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "config file is not valid, using defaults");
            AppConfig::default()
        });
        Ok(config)
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, content)
            .with_context(|| format!("Could not write '{}'", self.config_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::at(dir.path().join("config.json"));

        assert_eq!(manager.load().unwrap(), AppConfig::default());
        assert_eq!(manager.load().unwrap().mode, DebugMode::Shutdown);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::at(dir.path().join("config.json"));
        let config = AppConfig {
            mode: DebugMode::Option,
            envelope: EnvelopeKeys {
                success_code: "0".to_string(),
                ..EnvelopeKeys::default()
            },
            timeout_secs: Some(5),
        };

        manager.save(&config).unwrap();

        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn test_partial_and_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let manager = ConfigManager::at(path.clone());

        fs::write(&path, r#"{"mode": "auto", "envelope": {"msg": "message"}}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.mode, DebugMode::Auto);
        assert_eq!(config.envelope.msg, "message");
        assert_eq!(config.envelope.code, "code");

        fs::write(&path, "not json").unwrap();
        assert_eq!(manager.load().unwrap(), AppConfig::default());
    }
}
