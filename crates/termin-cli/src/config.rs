//! File-based settings for the terminal host.
//!
//! Settings are plain TOML; environment variables take precedence over
//! the file, so a `.env` alone keeps working without any file at all.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use termin_nlu::LuisConfig;

/// Contents of the optional `config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub luis: LuisConfig,
}

impl CliConfig {
    /// Loads the settings file.
    ///
    /// An explicitly named file must exist and parse. The default
    /// location is allowed to be absent; that simply means no file
    /// settings.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }

        let Some(path) = default_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::read(&path)
    }

    fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("terminbot").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_reads_luis_section() {
        // Use temporary directory for test
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[luis]
app_id = "app-1"
api_key = "key-1"
api_host_name = "westeurope.api.cognitive.microsoft.com"
"#,
        )
        .unwrap();

        let config = CliConfig::load(Some(&config_path)).expect("Should load config");
        assert_eq!(config.luis.app_id.as_deref(), Some("app-1"));
        assert!(config.luis.is_complete());
    }

    #[test]
    fn test_partial_file_leaves_missing_fields_unset() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[luis]\napp_id = \"app-1\"\n").unwrap();

        let config = CliConfig::load(Some(&config_path)).expect("Should load config");
        assert_eq!(config.luis.app_id.as_deref(), Some("app-1"));
        assert!(config.luis.api_key.is_none());
        assert!(!config.luis.is_complete());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");

        assert!(CliConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[luis\napp_id = ").unwrap();

        assert!(CliConfig::load(Some(&config_path)).is_err());
    }
}
