//! Configuration management for parley.
//!
//! Loads configuration from ${PARLEY_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Backend service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the chat backend.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Session directory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Seconds between session list polls.
    pub poll_interval_secs: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
        }
    }
}

/// Attachment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentsConfig {
    /// Maximum size of a single staged file in bytes.
    pub max_attachment_bytes: u64,
}

impl Default for AttachmentsConfig {
    fn default() -> Self {
        Self {
            max_attachment_bytes: crate::attachments::DEFAULT_MAX_ATTACHMENT_BYTES,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub directory: DirectoryConfig,
    pub attachments: AttachmentsConfig,
}

impl Config {
    /// Loads configuration from disk, falling back to defaults when the
    /// config file does not exist.
    pub fn load() -> Result<Self> {
        let path = paths::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("read config from {}", path.display()))?;
        let merged = merge_with_template(&content)?;
        toml::from_str(&merged).with_context(|| format!("parse config at {}", path.display()))
    }

    /// Writes the default config template if no config file exists yet.
    ///
    /// Returns the config path and whether a file was written.
    pub fn init() -> Result<(PathBuf, bool)> {
        let path = paths::config_path();
        if path.exists() {
            return Ok((path, false));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
        fs::write(&path, default_config_template())
            .with_context(|| format!("write config to {}", path.display()))?;
        Ok((path, true))
    }
}

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges user config values into the default template.
///
/// This ensures new comments/sections from the template are always present,
/// while preserving user's customized values.
fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("parse default config template")?;

    let user_doc: DocumentMut = user_config.parse().context("parse user config")?;

    merge_items(doc.as_table_mut(), user_doc.as_table());

    Ok(doc.to_string())
}

/// Recursively merges items from source table into target table.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source.iter() {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for parley configuration and data directories.
    //!
    //! PARLEY_HOME resolution order:
    //! 1. PARLEY_HOME environment variable (if set)
    //! 2. ~/.config/parley (default)

    use std::path::PathBuf;

    /// Returns the parley home directory.
    pub fn parley_home() -> PathBuf {
        if let Ok(home) = std::env::var("PARLEY_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("parley"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        parley_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn log_dir() -> PathBuf {
        parley_home().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert_eq!(config.directory.poll_interval_secs, 5);
        assert_eq!(config.attachments.max_attachment_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config: Config = toml::from_str(default_config_template()).unwrap();
        assert_eq!(config.backend.base_url, Config::default().backend.base_url);
        assert_eq!(
            config.directory.poll_interval_secs,
            Config::default().directory.poll_interval_secs
        );
    }

    #[test]
    fn test_merge_preserves_user_values() {
        let user = r#"
[backend]
base_url = "https://chat.example.com"
"#;
        let merged = merge_with_template(user).unwrap();
        let config: Config = toml::from_str(&merged).unwrap();
        assert_eq!(config.backend.base_url, "https://chat.example.com");
        // Untouched sections keep template defaults.
        assert_eq!(config.directory.poll_interval_secs, 5);
    }

    #[test]
    fn test_merge_rejects_malformed_user_config() {
        assert!(merge_with_template("backend = [not toml").is_err());
    }
}
