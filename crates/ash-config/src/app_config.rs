//! Application configuration
//!
//! Configuration loaded from `.ash.toml` / `config.toml`.

use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Editor command (e.g., "vim", "code --wait"). Falls back to `$EDITOR`.
    #[serde(default)]
    pub editor: Option<String>,

    /// Ask before applying each change
    #[serde(default)]
    pub interactive: bool,

    /// Expect diffs fetched with whitespace-only changes hidden. Advisory:
    /// `render` warns when a diff still carries them.
    #[serde(default)]
    pub ignore_whitespace: bool,

    /// Directory for review work files
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,

    /// Review URL written into the modeline when none is given
    #[serde(default)]
    pub review_url: Option<String>,

    /// Number of activities shown in overview documents
    #[serde(default = "default_activities_limit")]
    pub activities_limit: u32,
}

fn default_temp_dir() -> String {
    env::temp_dir().join("ash").to_string_lossy().to_string()
}

fn default_activities_limit() -> u32 {
    25
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            editor: None,
            interactive: false,
            ignore_whitespace: false,
            temp_dir: default_temp_dir(),
            review_url: None,
            activities_limit: default_activities_limit(),
        }
    }
}

impl AppConfig {
    /// Load config from the first config file found, or use defaults
    pub fn load() -> Self {
        match crate::load_config_file() {
            Some(content) => Self::from_toml(&content),
            None => {
                log::debug!("Using default app config");
                Self::default()
            }
        }
    }

    /// Parse config content, falling back to defaults when it is invalid
    pub fn from_toml(content: &str) -> Self {
        match toml::from_str(content) {
            Ok(config) => {
                log::info!("Loaded app config from file");
                config
            }
            Err(e) => {
                log::warn!("Failed to parse config file: {}", e);
                Self::default()
            }
        }
    }

    /// Editor to use: the configured one, then `$VISUAL`, then `$EDITOR`, then `vi`
    pub fn editor_command(&self) -> String {
        self.editor
            .clone()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| env::var("VISUAL").ok().filter(|e| !e.trim().is_empty()))
            .or_else(|| env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| "vi".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.editor, None);
        assert!(!config.interactive);
        assert!(!config.ignore_whitespace);
        assert!(config.temp_dir.ends_with("ash"));
        assert_eq!(config.activities_limit, 25);
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            editor = "nvim"
            interactive = true
            review_url = "https://git.example.com/projects/P/repos/r/pull-requests/1"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.editor.as_deref(), Some("nvim"));
        assert!(config.interactive);
        assert_eq!(config.editor_command(), "nvim");
        // temp_dir should use default
        assert!(!config.temp_dir.is_empty());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            activities_limit = 100
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.activities_limit, 100);
        // Other fields should use defaults
        assert_eq!(
            config,
            AppConfig {
                activities_limit: 100,
                ..AppConfig::default()
            }
        );
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let config = AppConfig::from_toml("interactive = \"maybe\"");
        assert_eq!(config, AppConfig::default());
    }
}
