//! CLI configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// CLI configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// Output formatting
    #[serde(default)]
    pub output: OutputConfig,

    /// Values used when a flag is omitted
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl CliConfig {
    /// Load configuration from file
    ///
    /// A missing file is not an error; the defaults apply.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: CliConfig = toml::from_str(content)?;
        Ok(config)
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Print encoded messages in upper-case hex
    #[serde(default)]
    pub uppercase: bool,

    /// Print decoded secret bytes instead of only their lengths
    #[serde(default)]
    pub reveal_secrets: bool,
}

/// Default values configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    /// User id for `encode` when `--user-id` is not given
    #[serde(default = "default_user_id")]
    pub user_id: u32,
}

fn default_user_id() -> u32 {
    0
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(!config.output.uppercase);
        assert!(!config.output.reveal_secrets);
        assert_eq!(config.defaults.user_id, 0);
    }

    #[test]
    fn test_parse_full() {
        let config = CliConfig::parse(
            r#"
            [output]
            uppercase = true
            reveal_secrets = true

            [defaults]
            user_id = 3857
            "#,
        )
        .unwrap();

        assert!(config.output.uppercase);
        assert!(config.output.reveal_secrets);
        assert_eq!(config.defaults.user_id, 3857);
    }

    #[test]
    fn test_parse_partial() {
        let config = CliConfig::parse("[defaults]\nuser_id = 9\n").unwrap();
        assert!(!config.output.uppercase);
        assert_eq!(config.defaults.user_id, 9);
    }

    #[test]
    fn test_parse_rejects_bad_type() {
        assert!(CliConfig::parse("[defaults]\nuser_id = \"nine\"\n").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = CliConfig::load("/nonexistent/keyguard.toml").unwrap();
        assert_eq!(config.defaults.user_id, 0);
    }
}
