//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.candidate-chat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::core::message::WELCOME_TEXT;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub welcome_message: Option<String>,
    /// Replaces the built-in example queries when non-empty.
    pub examples: Option<Vec<String>>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const API_URL_ENV: &str = "CANDIDATE_CHAT_API_URL";

pub const DEFAULT_EXAMPLE_QUERIES: [&str; 5] = [
    "Find software engineers with React and AWS experience",
    "Show candidates with Master's degrees from top schools",
    "Find candidates with salary expectations under $100,000",
    "Who are the project managers with technical backgrounds?",
    "Show me candidates from Brazil with Python skills",
];

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub welcome_message: String,
    pub examples: Vec<String>,
}

/// Values supplied on the command line. `None` = flag not given.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.candidate-chat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".candidate-chat").join("config.toml"))
}

/// Load config from `~/.candidate-chat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ChatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ChatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ChatConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ChatConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ChatConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ChatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# candidate-chat configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# api_url = "http://localhost:5000"     # Or set CANDIDATE_CHAT_API_URL
# request_timeout_secs = 60
# welcome_message = "Ask me about candidates."
# examples = [
#     "Find software engineers with React and AWS experience",
#     "Show me candidates from Brazil with Python skills",
# ]
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ChatConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, std::env::var(API_URL_ENV).ok())
}

fn resolve_with_env(
    config: &ChatConfig,
    cli: &CliOverrides,
    env_api_url: Option<String>,
) -> ResolvedConfig {
    // API URL: CLI → env → config → default
    let api_url = cli
        .api_url
        .clone()
        .or(env_api_url)
        .or_else(|| config.general.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let request_timeout_secs = cli
        .request_timeout_secs
        .or(config.general.request_timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let welcome_message = config
        .general
        .welcome_message
        .clone()
        .unwrap_or_else(|| WELCOME_TEXT.to_string());

    let examples = match &config.general.examples {
        Some(list) if !list.is_empty() => list.clone(),
        _ => DEFAULT_EXAMPLE_QUERIES.iter().map(|s| s.to_string()).collect(),
    };

    ResolvedConfig {
        api_url,
        request_timeout_secs,
        welcome_message,
        examples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&ChatConfig::default(), &CliOverrides::default(), None);
        assert_eq!(resolved.api_url, DEFAULT_API_URL);
        assert_eq!(resolved.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(resolved.welcome_message, WELCOME_TEXT);
        assert_eq!(resolved.examples.len(), 5);
        assert_eq!(
            resolved.examples[0],
            "Find software engineers with React and AWS experience"
        );
    }

    #[test]
    fn test_config_values_override_defaults() {
        let config = ChatConfig {
            general: GeneralConfig {
                api_url: Some("http://rag.internal:8080".to_string()),
                request_timeout_secs: Some(15),
                welcome_message: Some("Hi recruiter".to_string()),
                examples: Some(vec!["Find Go developers".to_string()]),
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), None);
        assert_eq!(resolved.api_url, "http://rag.internal:8080");
        assert_eq!(resolved.request_timeout_secs, 15);
        assert_eq!(resolved.welcome_message, "Hi recruiter");
        assert_eq!(resolved.examples, vec!["Find Go developers"]);
    }

    #[test]
    fn test_env_beats_config_and_cli_beats_env() {
        let config = ChatConfig {
            general: GeneralConfig {
                api_url: Some("http://from-config".to_string()),
                ..Default::default()
            },
        };
        let resolved =
            resolve_with_env(&config, &CliOverrides::default(), Some("http://from-env".into()));
        assert_eq!(resolved.api_url, "http://from-env");

        let cli = CliOverrides {
            api_url: Some("http://from-cli".to_string()),
            request_timeout_secs: Some(5),
        };
        let resolved = resolve_with_env(&config, &cli, Some("http://from-env".into()));
        assert_eq!(resolved.api_url, "http://from-cli");
        assert_eq!(resolved.request_timeout_secs, 5);
    }

    #[test]
    fn test_empty_examples_fall_back_to_builtins() {
        let config = ChatConfig {
            general: GeneralConfig {
                examples: Some(vec![]),
                ..Default::default()
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), None);
        assert_eq!(resolved.examples.len(), DEFAULT_EXAMPLE_QUERIES.len());
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[general]
api_url = "http://localhost:9000"
"#;
        let config: ChatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.api_url.as_deref(), Some("http://localhost:9000"));
        assert!(config.general.request_timeout_secs.is_none());
        assert!(config.general.examples.is_none());
    }

    #[test]
    fn test_full_toml_parses() {
        let toml_str = r#"
[general]
api_url = "http://localhost:9000"
request_timeout_secs = 30
welcome_message = "Welcome"
examples = ["One", "Two"]
"#;
        let config: ChatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.request_timeout_secs, Some(30));
        assert_eq!(
            config.general.examples,
            Some(vec!["One".to_string(), "Two".to_string()])
        );
    }

    #[test]
    fn test_generated_default_config_parses_as_empty() {
        let config: ChatConfig = toml::from_str(DEFAULT_CONFIG_CONTENT).unwrap();
        assert!(config.general.api_url.is_none());
    }

    #[test]
    fn test_missing_file_generates_default() {
        let dir = std::env::temp_dir().join(format!("candidate-chat-test-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.general.api_url.is_none());
        assert!(path.exists(), "default config should be written");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("candidate-chat-test-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[general\napi_url = ").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        let _ = fs::remove_dir_all(&dir);
    }
}
