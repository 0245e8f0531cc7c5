// Configuration loading (config/dugout.toml, environment override).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Base URL used when neither a config file nor the environment override
/// is present. Matches the backend's default local deployment.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/baseball";

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV: &str = "DUGOUT_API_URL";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSection {
    /// Base URL of the backend; the three endpoint paths hang off it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiSection {
    fn default() -> Self {
        ApiSection {
            base_url: default_base_url(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiSection::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load configuration from `config/dugout.toml` under `base_dir`.
///
/// The file is optional; defaults apply when it is absent. The
/// `DUGOUT_API_URL` environment variable takes precedence over both.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("dugout.toml");

    let mut config = if path.exists() {
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?
    } else {
        Config::default()
    };

    if let Ok(url) = std::env::var(BASE_URL_ENV) {
        if !url.is_empty() {
            config.api.base_url = url;
        }
    }

    validate(&config)?;
    Ok(config)
}

/// Load configuration relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::ReadError {
        path: PathBuf::from("."),
        source: e,
    })?;
    load_config_from(&cwd)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = config.api.base_url.trim();
    if url.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".to_string(),
            message: "must not be empty".to_string(),
        });
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".to_string(),
            message: format!("must start with http:// or https:// (got `{url}`)"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_file() {
        let dir = std::env::temp_dir().join("dugout-config-test-empty");
        std::fs::create_dir_all(&dir).unwrap();
        // Only meaningful when the override is unset in the test env.
        if std::env::var(BASE_URL_ENV).is_err() {
            let config = load_config_from(&dir).unwrap();
            assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        }
    }

    #[test]
    fn file_overrides_default() {
        let dir = std::env::temp_dir().join("dugout-config-test-file");
        std::fs::create_dir_all(dir.join("config")).unwrap();
        std::fs::write(
            dir.join("config").join("dugout.toml"),
            "[api]\nbase_url = \"http://stats.example:9000/api/baseball\"\n",
        )
        .unwrap();
        if std::env::var(BASE_URL_ENV).is_err() {
            let config = load_config_from(&dir).unwrap();
            assert_eq!(config.api.base_url, "http://stats.example:9000/api/baseball");
        }
    }

    #[test]
    fn validate_rejects_non_http_url() {
        let config = Config {
            api: ApiSection {
                base_url: "ftp://nope".to_string(),
            },
        };
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn validate_rejects_empty_url() {
        let config = Config {
            api: ApiSection {
                base_url: "  ".to_string(),
            },
        };
        assert!(validate(&config).is_err());
    }
}
