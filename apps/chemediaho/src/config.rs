//! # Configuration
//!
//! Optional TOML file plus environment overrides.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [security]
//! cors_origins = "https://chemediaho.it"   # "*" for all, unset for localhost only
//! rate_limit = 100                          # requests/second, 0 disables
//!
//! [grades]
//! include_blue_grades = true
//! max_suggestions = 4
//! ```
//!
//! ## Environment Variables
//!
//! - `CHEMEDIAHO_CORS_ORIGINS`: overrides `security.cors_origins`
//! - `CHEMEDIAHO_RATE_LIMIT`: overrides `security.rate_limit`

use chemediaho_core::primitives::MAX_SUGGESTIONS;
use chemediaho_core::{BluePolicy, MediaError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding the allowed CORS origins.
pub const ENV_CORS_ORIGINS: &str = "CHEMEDIAHO_CORS_ORIGINS";

/// Environment variable overriding the rate limit.
pub const ENV_RATE_LIMIT: &str = "CHEMEDIAHO_RATE_LIMIT";

/// Maximum config file size (64 KB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

// =============================================================================
// SECTIONS
// =============================================================================

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// `[security]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Comma-separated origins, `"*"` for any; `None` means localhost only.
    pub cors_origins: Option<String>,
    /// Requests per second across all clients; 0 disables limiting.
    pub rate_limit: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cors_origins: None,
            rate_limit: 100,
        }
    }
}

/// `[grades]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradesConfig {
    /// Default blue-grade policy when a request does not say.
    pub include_blue_grades: bool,
    /// Default number of suggestions returned.
    pub max_suggestions: usize,
}

impl Default for GradesConfig {
    fn default() -> Self {
        Self {
            include_blue_grades: true,
            max_suggestions: MAX_SUGGESTIONS,
        }
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

/// Whole application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub grades: GradesConfig,
}

impl AppConfig {
    /// Parse configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml(text: &str) -> Result<Self, MediaError> {
        toml::from_str(text).map_err(|e| MediaError::ParseError(format!("Config: {}", e)))
    }

    /// Load the file (if any), then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, MediaError> {
        let config = match path {
            Some(path) => {
                let metadata = std::fs::metadata(path).map_err(|e| {
                    MediaError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
                })?;
                if metadata.len() > MAX_CONFIG_FILE_SIZE {
                    return Err(MediaError::IoError(format!(
                        "Config file size {} bytes exceeds maximum allowed {} bytes",
                        metadata.len(),
                        MAX_CONFIG_FILE_SIZE
                    )));
                }
                let text = std::fs::read_to_string(path).map_err(|e| {
                    MediaError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
                })?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };

        Ok(config.with_overrides(
            std::env::var(ENV_CORS_ORIGINS).ok(),
            std::env::var(ENV_RATE_LIMIT).ok(),
        ))
    }

    /// Apply override values as read from the environment.
    ///
    /// An unparsable rate limit is ignored with a warning.
    #[must_use]
    pub fn with_overrides(mut self, cors_origins: Option<String>, rate_limit: Option<String>) -> Self {
        if let Some(origins) = cors_origins {
            self.security.cors_origins = Some(origins);
        }
        if let Some(raw) = rate_limit {
            match raw.trim().parse() {
                Ok(rps) => self.security.rate_limit = rps,
                Err(_) => tracing::warn!("Ignoring invalid {}: '{}'", ENV_RATE_LIMIT, raw),
            }
        }
        self
    }

    /// Blue policy for requests that leave it unspecified.
    #[must_use]
    pub fn blue_policy(&self, requested: Option<bool>) -> BluePolicy {
        BluePolicy::from_include(requested.unwrap_or(self.grades.include_blue_grades))
    }
}

// =============================================================================
// TESTS
// =============================================================================
