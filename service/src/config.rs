use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use guest_phone::ExtractMode;
use serde::{Deserialize, Serialize};

use crate::guests::SearchDefaults;

/// Adapter configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. config.yaml file (if exists)
/// 3. Environment variables with GA_ prefix (always wins)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub guests: GuestsServiceConfig,
    pub match_link: MatchLinkConfig,
    #[serde(default)]
    pub search: SearchDefaults,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GuestsServiceConfig {
    /// Base URL of the guests service (required — no compiled-in default).
    #[serde(default)]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// How phone numbers are normalised before a phone search.
    #[serde(default)]
    pub extract_phone_number_by: ExtractMode,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MatchLinkConfig {
    /// Identifies this system to the guests service on patch requests.
    #[serde(default)]
    pub source_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter (debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_timeout_ms() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GuestsServiceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: default_timeout_ms(),
            extract_phone_number_by: ExtractMode::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Sources are merged in priority order:
    /// 1. Struct defaults (lowest)
    /// 2. config.yaml file (if exists)
    /// 3. Environment variables with GA_ prefix (highest)
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config.yaml")
    }

    /// Load configuration with a custom YAML file path.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(yaml_path).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(yaml_path: &str) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(Env::prefixed("GA_").split("__"))
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = &self.guests.base_url;
        if base_url.is_empty() {
            return Err(ConfigError::Validation(
                "guests.base_url is required. Set GA_GUESTS__BASE_URL environment variable or configure in config.yaml.".into(),
            ));
        }

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "guests.base_url '{base_url}' must start with http:// or https://"
            )));
        }

        if self.guests.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "guests.timeout_ms cannot be 0".into(),
            ));
        }

        if self.match_link.source_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "match_link.source_id is required. Set GA_MATCH_LINK__SOURCE_ID environment variable or configure in config.yaml.".into(),
            ));
        }

        if self.search.sort.is_empty() {
            return Err(ConfigError::Validation("search.sort cannot be empty".into()));
        }

        if self.search.limit == 0 {
            return Err(ConfigError::Validation("search.limit cannot be 0".into()));
        }

        Ok(())
    }
}
