//! Configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::types::Language;

/// Default provider.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model to use.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default pause between two queued calls in milliseconds.
pub const DEFAULT_QUEUE_COOLDOWN_MS: u64 = 500;

/// Default number of attempts for a rate-limited call.
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 4;

/// Default delay before the first retry in milliseconds.
pub const DEFAULT_RETRY_INITIAL_DELAY_MS: u64 = 4000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },
}

/// Generation provider configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// "gemini" or "fake".
    pub provider: String,
    /// API key. Calls fail with a configuration error while it is missing.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// - `GEMINI_API_KEY`: API key (optional here, required for real calls)
    /// - `MEALWISE_PROVIDER`: "gemini" | "fake" (default: "gemini")
    /// - `MEALWISE_AI_MODEL`: Model name (default: "gemini-2.5-flash")
    /// - `MEALWISE_AI_BASE_URL`: API base URL
    /// - `MEALWISE_AI_TIMEOUT_SECS`: HTTP timeout (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let provider =
            env::var("MEALWISE_PROVIDER").unwrap_or_else(|_| DEFAULT_PROVIDER.to_string());

        let model = env::var("MEALWISE_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            env::var("MEALWISE_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = parse_var("MEALWISE_AI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            provider,
            api_key,
            model,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Orchestration settings shared by the planner components.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub language: Language,
    pub queue_cooldown: Duration,
    pub retry_max_attempts: u32,
    pub retry_initial_delay: Duration,
    pub data_dir: PathBuf,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            queue_cooldown: Duration::from_millis(DEFAULT_QUEUE_COOLDOWN_MS),
            retry_max_attempts: DEFAULT_RETRY_MAX_ATTEMPTS,
            retry_initial_delay: Duration::from_millis(DEFAULT_RETRY_INITIAL_DELAY_MS),
            data_dir: Self::default_data_dir(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from environment variables.
    ///
    /// - `MEALWISE_LANGUAGE`: "es" | "en" (default: "es")
    /// - `MEALWISE_QUEUE_COOLDOWN_MS`: pause between calls (default: 500)
    /// - `MEALWISE_RETRY_MAX_ATTEMPTS`: attempts per call (default: 4)
    /// - `MEALWISE_RETRY_INITIAL_DELAY_MS`: first backoff (default: 4000)
    /// - `MEALWISE_DATA_DIR`: local data directory (default: "~/.mealwise/data")
    pub fn from_env() -> Result<Self, ConfigError> {
        let language = match env::var("MEALWISE_LANGUAGE") {
            Ok(value) => Language::from_str(&value).ok_or(ConfigError::InvalidValue {
                name: "MEALWISE_LANGUAGE".to_string(),
                value,
            })?,
            Err(_) => Language::default(),
        };

        let cooldown_ms = parse_var("MEALWISE_QUEUE_COOLDOWN_MS", DEFAULT_QUEUE_COOLDOWN_MS)?;
        let retry_max_attempts =
            parse_var("MEALWISE_RETRY_MAX_ATTEMPTS", DEFAULT_RETRY_MAX_ATTEMPTS)?;
        let initial_delay_ms = parse_var(
            "MEALWISE_RETRY_INITIAL_DELAY_MS",
            DEFAULT_RETRY_INITIAL_DELAY_MS,
        )?;

        if retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MEALWISE_RETRY_MAX_ATTEMPTS".to_string(),
                value: "0".to_string(),
            });
        }

        let data_dir = env::var("MEALWISE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_data_dir());

        Ok(Self {
            language,
            queue_cooldown: Duration::from_millis(cooldown_ms),
            retry_max_attempts,
            retry_initial_delay: Duration::from_millis(initial_delay_ms),
            data_dir,
        })
    }

    /// Get the default data directory: ~/.mealwise/data
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".mealwise").join("data"))
            .unwrap_or_else(|| PathBuf::from("data"))
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}
