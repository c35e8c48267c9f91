//! Fact-checker configuration.
//!
//! Configuration is an explicit immutable value built once at startup:
//! secrets come from the environment, tunables from defaults or a YAML file.
//!
//! ```yaml
//! model: gemini-2.5-flash
//! provider_timeout: 10s
//! llm_timeout: 30s
//! max_results: 5
//! endpoints:
//!   news_api: https://newsapi.org/v2
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::providers::{ApiCredential, CredentialSource, GEMINI_API_KEY_ENV};

/// Optional NewsAPI key.
pub const NEWS_API_KEY_ENV: &str = "NEWS_API_KEY";
/// Accepted alias for [`NEWS_API_KEY_ENV`].
pub const SEARCH_API_KEY_ENV: &str = "SEARCH_API_KEY";
/// Optional model override.
pub const MODEL_ENV: &str = "FACTLINE_MODEL";

/// Upper bound for `max_results`.
pub const MAX_RESULTS_LIMIT: usize = 20;

/// Configuration errors. These are fatal and reported before any retrieval.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} not set: export {var} (see https://aistudio.google.com/apikey)")]
    MissingCredential { var: &'static str, name: &'static str },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Base URLs of the external services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Endpoints {
    /// DuckDuckGo Instant Answer API
    pub instant_answer: String,
    /// DuckDuckGo HTML search
    pub web_search: String,
    /// NewsAPI v2 base
    pub news_api: String,
    /// Generative Language API base
    pub gemini: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            instant_answer: "https://api.duckduckgo.com/".to_string(),
            web_search: "https://html.duckduckgo.com/html/".to_string(),
            news_api: "https://newsapi.org/v2".to_string(),
            gemini: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

/// RSS feeds consulted for trending topics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Feeds {
    pub local: Vec<String>,
    pub international: Vec<String>,
}

impl Default for Feeds {
    fn default() -> Self {
        Self {
            local: vec![
                "https://feeds.feedburner.com/ndtvnews-latest".to_string(),
                "https://timesofindia.indiatimes.com/rssfeedstopstories.cms".to_string(),
            ],
            international: vec![
                "https://feeds.bbci.co.uk/news/rss.xml".to_string(),
                "https://rss.cnn.com/rss/edition.rss".to_string(),
            ],
        }
    }
}

/// Non-secret tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Gemini model name
    pub model: String,

    /// Per-search-provider timeout
    #[serde(with = "duration_human")]
    pub provider_timeout: Duration,

    /// Language-model call timeout
    #[serde(with = "duration_human")]
    pub llm_timeout: Duration,

    /// Evidence items kept per fact-check
    pub max_results: usize,

    /// Maximum tokens the model may generate
    pub max_tokens: u32,

    pub temperature: f32,

    pub user_agent: String,

    pub endpoints: Endpoints,

    pub feeds: Feeds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            provider_timeout: Duration::from_secs(10),
            llm_timeout: Duration::from_secs(30),
            max_results: 5,
            max_tokens: 2048,
            temperature: 0.2,
            user_agent: concat!("factline/", env!("CARGO_PKG_VERSION")).to_string(),
            endpoints: Endpoints::default(),
            feeds: Feeds::default(),
        }
    }
}

impl Settings {
    /// Parse settings from YAML. Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(invalid("model", "must not be empty"));
        }
        if self.provider_timeout.is_zero() {
            return Err(invalid("provider_timeout", "must be greater than zero"));
        }
        if self.llm_timeout.is_zero() {
            return Err(invalid("llm_timeout", "must be greater than zero"));
        }
        if !(1..=MAX_RESULTS_LIMIT).contains(&self.max_results) {
            return Err(invalid(
                "max_results",
                format!("must be between 1 and {}, got {}", MAX_RESULTS_LIMIT, self.max_results),
            ));
        }
        if self.max_tokens == 0 {
            return Err(invalid("max_tokens", "must be greater than zero"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid("temperature", format!("must be within 0-2, got {}", self.temperature)));
        }

        let urls = [
            ("endpoints.instant_answer", &self.endpoints.instant_answer),
            ("endpoints.web_search", &self.endpoints.web_search),
            ("endpoints.news_api", &self.endpoints.news_api),
            ("endpoints.gemini", &self.endpoints.gemini),
        ];
        for (field, url) in urls {
            check_url(field, url)?;
        }
        for url in self.feeds.local.iter().chain(&self.feeds.international) {
            check_url("feeds", url)?;
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

fn check_url(field: &'static str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(invalid(field, format!("must start with http:// or https://, got '{}'", url)))
    }
}

/// Everything a fact-checker needs: credentials plus settings.
#[derive(Debug)]
pub struct FactCheckConfig {
    pub gemini_api_key: ApiCredential,
    pub news_api_key: Option<ApiCredential>,
    pub settings: Settings,
}

impl FactCheckConfig {
    pub fn new(gemini_api_key: ApiCredential) -> Self {
        Self {
            gemini_api_key,
            news_api_key: None,
            settings: Settings::default(),
        }
    }

    pub fn with_news_api_key(mut self, key: ApiCredential) -> Self {
        self.news_api_key = Some(key);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Read credentials and overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let gemini = read(GEMINI_API_KEY_ENV).ok_or(ConfigError::MissingCredential {
            var: GEMINI_API_KEY_ENV,
            name: "Gemini API key",
        })?;

        let mut config = Self::new(ApiCredential::new(
            gemini,
            CredentialSource::Environment,
            "Gemini API key",
        ));

        if let Some(news) = read(NEWS_API_KEY_ENV).or_else(|| read(SEARCH_API_KEY_ENV)) {
            config.news_api_key = Some(ApiCredential::new(
                news,
                CredentialSource::Environment,
                "NewsAPI key",
            ));
        }

        if let Some(model) = read(MODEL_ENV) {
            config.settings.model = model;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gemini_api_key.is_empty() {
            return Err(ConfigError::MissingCredential {
                var: GEMINI_API_KEY_ENV,
                name: "Gemini API key",
            });
        }
        self.settings.validate()
    }

    /// The news key, if present and non-blank.
    pub fn news_api_key(&self) -> Option<&ApiCredential> {
        self.news_api_key.as_ref().filter(|k| !k.is_empty())
    }
}

/// Durations as human-readable strings ("10s", "1m 30s").
mod duration_human {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}
