use std::time::Duration;

use crate::catalog::DEFAULT_TMDB_BASE_URL;
use crate::completion::DEFAULT_OPENROUTER_BASE_URL;
use crate::personas::DEFAULT_PERSONA;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(6);
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the chat service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Completion credential; without it every reply is the fixed advisory
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    /// Catalog credential; without it enrichment never matches
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub port: u16,
    pub catalog_timeout: Duration,
    pub completion_timeout: Duration,
    pub default_persona: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            openrouter_api_key: None,
            openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            tmdb_api_key: None,
            tmdb_base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            catalog_timeout: DEFAULT_CATALOG_TIMEOUT,
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
            default_persona: DEFAULT_PERSONA.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Blank values
    /// count as unset and unparsable numbers keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let seconds = |key: &str, default: Duration| {
            non_blank(key)
                .and_then(|value| value.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        let defaults = Self::default();
        Self {
            openrouter_api_key: non_blank("OPENROUTER_API_KEY"),
            openrouter_base_url: non_blank("OPENROUTER_BASE_URL")
                .unwrap_or(defaults.openrouter_base_url),
            tmdb_api_key: non_blank("TMDB_API_KEY"),
            tmdb_base_url: non_blank("TMDB_BASE_URL").unwrap_or(defaults.tmdb_base_url),
            port: non_blank("PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            catalog_timeout: seconds("CATALOG_TIMEOUT_SECS", defaults.catalog_timeout),
            completion_timeout: seconds("COMPLETION_TIMEOUT_SECS", defaults.completion_timeout),
            default_persona: non_blank("DEFAULT_PERSONA").unwrap_or(defaults.default_persona),
        }
    }
}
