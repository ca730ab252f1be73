use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_APIFY_BASE_URL: &str = "https://api.apify.com/v2";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub apify_api_token: String,
    pub apify_base_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub poll_interval_secs: u64,
    pub max_polls: u32,
    /// Region searched when a request does not name one.
    pub default_location: String,
    /// Search terms used when the model's keyword list yields nothing usable.
    pub fallback_keywords: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            apify_api_token: require_env("APIFY_API_TOKEN")?,
            apify_base_url: std::env::var("APIFY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_APIFY_BASE_URL.to_string()),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            poll_interval_secs: parse_env("SCRAPE_POLL_INTERVAL_SECS", 2)?,
            max_polls: parse_env("SCRAPE_MAX_POLLS", 150)?,
            default_location: std::env::var("DEFAULT_JOB_LOCATION")
                .unwrap_or_else(|_| "Sri Lanka".to_string()),
            fallback_keywords: std::env::var("FALLBACK_KEYWORDS")
                .unwrap_or_else(|_| "Software Engineer".to_string()),
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            apify_api_token: "test-token".to_string(),
            apify_base_url: DEFAULT_APIFY_BASE_URL.to_string(),
            anthropic_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            poll_interval_secs: 2,
            max_polls: 150,
            default_location: "Sri Lanka".to_string(),
            fallback_keywords: "Software Engineer".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u32 = parse_env("SCOUT_TEST_SURELY_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("SCOUT_TEST_BAD_NUMBER", "two");
        let result: Result<u64> = parse_env("SCOUT_TEST_BAD_NUMBER", 2);
        assert!(result.is_err());
        std::env::remove_var("SCOUT_TEST_BAD_NUMBER");
    }
}
