use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::debounce::DEFAULT_SEARCH_DELAY;

/// Where session and preference state is kept between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    File(PathBuf),
    /// Nothing is persisted; every run starts signed out.
    Memory,
}

/// Console configuration loaded from environment variables.
/// Fails at startup if the API base URL is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub storage: StorageLocation,
    pub search_debounce: Duration,
    pub http_timeout: Duration,
    pub rows_per_page: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let api_base_url = require_env("CONSOLE_API_BASE_URL")?;
        reqwest::Url::parse(&api_base_url)
            .with_context(|| format!("CONSOLE_API_BASE_URL '{api_base_url}' is not a valid URL"))?;

        let storage = match std::env::var("CONSOLE_STORAGE_PATH") {
            Ok(path) if path == ":memory:" => StorageLocation::Memory,
            Ok(path) => StorageLocation::File(PathBuf::from(path)),
            Err(_) => StorageLocation::File(PathBuf::from(".console/storage.json")),
        };

        Ok(Config {
            api_base_url,
            storage,
            search_debounce: Duration::from_millis(env_or(
                "SEARCH_DEBOUNCE_MS",
                DEFAULT_SEARCH_DELAY.as_millis() as u64,
            )?),
            http_timeout: Duration::from_secs(env_or("HTTP_TIMEOUT_SECS", 30)?),
            rows_per_page: env_or("ROWS_PER_PAGE", 10)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    #[cfg(test)]
    pub fn for_tests(api_base_url: &str) -> Self {
        Config {
            api_base_url: api_base_url.to_string(),
            storage: StorageLocation::Memory,
            search_debounce: DEFAULT_SEARCH_DELAY,
            http_timeout: Duration::from_secs(5),
            rows_per_page: 10,
            rust_log: "debug".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
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
    fn test_env_or_uses_default_when_unset() {
        let value: u64 = env_or("CONSOLE_TEST_UNSET_VARIABLE", 300).unwrap();
        assert_eq!(value, 300);
    }

    #[test]
    fn test_env_or_rejects_garbage() {
        std::env::set_var("CONSOLE_TEST_BAD_NUMBER", "soon");
        let err = env_or::<u32>("CONSOLE_TEST_BAD_NUMBER", 10).unwrap_err();
        assert!(err.to_string().contains("CONSOLE_TEST_BAD_NUMBER"));
    }

    #[test]
    fn test_env_or_parses_value() {
        std::env::set_var("CONSOLE_TEST_ROWS", " 25 ");
        assert_eq!(env_or::<u32>("CONSOLE_TEST_ROWS", 10).unwrap(), 25);
    }
}
