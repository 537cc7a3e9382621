//! Connection settings for `PersonApi`.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:12306";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub const BASE_URL_ENV: &str = "PERSONNEL_API_URL";
pub const TIMEOUT_ENV: &str = "PERSONNEL_API_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ApiConfig {
    /// Defaults overridden by `PERSONNEL_API_URL` and
    /// `PERSONNEL_API_TIMEOUT_MS`. Unusable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(BASE_URL_ENV) {
            let url = url.trim();
            if url.is_empty() {
                log::warn!("{BASE_URL_ENV} is empty, using {}", config.base_url);
            } else {
                config.base_url = url.to_string();
            }
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.timeout = Duration::from_millis(ms),
                _ => log::warn!(
                    "ignoring {TIMEOUT_ENV}={raw:?}, using {}ms",
                    config.timeout.as_millis()
                ),
            }
        }

        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
