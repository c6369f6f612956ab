//! Per-scenario harness configuration.
//!
//! Each scenario builds its own `HarnessConfig`; nothing is shared through
//! globals, so parallel tests never see each other's headers.

use crate::http::Headers;

pub const DEFAULT_BASE_URL: &str = "https://petstore.swagger.io/v2";

pub const BASE_URL_VAR: &str = "PETSTORE_BASE_URL";
pub const API_KEY_VAR: &str = "PETSTORE_API_KEY";

#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    base_url: String,
    default_headers: Headers,
}

impl HarnessConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers: Headers::from([("accept", "application/json")]),
        }
    }

    /// Read `PETSTORE_BASE_URL` and `PETSTORE_API_KEY` from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url);
        if let Some(key) = lookup(API_KEY_VAR) {
            config.default_headers.insert("api_key", key);
        }
        config
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_headers(&self) -> &Headers {
        &self.default_headers
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
