//! `AppConfig` struct, TOML loading, and environment overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable overriding `tmdb.api_token`.
pub const ENV_API_TOKEN: &str = "TMDB_API_TOKEN";
/// Environment variable overriding `tmdb.api_key`.
pub const ENV_API_KEY: &str = "TMDB_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB access settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Share link settings.
    #[serde(default)]
    pub share: ShareConfig,
}

/// TMDB access configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// Bearer token (API read access token).
    #[serde(default)]
    pub api_token: Option<String>,
    /// v3 API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Response language.
    #[serde(default = "default_language")]
    pub language: String,
    /// API base URL override.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            api_key: None,
            language: default_language(),
            base_url: None,
        }
    }
}

/// Share link configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct ShareConfig {
    /// Page URL that share links point at.
    #[serde(default = "default_share_base_url")]
    pub base_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_share_base_url(),
        }
    }
}

fn default_language() -> String {
    String::from("en-US")
}

fn default_share_base_url() -> String {
    String::from("http://localhost:8080/")
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Applies credential overrides from the process environment.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies credential overrides from `lookup`; empty values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.tmdb.api_token = Some(token);
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.tmdb.api_key = Some(key);
        }
        self
    }
}
