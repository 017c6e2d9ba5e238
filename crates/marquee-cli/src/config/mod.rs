//! Application configuration module.
//!
//! Manages the TOML config file holding TMDB credentials, the response
//! language, and the base URL used for share links.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::resolve_config_path;
