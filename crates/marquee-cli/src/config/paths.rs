//! Config file location.

use std::path::PathBuf;

use anyhow::{Result, bail};

/// Application directory under the user config directory.
const APP_DIR: &str = "marquee";

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path from the process environment.
///
/// See [`resolve_config_path_with`] for the lookup order.
///
/// # Errors
///
/// Returns an error if no config directory can be determined.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    resolve_config_path_with(dir, |name| std::env::var(name).ok())
}

/// Resolves the config file path.
///
/// 1. `{dir}/config.toml` when `dir` is given.
/// 2. `$XDG_CONFIG_HOME/marquee/config.toml` when set and non-empty.
/// 3. `$HOME/.config/marquee/config.toml`.
///
/// # Errors
///
/// Returns an error if `dir` is `None` and neither variable is set.
pub fn resolve_config_path_with(
    dir: Option<&PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }

    let non_empty = |name: &str| env(name).filter(|v| !v.is_empty()).map(PathBuf::from);
    let base = match (non_empty("XDG_CONFIG_HOME"), non_empty("HOME")) {
        (Some(xdg), _) => xdg,
        (None, Some(home)) => home.join(".config"),
        (None, None) => bail!("cannot locate config directory: set HOME or pass --dir"),
    };
    Ok(base.join(APP_DIR).join(CONFIG_FILE))
}
