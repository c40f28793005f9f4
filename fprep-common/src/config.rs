//! Configuration file location and setting resolution
//!
//! Settings follow a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory name used under the platform config dir
pub const APP_DIR_NAME: &str = "fprep";

/// Which tier a resolved setting came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    CommandLine,
    Environment,
    ConfigFile,
}

impl std::fmt::Display for SettingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingSource::CommandLine => write!(f, "command line"),
            SettingSource::Environment => write!(f, "environment"),
            SettingSource::ConfigFile => write!(f, "TOML"),
        }
    }
}

/// Resolve the config file path
///
/// Priority: explicit CLI path → environment variable → platform default.
/// The platform default is returned only if the file exists; explicit paths
/// are returned as given so that a missing file surfaces as an error later.
pub fn resolve_config_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    file_name: &str,
) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if is_valid_value(&path) {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path(file_name).filter(|p| p.exists())
}

/// Platform default location: `<config_dir>/fprep/<file_name>`
///
/// On Linux, falls back to `/etc/fprep/<file_name>` when the user file is absent.
pub fn default_config_path(file_name: &str) -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(file_name));

    if cfg!(target_os = "linux") {
        if let Some(path) = &user_config {
            if path.exists() {
                return user_config;
            }
        }
        let system_config = PathBuf::from("/etc").join(APP_DIR_NAME).join(file_name);
        if system_config.exists() {
            return Some(system_config);
        }
    }

    user_config
}

/// Load and parse a TOML config file
pub fn load_toml_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;
    debug!(path = %path.display(), "Loaded TOML config");
    Ok(config)
}

/// Resolve a string setting from CLI → ENV → TOML
///
/// Empty or whitespace-only values are ignored at every tier. When more than
/// one tier supplies a value, a warning names them all and the highest
/// priority wins.
pub fn resolve_setting(
    name: &str,
    cli_value: Option<&str>,
    env_var_name: &str,
    toml_value: Option<&str>,
) -> Option<(String, SettingSource)> {
    let env_value = std::env::var(env_var_name).ok();

    let candidates = [
        (cli_value, SettingSource::CommandLine),
        (env_value.as_deref(), SettingSource::Environment),
        (toml_value, SettingSource::ConfigFile),
    ];

    let valid: Vec<(&str, SettingSource)> = candidates
        .iter()
        .filter_map(|(value, source)| value.filter(|v| is_valid_value(v)).map(|v| (v, *source)))
        .collect();

    if valid.len() > 1 {
        let sources: Vec<String> = valid.iter().map(|(_, s)| s.to_string()).collect();
        warn!(
            "{} found in multiple sources: {}. Using {} (highest priority).",
            name,
            sources.join(", "),
            valid[0].1
        );
    }

    let (value, source) = valid.into_iter().next()?;
    info!("{} loaded from {}", name, source);
    Some((value.trim().to_string(), source))
}

/// Validate a setting value (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}
