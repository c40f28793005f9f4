//! Configuration resolution for fprep-lineup
//!
//! Provides multi-tier configuration resolution with CLI → ENV → TOML → default
//! priority. The TOML file is `~/.config/fprep/lineup.toml` unless a path is
//! given on the command line or in `FPREP_CONFIG`.

use crate::catalog::AuthorizationPolicy;
use crate::services::name_policy::NamePolicy;
use fprep_common::config::{load_toml_config, resolve_config_path, resolve_setting};
use fprep_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub const CONFIG_FILE_NAME: &str = "lineup.toml";
pub const ENV_CONFIG_PATH: &str = "FPREP_CONFIG";
pub const ENV_DEVELOPER_TOKEN: &str = "FPREP_DEVELOPER_TOKEN";
pub const ENV_USER_TOKEN: &str = "FPREP_USER_TOKEN";
pub const ENV_STOREFRONT: &str = "FPREP_STOREFRONT";
pub const ENV_CATALOG_URL: &str = "FPREP_CATALOG_URL";

/// Logging section of the TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Lineup extraction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineupConfig {
    pub catalog_base_url: String,
    pub storefront: String,
    pub developer_token: Option<String>,
    pub user_token: Option<String>,
    /// Catalog request quota shared by all calls
    pub requests_per_second: u32,
    /// Per-lookup deadline; expiry counts as a failed lookup
    pub lookup_timeout_ms: u64,
    pub http_timeout_secs: u64,
    /// Concurrent track fetches across artists
    pub track_fetch_concurrency: usize,
    /// Extra attempts for failed (not not-found) lookups
    pub max_lookup_retries: u32,
    pub authorization_policy: AuthorizationPolicy,
    pub name_policy: NamePolicy,
    /// Appended to the built-in noise phrase list
    pub extra_noise_phrases: Vec<String>,
    pub logging: LoggingConfig,
}

impl Default for LineupConfig {
    fn default() -> Self {
        Self {
            catalog_base_url: "https://api.music.apple.com/v1".to_string(),
            storefront: "us".to_string(),
            developer_token: None,
            user_token: None,
            requests_per_second: 20,
            lookup_timeout_ms: 10_000,
            http_timeout_secs: 30,
            track_fetch_concurrency: 4,
            max_lookup_retries: 0,
            authorization_policy: AuthorizationPolicy::Advisory,
            name_policy: NamePolicy::Containment,
            extra_noise_phrases: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub developer_token: Option<String>,
    pub storefront: Option<String>,
    pub catalog_base_url: Option<String>,
    pub track_fetch_concurrency: Option<usize>,
    pub enforce_authorization: bool,
}

impl LineupConfig {
    /// Resolve configuration from CLI overrides, environment, TOML, and defaults
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let config_path = resolve_config_path(
            overrides.config_path.as_deref(),
            ENV_CONFIG_PATH,
            CONFIG_FILE_NAME,
        );

        let mut config = match &config_path {
            Some(path) => {
                info!("Config file: {}", path.display());
                load_toml_config::<LineupConfig>(path)?
            }
            None => LineupConfig::default(),
        };

        // Defaults are not a tier of their own
        let defaults = LineupConfig::default();

        config.developer_token = resolve_setting(
            "Developer token",
            overrides.developer_token.as_deref(),
            ENV_DEVELOPER_TOKEN,
            config.developer_token.as_deref(),
        )
        .map(|(value, _)| value);

        config.user_token = resolve_setting(
            "User token",
            None,
            ENV_USER_TOKEN,
            config.user_token.as_deref(),
        )
        .map(|(value, _)| value);

        if let Some((storefront, _)) = resolve_setting(
            "Storefront",
            overrides.storefront.as_deref(),
            ENV_STOREFRONT,
            Some(config.storefront.as_str()).filter(|s| *s != defaults.storefront),
        ) {
            config.storefront = storefront;
        }

        if let Some((url, _)) = resolve_setting(
            "Catalog URL",
            overrides.catalog_base_url.as_deref(),
            ENV_CATALOG_URL,
            Some(config.catalog_base_url.as_str()).filter(|u| *u != defaults.catalog_base_url),
        ) {
            config.catalog_base_url = url;
        }

        if let Some(concurrency) = overrides.track_fetch_concurrency {
            config.track_fetch_concurrency = concurrency;
        }

        if overrides.enforce_authorization {
            config.authorization_policy = AuthorizationPolicy::Enforce;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.track_fetch_concurrency == 0 {
            return Err(Error::Config("track_fetch_concurrency must be at least 1".to_string()));
        }
        if self.requests_per_second == 0 {
            return Err(Error::Config("requests_per_second must be at least 1".to_string()));
        }
        if self.lookup_timeout_ms == 0 {
            return Err(Error::Config("lookup_timeout_ms must be at least 1".to_string()));
        }
        if self.storefront.trim().is_empty() {
            return Err(Error::Config("storefront must not be empty".to_string()));
        }
        if let NamePolicy::Similarity { threshold } = self.name_policy {
            if !(threshold > 0.0 && threshold <= 1.0) {
                return Err(Error::Config(format!(
                    "name_policy threshold must be in (0, 1], got {}",
                    threshold
                )));
            }
        }
        Ok(())
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}
