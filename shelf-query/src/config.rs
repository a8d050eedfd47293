//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: SHELF_, nested keys separated by `__`)
//! 2. A TOML file: `./shelf.toml`, or the path given to [`Config::load_from`]
//! 3. Default values
//!
//! ```toml
//! [service]
//! name = "bookshelf"
//! log_level = "debug"
//!
//! [paging]
//! default_page_size = 20
//! max_page_size = 100
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Default config file looked up by [`Config::load`]
pub const DEFAULT_CONFIG_FILE: &str = "shelf.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Paging configuration
    #[serde(default)]
    pub paging: PagingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Paging defaults and limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Page size used when a request does not name one
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,

    /// Largest page size a request may ask for; unlimited when unset
    #[serde(default)]
    pub max_page_size: Option<i64>,
}

impl PagingConfig {
    /// Check the paging settings are usable
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] when `default_page_size < 1` or
    /// `max_page_size < default_page_size`.
    pub fn validate(&self) -> Result<()> {
        if self.default_page_size < 1 {
            return Err(Error::InvalidConfig(format!(
                "paging.default_page_size must be >= 1, got {}",
                self.default_page_size
            )));
        }
        if let Some(max) = self.max_page_size {
            if max < self.default_page_size {
                return Err(Error::InvalidConfig(format!(
                    "paging.max_page_size ({}) is below paging.default_page_size ({})",
                    max, self.default_page_size
                )));
            }
        }
        Ok(())
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> i64 {
    10
}

impl Config {
    /// Load configuration from defaults, `./shelf.toml` and the environment
    ///
    /// A missing `shelf.toml` is not an error.
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a specific file
    ///
    /// Environment variables (SHELF_ prefix) still override the file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!("Loading configuration from: {}", path.display());
        } else {
            tracing::debug!("No configuration file at {}, using defaults", path.display());
        }

        let config: Self = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("SHELF_").split("__"))
            .extract()?;

        config.paging.validate()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "shelf".to_string(),
                log_level: default_log_level(),
            },
            paging: PagingConfig::default(),
        }
    }
}
