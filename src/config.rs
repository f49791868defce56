//! Optional TOML configuration file.
//!
//! ```toml
//! [geocoder]
//! base_url = "https://nominatim.openstreetmap.org"
//! user_agent = "my-app/1.0 (me@example.com)"
//! timeout_secs = 30
//!
//! [resolve]
//! delay_ms = 1000
//! fallback = true
//! ```
//!
//! Every key is optional. Command line flags override file values.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::geocoder::NominatimConfig;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub geocoder: GeocoderConfig,
    pub resolve: ResolveConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct GeocoderConfig {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveConfig {
    /// Pause between geocoder requests
    pub delay_ms: Option<u64>,
    pub fallback: Option<bool>,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

impl GeocoderConfig {
    /// Nominatim settings with unset keys left at their defaults.
    pub fn to_nominatim(&self) -> NominatimConfig {
        let mut config = NominatimConfig::default();
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }
}
