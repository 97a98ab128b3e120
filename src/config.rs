//! Configuration management for alertbus
//!
//! This module defines the `Config` struct and its sub-structs. It uses the
//! `figment` crate to layer built-in defaults, an optional TOML file and
//! `ALERTS_`-prefixed environment variables, in that order.

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::AlertCategory;
use crate::formatting::DEFAULT_TIMESTAMP_FORMAT;

/// Prefix for environment overrides, e.g. `ALERTS_LOG_LEVEL=debug`.
pub const ENV_PREFIX: &str = "ALERTS_";

/// The main configuration struct.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level handed to [`crate::logging::init_tracing`].
    pub log_level: String,
    /// Settings for the default console handler.
    pub console: ConsoleConfig,
    /// Settings for the publish/subscribe path.
    pub dispatch: DispatchConfig,
    /// Category overrides by alert type name, e.g. `error = "PaymentFailed"`.
    /// Names must be registered on the context builder.
    #[serde(default)]
    pub overrides: BTreeMap<AlertCategory, String>,
}

/// Configuration for the console handler.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// A `chrono` format string for the line timestamp.
    pub timestamp_format: String,
}

/// Configuration for alert dispatch.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DispatchConfig {
    /// Subscribe the logging listeners for the standard and registered
    /// alert types when the context is built.
    pub install_standard_listeners: bool,
}

impl Config {
    /// Loads the configuration.
    ///
    /// # Arguments
    /// * `config_path` - An optional TOML file merged over the defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        // Nested keys use a double underscore, e.g. ALERTS_CONSOLE__TIMESTAMP_FORMAT
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            console: ConsoleConfig {
                timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            },
            dispatch: DispatchConfig {
                install_standard_listeners: true,
            },
            overrides: BTreeMap::new(),
        }
    }
}
