//! Service settings
//!
//! Layered as: built-in defaults, then an optional TOML file, then
//! `RAPIDCARE__SECTION__KEY` environment variables.

use anyhow::{anyhow, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "RAPIDCARE";
pub const DEFAULT_CONFIG_FILE: &str = "rapidcare";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub locator: LocatorSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocatorSettings {
    /// Result count when the caller does not ask for one
    pub default_limit: usize,
    /// Upper bound applied to caller-supplied limits
    pub max_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `dispatch_service=debug`
    pub level: String,
    pub json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locator: LocatorSettings {
                default_limit: 5,
                max_limit: 50,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                json: false,
            },
        }
    }
}

impl Settings {
    /// Load settings from `rapidcare.toml` (if present) and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        Self::finish(builder.build()?)
    }

    /// Layer an inline TOML document over the defaults. No environment lookup.
    pub fn from_toml(document: &str) -> Result<Self> {
        let builder = Self::defaults()?.add_source(File::from_str(document, FileFormat::Toml));
        Self::finish(builder.build()?)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = Settings::default();
        Ok(Config::builder()
            .set_default("locator.default_limit", defaults.locator.default_limit as i64)?
            .set_default("locator.max_limit", defaults.locator.max_limit as i64)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.json", defaults.logging.json)?)
    }

    fn finish(config: Config) -> Result<Self> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.locator.default_limit == 0 {
            return Err(anyhow!("locator.default_limit must be at least 1"));
        }
        if self.locator.default_limit > self.locator.max_limit {
            return Err(anyhow!(
                "locator.default_limit {} exceeds locator.max_limit {}",
                self.locator.default_limit,
                self.locator.max_limit
            ));
        }
        Ok(())
    }
}
