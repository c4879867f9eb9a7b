//! Configuration for the preference store.
//!
//! Loading priority, lowest to highest:
//! 1. Default values (hardcoded)
//! 2. Optional config file
//! 3. Environment variables (`PREF` prefix)


use std::path::PathBuf;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::Result;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one backing file per preference set.
    pub base_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./"),
        }
    }
}

impl StoreConfig {
    /// Load configuration from multiple sources with priority:
    /// 1. Defaults
    /// 2. Optional config file
    /// 3. Environment variables (highest priority)
    ///
    /// # Arguments
    /// * `config_path` - Optional path to a TOML config file
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Config::builder();

        if let Some(path) = config_path {
            config = config.add_source(File::with_name(path).required(true));
        }

        config = config.add_source(
            Environment::with_prefix("PREF")
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let settings: Self = config.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_path.as_os_str().is_empty() {
            return Err(ConfigError::Message("base_path must not be empty".to_string()).into());
        }
        Ok(())
    }
}
