use super::{eviction::EvictionConfig, series::SeriesConfig, traits::ConfigSection};
use crate::error::SeriesCacheError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Environment prefix for layered overrides, e.g. `SERIESCACHE_EVICTION__THRESHOLD=50`.
pub const ENV_PREFIX: &str = "SERIESCACHE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub eviction: EvictionConfig,
    pub series: SeriesConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), SeriesCacheError> {
        self.eviction.validate()?;
        self.series.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SeriesCacheError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SeriesCacheError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| SeriesCacheError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.replace(config)
    }

    /// Loads `path` and then applies `SERIESCACHE_*` environment overrides on top.
    pub fn load_layered<P: AsRef<Path>>(&self, path: P) -> Result<(), SeriesCacheError> {
        let config: AppConfig = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SeriesCacheError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| SeriesCacheError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| SeriesCacheError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update<F>(&self, f: F) -> Result<(), SeriesCacheError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        self.replace(candidate)
    }

    fn replace(&self, config: AppConfig) -> Result<(), SeriesCacheError> {
        config.validate()?;
        log::debug!(
            "config: eviction threshold={} divider={}, maximum_bar_count={:?}",
            config.eviction.threshold,
            config.eviction.divider,
            config.series.maximum_bar_count
        );
        let mut guard = self
            .config
            .write()
            .map_err(|_| SeriesCacheError::Configuration("Config lock poisoned".to_string()))?;
        *guard = config;
        Ok(())
    }
}
