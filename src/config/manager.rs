use super::{
    cache::CacheConfig, evaluation::EvaluationConfig, task::TaskConfig, traits::ConfigManifest,
    traits::ConfigSection, vm::VmConfig,
};
use crate::error::{AmlzError, Result};
use config::{Config, Environment, File, FileFormat};
use log::info;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Prefix of environment overrides, e.g. `AMLZ__VM__MAX_INSTRUCTIONS=50`.
pub const ENV_PREFIX: &str = "AMLZ";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub vm: VmConfig,
    pub evaluation: EvaluationConfig,
    pub cache: CacheConfig,
    pub task: TaskConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.vm.validate()?;
        self.evaluation.validate()?;
        self.cache.validate()?;
        self.task.validate()?;
        Ok(())
    }

    pub fn manifests(&self) -> Vec<ConfigManifest> {
        vec![
            self.vm.to_manifest(),
            self.evaluation.to_manifest(),
            self.cache.to_manifest(),
            self.task.to_manifest(),
        ]
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

    /// Loads a TOML file, then applies `AMLZ__SECTION__FIELD` overrides.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let builder = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true));
        self.install(Self::deserialize(builder)?)?;
        info!("Loaded configuration from {}", path.display());
        Ok(())
    }

    /// Loads TOML text without consulting the environment.
    pub fn load_from_str(&self, toml_text: &str) -> Result<()> {
        let builder = Config::builder().add_source(File::from_str(toml_text, FileFormat::Toml));
        self.install(Self::deserialize(builder)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_str = toml::to_string_pretty(&*self.config.read())
            .map_err(|e| AmlzError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| AmlzError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().clone()
    }

    /// Applies `f` and keeps the result only if it still validates.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write();
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }

    fn deserialize(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<AppConfig> {
        builder
            .build()
            .and_then(|settings| settings.try_deserialize::<AppConfig>())
            .map_err(|e| AmlzError::Configuration(format!("Failed to parse config: {}", e)))
    }

    fn install(&self, config: AppConfig) -> Result<()> {
        config.validate()?;
        *self.config.write() = config;
        Ok(())
    }
}
