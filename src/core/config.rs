use super::options::{ApiLayerSettings, EcbSettings, Options};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

pub const APILAYER_KEY_ENV: &str = "APILAYER_ACCESS_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EcbProviderConfig {
    pub base_url: Option<String>,
    #[serde(flatten)]
    pub options: Options<EcbSettings>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiLayerProviderConfig {
    pub base_url: Option<String>,
    #[serde(flatten)]
    pub options: Options<ApiLayerSettings>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    pub ecb: Option<EcbProviderConfig>,
    pub apilayer: Option<ApiLayerProviderConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Per-provider deadline in seconds.
    pub timeout_secs: Option<u64>,
    pub max_concurrency: Option<usize>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "fxrates", "fxrates")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.apply_env();
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn apply_env(&mut self) {
        if let Some(apilayer) = self.providers.apilayer.as_mut() {
            if apilayer.options.credential.is_none() {
                apilayer.options.credential = std::env::var(APILAYER_KEY_ENV).ok();
            }
        }
    }
}

pub const DEFAULT_CONFIG: &str = r#"---
providers:
  ecb:
    currencies: ["EUR", "USD", "CHF", "HKD"]
    settings:
      history: ninety_days
  # apilayer:
  #   credential: "<access key>"
  #   currencies: ["GHS", "LKR"]
  #   settings:
  #     date: "2015-01-01"

timeout_secs: 30
"#;
