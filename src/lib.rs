pub mod cli;
pub mod core;
pub mod providers;
pub mod registry;

pub use crate::core::config;
pub use crate::core::{CurrencyCode, Fetched, Options, Rate, RateError, RateProvider};
pub use crate::registry::{Registry, RegistryOptions};

use crate::cli::rates::{OutputFormat, Span};
use crate::config::AppConfig;
use crate::providers::{ApiLayerProvider, EcbProvider, apilayer, ecb};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub enum AppCommand {
    Last,
    History,
}

/// Registers every provider block present in `config`, ECB first.
pub fn build_registry(config: &AppConfig) -> Registry {
    let mut registry = Registry::with_options(RegistryOptions {
        timeout: config.timeout(),
        max_concurrency: config.max_concurrency,
    });

    if let Some(ecb_config) = &config.providers.ecb {
        let base_url = ecb_config
            .base_url
            .as_deref()
            .unwrap_or(ecb::DEFAULT_BASE_URL);
        registry.register(Arc::new(EcbProvider::new(
            base_url,
            ecb_config.options.clone(),
        )));
    }

    if let Some(apilayer_config) = &config.providers.apilayer {
        if apilayer_config.options.credential.is_none() {
            warn!(
                "{} not set; API Layer requests will fail",
                config::APILAYER_KEY_ENV
            );
        }
        let base_url = apilayer_config
            .base_url
            .as_deref()
            .unwrap_or(apilayer::DEFAULT_BASE_URL);
        registry.register(Arc::new(ApiLayerProvider::new(
            base_url,
            apilayer_config.options.clone(),
        )));
    }

    registry
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(timeout = ?config.timeout(), "Loaded config");

    let registry = build_registry(&config);
    info!("Registered {} rate provider(s)", registry.len());
    if registry.is_empty() {
        anyhow::bail!("No providers configured");
    }

    let span = match command {
        AppCommand::Last => Span::Last,
        AppCommand::History => Span::History,
    };
    cli::rates::run(&registry, span, format).await
}
