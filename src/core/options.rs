//! Per-provider construction options

use super::currency::CurrencyCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Options handed to a provider once, at construction.
///
/// An empty `currencies` list means every code the provider supports.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Options<S = ()> {
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(default)]
    pub currencies: Vec<String>,
    #[serde(default)]
    pub settings: S,
}

impl<S: Default> Options<S> {
    pub fn new() -> Self {
        Self {
            credential: None,
            currencies: Vec::new(),
            settings: S::default(),
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_currencies<I, T>(mut self, currencies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.currencies = currencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_settings(mut self, settings: S) -> Self {
        self.settings = settings;
        self
    }
}

/// How much of the ECB series `fetch_history` downloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryWindow {
    #[default]
    Full,
    NinetyDays,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EcbSettings {
    #[serde(default)]
    pub history: HistoryWindow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiLayerSettings {
    /// Day answered by `fetch_history`; latest quotes when unset.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Resolves requested codes against a provider catalog.
///
/// Unknown or malformed codes are dropped, as are repeats. Order follows the request.
pub fn resolve_currencies(requested: &[String], catalog: &[CurrencyCode]) -> Vec<CurrencyCode> {
    if requested.is_empty() {
        return catalog.to_vec();
    }

    let mut resolved = Vec::with_capacity(requested.len());
    for raw in requested {
        match raw.parse::<CurrencyCode>() {
            Ok(code) if catalog.contains(&code) => {
                if !resolved.contains(&code) {
                    resolved.push(code);
                }
            }
            _ => debug!("Dropping unsupported currency code '{}'", raw),
        }
    }
    resolved
}
