//! Provider abstraction shared by every rate source

use super::error::RateError;
use super::rate::Rate;
use async_trait::async_trait;

/// Rates and errors from one fetch. Both may be non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fetched {
    pub rates: Vec<Rate>,
    pub errors: Vec<RateError>,
}

impl Fetched {
    pub fn new(rates: Vec<Rate>, errors: Vec<RateError>) -> Self {
        Self { rates, errors }
    }

    pub fn from_error(error: RateError) -> Self {
        Self {
            rates: Vec::new(),
            errors: vec![error],
        }
    }

    /// Moves `other` to the end, keeping both orders.
    pub fn append(&mut self, mut other: Fetched) {
        self.rates.append(&mut other.rates);
        self.errors.append(&mut other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty() && self.errors.is_empty()
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Human readable source name.
    fn name(&self) -> String;

    /// Most recent snapshot, filtered to the configured currencies.
    async fn fetch_last(&self) -> Fetched;

    /// Historical view. Whether this is one day or a series depends on the source.
    async fn fetch_history(&self) -> Fetched;
}
