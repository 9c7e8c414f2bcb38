//! Core rate model and provider abstractions

pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod options;
pub mod provider;
pub mod rate;

// Re-export main types for cleaner imports
pub use currency::CurrencyCode;
pub use error::RateError;
pub use options::{ApiLayerSettings, EcbSettings, HistoryWindow, Options};
pub use provider::{Fetched, RateProvider};
pub use rate::Rate;
