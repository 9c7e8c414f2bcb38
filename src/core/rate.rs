//! Normalized exchange rate model

use super::currency::CurrencyCode;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Display format for [`Rate::date`].
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Calendar date format used by feeds and settings.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One observed exchange value of `unit` priced in `base`.
///
/// Serializes to `{date, currency, value}`; the parsed time and codes stay internal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rate {
    #[serde(skip)]
    time: DateTime<Utc>,
    date: String,
    #[serde(skip)]
    base: CurrencyCode,
    #[serde(skip)]
    unit: CurrencyCode,
    currency: String,
    value: Decimal,
}

impl Rate {
    pub fn new(time: DateTime<Utc>, base: CurrencyCode, unit: CurrencyCode, value: Decimal) -> Self {
        Self {
            time,
            date: time.format(DATE_TIME_FORMAT).to_string(),
            base,
            unit,
            currency: format!("{base}/{unit}"),
            value,
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn base(&self) -> CurrencyCode {
        self.base
    }

    pub fn unit(&self) -> CurrencyCode {
        self.unit
    }

    /// The pair label, `BASE/UNIT`.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn value(&self) -> Decimal {
        self.value
    }
}
