//! European Central Bank reference rates.
//!
//! The ECB publishes euro foreign exchange reference rates as an XML "cube": one `Cube`
//! per day, each holding `Cube currency=".." rate=".."` entries quoted against EUR.
//! `fetch_last` reads the daily file and `fetch_history` reads a whole series, either the
//! complete history or the last 90 days depending on [`EcbSettings::history`].

use super::util::{fetch_body, http_client};
use crate::core::currency::{ECB_CURRENCIES, catalog_codes};
use crate::core::options::{EcbSettings, HistoryWindow, Options, resolve_currencies};
use crate::core::rate::DATE_FORMAT;
use crate::core::{CurrencyCode, Fetched, Rate, RateError, RateProvider};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, instrument, warn};

const PROVIDER_NAME: &str = "European Central Bank";
pub const DEFAULT_BASE_URL: &str = "https://www.ecb.europa.eu/stats/eurofxref";

const DAILY_FILE: &str = "eurofxref-daily.xml";
const NINETY_DAYS_FILE: &str = "eurofxref-hist-90d.xml";
const HISTORY_FILE: &str = "eurofxref-hist.xml";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Cube", default)]
    series: Series,
}

#[derive(Debug, Default, Deserialize)]
struct Series {
    #[serde(rename = "Cube", default)]
    days: Vec<Day>,
}

#[derive(Debug, Deserialize)]
struct Day {
    #[serde(rename = "@time")]
    time: String,
    #[serde(rename = "Cube", default)]
    rates: Vec<DayRate>,
}

#[derive(Debug, Deserialize)]
struct DayRate {
    #[serde(rename = "@currency")]
    currency: String,
    #[serde(rename = "@rate")]
    rate: String,
}

pub struct EcbProvider {
    base_url: String,
    client: reqwest::Client,
    currencies: Vec<CurrencyCode>,
    history: HistoryWindow,
}

impl EcbProvider {
    pub fn new(base_url: &str, options: Options<EcbSettings>) -> Self {
        let catalog = catalog_codes(ECB_CURRENCIES);
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(),
            currencies: resolve_currencies(&options.currencies, &catalog),
            history: options.settings.history,
        }
    }

    /// Currencies reported, after catalog expansion and filtering.
    pub fn currencies(&self) -> &[CurrencyCode] {
        &self.currencies
    }

    /// Rates for the last 90 published days.
    pub async fn fetch_90_days(&self) -> Fetched {
        self.fetch(NINETY_DAYS_FILE).await
    }

    #[instrument(name = "EcbFetch", skip(self))]
    async fn fetch(&self, file: &str) -> Fetched {
        let url = format!("{}/{}", self.base_url, file);
        debug!("Requesting reference rates from {}", url);

        let body = match fetch_body(PROVIDER_NAME, self.client.get(&url)).await {
            Ok(body) => body,
            Err(e) => return Fetched::from_error(e),
        };

        let envelope: Envelope = match quick_xml::de::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "Failed to parse ECB response");
                return Fetched::from_error(RateError::decode(PROVIDER_NAME, e));
            }
        };

        normalize(envelope, &self.currencies)
    }
}

/// Maps every day of the cube onto EUR based rates for `currencies`.
fn normalize(envelope: Envelope, currencies: &[CurrencyCode]) -> Fetched {
    let base = CurrencyCode::EUR;
    let identity = Decimal::new(10000, 4);
    let mut fetched = Fetched::default();
    let mut anchor: Option<(String, DateTime<Utc>)> = None;

    for day in envelope.series.days {
        let current = anchor
            .as_ref()
            .filter(|(date, _)| *date == day.time)
            .map(|(_, time)| *time);
        let time = match current {
            Some(time) => time,
            None => match NaiveDate::parse_from_str(day.time.trim(), DATE_FORMAT) {
                Ok(date) => {
                    let time = date.and_time(NaiveTime::MIN).and_utc();
                    anchor = Some((day.time.clone(), time));
                    time
                }
                Err(e) => {
                    warn!(date = %day.time, "Skipping ECB entry with invalid date");
                    fetched.errors.push(RateError::DateParse {
                        provider: PROVIDER_NAME.to_string(),
                        value: day.time.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            },
        };

        if currencies.contains(&base) {
            fetched.rates.push(Rate::new(time, base, base, identity));
        }

        for unit in currencies.iter().filter(|c| **c != base) {
            for item in day.rates.iter().filter(|r| r.currency.trim() == unit.as_str()) {
                match Decimal::from_str(item.rate.trim()) {
                    Ok(value) => fetched.rates.push(Rate::new(time, base, *unit, value)),
                    Err(e) => fetched.errors.push(RateError::decode(
                        PROVIDER_NAME,
                        format!("rate '{}' for {} on {}: {}", item.rate, unit, day.time, e),
                    )),
                }
            }
        }
    }

    fetched
}

#[async_trait]
impl RateProvider for EcbProvider {
    fn name(&self) -> String {
        PROVIDER_NAME.to_string()
    }

    async fn fetch_last(&self) -> Fetched {
        self.fetch(DAILY_FILE).await
    }

    /// Every day of the configured series.
    async fn fetch_history(&self) -> Fetched {
        match self.history {
            HistoryWindow::Full => self.fetch(HISTORY_FILE).await,
            HistoryWindow::NinetyDays => self.fetch(NINETY_DAYS_FILE).await,
        }
    }
}
