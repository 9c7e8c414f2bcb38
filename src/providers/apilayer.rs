//! apilayer currency quotes.
//!
//! Quotes come back as one JSON envelope keyed by concatenated pairs (`"USDCHF"`), always
//! with USD as the source currency. A failed envelope is terminal for the call: no rates,
//! one error. `fetch_history` answers the single day configured in
//! [`ApiLayerSettings::date`], or the live quotes when no day is set.

use super::util::{fetch_body, http_client};
use crate::core::currency::{APILAYER_CURRENCIES, catalog_codes};
use crate::core::options::{ApiLayerSettings, Options, resolve_currencies};
use crate::core::rate::DATE_FORMAT;
use crate::core::{CurrencyCode, Fetched, Rate, RateError, RateProvider};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, instrument, warn};

const PROVIDER_NAME: &str = "API Layer";
pub const DEFAULT_BASE_URL: &str = "http://apilayer.net/api";

/// Below this many currencies the request asks only for those.
const CURRENCY_FILTER_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    historical: bool,
    #[serde(default)]
    timestamp: Option<i64>,
    #[serde(default)]
    quotes: HashMap<String, serde_json::Number>,
    error: Option<QuoteError>,
}

#[derive(Debug, Deserialize)]
struct QuoteError {
    #[serde(default)]
    code: u16,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    info: String,
}

impl QuoteError {
    fn message(&self) -> String {
        if !self.info.is_empty() {
            self.info.clone()
        } else if !self.kind.is_empty() {
            format!("{} (code {})", self.kind, self.code)
        } else {
            format!("request failed (code {})", self.code)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Live,
    Historical(NaiveDate),
}

pub struct ApiLayerProvider {
    base_url: String,
    client: reqwest::Client,
    credential: Option<String>,
    currencies: Vec<CurrencyCode>,
    history: Target,
}

impl ApiLayerProvider {
    pub fn new(base_url: &str, options: Options<ApiLayerSettings>) -> Self {
        let catalog = catalog_codes(APILAYER_CURRENCIES);
        let history = options
            .settings
            .date
            .map_or(Target::Live, Target::Historical);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(),
            credential: options.credential.filter(|c| !c.is_empty()),
            currencies: resolve_currencies(&options.currencies, &catalog),
            history,
        }
    }

    /// Currencies reported, after catalog expansion and filtering.
    pub fn currencies(&self) -> &[CurrencyCode] {
        &self.currencies
    }

    /// Day answered by `fetch_history`, if one was configured.
    pub fn history_date(&self) -> Option<NaiveDate> {
        match self.history {
            Target::Live => None,
            Target::Historical(date) => Some(date),
        }
    }

    fn request(
        &self,
        credential: &str,
        target: Target,
    ) -> Result<reqwest::RequestBuilder, RateError> {
        let mut query: Vec<(&str, String)> = vec![("access_key", credential.to_string())];
        let endpoint = match target {
            Target::Live => "live",
            Target::Historical(date) => {
                query.push(("date", date.format(DATE_FORMAT).to_string()));
                "historical"
            }
        };
        if self.currencies.len() < CURRENCY_FILTER_LIMIT {
            let currencies: Vec<&str> = self.currencies.iter().map(|c| c.as_str()).collect();
            query.push(("currencies", currencies.join(",")));
        }

        let endpoint_url = format!("{}/{}", self.base_url, endpoint);
        let url = reqwest::Url::parse_with_params(&endpoint_url, &query)
            .map_err(|e| RateError::transport(PROVIDER_NAME, e))?;
        Ok(self.client.get(url))
    }

    #[instrument(name = "ApiLayerFetch", skip(self))]
    async fn fetch(&self, target: Target) -> Fetched {
        let Some(credential) = self.credential.as_deref() else {
            return Fetched::from_error(RateError::MissingCredential {
                provider: PROVIDER_NAME.to_string(),
            });
        };

        debug!("Requesting quotes from {}", self.base_url);
        let request = match self.request(credential, target) {
            Ok(request) => request,
            Err(e) => return Fetched::from_error(e),
        };
        let body = match fetch_body(PROVIDER_NAME, request).await {
            Ok(body) => body,
            Err(e) => return Fetched::from_error(e),
        };

        match serde_json::from_str::<QuoteEnvelope>(&body) {
            Ok(envelope) => normalize(envelope, &self.currencies),
            Err(e) => {
                warn!(error = %e, response = %body, "Failed to parse quote response");
                Fetched::from_error(RateError::decode(PROVIDER_NAME, e))
            }
        }
    }
}

/// Maps USD based quotes for `currencies` onto rates sharing the envelope timestamp.
fn normalize(envelope: QuoteEnvelope, currencies: &[CurrencyCode]) -> Fetched {
    if !envelope.success {
        let message = envelope
            .error
            .as_ref()
            .map_or_else(|| "request was not successful".to_string(), QuoteError::message);
        return Fetched::from_error(RateError::Upstream {
            provider: PROVIDER_NAME.to_string(),
            message,
        });
    }

    let timestamp = match envelope.timestamp {
        None | Some(0) => {
            return Fetched::from_error(RateError::MissingTimestamp {
                provider: PROVIDER_NAME.to_string(),
            });
        }
        Some(timestamp) => timestamp,
    };
    let Some(time) = DateTime::from_timestamp(timestamp, 0) else {
        return Fetched::from_error(RateError::decode(
            PROVIDER_NAME,
            format!("timestamp {timestamp} out of range"),
        ));
    };

    debug!(
        historical = envelope.historical,
        quotes = envelope.quotes.len(),
        "Decoded quote envelope"
    );
    let base = CurrencyCode::USD;
    let mut fetched = Fetched::default();
    for unit in currencies {
        let key = format!("{base}{unit}");
        let Some(number) = envelope.quotes.get(&key) else {
            continue;
        };
        let text = number.to_string();
        match Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)) {
            Ok(value) => fetched.rates.push(Rate::new(time, base, *unit, value)),
            Err(e) => fetched.errors.push(RateError::decode(
                PROVIDER_NAME,
                format!("quote {key}={text}: {e}"),
            )),
        }
    }
    fetched
}

#[async_trait]
impl RateProvider for ApiLayerProvider {
    fn name(&self) -> String {
        PROVIDER_NAME.to_string()
    }

    async fn fetch_last(&self) -> Fetched {
        self.fetch(Target::Live).await
    }

    async fn fetch_history(&self) -> Fetched {
        self.fetch(self.history).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::{CHF, EUR, GHS, LKR, USD};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LIVE_JSON: &str = r#"{
        "success": true,
        "terms": "https://currencylayer.com/terms",
        "privacy": "https://currencylayer.com/privacy",
        "timestamp": 1430401802,
        "source": "USD",
        "quotes": {
            "USDEUR": 0.89,
            "USDCHF": 0.9312,
            "USDUSD": 1
        }
    }"#;

    const HISTORICAL_JSON: &str = r#"{
        "success": true,
        "historical": true,
        "date": "2015-01-01",
        "timestamp": 1420156799,
        "source": "USD",
        "quotes": {
            "USDGHS": 3.8,
            "USDLKR": 135.0
        }
    }"#;

    const FAILED_JSON: &str = r#"{
        "success": false,
        "error": {
            "code": 101,
            "type": "invalid_access_key",
            "info": "You have not supplied a valid API Access Key."
        }
    }"#;

    async fn create_mock_server(endpoint: &str, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/{endpoint}")))
            .and(query_param("access_key", "tok"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn options(currencies: &[&str]) -> Options<ApiLayerSettings> {
        Options::new()
            .with_credential("tok")
            .with_currencies(currencies.iter().copied())
    }

    fn summary(fetched: &Fetched) -> Vec<(&str, String)> {
        fetched
            .rates
            .iter()
            .map(|r| (r.currency(), r.value().to_string()))
            .collect()
    }

    #[test]
    fn test_empty_currencies_expand_to_catalog() {
        let provider = ApiLayerProvider::new(DEFAULT_BASE_URL, Options::new());
        assert_eq!(
            provider.currencies(),
            catalog_codes(APILAYER_CURRENCIES).as_slice()
        );
        assert!(provider.history_date().is_none());
    }

    #[test]
    fn test_unsupported_currencies_are_dropped() {
        let provider = ApiLayerProvider::new(DEFAULT_BASE_URL, options(&[GHS, "QQQ", LKR]));
        let codes: Vec<&str> = provider.currencies().iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec![GHS, LKR]);
    }

    #[tokio::test]
    async fn test_fetch_last() {
        let mock_server = create_mock_server("live", LIVE_JSON).await;
        let provider = ApiLayerProvider::new(&mock_server.uri(), options(&[EUR, USD, CHF, "HKD"]));

        let fetched = provider.fetch_last().await;

        assert!(fetched.errors.is_empty(), "errors: {:?}", fetched.errors);
        assert_eq!(
            summary(&fetched),
            vec![
                ("USD/EUR", "0.89".to_string()),
                ("USD/USD", "1".to_string()),
                ("USD/CHF", "0.9312".to_string()),
            ]
        );
        assert!(fetched.rates.iter().all(|r| r.date() == "2015-04-30 13:50:02"));
    }

    #[tokio::test]
    async fn test_fetch_history_uses_configured_date() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/historical"))
            .and(query_param("access_key", "tok"))
            .and(query_param("date", "2015-01-01"))
            .and(query_param("currencies", "GHS,LKR"))
            .respond_with(ResponseTemplate::new(200).set_body_string(HISTORICAL_JSON))
            .mount(&mock_server)
            .await;

        let settings = ApiLayerSettings {
            date: NaiveDate::from_ymd_opt(2015, 1, 1),
        };
        let provider = ApiLayerProvider::new(
            &mock_server.uri(),
            options(&[GHS, LKR]).with_settings(settings),
        );

        let fetched = provider.fetch_history().await;

        assert!(fetched.errors.is_empty(), "errors: {:?}", fetched.errors);
        assert_eq!(
            summary(&fetched),
            vec![
                ("USD/GHS", "3.8".to_string()),
                ("USD/LKR", "135.0".to_string()),
            ]
        );
        // Stamped from the envelope, not from the requested day.
        assert!(fetched.rates.iter().all(|r| r.date() == "2015-01-01 23:59:59"));
    }

    #[tokio::test]
    async fn test_fetch_history_without_date_uses_live() {
        let mock_server = create_mock_server("live", LIVE_JSON).await;
        let provider = ApiLayerProvider::new(&mock_server.uri(), options(&[CHF]));

        let last = provider.fetch_last().await;
        let history = provider.fetch_history().await;

        assert_eq!(last, history);
        assert_eq!(summary(&history), vec![("USD/CHF", "0.9312".to_string())]);
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope() {
        let mock_server = create_mock_server("live", FAILED_JSON).await;
        let provider = ApiLayerProvider::new(&mock_server.uri(), options(&[CHF]));

        let fetched = provider.fetch_last().await;

        assert!(fetched.rates.is_empty());
        assert_eq!(fetched.errors.len(), 1);
        assert!(
            fetched.errors[0]
                .to_string()
                .contains("You have not supplied a valid API Access Key.")
        );
    }

    #[tokio::test]
    async fn test_missing_timestamp() {
        let body = r#"{"success": true, "quotes": {"USDCHF": 0.93}}"#;
        let mock_server = create_mock_server("live", body).await;
        let provider = ApiLayerProvider::new(&mock_server.uri(), options(&[CHF]));

        let fetched = provider.fetch_last().await;

        assert!(fetched.rates.is_empty());
        assert_eq!(
            fetched.errors,
            vec![RateError::MissingTimestamp {
                provider: PROVIDER_NAME.to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_null_or_zero_timestamp() {
        for body in [
            r#"{"success": true, "timestamp": null, "quotes": {"USDCHF": 0.93}}"#,
            r#"{"success": true, "timestamp": 0, "quotes": {"USDCHF": 0.93}}"#,
        ] {
            let mock_server = create_mock_server("live", body).await;
            let provider = ApiLayerProvider::new(&mock_server.uri(), options(&[CHF]));

            let fetched = provider.fetch_last().await;

            assert!(fetched.rates.is_empty());
            assert_eq!(
                fetched.errors,
                vec![RateError::MissingTimestamp {
                    provider: PROVIDER_NAME.to_string()
                }]
            );
        }
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let mock_server = create_mock_server("live", "<html>oops</html>").await;
        let provider = ApiLayerProvider::new(&mock_server.uri(), options(&[CHF]));

        let fetched = provider.fetch_last().await;

        assert!(fetched.rates.is_empty());
        assert_eq!(fetched.errors.len(), 1);
        assert!(matches!(fetched.errors[0], RateError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_missing_credential_skips_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LIVE_JSON))
            .expect(0)
            .mount(&mock_server)
            .await;
        let provider = ApiLayerProvider::new(
            &mock_server.uri(),
            Options::new().with_currencies([CHF]),
        );

        let fetched = provider.fetch_last().await;

        assert!(fetched.rates.is_empty());
        assert_eq!(
            fetched.errors[0].to_string(),
            "API Layer: missing access credential"
        );
    }
}
