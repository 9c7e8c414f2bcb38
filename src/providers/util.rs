use crate::core::RateError;
use std::time::Duration;
use tracing::debug;

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("fxrates/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Sends a GET and returns the body of a successful response.
///
/// # Parameters
/// - `provider`: name recorded in any error
/// - `request`: the prepared request
///
/// # Returns
/// The response body, or the transport or status failure as a [`RateError`]
pub(crate) async fn fetch_body(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> Result<String, RateError> {
    let response = request
        .send()
        .await
        .map_err(|e| RateError::transport(provider, e))?;

    let status = response.status();
    debug!(%status, "Received {} response", provider);
    if !status.is_success() {
        return Err(RateError::Http {
            provider: provider.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| RateError::transport(provider, e))
}
