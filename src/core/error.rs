//! Errors reported by providers alongside the rates they did fetch

use thiserror::Error;

/// A failure captured while fetching from one provider.
///
/// These are returned as values next to any rates that were produced, never raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateError {
    #[error("{provider}: request failed: {message}")]
    Transport { provider: String, message: String },

    #[error("{provider}: HTTP error: {status}")]
    Http { provider: String, status: u16 },

    #[error("{provider}: failed to decode response: {message}")]
    Decode { provider: String, message: String },

    #[error("{provider}: {message}")]
    Upstream { provider: String, message: String },

    #[error("{provider}: could not determine date")]
    MissingTimestamp { provider: String },

    #[error("{provider}: invalid date '{value}': {message}")]
    DateParse {
        provider: String,
        value: String,
        message: String,
    },

    #[error("{provider}: missing access credential")]
    MissingCredential { provider: String },

    #[error("{provider}: timed out after {millis}ms")]
    Timeout { provider: String, millis: u128 },
}

impl RateError {
    pub fn provider(&self) -> &str {
        match self {
            RateError::Transport { provider, .. }
            | RateError::Http { provider, .. }
            | RateError::Decode { provider, .. }
            | RateError::Upstream { provider, .. }
            | RateError::MissingTimestamp { provider }
            | RateError::DateParse { provider, .. }
            | RateError::MissingCredential { provider }
            | RateError::Timeout { provider, .. } => provider,
        }
    }

    pub(crate) fn transport(provider: &str, err: impl std::fmt::Display) -> Self {
        RateError::Transport {
            provider: provider.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn decode(provider: &str, err: impl std::fmt::Display) -> Self {
        RateError::Decode {
            provider: provider.to_string(),
            message: err.to_string(),
        }
    }
}
