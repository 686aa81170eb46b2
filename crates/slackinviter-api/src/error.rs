use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `slackinviter-api` crate.
///
/// Covers every failure mode across the three outbound surfaces:
/// the Slack Web API, reCAPTCHA verification, and the Ory session check.
/// `slackinviter-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success HTTP status without a structured error body.
    #[error("HTTP {status} from {endpoint}: {message}")]
    Http {
        endpoint: String,
        status: u16,
        message: String,
    },

    // ── Slack ───────────────────────────────────────────────────────
    /// Rate limited by Slack (HTTP 429). Carries the `Retry-After` delay.
    #[error("Rate limited -- retry after {}s", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    /// Slack answered `{"ok": false, "error": "..."}`.
    #[error("Slack API error in {method}: {error}")]
    Slack { method: String, error: String },

    /// The configured Slack token is not accepted as an HTTP header value.
    #[error("Invalid Slack token: {0}")]
    InvalidToken(String),

    // ── reCAPTCHA ───────────────────────────────────────────────────
    /// reCAPTCHA rejected the verification request itself
    /// (bad secret, malformed token, timeout-or-duplicate, ...).
    #[error("reCAPTCHA validation failed: {codes:?}")]
    Captcha { codes: Vec<String> },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the provider asked us to back off.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// The Slack error code (`"invalid_auth"`, `"already_invited"`, ...), if any.
    pub fn slack_error_code(&self) -> Option<&str> {
        match self {
            Self::Slack { error, .. } => Some(error.as_str()),
            _ => None,
        }
    }
}
