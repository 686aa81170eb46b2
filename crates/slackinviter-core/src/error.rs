// ── Core error types ──
//
// Domain errors from slackinviter-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the `From<slackinviter_api::Error>`
// impl folds transport-layer errors into the few classes the sync loop
// and the admission flow branch on.

use std::time::Duration;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Provider errors ──────────────────────────────────────────────
    /// Transient: the provider asked us to wait before retrying the same call.
    #[error("Rate limited by provider -- retry after {}s", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    /// Anything else the directory provider rejected or failed on.
    #[error("Provider error: {message}")]
    Provider {
        message: String,
        /// Provider error code (e.g. Slack's `"invalid_auth"`).
        code: Option<String>,
    },

    // ── Verification errors ──────────────────────────────────────────
    #[error("Challenge verification failed: {message}")]
    Captcha { message: String },

    #[error("Session lookup failed: {message}")]
    Session { message: String },

    // ── Lifecycle ────────────────────────────────────────────────────
    /// The operation was abandoned because shutdown was requested.
    #[error("Cancelled")]
    Cancelled,

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<slackinviter_api::Error> for CoreError {
    fn from(err: slackinviter_api::Error) -> Self {
        use slackinviter_api::Error as ApiError;

        match err {
            ApiError::RateLimited { retry_after } => CoreError::RateLimited { retry_after },
            ApiError::Slack { method, error } => CoreError::Provider {
                message: format!("{method}: {error}"),
                code: Some(error),
            },
            ApiError::Http {
                endpoint,
                status,
                message,
            } => CoreError::Provider {
                message: format!("{endpoint} returned HTTP {status}: {message}"),
                code: None,
            },
            ApiError::Transport(e) => CoreError::Provider {
                message: e.to_string(),
                code: None,
            },
            ApiError::Deserialization { message, body: _ } => CoreError::Provider {
                message: format!("malformed response: {message}"),
                code: None,
            },
            ApiError::Captcha { codes } => CoreError::Captcha {
                message: codes.join(", "),
            },
            ApiError::InvalidUrl(e) => CoreError::Internal(format!("Invalid URL: {e}")),
            ApiError::InvalidToken(reason) => CoreError::Internal(format!("Invalid token: {reason}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_keeps_its_delay() {
        let err = CoreError::from(slackinviter_api::Error::RateLimited {
            retry_after: Duration::from_secs(9),
        });
        assert!(err.is_rate_limited());
        assert!(matches!(err, CoreError::RateLimited { retry_after } if retry_after.as_secs() == 9));
    }

    #[test]
    fn slack_error_keeps_its_code() {
        let err = CoreError::from(slackinviter_api::Error::Slack {
            method: "team.info".into(),
            error: "invalid_auth".into(),
        });
        match err {
            CoreError::Provider { message, code } => {
                assert_eq!(message, "team.info: invalid_auth");
                assert_eq!(code.as_deref(), Some("invalid_auth"));
            }
            other => panic!("expected Provider, got {other:?}"),
        }
    }
}
