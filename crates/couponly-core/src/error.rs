// ── Core error types ──
//
// User-facing errors from couponly-core. Consumers never see reqwest
// errors or JSON parse failures directly; the `From<couponly_api::Error>`
// impl translates transport-layer errors into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach coupon service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Coupon service timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Service answers ──────────────────────────────────────────────
    /// The service refused the request. `message` and `time_left` are
    /// whatever the error body carried.
    #[error("{}", .message.as_deref().unwrap_or("Coupon service rejected the request"))]
    Rejected {
        status: u16,
        message: Option<String>,
        time_left: Option<u64>,
    },

    #[error("Unexpected response from coupon service: {message}")]
    InvalidResponse { message: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Clipboard unavailable: {message}")]
    Clipboard { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The server-provided message, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Remaining restriction window reported with a rejection.
    pub fn time_left(&self) -> Option<u64> {
        match self {
            Self::Rejected { time_left, .. } => *time_left,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<couponly_api::Error> for CoreError {
    fn from(err: couponly_api::Error) -> Self {
        match err {
            couponly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            couponly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            couponly_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            couponly_api::Error::Rejected {
                status,
                message,
                time_left,
            } => CoreError::Rejected {
                status,
                message,
                time_left,
            },
            couponly_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}
