use thiserror::Error;

/// Top-level error type for the `couponly-api` crate.
///
/// Covers transport failures, non-2xx answers from the coupon service,
/// and malformed response bodies. `couponly-core` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Service ─────────────────────────────────────────────────────
    /// The service answered with a non-2xx status.
    ///
    /// `message` and `time_left` come from the `{ message?, timeLeft? }`
    /// error body when the service sent one.
    #[error("Coupon service rejected the request (HTTP {status}){}", fmt_message(.message.as_deref()))]
    Rejected {
        status: u16,
        message: Option<String>,
        time_left: Option<u64>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

fn fmt_message(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}
