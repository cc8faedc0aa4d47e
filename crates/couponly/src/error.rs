//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable process exit code.

use miette::Diagnostic;
use thiserror::Error;

use couponly_config::ConfigError;
use couponly_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const REJECTED: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the coupon service at {url}")]
    #[diagnostic(
        code(couponly::connection_failed),
        help(
            "Check that the service is running and reachable.\n\
             URL: {url}\n\
             Self-signed certificate? Try: couponly status --insecure"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(couponly::timeout),
        help("Increase timeout with --timeout or check the service's responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Service ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(couponly::rejected), help("{hint}"))]
    Rejected { message: String, hint: String },

    #[error("Unexpected response from the coupon service: {message}")]
    #[diagnostic(code(couponly::invalid_response))]
    InvalidResponse { message: String },

    #[error("Could not copy to the clipboard: {message}")]
    #[diagnostic(
        code(couponly::clipboard),
        help("The coupon was still claimed; copy it from the output above.")
    )]
    Clipboard { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(couponly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(couponly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: couponly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No coupon service configured")]
    #[diagnostic(
        code(couponly::no_config),
        help(
            "Create a profile with: couponly config init\n\
             Or pass --server / set COUPONLY_SERVER.\n\
             Config file: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(couponly::config),
        help("Fix or move aside the config file; it was left unchanged.")
    )]
    Config(Box<figment::Error>),

    #[error("Failed to write configuration: {0}")]
    #[diagnostic(code(couponly::config_write))]
    ConfigWrite(#[from] toml::ser::Error),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::NoConfig { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }

    /// A rejection carrying the service's message (or `fallback`) and the
    /// remaining restriction window.
    pub fn rejected(message: Option<&str>, fallback: &str, time_left: Option<u64>) -> Self {
        let hint = match time_left.filter(|&s| s > 0) {
            Some(secs) => format!(
                "You can claim again in {} ({}).",
                couponly_core::format_hms(secs),
                humantime::format_duration(std::time::Duration::from_secs(secs))
            ),
            None => "Check `couponly status` before trying again.".into(),
        };
        Self::Rejected {
            message: message.unwrap_or(fallback).to_owned(),
            hint,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            CoreError::Rejected {
                message, time_left, ..
            } => Self::rejected(
                message.as_deref(),
                "Coupon service rejected the request",
                time_left,
            ),
            CoreError::InvalidResponse { message } => Self::InvalidResponse { message },
            CoreError::Clipboard { message } => Self::Clipboard { message },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Serialization(e) => Self::ConfigWrite(e),
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Io(e) => Self::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_uses_server_message_and_window() {
        let err = CliError::from(CoreError::Rejected {
            status: 429,
            message: Some("Slow down".into()),
            time_left: Some(3661),
        });
        assert_eq!(err.to_string(), "Slow down");
        assert_eq!(err.exit_code(), exit_code::REJECTED);
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("01:01:01"), "{help}");
    }

    #[test]
    fn rejection_without_message_uses_fallback() {
        let err = CliError::rejected(None, "Error claiming coupon", None);
        assert_eq!(err.to_string(), "Error claiming coupon");
    }

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(
            CliError::from(CoreError::Timeout { timeout_secs: 5 }).exit_code(),
            exit_code::TIMEOUT
        );
        assert_eq!(
            CliError::from(CoreError::ConnectionFailed {
                url: "http://x".into(),
                reason: "refused".into()
            })
            .exit_code(),
            exit_code::CONNECTION
        );
        assert_eq!(
            CliError::NoConfig { path: "x".into() }.exit_code(),
            exit_code::USAGE
        );
        assert_eq!(
            CliError::InvalidResponse {
                message: "bad".into()
            }
            .exit_code(),
            exit_code::GENERAL
        );
    }
}
