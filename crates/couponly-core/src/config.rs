// ── Runtime service configuration ──
//
// Describes *how* to reach the coupon service. Never touches disk:
// the CLI/TUI builds a `ServiceConfig` (usually via couponly-config)
// and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for couponly_api::TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// Configuration for talking to one coupon service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Service base URL; endpoints are resolved beneath it.
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Flip the message to a success notice when the countdown runs out.
    pub announce_expiry: bool,
    /// Saved `Cookie` header identifying this visitor, if any.
    pub session: Option<SecretString>,
}

impl ServiceConfig {
    /// Config with defaults for everything but the URL.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            announce_expiry: true,
            session: None,
        }
    }
}
