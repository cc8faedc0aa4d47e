//! Domain types shared by the CLI and TUI.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ── Messages ────────────────────────────────────────────────────────

/// Display severity of the status message. Exactly one is active.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// A status message: severity plus text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ── Coupons ─────────────────────────────────────────────────────────

/// Opaque coupon code issued by the service. Never parsed or validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouponCode(String);

impl CouponCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CouponCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

// ── Service results ─────────────────────────────────────────────────

/// Result of a status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    pub restricted: bool,
    /// Seconds until the visitor may claim again.
    pub time_left: Option<u64>,
}

impl From<couponly_api::StatusResponse> for Restriction {
    fn from(resp: couponly_api::StatusResponse) -> Self {
        Self {
            restricted: resp.restricted,
            time_left: resp.time_left,
        }
    }
}

/// A successfully claimed coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimOutcome {
    pub coupon: CouponCode,
    /// New restriction window started by this claim, in seconds.
    pub restriction_time: Option<u64>,
    pub claimed_at: DateTime<Utc>,
}

impl From<couponly_api::ClaimResponse> for ClaimOutcome {
    fn from(resp: couponly_api::ClaimResponse) -> Self {
        Self {
            coupon: CouponCode::from(resp.coupon),
            restriction_time: resp.restriction_time,
            claimed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn severity_round_trips_through_strings() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::from_str("error").unwrap(), Severity::Error);
    }

    #[test]
    fn coupon_code_is_opaque() {
        let code = CouponCode::new("  spaced  code ");
        assert_eq!(code.as_str(), "  spaced  code ");
        assert_eq!(code.to_string(), "  spaced  code ");
    }
}
