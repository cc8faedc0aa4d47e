// Wire models for the coupon service.
//
// Field names follow the service's camelCase JSON. Every duration is a
// count of whole seconds; the service is loose about number types, so
// the `seconds` helper accepts integers and floats alike.

use serde::{Deserialize, Deserializer, Serialize};

/// `GET /check-status` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(default)]
    pub restricted: bool,
    #[serde(default, deserialize_with = "seconds")]
    pub time_left: Option<u64>,
}

/// `POST /claim` success response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub coupon: String,
    #[serde(default, deserialize_with = "seconds")]
    pub restriction_time: Option<u64>,
}

/// Error body sent with non-2xx answers. Both fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "seconds")]
    pub time_left: Option<u64>,
}

/// Deserialize an optional second count.
///
/// Floats round up so a partially elapsed second still counts,
/// negatives and `null` collapse to `None`.
fn seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(raw.and_then(|n| {
        if let Some(v) = n.as_u64() {
            return Some(v);
        }
        let v = n.as_f64()?;
        if v.is_finite() && v > 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
            Some(v.ceil() as u64)
        } else {
            None
        }
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_with_time_left() {
        let s: StatusResponse =
            serde_json::from_str(r#"{"restricted":true,"timeLeft":3600}"#).unwrap();
        assert!(s.restricted);
        assert_eq!(s.time_left, Some(3600));
    }

    #[test]
    fn status_without_time_left() {
        let s: StatusResponse = serde_json::from_str(r#"{"restricted":false}"#).unwrap();
        assert!(!s.restricted);
        assert_eq!(s.time_left, None);
    }

    #[test]
    fn fractional_seconds_round_up() {
        let s: StatusResponse =
            serde_json::from_str(r#"{"restricted":true,"timeLeft":12.2}"#).unwrap();
        assert_eq!(s.time_left, Some(13));
    }

    #[test]
    fn negative_or_null_seconds_mean_no_window() {
        let s: StatusResponse =
            serde_json::from_str(r#"{"restricted":true,"timeLeft":-4}"#).unwrap();
        assert_eq!(s.time_left, None);

        let s: StatusResponse =
            serde_json::from_str(r#"{"restricted":true,"timeLeft":null}"#).unwrap();
        assert_eq!(s.time_left, None);
    }

    #[test]
    fn claim_restriction_time_is_optional() {
        let c: ClaimResponse = serde_json::from_str(r#"{"coupon":"SAVE-10"}"#).unwrap();
        assert_eq!(c.coupon, "SAVE-10");
        assert_eq!(c.restriction_time, None);

        let c: ClaimResponse =
            serde_json::from_str(r#"{"coupon":"SAVE-20","restrictionTime":60}"#).unwrap();
        assert_eq!(c.restriction_time, Some(60));
    }

    #[test]
    fn error_body_accepts_empty_object() {
        let e: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(e, ErrorBody::default());
    }
}
