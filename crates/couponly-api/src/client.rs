// Coupon service HTTP client
//
// Wraps `reqwest::Client` with endpoint URL construction, credential
// cookie handling, and response/error-body decoding. Callers get typed
// responses; any non-2xx answer becomes `Error::Rejected` carrying the
// service's optional `message` and `timeLeft`.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{ClaimResponse, ErrorBody, StatusResponse};
use crate::transport::TransportConfig;

const STATUS_PATH: &str = "check-status";
const CLAIM_PATH: &str = "claim";

/// Raw HTTP client for the coupon service.
///
/// Every request is credentialed: the cookie jar that identifies the
/// visitor is attached to the underlying `reqwest::Client`, so the
/// service can apply its per-visitor restriction window.
pub struct CouponClient {
    http: reqwest::Client,
    base_url: Url,
    /// Jar reference for exporting and restoring the visitor's cookies.
    cookie_jar: Arc<Jar>,
}

impl CouponClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (the service identifies visitors by cookie).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let mut config = transport.clone();
        let cookie_jar = Arc::clone(config.cookie_jar.get_or_insert_with(Arc::default));
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            cookie_jar,
        })
    }

    // ── Credentials ──────────────────────────────────────────────────

    /// Export the `Cookie` header value the jar holds for the service.
    ///
    /// Returns e.g. `"sid=abc123; visitor=42"`, or `None` when the jar is
    /// empty.
    pub fn cookie_header(&self) -> Option<String> {
        let cookies = self.cookie_jar.cookies(&self.base_url)?;
        cookies.to_str().ok().map(String::from)
    }

    /// Seed the jar from a previously exported `Cookie` header value.
    ///
    /// Cookies are scoped to the service origin's root path. Returns the
    /// number of cookies restored.
    pub fn restore_cookies(&self, header: &str) -> usize {
        let mut origin = self.base_url.clone();
        origin.set_path("/");
        origin.set_query(None);

        let mut restored = 0;
        for pair in header.split(';').map(str::trim).filter(|p| p.contains('=')) {
            self.cookie_jar.add_cookie_str(pair, &origin);
            restored += 1;
        }
        trace!(restored, "restored session cookies");
        restored
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /check-status`: is the visitor currently restricted?
    pub async fn check_status(&self) -> Result<StatusResponse, Error> {
        let url = self.endpoint_url(STATUS_PATH)?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        Self::parse_response(resp).await
    }

    /// `POST /claim`: ask the service for a coupon.
    pub async fn claim(&self) -> Result<ClaimResponse, Error> {
        let url = self.endpoint_url(CLAIM_PATH)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Self::parse_response(resp).await
    }

    // ── Helpers ──────────────────────────────────────────────────────

    /// Build `{base}/{path}` without dropping any path prefix on the base.
    fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Decode a success body, or turn a non-2xx answer into `Error::Rejected`.
    async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            // The error body is best-effort; a plain-text or empty body
            // still yields a rejection, just without a message.
            let parsed = serde_json::from_str::<ErrorBody>(&body).unwrap_or_default();
            debug!(status = status.as_u16(), "coupon service rejected request");
            return Err(Error::Rejected {
                status: status.as_u16(),
                message: parsed.message.filter(|m| !m.is_empty()),
                time_left: parsed.time_left,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview = body.chars().take(200).collect::<String>();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}
