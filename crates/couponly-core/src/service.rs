// ── Service facade ──
//
// Thin, clonable wrapper around `CouponClient`. Owns the translation from
// wire responses to domain values and from transport errors to
// `CoreError`, plus the visitor's session cookies.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use couponly_api::{CouponClient, TransportConfig};

use crate::config::ServiceConfig;
use crate::error::CoreError;
use crate::model::{ClaimOutcome, Restriction};

/// Handle to the coupon service. Clones share one HTTP client and jar.
#[derive(Clone)]
pub struct CouponService {
    inner: Arc<Inner>,
}

struct Inner {
    client: CouponClient,
    config: ServiceConfig,
}

impl CouponService {
    /// Build the HTTP client and restore any saved session cookies.
    pub fn new(config: ServiceConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: (&config.tls).into(),
            timeout: config.timeout,
            cookie_jar: None,
        };
        let client = CouponClient::new(config.url.clone(), &transport)?;

        if let Some(ref session) = config.session {
            let restored = client.restore_cookies(session.expose_secret());
            debug!(restored, "restored visitor session");
        }

        Ok(Self {
            inner: Arc::new(Inner { client, config }),
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    /// Ask whether the visitor is inside a restriction window.
    #[instrument(skip(self), fields(url = %self.inner.config.url))]
    pub async fn check_status(&self) -> Result<Restriction, CoreError> {
        self.inner
            .client
            .check_status()
            .await
            .map(Restriction::from)
            .map_err(|e| self.translate(e))
    }

    /// Claim a coupon.
    #[instrument(skip(self), fields(url = %self.inner.config.url))]
    pub async fn claim(&self) -> Result<ClaimOutcome, CoreError> {
        self.inner
            .client
            .claim()
            .await
            .map(ClaimOutcome::from)
            .map_err(|e| self.translate(e))
    }

    /// Current session cookies, for persisting between runs.
    pub fn session_cookies(&self) -> Option<SecretString> {
        self.inner.client.cookie_header().map(SecretString::from)
    }

    /// Fill in the configured timeout, which the bare `From` impl can't know.
    fn translate(&self, err: couponly_api::Error) -> CoreError {
        match CoreError::from(err) {
            CoreError::Timeout { .. } => CoreError::Timeout {
                timeout_secs: self.inner.config.timeout.as_secs(),
            },
            other => other,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn setup(session: Option<&str>) -> (MockServer, CouponService) {
        let server = MockServer::start().await;
        let mut config = ServiceConfig::new(Url::parse(&server.uri()).unwrap());
        config.session = session.map(|s| SecretString::from(s.to_owned()));
        let service = CouponService::new(config).unwrap();
        (server, service)
    }

    #[tokio::test]
    async fn check_status_maps_to_restriction() {
        let (server, service) = setup(None).await;
        Mock::given(method("GET"))
            .and(path("/check-status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "restricted": true, "timeLeft": 120 })),
            )
            .mount(&server)
            .await;

        let r = service.check_status().await.unwrap();
        assert_eq!(
            r,
            Restriction {
                restricted: true,
                time_left: Some(120)
            }
        );
    }

    #[tokio::test]
    async fn claim_rejection_keeps_message_and_window() {
        let (server, service) = setup(None).await;
        Mock::given(method("POST"))
            .and(path("/claim"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "message": "Too soon",
                "timeLeft": 30
            })))
            .mount(&server)
            .await;

        let err = service.claim().await.unwrap_err();
        assert_eq!(err.server_message(), Some("Too soon"));
        assert_eq!(err.time_left(), Some(30));
    }

    #[tokio::test]
    async fn saved_session_is_replayed_and_exported() {
        let (server, service) = setup(Some("visitor=v1")).await;
        Mock::given(method("POST"))
            .and(path("/claim"))
            .and(header("cookie", "visitor=v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "coupon": "C-1" })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = service.claim().await.unwrap();
        assert_eq!(outcome.coupon.as_str(), "C-1");

        let exported = service.session_cookies().unwrap();
        assert_eq!(exported.expose_secret(), "visitor=v1");
    }
}
