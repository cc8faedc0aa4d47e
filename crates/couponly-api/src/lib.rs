// couponly-api: Async Rust client for the coupon claim service
//
// Two endpoints, both credentialed through a cookie jar:
// `GET /check-status` and `POST /claim`.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::CouponClient;
pub use error::Error;
pub use models::{ClaimResponse, ErrorBody, StatusResponse};
pub use transport::{TlsMode, TransportConfig};
