//! State and service layer between `couponly-api` and UI consumers (CLI / TUI).
//!
//! - **[`ClaimView`]**: the claim screen's state model. Applies status and
//!   claim results, drives the restriction countdown, and flashes the
//!   "copied" indicator. Every failure lands here as a user-facing
//!   [`Message`]; nothing propagates past it.
//!
//! - **[`CouponService`]**: cheap-to-clone facade over the HTTP client.
//!   Translates transport errors into [`CoreError`] and wire responses into
//!   [`Restriction`] / [`ClaimOutcome`].
//!
//! - **[`Countdown`]**: the one-second restriction timer and its
//!   `HH:MM:SS` rendering.
//!
//! - **[`ClipboardSink`]**: seam over the system clipboard
//!   ([`SystemClipboard`] in production).

pub mod clipboard;
pub mod config;
pub mod countdown;
pub mod error;
pub mod model;
pub mod service;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use clipboard::{ClipboardSink, SystemClipboard};
pub use config::{ServiceConfig, TlsVerification};
pub use countdown::{Countdown, Tick, format_hms};
pub use error::CoreError;
pub use model::{ClaimOutcome, CouponCode, Message, Restriction, Severity};
pub use service::CouponService;
pub use view::{COPIED_FLASH, ClaimView, CopyOutcome};
