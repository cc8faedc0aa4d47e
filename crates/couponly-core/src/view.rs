//! Claim screen state.
//!
//! [`ClaimView`] owns everything the claim screen shows: the coupon, the
//! status message, the loading flag, the restriction countdown, and the
//! transient "copied" indicator. Results are applied in arrival order and
//! the most recent one wins. Failures are turned into messages here and
//! never propagate further.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::clipboard::ClipboardSink;
use crate::countdown::{Countdown, Tick};
use crate::error::CoreError;
use crate::model::{ClaimOutcome, CouponCode, Message, Restriction};

/// How long the "copied" indicator stays up.
pub const COPIED_FLASH: Duration = Duration::from_millis(2000);

pub const WELCOME_TEXT: &str = "Welcome! Claim your special discount coupon below.";
pub const RESTRICTED_TEXT: &str = "Please wait before claiming another coupon";
pub const STATUS_ERROR_TEXT: &str = "Unable to check status. Please try again later.";
pub const CLAIMED_TEXT: &str = "Coupon claimed successfully!";
pub const CLAIM_FALLBACK_TEXT: &str = "Error claiming coupon";
pub const EXPIRED_TEXT: &str = "You can now claim a new coupon!";

/// Result of a copy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// No coupon on screen; nothing was copied.
    NothingToCopy,
    Copied,
    /// The clipboard refused the write. The indicator is not shown.
    Failed(String),
}

/// State of the claim screen.
#[derive(Debug, Clone)]
pub struct ClaimView {
    coupon: Option<CouponCode>,
    message: Message,
    loading: bool,
    countdown: Countdown,
    copied_until: Option<Instant>,
    announce_expiry: bool,
}

impl ClaimView {
    /// Fresh state showing the welcome message. With `announce_expiry`,
    /// the end of a countdown flips the message to a success notice.
    pub fn new(announce_expiry: bool) -> Self {
        Self {
            coupon: None,
            message: Message::info(WELCOME_TEXT),
            loading: false,
            countdown: Countdown::default(),
            copied_until: None,
            announce_expiry,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn coupon(&self) -> Option<&CouponCode> {
        self.coupon.as_ref()
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn time_left(&self) -> Option<u64> {
        self.countdown.remaining()
    }

    /// Countdown as `HH:MM:SS`, empty when no window is active.
    pub fn countdown_display(&self) -> String {
        self.countdown.display()
    }

    /// Claiming is blocked while a request is in flight or a window is active.
    pub fn can_claim(&self) -> bool {
        !self.loading && !self.countdown.is_active()
    }

    pub fn button_label(&self) -> &'static str {
        if self.loading {
            "Processing..."
        } else if self.countdown.is_active() {
            "Please Wait"
        } else {
            "Claim Your Coupon"
        }
    }

    /// Whether the "copied" indicator is visible at `now`.
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_until.is_some_and(|until| now < until)
    }

    // ── Status ───────────────────────────────────────────────────────

    /// Apply a status check result.
    ///
    /// Returns the seconds a new countdown was seeded with, so callers can
    /// (re)start their one-second timer.
    pub fn apply_status(&mut self, result: &Result<Restriction, CoreError>) -> Option<u64> {
        match result {
            Ok(restriction) if restriction.restricted => {
                debug!(time_left = ?restriction.time_left, "visitor is restricted");
                self.countdown.seed(restriction.time_left);
                self.message = Message::warning(RESTRICTED_TEXT);
                self.countdown.remaining()
            }
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "status check failed");
                self.message = Message::error(STATUS_ERROR_TEXT);
                None
            }
        }
    }

    // ── Claim ────────────────────────────────────────────────────────

    /// Mark a claim as in flight. Returns `false` (and changes nothing)
    /// when claiming is currently blocked.
    pub fn begin_claim(&mut self) -> bool {
        if !self.can_claim() {
            return false;
        }
        self.loading = true;
        true
    }

    /// Apply a claim result and clear the loading flag.
    ///
    /// Returns the seconds a new countdown was seeded with, if any.
    pub fn apply_claim(&mut self, result: &Result<ClaimOutcome, CoreError>) -> Option<u64> {
        self.loading = false;
        match result {
            Ok(outcome) => {
                info!("coupon claimed");
                self.coupon = Some(outcome.coupon.clone());
                self.message = Message::success(CLAIMED_TEXT);
                self.seed_if_present(outcome.restriction_time)
            }
            Err(e) => {
                warn!(error = %e, "claim failed");
                self.coupon = None;
                self.copied_until = None;
                self.message =
                    Message::error(e.server_message().unwrap_or(CLAIM_FALLBACK_TEXT));
                self.seed_if_present(e.time_left())
            }
        }
    }

    fn seed_if_present(&mut self, seconds: Option<u64>) -> Option<u64> {
        let seconds = seconds.filter(|&s| s > 0)?;
        self.countdown.seed(Some(seconds));
        Some(seconds)
    }

    // ── Countdown ────────────────────────────────────────────────────

    /// Advance the countdown by one second.
    pub fn tick_second(&mut self) -> Tick {
        let tick = self.countdown.tick();
        if tick == Tick::Expired {
            debug!("restriction window expired");
            if self.announce_expiry {
                self.message = Message::success(EXPIRED_TEXT);
            }
        }
        tick
    }

    // ── Copy ─────────────────────────────────────────────────────────

    /// Copy the coupon into `clipboard` and raise the indicator until
    /// `now + COPIED_FLASH`.
    pub fn copy_coupon(&mut self, clipboard: &mut dyn ClipboardSink, now: Instant) -> CopyOutcome {
        let Some(coupon) = self.coupon.as_ref() else {
            return CopyOutcome::NothingToCopy;
        };
        match clipboard.set_text(coupon.as_str()) {
            Ok(()) => {
                self.copied_until = Some(now + COPIED_FLASH);
                CopyOutcome::Copied
            }
            Err(e) => {
                warn!(error = %e, "failed to copy code");
                CopyOutcome::Failed(e.to_string())
            }
        }
    }

    /// Drop the indicator once its deadline has passed. Returns `true`
    /// when it was cleared by this call.
    pub fn expire_copied(&mut self, now: Instant) -> bool {
        match self.copied_until {
            Some(until) if now >= until => {
                self.copied_until = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::model::Severity;

    #[derive(Default)]
    struct MemoryClipboard {
        text: Option<String>,
        fail: bool,
    }

    impl ClipboardSink for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), CoreError> {
            if self.fail {
                return Err(CoreError::Clipboard {
                    message: "denied".into(),
                });
            }
            self.text = Some(text.to_owned());
            Ok(())
        }
    }

    fn outcome(code: &str, restriction_time: Option<u64>) -> Result<ClaimOutcome, CoreError> {
        Ok(ClaimOutcome {
            coupon: CouponCode::new(code),
            restriction_time,
            claimed_at: Utc::now(),
        })
    }

    fn rejection(message: Option<&str>, time_left: Option<u64>) -> Result<ClaimOutcome, CoreError> {
        Err(CoreError::Rejected {
            status: 429,
            message: message.map(String::from),
            time_left,
        })
    }

    #[test]
    fn starts_with_welcome_info() {
        let view = ClaimView::new(false);
        assert_eq!(view.message().severity, Severity::Info);
        assert_eq!(view.message().text, WELCOME_TEXT);
        assert!(view.can_claim());
        assert_eq!(view.button_label(), "Claim Your Coupon");
    }

    // ── Status ───────────────────────────────────────────────────────

    #[test]
    fn restricted_status_seeds_countdown_and_warns() {
        let mut view = ClaimView::new(false);
        let seeded = view.apply_status(&Ok(Restriction {
            restricted: true,
            time_left: Some(5),
        }));

        assert_eq!(seeded, Some(5));
        assert_eq!(view.time_left(), Some(5));
        assert_eq!(view.message(), &Message::warning(RESTRICTED_TEXT));
        assert!(!view.can_claim());
        assert_eq!(view.button_label(), "Please Wait");
    }

    #[test]
    fn countdown_decrements_each_second_to_zero() {
        let mut view = ClaimView::new(false);
        view.apply_status(&Ok(Restriction {
            restricted: true,
            time_left: Some(3),
        }));

        let mut seen = vec![view.time_left()];
        while view.tick_second() != Tick::Idle {
            seen.push(view.time_left());
        }

        assert_eq!(seen, vec![Some(3), Some(2), Some(1), None]);
        assert!(view.can_claim());
    }

    #[test]
    fn unrestricted_status_leaves_state_alone() {
        let mut view = ClaimView::new(false);
        let seeded = view.apply_status(&Ok(Restriction {
            restricted: false,
            time_left: Some(50),
        }));

        assert_eq!(seeded, None);
        assert_eq!(view.time_left(), None);
        assert_eq!(view.message().text, WELCOME_TEXT);
    }

    #[test]
    fn failed_status_shows_error() {
        let mut view = ClaimView::new(false);
        view.apply_status(&Err(CoreError::Timeout { timeout_secs: 30 }));

        assert_eq!(view.message(), &Message::error(STATUS_ERROR_TEXT));
    }

    // ── Claim ────────────────────────────────────────────────────────

    #[test]
    fn successful_claim_shows_coupon() {
        let mut view = ClaimView::new(false);
        assert!(view.begin_claim());
        assert!(view.loading());
        assert_eq!(view.button_label(), "Processing...");

        let seeded = view.apply_claim(&outcome("SAVE-30", Some(3600)));

        assert!(!view.loading());
        assert_eq!(view.coupon().unwrap().as_str(), "SAVE-30");
        assert_eq!(view.message().severity, Severity::Success);
        assert_eq!(view.message().text, CLAIMED_TEXT);
        assert_eq!(seeded, Some(3600));
        assert_eq!(view.countdown_display(), "01:00:00");
    }

    #[test]
    fn claim_without_restriction_time_keeps_button_enabled() {
        let mut view = ClaimView::new(false);
        view.begin_claim();
        let seeded = view.apply_claim(&outcome("FREE-SHIP", None));

        assert_eq!(seeded, None);
        assert!(view.can_claim());
    }

    #[test]
    fn begin_claim_is_refused_while_busy() {
        let mut view = ClaimView::new(false);
        assert!(view.begin_claim());
        assert!(!view.begin_claim());

        view.apply_claim(&outcome("A", Some(10)));
        assert!(!view.begin_claim(), "window active");
    }

    #[test]
    fn failed_claim_shows_server_message_and_clears_coupon() {
        let mut view = ClaimView::new(false);
        view.begin_claim();
        view.apply_claim(&outcome("OLD", None));

        view.begin_claim();
        let seeded = view.apply_claim(&rejection(Some("Already claimed from this IP"), Some(42)));

        assert!(view.coupon().is_none());
        assert_eq!(view.message(), &Message::error("Already claimed from this IP"));
        assert_eq!(seeded, Some(42));
        assert_eq!(view.time_left(), Some(42));
        assert!(!view.loading());
    }

    #[test]
    fn failed_claim_without_message_uses_fallback() {
        let mut view = ClaimView::new(false);
        view.begin_claim();
        view.apply_claim(&rejection(None, None));

        assert_eq!(view.message(), &Message::error(CLAIM_FALLBACK_TEXT));
        assert_eq!(view.time_left(), None);
    }

    #[test]
    fn network_failure_uses_fallback() {
        let mut view = ClaimView::new(false);
        view.begin_claim();
        view.apply_claim(&Err(CoreError::ConnectionFailed {
            url: "http://localhost".into(),
            reason: "refused".into(),
        }));

        assert_eq!(view.message().text, CLAIM_FALLBACK_TEXT);
    }

    // ── Expiry variant ───────────────────────────────────────────────

    #[test]
    fn expiry_announces_when_enabled() {
        let mut view = ClaimView::new(true);
        view.apply_status(&Ok(Restriction {
            restricted: true,
            time_left: Some(1),
        }));

        assert_eq!(view.tick_second(), Tick::Expired);
        assert_eq!(view.message(), &Message::success(EXPIRED_TEXT));
    }

    #[test]
    fn expiry_is_silent_when_disabled() {
        let mut view = ClaimView::new(false);
        view.apply_status(&Ok(Restriction {
            restricted: true,
            time_left: Some(1),
        }));

        assert_eq!(view.tick_second(), Tick::Expired);
        assert_eq!(view.message(), &Message::warning(RESTRICTED_TEXT));
    }

    // ── Copy ─────────────────────────────────────────────────────────

    #[test]
    fn copy_flashes_for_exactly_two_seconds() {
        let mut view = ClaimView::new(false);
        view.begin_claim();
        view.apply_claim(&outcome("COPY-ME", None));

        let mut clipboard = MemoryClipboard::default();
        let t0 = Instant::now();
        assert_eq!(view.copy_coupon(&mut clipboard, t0), CopyOutcome::Copied);
        assert_eq!(clipboard.text.as_deref(), Some("COPY-ME"));

        let just_before = t0 + Duration::from_millis(1999);
        assert!(view.is_copied(just_before));
        assert!(!view.expire_copied(just_before));

        let deadline = t0 + Duration::from_millis(2000);
        assert!(!view.is_copied(deadline));
        assert!(view.expire_copied(deadline));
        assert!(!view.expire_copied(deadline));
    }

    #[test]
    fn copy_without_coupon_is_noop() {
        let mut view = ClaimView::new(false);
        let mut clipboard = MemoryClipboard::default();

        assert_eq!(
            view.copy_coupon(&mut clipboard, Instant::now()),
            CopyOutcome::NothingToCopy
        );
        assert!(clipboard.text.is_none());
    }

    #[test]
    fn clipboard_failure_keeps_indicator_down() {
        let mut view = ClaimView::new(false);
        view.begin_claim();
        view.apply_claim(&outcome("X", None));

        let mut clipboard = MemoryClipboard {
            fail: true,
            ..MemoryClipboard::default()
        };
        let now = Instant::now();
        let outcome = view.copy_coupon(&mut clipboard, now);

        assert!(matches!(outcome, CopyOutcome::Failed(_)));
        assert!(!view.is_copied(now));
        assert_eq!(view.message().text, CLAIMED_TEXT);
    }
}
