//! Everything that can happen in the UI. State only changes in response
//! to an action.

use couponly_core::{ClaimOutcome, CoreError, Restriction};

#[derive(Debug)]
pub enum Action {
    // ── App lifecycle ─────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    ToggleHelp,

    // ── User intents ──────────────────────────────────────────────────
    /// Ask the service whether a claim is allowed.
    CheckStatus,
    /// Claim button pressed; the screen decides whether it's allowed.
    Claim,
    /// Copy the current coupon to the clipboard.
    CopyCode,

    // ── Service round trips ───────────────────────────────────────────
    /// A claim was accepted locally; send the request.
    SubmitClaim,
    StatusLoaded(Result<Restriction, CoreError>),
    ClaimFinished(Result<ClaimOutcome, CoreError>),

    // ── Countdown timer ───────────────────────────────────────────────
    /// A new restriction window was seeded; (re)start the timer.
    StartCountdown,
    StopCountdown,
    CountdownTick,
}
