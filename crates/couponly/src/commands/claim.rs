//! `couponly claim`: claim a coupon and optionally copy it.

use std::time::Instant;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracing::warn;

use couponly_core::view::CLAIM_FALLBACK_TEXT;
use couponly_core::{
    ClaimView, ClipboardSink, CopyOutcome, CoreError, CouponCode, CouponService, Message,
    SystemClipboard,
};

use crate::cli::{ClaimArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct ClaimReport {
    coupon: CouponCode,
    message: Message,
    restriction_time_secs: Option<u64>,
    next_claim_in: Option<String>,
    claimed_at: DateTime<Utc>,
    copied: bool,
}

pub async fn handle(
    service: &CouponService,
    args: &ClaimArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut view = ClaimView::new(service.config().announce_expiry);
    view.begin_claim();
    let result = service.claim().await;
    view.apply_claim(&result);

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e @ CoreError::Rejected { .. }) => {
            return Err(CliError::rejected(
                Some(&view.message().text),
                CLAIM_FALLBACK_TEXT,
                e.time_left(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let copied = args.copy && copy_to(&mut view, &mut SystemClipboard::new());

    let report = ClaimReport {
        coupon: outcome.coupon,
        message: view.message().clone(),
        restriction_time_secs: view.time_left(),
        next_claim_in: view.time_left().map(couponly_core::format_hms),
        claimed_at: outcome.claimed_at,
        copied,
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &report,
        |r| detail(r, color),
        |r| r.coupon.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Copy the claimed code. Failure is reported but doesn't fail the claim.
fn copy_to(view: &mut ClaimView, clipboard: &mut dyn ClipboardSink) -> bool {
    match view.copy_coupon(clipboard, Instant::now()) {
        CopyOutcome::Copied => true,
        CopyOutcome::Failed(reason) => {
            warn!(%reason, "clipboard copy failed");
            eprintln!("Could not copy the coupon to the clipboard: {reason}");
            false
        }
        CopyOutcome::NothingToCopy => false,
    }
}

fn detail(report: &ClaimReport, color: bool) -> String {
    let mut rows = vec![
        ("Coupon", report.coupon.to_string()),
        ("Message", output::paint_message(&report.message, color)),
        (
            "Claimed at",
            report
                .claimed_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        ),
    ];
    if let Some(ref next) = report.next_claim_in {
        rows.push(("Next claim in", next.clone()));
    }
    if report.copied {
        rows.push(("Clipboard", "Copied".into()));
    }
    output::detail_table(&rows)
}
