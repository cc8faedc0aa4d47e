//! `couponly status`: restriction state, optionally watched until it clears.

use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use couponly_core::{ClaimView, CouponService, Message, Severity, Tick};

use crate::cli::{GlobalOpts, StatusArgs};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct StatusReport {
    restricted: bool,
    time_left_secs: Option<u64>,
    time_left: Option<String>,
    next_claim_at: Option<DateTime<Utc>>,
    message: Message,
}

impl StatusReport {
    fn from_view(view: &ClaimView) -> Self {
        let time_left_secs = view.time_left();
        Self {
            restricted: time_left_secs.is_some(),
            time_left_secs,
            time_left: time_left_secs.map(couponly_core::format_hms),
            next_claim_at: time_left_secs
                .and_then(|secs| i64::try_from(secs).ok())
                .and_then(TimeDelta::try_seconds)
                .and_then(|d| Utc::now().checked_add_signed(d)),
            message: view.message().clone(),
        }
    }
}

pub async fn handle(
    service: &CouponService,
    args: &StatusArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut view = ClaimView::new(service.config().announce_expiry);
    let result = service.check_status().await;
    view.apply_status(&result);
    let restriction = result?;

    // Restricted with no usable window: the service still says wait.
    let report = StatusReport {
        restricted: restriction.restricted,
        ..StatusReport::from_view(&view)
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &report,
        |r| detail(r, color),
        |r| r.time_left_secs.unwrap_or(0).to_string(),
    )?;
    output::print_output(&out, global.quiet);

    if args.watch && view.time_left().is_some() {
        watch(&mut view, global.quiet).await;
        if view.message().severity == Severity::Success {
            output::print_output(&output::paint_message(view.message(), color), global.quiet);
        }
    }

    Ok(())
}

fn detail(report: &StatusReport, color: bool) -> String {
    let state = if report.restricted {
        "Restricted"
    } else {
        "Available"
    };
    let mut rows = vec![
        ("Status", state.to_owned()),
        ("Message", output::paint_message(&report.message, color)),
    ];
    if let Some(ref left) = report.time_left {
        rows.push(("Time left", left.clone()));
    }
    if let Some(at) = report.next_claim_at {
        rows.push((
            "Next claim at",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        ));
    }
    output::detail_table(&rows)
}

/// Count the window down on a progress bar until it expires or Ctrl+C.
async fn watch(view: &mut ClaimView, quiet: bool) {
    let Some(total) = view.time_left() else {
        return;
    };

    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total)
    };
    bar.set_style(
        ProgressStyle::with_template("{spinner:.yellow} {msg} [{bar:30.yellow/dim}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_message(format!("Next coupon in {}", view.countdown_display()));

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }
        match view.tick_second() {
            Tick::Running(left) => {
                bar.set_position(total - left);
                bar.set_message(format!("Next coupon in {}", view.countdown_display()));
            }
            Tick::Expired | Tick::Idle => break,
        }
    }

    bar.finish_and_clear();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use couponly_core::{CoreError, Restriction};

    use super::*;

    #[test]
    fn report_reflects_restricted_view() {
        let mut view = ClaimView::new(true);
        view.apply_status(&Ok::<_, CoreError>(Restriction {
            restricted: true,
            time_left: Some(90),
        }));

        let report = StatusReport::from_view(&view);
        assert!(report.restricted);
        assert_eq!(report.time_left_secs, Some(90));
        assert_eq!(report.time_left.as_deref(), Some("00:01:30"));
        assert!(report.next_claim_at.unwrap() > Utc::now());
        assert_eq!(report.message.severity, Severity::Warning);
    }

    #[test]
    fn available_view_has_no_window() {
        let view = ClaimView::new(true);
        let report = StatusReport::from_view(&view);
        assert!(!report.restricted);
        assert!(report.time_left.is_none());
        assert!(report.next_claim_at.is_none());

        let table = detail(&report, false);
        assert!(table.contains("Available"));
    }

    #[tokio::test(start_paused = true)]
    async fn watch_runs_until_expiry() {
        let mut view = ClaimView::new(true);
        view.apply_status(&Ok::<_, CoreError>(Restriction {
            restricted: true,
            time_left: Some(3),
        }));

        watch(&mut view, true).await;

        assert_eq!(view.time_left(), None);
        assert_eq!(view.message().severity, Severity::Success);
    }
}
