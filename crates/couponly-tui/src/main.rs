//! `couponly-tui`: claim a discount coupon from the terminal.
//!
//! One screen built on [ratatui](https://ratatui.rs): the status message,
//! the claimed code (click or `y` to copy), the countdown until the next
//! claim and the claim button. The service comes from `--server` or from
//! the shared couponly config profile; the visitor's session cookies are
//! shared with the `couponly` CLI.
//!
//! Logs go to a file (default `$TMPDIR/couponly-tui.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod theme;
mod tui;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use couponly_config::Profile;
use couponly_core::{CouponService, SystemClipboard, TlsVerification};

use crate::app::App;

/// Terminal UI for claiming discount coupons.
#[derive(Parser, Debug)]
#[command(name = "couponly-tui", version, about)]
struct Cli {
    /// Coupon service URL (overrides profile)
    #[arg(short = 'S', long, env = "COUPONLY_SERVER")]
    server: Option<String>,

    /// Service profile to use
    #[arg(short = 'p', long, env = "COUPONLY_PROFILE")]
    profile: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Hold the guard for the lifetime of the app so
/// buffered lines are flushed on exit.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "couponly_tui={log_level},couponly_core={log_level},couponly_api={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("couponly-tui.log"));
    let log_dir = log_file.parent().unwrap_or(Path::new("."));
    let log_name = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("couponly-tui.log"));

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, log_name));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve the service: profile from the shared config, with `--server`
/// and `--insecure` on top. A bare `--server` works without any config.
/// The saved session is attached last, against the final URL.
fn build_service(cli: &Cli) -> Result<(CouponService, String)> {
    let cfg = couponly_config::load_config()?;
    let profile_name = cli
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    let profile = match (cfg.profiles.get(&profile_name), cli.server.as_deref()) {
        (Some(profile), _) => profile.clone(),
        (None, Some(server)) => Profile::new(server),
        (None, None) if cli.profile.is_some() => {
            bail!("profile '{profile_name}' not found; create it with `couponly config init`")
        }
        (None, None) => bail!(
            "no coupon service configured; pass --server or run `couponly config init`"
        ),
    };

    let mut config = couponly_config::profile_to_service_config(&profile, &cfg.defaults)?;
    if let Some(ref server) = cli.server {
        config.url = couponly_config::parse_server_url(server)?;
    }
    if cli.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    couponly_config::attach_session(&mut config, &profile_name);

    Ok((CouponService::new(config)?, profile_name))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let (service, profile_name) = build_service(&cli)?;
    info!(
        url = %service.config().url,
        profile = %profile_name,
        "starting couponly-tui"
    );

    let mut app = App::new(service, Some(profile_name), Box::new(SystemClipboard::new()));
    app.run().await?;

    Ok(())
}
