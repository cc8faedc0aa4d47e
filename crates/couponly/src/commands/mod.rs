//! Command dispatch: bridges CLI args -> core service calls -> output formatting.

pub mod claim;
pub mod config_cmd;
pub mod status;

use tracing::{debug, warn};

use couponly_core::CouponService;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a service-bound command, then persist the visitor's session.
///
/// The session is saved whether or not the command succeeded.
pub async fn dispatch(
    cmd: Command,
    service: &CouponService,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = match cmd {
        Command::Status(args) => status::handle(service, &args, global).await,
        Command::Claim(args) => claim::handle(service, &args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    };

    if let Some(cookies) = service.session_cookies() {
        match couponly_config::save_session(profile_name, &service.config().url, &cookies) {
            Ok(()) => debug!(profile = profile_name, "session saved"),
            Err(e) => warn!(profile = profile_name, error = %e, "failed to save session"),
        }
    }

    result
}
