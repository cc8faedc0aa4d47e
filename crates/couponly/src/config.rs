//! CLI-side config resolution: the shared couponly-config profiles with
//! `GlobalOpts` flag overrides layered on top.

use std::time::Duration;

use couponly_config::{Config, Defaults, Profile};
use couponly_core::{ServiceConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use couponly_config::{
    config_path, load_config, load_config_or_default, save_config, session_path,
};

/// Determine the active profile name: `--profile` flag, then config default.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Resolve a profile with CLI flag overrides. No session is attached.
pub fn resolve_profile(
    profile: &Profile,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ServiceConfig, CliError> {
    let mut config = couponly_config::profile_to_service_config(profile, defaults)?;

    if let Some(ref server) = global.server {
        config.url = couponly_config::parse_server_url(server)?;
    }
    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }

    Ok(config)
}

/// Build a `ServiceConfig` from the config file, profile, and CLI overrides.
///
/// Returns the profile name alongside it, which keys the session file.
/// The saved session is attached only when it was issued by the final URL's
/// origin.
pub fn build_service_config(global: &GlobalOpts) -> Result<(ServiceConfig, String), CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let mut config = resolve_profile(profile, &cfg.defaults, global)?;
        couponly_config::attach_session(&mut config, &profile_name);
        return Ok((config, profile_name));
    }

    // An explicit --profile that doesn't exist is an error, not a fallback.
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    // No profile: build from flags / env alone.
    let server = global.server.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let ad_hoc = Profile::new(server);
    let mut config = resolve_profile(&ad_hoc, &cfg.defaults, global)?;
    couponly_config::attach_session(&mut config, &profile_name);
    Ok((config, profile_name))
}

/// Comma-separated, sorted profile names for help text.
pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    names.join(", ")
}
