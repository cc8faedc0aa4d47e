//! Config subcommand handlers.

use std::io::IsTerminal;

use dialoguer::{Confirm, Input};
use serde::Serialize;

use couponly_config::Profile;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Use `given` if present, otherwise prompt (interactive terminals only).
fn value_or_prompt(
    given: Option<String>,
    field: &str,
    prompt: &str,
    default: &str,
) -> Result<String, CliError> {
    if let Some(v) = given {
        return Ok(v);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: format!("not a terminal; pass --{field}"),
        });
    }
    Input::new()
        .with_prompt(prompt)
        .default(default.to_owned())
        .interact_text()
        .map_err(prompt_err)
}

#[derive(Serialize)]
struct Paths {
    config: String,
    session: String,
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init { name, url } => {
            let config_path = config::config_path();
            let interactive = name.is_none() || (url.is_none() && global.server.is_none());
            if interactive {
                eprintln!("couponly configuration wizard");
                eprintln!("   Config path: {}\n", config_path.display());
            }

            let profile_name = value_or_prompt(name, "name", "Profile name", "default")?;
            let server = value_or_prompt(
                url.or_else(|| global.server.clone()),
                "url",
                "Coupon service URL",
                "http://localhost:3000",
            )?;
            // Validate before writing anything.
            couponly_config::parse_server_url(&server)?;

            let mut profile = Profile::new(server);
            if global.insecure {
                profile.insecure = Some(true);
            } else if interactive {
                let accept = Confirm::new()
                    .with_prompt("Accept self-signed TLS certificates?")
                    .default(false)
                    .interact()
                    .map_err(prompt_err)?;
                if accept {
                    profile.insecure = Some(true);
                }
            }
            if let Some(secs) = global.timeout {
                profile.timeout = Some(secs);
            }

            let mut cfg = config::load_config()?;
            if cfg.profiles.is_empty() {
                cfg.default_profile = Some(profile_name.clone());
            }
            cfg.profiles.insert(profile_name.clone(), profile);
            config::save_config(&cfg)?;

            eprintln!("✓ Profile '{profile_name}' written to {}", config_path.display());
            if cfg.default_profile.as_deref() == Some(profile_name.as_str()) {
                eprintln!("  Active profile: {profile_name}");
            }
            eprintln!("  Test it: couponly status");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let text = toml::to_string_pretty(&cfg)?;
            let out = output::render_single(
                &global.output,
                &cfg,
                |_| text.clone(),
                |c| c.default_profile.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let paths = Paths {
                config: config::config_path().display().to_string(),
                session: config::session_path(&profile_name).display().to_string(),
            };
            let out = output::render_single(
                &global.output,
                &paths,
                |p| {
                    output::detail_table(&[
                        ("Config", p.config.clone()),
                        ("Session", p.session.clone()),
                    ])
                },
                |p| p.config.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── Forget ──────────────────────────────────────────────────
        ConfigCommand::Forget { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            couponly_config::clear_session(&profile_name)?;
            eprintln!("✓ Forgot saved session for '{profile_name}'");
            Ok(())
        }
    }
}
