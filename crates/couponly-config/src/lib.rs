//! Shared configuration for the couponly CLI and TUI.
//!
//! TOML profiles, environment overrides, translation to
//! `couponly_core::ServiceConfig`, and on-disk persistence of the
//! visitor's session cookies. Both binaries depend on this crate; the CLI
//! adds `GlobalOpts`-aware wrappers on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use couponly_core::{ServiceConfig, TlsVerification};

/// Environment prefix for config overrides, e.g. `COUPONLY_DEFAULTS__TIMEOUT=10`.
pub const ENV_PREFIX: &str = "COUPONLY_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named service profiles, kept sorted by name.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Show a success notice when the restriction window runs out.
    #[serde(default = "default_announce_expiry")]
    pub announce_expiry: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            announce_expiry: default_announce_expiry(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_announce_expiry() -> bool {
    true
}

/// A named coupon service profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Service base URL (e.g., "https://coupons.example.com").
    pub server: String,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Override timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Override the expiry notice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announce_expiry: Option<bool>,
}

impl Profile {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            announce_expiry: None,
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "couponly", "couponly")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where a profile's session cookies are kept.
pub fn session_path(profile_name: &str) -> PathBuf {
    let dir = project_dirs().map_or_else(
        || dirs_fallback().join("sessions"),
        |dirs| dirs.data_local_dir().join("sessions"),
    );
    dir.join(format!("{profile_name}.cookie"))
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("couponly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` layered over defaults, then `COUPONLY_*` env vars.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    Ok(config)
}

/// Load config for read-only callers, falling back to defaults when the
/// file can't be parsed. Never save the result: it would drop the broken
/// file's profiles.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config");
        Config::default()
    })
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// Parse and validate a service URL.
pub fn parse_server_url(raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw.trim().parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("expected an http(s) URL, got scheme '{other}'"),
        }),
    }
}

/// Build a `ServiceConfig` from a profile: no CLI flag overrides and no
/// session. Call [`attach_session`] once the final URL is known.
pub fn profile_to_service_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ServiceConfig, ConfigError> {
    let url = parse_server_url(&profile.server)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ServiceConfig {
        url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        announce_expiry: profile.announce_expiry.unwrap_or(defaults.announce_expiry),
        session: None,
    })
}

// ── Session persistence ─────────────────────────────────────────────

/// On-disk session: the cookies plus the origin that issued them.
#[derive(Debug, Deserialize, Serialize)]
struct SessionFile {
    origin: String,
    cookies: String,
}

/// `scheme://host[:port]` of a service URL; sessions never cross it.
fn session_origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Read the saved session cookies for a profile, if they were issued by
/// the origin of `url`.
pub fn load_session(profile_name: &str, url: &Url) -> Option<SecretString> {
    load_session_from(&session_path(profile_name), url)
}

pub fn load_session_from(path: &Path, url: &Url) -> Option<SecretString> {
    let raw = std::fs::read_to_string(path).ok()?;
    let file: SessionFile = match toml::from_str(&raw) {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable session file");
            return None;
        }
    };

    let origin = session_origin(url);
    if file.origin != origin {
        debug!(saved = %file.origin, current = %origin, "saved session belongs to another origin");
        return None;
    }
    if file.cookies.trim().is_empty() {
        return None;
    }
    debug!(path = %path.display(), "loaded saved session");
    Some(SecretString::from(file.cookies))
}

/// Attach the profile's saved session to `config`, keyed by `config.url`.
pub fn attach_session(config: &mut ServiceConfig, profile_name: &str) {
    config.session = load_session(profile_name, &config.url);
}

/// Persist session cookies issued by the origin of `url` for a profile.
pub fn save_session(
    profile_name: &str,
    url: &Url,
    cookies: &SecretString,
) -> Result<(), ConfigError> {
    save_session_to(&session_path(profile_name), url, cookies)
}

pub fn save_session_to(path: &Path, url: &Url, cookies: &SecretString) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = SessionFile {
        origin: session_origin(url),
        cookies: cookies.expose_secret().to_owned(),
    };
    write_private(path, &toml::to_string(&file)?)?;
    debug!(path = %path.display(), origin = %file.origin, "saved session");
    Ok(())
}

/// Forget a profile's session. Missing files are not an error.
pub fn clear_session(profile_name: &str) -> Result<(), ConfigError> {
    match std::fs::remove_file(session_path(profile_name)) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    std::fs::write(path, contents)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.defaults.announce_expiry);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        let mut profile = Profile::new("https://coupons.example.com");
        profile.timeout = Some(5);
        cfg.profiles.insert("shop".into(), profile);
        cfg.default_profile = Some("shop".into());
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.default_profile.as_deref(), Some("shop"));
        let shop = &loaded.profiles["shop"];
        assert_eq!(shop.server, "https://coupons.example.com");
        assert_eq!(shop.timeout, Some(5));
        assert_eq!(shop.insecure, None);
    }

    #[test]
    fn profile_overrides_defaults() {
        let defaults = Defaults::default();
        let mut profile = Profile::new("http://localhost:5000");
        profile.insecure = Some(true);
        profile.timeout = Some(7);
        profile.announce_expiry = Some(false);

        let svc = profile_to_service_config(&profile, &defaults).unwrap();
        assert_eq!(svc.url.as_str(), "http://localhost:5000/");
        assert!(svc.session.is_none());
        assert_eq!(svc.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(svc.timeout, Duration::from_secs(7));
        assert!(!svc.announce_expiry);
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(parse_server_url("ftp://example.com").is_err());
        assert!(parse_server_url("not a url").is_err());
        assert!(parse_server_url(" https://example.com ").is_ok());
    }

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn session_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions").join("default.cookie");
        let shop = url("https://coupons.example.com/api/");

        assert!(load_session_from(&path, &shop).is_none());

        let cookies = SecretString::from("visitor=abc; sid=1".to_owned());
        save_session_to(&path, &shop, &cookies).unwrap();

        // Same origin, different path.
        let loaded = load_session_from(&path, &url("https://coupons.example.com/")).unwrap();
        assert_eq!(loaded.expose_secret(), "visitor=abc; sid=1");
    }

    #[test]
    fn session_is_not_replayed_to_another_origin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.cookie");
        let cookies = SecretString::from("visitor=abc".to_owned());
        save_session_to(&path, &url("https://coupons.example.com"), &cookies).unwrap();

        assert!(load_session_from(&path, &url("https://other.example.com")).is_none());
        assert!(load_session_from(&path, &url("http://coupons.example.com")).is_none());
        assert!(load_session_from(&path, &url("https://coupons.example.com:8443")).is_none());
    }

    #[test]
    fn legacy_session_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.cookie");
        std::fs::write(&path, "visitor=abc").unwrap();

        assert!(load_session_from(&path, &url("https://coupons.example.com")).is_none());
    }

    #[test]
    fn broken_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profiles.work]\nserver = \n").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::Figment(_))));
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.cookie");
        save_session_to(&path, &url("http://localhost"), &SecretString::from("a=b".to_owned()))
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
