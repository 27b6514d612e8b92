//! Configuration for the storefront CLI.
//!
//! TOML profiles layered with environment variables, platform paths, and
//! translation to `storefront_core::StorefrontConfig`. Also provides the
//! durable [`SessionStorage`] adapters the core's session store persists
//! through.

mod storage;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use storefront_core::{
    DEFAULT_BACKEND_URL, MemoryStorage, SessionStorage, StorefrontConfig, TlsVerification,
};

pub use storage::{FileStorage, KeyringStorage};

/// Profile used when neither the flag nor the file names one.
pub const DEFAULT_PROFILE: &str = "default";

/// Environment prefix. Nested keys use `__`, e.g.
/// `STOREFRONT_DEFAULTS__OUTPUT=json`.
pub const ENV_PREFIX: &str = "STOREFRONT_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in {}", .path.display())]
    UnknownProfile { name: String, path: PathBuf },

    #[error("config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

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

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Pick the profile to use: explicit name, then `default_profile`, then
    /// `"default"`. The `"default"` profile need not exist on disk.
    pub fn resolve_profile(&self, name: Option<&str>) -> Result<(String, Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or(DEFAULT_PROFILE);

        match self.profiles.get(name) {
            Some(profile) => Ok((name.to_owned(), profile.clone())),
            None if name == DEFAULT_PROFILE => Ok((name.to_owned(), Profile::default())),
            None => Err(ConfigError::UnknownProfile {
                name: name.to_owned(),
                path: config_path(),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout. Unset means no local timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout_secs: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// Where a profile's session token is kept between runs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionBackend {
    /// JSON file in the platform data directory.
    #[default]
    File,
    /// System keyring.
    Keyring,
    /// Not persisted; every run starts logged out.
    Memory,
}

/// A named backend profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Backend root URL (e.g., "http://localhost:8001").
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Override the global timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Extra CA certificate for HTTPS backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    #[serde(default)]
    pub session_backend: SessionBackend,

    /// Log out when the backend rejects the stored token.
    #[serde(default = "default_true")]
    pub logout_on_unauthorized: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            timeout_secs: None,
            ca_cert: None,
            session_backend: SessionBackend::default(),
            logout_on_unauthorized: true,
        }
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.into()
}
fn default_true() -> bool {
    true
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "storefront", "storefront")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || fallback_dir(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding per-profile session files.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || fallback_dir(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

pub fn session_file_path(profile_name: &str) -> PathBuf {
    data_dir()
        .join("sessions")
        .join(format!("{profile_name}.json"))
}

fn fallback_dir(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("storefront");
    p
}

// ── Loading & saving ────────────────────────────────────────────────

/// Load the full Config: defaults, then the config file, then environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Same as [`load_config`] with an explicit file. A missing file is fine.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Write a starter config with a single `default` profile. Refuses to
/// overwrite an existing file.
pub fn init_config(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    let mut cfg = Config::default();
    cfg.profiles.insert(DEFAULT_PROFILE.into(), Profile::default());
    save_config(&cfg, path)?;
    Ok(cfg)
}

// ── Translation to core types ───────────────────────────────────────

/// Build the runtime `StorefrontConfig` for a profile.
pub fn profile_to_storefront_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<StorefrontConfig, ConfigError> {
    let base_url = parse_backend_url(&profile.backend_url)?;

    let tls = profile
        .ca_cert
        .clone()
        .map_or(TlsVerification::SystemDefaults, TlsVerification::CustomCa);

    let timeout = profile
        .timeout_secs
        .or(defaults.timeout_secs)
        .map(Duration::from_secs);

    Ok(StorefrontConfig {
        base_url,
        tls,
        timeout,
        logout_on_unauthorized: profile.logout_on_unauthorized,
    })
}

pub fn parse_backend_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|e| ConfigError::Validation {
        field: "backend_url".into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "backend_url".into(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// Open the session persistence adapter a profile asks for.
pub fn open_session_storage(
    backend: SessionBackend,
    profile_name: &str,
) -> Arc<dyn SessionStorage> {
    match backend {
        SessionBackend::File => Arc::new(FileStorage::new(session_file_path(profile_name))),
        SessionBackend::Keyring => Arc::new(KeyringStorage::new(profile_name)),
        SessionBackend::Memory => Arc::new(MemoryStorage::new()),
    }
}
