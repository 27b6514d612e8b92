// ── Runtime connection configuration ──
//
// These types describe *how* to reach the backend. They never touch disk;
// the CLI builds a `StorefrontConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Backend used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

/// TLS verification strategy for HTTPS backends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// Built-in root store.
    #[default]
    SystemDefaults,
    /// Additionally trust a custom CA certificate file.
    CustomCa(PathBuf),
}

/// Configuration for one storefront backend.
///
/// Built by the CLI, passed to `Storefront` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend root URL (e.g., `http://localhost:8001`).
    pub base_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout. `None` means no local timeout.
    pub timeout: Option<Duration>,
    /// Drop the session when an authenticated request comes back 401.
    pub logout_on_unauthorized: bool,
}

impl StorefrontConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend URL is valid"),
            tls: TlsVerification::default(),
            timeout: None,
            logout_on_unauthorized: true,
        }
    }
}
