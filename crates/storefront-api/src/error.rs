use thiserror::Error;

/// Top-level error type for the `storefront-api` crate.
///
/// Covers every failure mode of the backend contract: authentication,
/// transport, non-success responses, and payload decoding.
/// `storefront-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials rejected, or a bearer token the backend no longer accepts.
    #[error("Authentication failed (HTTP {status}): {message}")]
    Authentication {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-success response. `message` carries the backend's `detail`
    /// when one was supplied.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the backend rejected the bearer token or credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Authentication { status: 401, .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The server-supplied `detail` message, if the response carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Authentication { detail, .. } | Self::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
