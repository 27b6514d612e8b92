// ── Session & identity ──

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Public profile of the logged-in user. Persisted as JSON next to the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// An authenticated identity: bearer token plus the user it belongs to.
///
/// The two halves only exist together, so "user present iff token present"
/// holds by construction wherever an `Option<Session>` is stored.
#[derive(Debug, Clone)]
pub struct Session {
    token: SecretString,
    user: User,
}

impl Session {
    pub fn new(token: SecretString, user: User) -> Self {
        Self { token, user }
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}

/// Backend liveness report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
