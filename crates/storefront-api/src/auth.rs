// Authentication endpoints
//
// Email/password login and registration. Both return a bearer token and the
// public user profile; failures carry the backend's `detail` message.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::StorefrontClient;
use crate::error::Error;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};

impl StorefrontClient {
    /// `POST /api/auth/login`
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AuthResponse, Error> {
        let url = self.api_url("auth/login")?;
        debug!(email, "logging in");
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        self.post_json(url, &body).await
    }

    /// `POST /api/auth/register`
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, Error> {
        let url = self.api_url("auth/register")?;
        debug!(email, "registering account");
        let body = RegisterRequest {
            email,
            password: password.expose_secret(),
            name,
        };
        self.post_json(url, &body).await
    }
}
