// Storefront HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token injection,
// and `{ "detail": ... }` error extraction. Endpoint groups (catalog, cart,
// auth) are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ErrorBody;
use crate::transport::TransportConfig;

/// Raw HTTP client for the storefront backend.
///
/// Stateless with respect to sessions: authenticated calls take the bearer
/// token as an argument, so the caller (the session store) stays the only
/// owner of credentials.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    http: reqwest::Client,
    base_url: Url,
}

impl StorefrontClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://localhost:8001`); all
    /// endpoint paths are resolved under `/api/`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`, tolerating a trailing slash on the base.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        debug!("GET {}", url);
        let builder = with_bearer(self.http.get(url), token);
        let resp = builder.send().await?;
        parse_json(resp).await
    }

    pub(crate) async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, Error>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {}", url);
        let resp = self.http.post(url).json(body).send().await?;
        parse_json(resp).await
    }

    /// Send a bodiless request whose response payload the caller ignores.
    pub(crate) async fn send_empty(
        &self,
        method: reqwest::Method,
        url: Url,
        token: &SecretString,
    ) -> Result<(), Error> {
        debug!("{} {}", method, url);
        let builder = with_bearer(self.http.request(method, url), Some(token));
        let resp = builder.send().await?;
        check_status(resp).await.map(drop)
    }
}

fn with_bearer(
    builder: reqwest::RequestBuilder,
    token: Option<&SecretString>,
) -> reqwest::RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token.expose_secret()),
        None => builder,
    }
}

/// Turn a non-success response into an [`Error`], extracting the backend's
/// `detail` message when present.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.detail_text());
    let message = detail.clone().unwrap_or_else(|| {
        let snippet = preview(&body);
        if snippet.is_empty() {
            status.to_string()
        } else {
            format!("{status}: {snippet}")
        }
    });
    trace!(status = status.as_u16(), %message, "non-success response");

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::Authentication {
            status: status.as_u16(),
            message,
            detail,
        });
    }

    Err(Error::Api {
        status: status.as_u16(),
        message,
        detail,
    })
}

async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let resp = check_status(resp).await?;
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let snippet = preview(&body);
        Error::Deserialization {
            message: format!("{e} (body preview: {snippet:?})"),
            body: body.clone(),
        }
    })
}

/// First 200 characters of a body, for error messages.
fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
