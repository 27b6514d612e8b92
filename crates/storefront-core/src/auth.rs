// ── Auth Flow Controller ──
//
// Login / registration state machine. Two orthogonal axes: the phase
// (where the identity is) and the modal (what the UI is showing). The
// pending error belongs to whichever modal is open and is dropped on every
// modal transition.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use strum::{Display, EnumString};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use storefront_api::StorefrontClient;

use crate::cart::CartSync;
use crate::error::CoreError;
use crate::model::Session;
use crate::session::SessionStore;

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum AuthPhase {
    #[default]
    Anonymous,
    LoginPending,
    RegisterPending,
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Modal {
    #[default]
    Closed,
    Login,
    Register,
}

/// Form fields kept across a failed submission so the user can retry.
/// The password is never retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthView {
    pub phase: AuthPhase,
    pub modal: Modal,
    /// Message for the open modal, if the last submission failed.
    pub error: Option<String>,
    pub form: AuthForm,
}

pub struct AuthFlow {
    client: StorefrontClient,
    session: Arc<SessionStore>,
    cart: Arc<CartSync>,
    view: watch::Sender<AuthView>,
}

impl AuthFlow {
    pub fn new(client: StorefrontClient, session: Arc<SessionStore>, cart: Arc<CartSync>) -> Self {
        let (view, _) = watch::channel(AuthView::default());
        Self {
            client,
            session,
            cart,
            view,
        }
    }

    // ── Modal transitions ────────────────────────────────────────────

    pub fn open_login(&self) {
        self.set_modal(Modal::Login);
    }

    pub fn open_register(&self) {
        self.set_modal(Modal::Register);
    }

    /// Flip between the login and register modals. Opens login when closed.
    pub fn switch_modal(&self) {
        let next = match self.view.borrow().modal {
            Modal::Login => Modal::Register,
            Modal::Register | Modal::Closed => Modal::Login,
        };
        self.set_modal(next);
    }

    pub fn close_modal(&self) {
        self.set_modal(Modal::Closed);
    }

    fn set_modal(&self, modal: Modal) {
        self.view.send_modify(|v| {
            v.modal = modal;
            v.error = None;
        });
        debug!(%modal, "auth modal");
    }

    // ── Submissions ──────────────────────────────────────────────────

    pub async fn submit_login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Arc<Session>, CoreError> {
        if email.trim().is_empty() || password.expose_secret().is_empty() {
            return Err(self.reject("Email and password are required"));
        }

        self.begin(Modal::Login, AuthPhase::LoginPending, None, email);
        let result = self.client.login(email, password).await;
        self.finish(result, LOGIN_FAILED)
    }

    pub async fn submit_register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<Arc<Session>, CoreError> {
        if name.trim().is_empty() || email.trim().is_empty() || password.expose_secret().is_empty()
        {
            return Err(self.reject("Name, email and password are required"));
        }

        self.begin(Modal::Register, AuthPhase::RegisterPending, Some(name), email);
        let result = self.client.register(name, email, password).await;
        self.finish(result, REGISTRATION_FAILED)
    }

    /// Local validation failure: shown in the modal, nothing sent.
    fn reject(&self, message: &str) -> CoreError {
        self.view.send_modify(|v| v.error = Some(message.to_owned()));
        CoreError::ValidationFailed {
            message: message.to_owned(),
        }
    }

    fn begin(&self, modal: Modal, phase: AuthPhase, name: Option<&str>, email: &str) {
        self.view.send_modify(|v| {
            v.modal = modal;
            v.phase = phase;
            v.error = None;
            if let Some(name) = name {
                v.form.name = name.to_owned();
            }
            v.form.email = email.to_owned();
        });
        debug!(%phase, "auth submission started");
    }

    fn finish(
        &self,
        result: Result<storefront_api::AuthResponse, storefront_api::Error>,
        fallback: &str,
    ) -> Result<Arc<Session>, CoreError> {
        let response = match result {
            Ok(r) => r,
            Err(e) => {
                let message = e.detail().unwrap_or(fallback).to_owned();
                warn!(error = %e, "auth submission rejected");
                self.fail(message);
                return Err(e.into());
            }
        };

        let session = match self.session.install(Session::from(response)) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "could not persist session");
                self.fail(fallback.to_owned());
                return Err(e.into());
            }
        };

        self.view.send_modify(|v| {
            v.phase = AuthPhase::Authenticated;
            v.modal = Modal::Closed;
            v.error = None;
            v.form = AuthForm::default();
        });
        info!(user = %session.user().email, "authenticated");
        Ok(session)
    }

    /// Back to anonymous with the modal still open and the message shown.
    fn fail(&self, message: String) {
        let phase = if self.session.is_authenticated() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Anonymous
        };
        self.view.send_modify(|v| {
            v.phase = phase;
            v.error = Some(message);
        });
    }

    // ── Logout ───────────────────────────────────────────────────────

    /// Drop the session and actively blank the visible cart.
    pub fn logout(&self) {
        self.session.clear();
        self.cart.reset();
        self.view.send_modify(|v| {
            v.phase = AuthPhase::Anonymous;
            v.error = None;
        });
        info!("logged out");
    }

    /// Align the phase with the session store after an external change
    /// (hydrate, 401 logout).
    pub fn sync_with_session(&self) {
        let authenticated = self.session.is_authenticated();
        self.view.send_if_modified(|v| {
            let phase = match (authenticated, v.phase) {
                (true, AuthPhase::Anonymous) => AuthPhase::Authenticated,
                (false, AuthPhase::Authenticated) => AuthPhase::Anonymous,
                (_, phase) => phase,
            };
            let changed = phase != v.phase;
            v.phase = phase;
            changed
        });
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn view(&self) -> AuthView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthView> {
        self.view.subscribe()
    }
}
