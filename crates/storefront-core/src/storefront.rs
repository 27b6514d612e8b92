// ── Storefront facade ──
//
// Owns the stores and wires them together: one client, one session store,
// one catalog, one cart, one auth flow. The only background task is the
// session observer that keeps the cart in step with the identity.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use storefront_api::{StorefrontClient, TlsMode, TransportConfig};

use crate::auth::{AuthFlow, AuthView};
use crate::cart::{CartMutation, CartSync};
use crate::catalog::{CatalogCache, CatalogFilter, FilteredProducts};
use crate::config::{StorefrontConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{Cart, HealthStatus, Product, ProductId, Session};
use crate::session::SessionStore;
use crate::storage::SessionStorage;

/// Main entry point for consumers.
///
/// Cheaply cloneable via `Arc<StorefrontInner>`. Call
/// [`start()`](Self::start) before use and [`shutdown()`](Self::shutdown)
/// when done.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    client: StorefrontClient,
    session: Arc<SessionStore>,
    catalog: CatalogCache,
    cart: Arc<CartSync>,
    auth: AuthFlow,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Storefront {
    /// Build the stores. Does no I/O.
    pub fn new(config: StorefrontConfig, storage: Arc<dyn SessionStorage>) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: match config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(ref path) => TlsMode::CustomCa(path.clone()),
            },
            timeout: config.timeout,
            ..TransportConfig::default()
        };
        let client = StorefrontClient::new(config.base_url.clone(), &transport)?;

        let session = Arc::new(SessionStore::new(storage));
        let catalog = CatalogCache::new(client.clone());
        let cart = Arc::new(CartSync::new(
            client.clone(),
            Arc::clone(&session),
            config.logout_on_unauthorized,
        ));
        let auth = AuthFlow::new(client.clone(), Arc::clone(&session), Arc::clone(&cart));

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                config,
                client,
                session,
                catalog,
                cart,
                auth,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Hydrate the session, load the catalog, reconcile the cart, and
    /// start the session observer.
    ///
    /// Catalog and cart failures are logged and leave the affected store
    /// at its previous (empty) state; `start` itself only fails on
    /// programming errors.
    pub async fn start(&self) -> Result<(), CoreError> {
        let inner = &self.inner;
        info!(backend = %inner.config.base_url, "starting storefront");

        let hydrated = inner.session.hydrate();
        inner.auth.sync_with_session();

        let (products, categories) =
            tokio::join!(inner.catalog.load_products(), inner.catalog.load_categories());
        if let Err(e) = products {
            warn!(error = %e, "product catalog unavailable (non-fatal)");
        }
        if let Err(e) = categories {
            warn!(error = %e, "categories unavailable (non-fatal)");
        }

        if hydrated.is_some() {
            if let Err(e) = inner.cart.reload().await {
                warn!(error = %e, "initial cart reconciliation failed (non-fatal)");
            }
            inner.auth.sync_with_session();
        }

        // Whatever was reconciled above counts as seen.
        let mut sessions = inner.session.subscribe();
        let seen = sessions.borrow_and_update().clone();
        let observer = tokio::spawn(session_observer_task(
            self.clone(),
            sessions,
            seen,
            inner.cancel.child_token(),
        ));
        inner.task_handles.lock().await.push(observer);

        debug!("storefront started");
        Ok(())
    }

    /// Stop background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("storefront shut down");
    }

    /// One-shot: start, run closure, shut down.
    pub async fn oneshot<F, Fut, T>(
        config: StorefrontConfig,
        storage: Arc<dyn SessionStorage>,
        f: F,
    ) -> Result<T, CoreError>
    where
        F: FnOnce(Storefront) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let storefront = Storefront::new(config, storage)?;
        storefront.start().await?;
        let result = f(storefront.clone()).await;
        storefront.shutdown().await;
        result
    }

    // ── Cart ─────────────────────────────────────────────────────────

    /// Add one unit. Without a session this opens the login modal instead.
    pub async fn add_to_cart(&self, product_id: &ProductId) -> CartMutation {
        let outcome = self.inner.cart.add(product_id).await;
        if outcome == CartMutation::LoginRequired {
            self.inner.auth.open_login();
        }
        outcome
    }

    pub async fn update_cart_quantity(&self, product_id: &ProductId, quantity: i64) -> CartMutation {
        self.inner.cart.update_quantity(product_id, quantity).await
    }

    pub async fn remove_from_cart(&self, product_id: &ProductId) -> CartMutation {
        self.inner.cart.remove(product_id).await
    }

    pub async fn reload_cart(&self) -> Result<(), CoreError> {
        let result = self.inner.cart.reload().await;
        self.inner.auth.sync_with_session();
        result
    }

    // ── Auth ─────────────────────────────────────────────────────────

    /// Log in. The cart reload that follows is driven by the session
    /// observer.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Arc<Session>, CoreError> {
        self.inner.auth.submit_login(email, password).await
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<Arc<Session>, CoreError> {
        self.inner.auth.submit_register(name, email, password).await
    }

    pub fn logout(&self) {
        self.inner.auth.logout();
    }

    // ── Catalog ──────────────────────────────────────────────────────

    pub fn filter_products(&self, filter: CatalogFilter) -> FilteredProducts {
        self.inner.catalog.filter(filter)
    }

    /// Cached product, falling back to `GET /api/products/{id}`.
    pub async fn product(&self, id: &ProductId) -> Result<Arc<Product>, CoreError> {
        if let Some(p) = self.inner.catalog.product(id) {
            return Ok(p);
        }
        match self.inner.client.get_product(id.as_str()).await {
            Ok(p) => Ok(Arc::new(Product::from(p))),
            Err(e) if e.is_not_found() => Err(CoreError::NotFound {
                entity_type: "Product".into(),
                identifier: id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn health(&self) -> Result<HealthStatus, CoreError> {
        Ok(HealthStatus::from(self.inner.client.health().await?))
    }

    // ── Store access & observation ───────────────────────────────────

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.inner.session
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.inner.catalog
    }

    pub fn cart(&self) -> &Arc<CartSync> {
        &self.inner.cart
    }

    pub fn auth(&self) -> &AuthFlow {
        &self.inner.auth
    }

    pub fn cart_snapshot(&self) -> Arc<Cart> {
        self.inner.cart.snapshot()
    }

    pub fn current_session(&self) -> Option<Arc<Session>> {
        self.inner.session.current()
    }

    pub fn auth_view(&self) -> AuthView {
        self.inner.auth.view()
    }

    pub fn subscribe_cart(&self) -> watch::Receiver<Arc<Cart>> {
        self.inner.cart.subscribe()
    }

    pub fn subscribe_auth(&self) -> watch::Receiver<AuthView> {
        self.inner.auth.subscribe()
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Reload the cart whenever a new session appears; blank it when the
/// session goes away. A change already pending at cancellation is still
/// handled, so a login right before `shutdown()` gets its cart.
async fn session_observer_task(
    storefront: Storefront,
    mut sessions: watch::Receiver<Option<Arc<Session>>>,
    mut seen: Option<Arc<Session>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                if sessions.has_changed().unwrap_or(false) {
                    on_session_change(&storefront, &mut sessions, &mut seen).await;
                }
                break;
            }
            changed = sessions.changed() => {
                if changed.is_err() {
                    break;
                }
                on_session_change(&storefront, &mut sessions, &mut seen).await;
            }
        }
    }
}

async fn on_session_change(
    storefront: &Storefront,
    sessions: &mut watch::Receiver<Option<Arc<Session>>>,
    seen: &mut Option<Arc<Session>>,
) {
    let current = sessions.borrow_and_update().clone();
    let same = match (&*seen, &current) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    };
    if same {
        return;
    }
    seen.clone_from(&current);

    let inner = &storefront.inner;
    if current.is_some() {
        debug!("session changed; reloading cart");
        if let Err(e) = inner.cart.reload().await {
            warn!(error = %e, "cart reload after session change failed");
        }
    } else {
        inner.cart.reset();
    }
    inner.auth.sync_with_session();
}
