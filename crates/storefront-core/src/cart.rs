// ── Cart Synchronizer ──
//
// The cart shown locally is always the backend's last answer to
// `GET /api/cart` for the current session, or the empty default. Every
// mutation is followed by exactly one reload, whatever the mutation's
// outcome; nothing is ever applied optimistically.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};

use storefront_api::StorefrontClient;

use crate::error::CoreError;
use crate::model::{Cart, ProductId, Session};
use crate::session::SessionStore;

/// Quantity sent by [`CartSync::add`]. Repeated adds increment on the
/// backend.
const ADD_QUANTITY: i64 = 1;

/// Outcome of a cart mutation. The follow-up reload has already run by the
/// time the caller sees this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartMutation {
    /// The backend accepted the mutation.
    Applied,
    /// The mutation request failed; the error was logged.
    Failed,
    /// No session. Nothing was sent.
    LoginRequired,
}

pub struct CartSync {
    client: StorefrontClient,
    session: Arc<SessionStore>,
    logout_on_unauthorized: bool,
    cart: watch::Sender<Arc<Cart>>,
    busy: watch::Sender<BTreeSet<ProductId>>,
    last_reload: watch::Sender<Option<DateTime<Utc>>>,
}

impl CartSync {
    pub fn new(
        client: StorefrontClient,
        session: Arc<SessionStore>,
        logout_on_unauthorized: bool,
    ) -> Self {
        let (cart, _) = watch::channel(Arc::new(Cart::empty()));
        let (busy, _) = watch::channel(BTreeSet::new());
        let (last_reload, _) = watch::channel(None);
        Self {
            client,
            session,
            logout_on_unauthorized,
            cart,
            busy,
            last_reload,
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Add one unit of `product_id`. The product is reported busy until the
    /// follow-up reload finishes.
    pub async fn add(&self, product_id: &ProductId) -> CartMutation {
        let Some(session) = self.session.current() else {
            debug!(%product_id, "add to cart without session");
            return CartMutation::LoginRequired;
        };

        let _busy = BusyGuard::mark(&self.busy, product_id.clone());
        let outcome = self
            .client
            .add_to_cart(session.token(), product_id.as_str(), ADD_QUANTITY)
            .await;
        let outcome = settle("add", product_id, outcome);
        self.reload_after_mutation().await;
        outcome
    }

    /// Set a line's quantity. Zero and negative values go to the backend
    /// as-is.
    pub async fn update_quantity(&self, product_id: &ProductId, quantity: i64) -> CartMutation {
        let Some(session) = self.session.current() else {
            return CartMutation::LoginRequired;
        };

        let outcome = self
            .client
            .update_cart_item(session.token(), product_id.as_str(), quantity)
            .await;
        let outcome = settle("update", product_id, outcome);
        self.reload_after_mutation().await;
        outcome
    }

    pub async fn remove(&self, product_id: &ProductId) -> CartMutation {
        let Some(session) = self.session.current() else {
            return CartMutation::LoginRequired;
        };

        let outcome = self
            .client
            .remove_from_cart(session.token(), product_id.as_str())
            .await;
        let outcome = settle("remove", product_id, outcome);
        self.reload_after_mutation().await;
        outcome
    }

    // ── Reconciliation ───────────────────────────────────────────────

    /// Replace the local cart with the backend's.
    ///
    /// Without a session the cart is blanked and nothing is fetched. A
    /// response that arrives after the session changed is dropped.
    pub async fn reload(&self) -> Result<(), CoreError> {
        let Some(session) = self.session.current() else {
            self.reset();
            return Ok(());
        };

        match self.client.get_cart(session.token()).await {
            Ok(wire) => {
                self.apply(&session, Cart::from(wire));
                Ok(())
            }
            Err(e) if e.is_unauthorized() => {
                self.on_unauthorized(&session);
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Blank the cart to the empty default.
    pub fn reset(&self) {
        self.cart.send_replace(Arc::new(Cart::empty()));
        debug!("cart reset");
    }

    async fn reload_after_mutation(&self) {
        if let Err(e) = self.reload().await {
            warn!(error = %e, "cart reload after mutation failed");
        }
    }

    /// The identity check runs under the cart channel's lock. `clear()`
    /// drops the session before `reset()` takes that lock, so a snapshot
    /// from a logged-out session can never land after the reset.
    fn apply(&self, issued_by: &Arc<Session>, cart: Cart) {
        let (items, total) = (cart.items.len(), cart.total);
        let applied = self.cart.send_if_modified(|current| {
            if !self.session.is_current(issued_by) {
                return false;
            }
            *current = Arc::new(cart);
            true
        });

        if applied {
            debug!(items, total = %total, "cart reloaded");
            self.last_reload.send_replace(Some(Utc::now()));
        } else {
            debug!("discarding cart snapshot from a previous session");
        }
    }

    fn on_unauthorized(&self, issued_by: &Arc<Session>) {
        if !self.logout_on_unauthorized || !self.session.is_current(issued_by) {
            warn!("backend rejected the session token");
            return;
        }
        warn!("backend rejected the session token; logging out");
        self.session.clear();
        self.reset();
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<Cart> {
        self.cart.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.cart.subscribe()
    }

    pub fn busy(&self) -> BTreeSet<ProductId> {
        self.busy.borrow().clone()
    }

    pub fn is_busy(&self, product_id: &ProductId) -> bool {
        self.busy.borrow().contains(product_id)
    }

    pub fn subscribe_busy(&self) -> watch::Receiver<BTreeSet<ProductId>> {
        self.busy.subscribe()
    }

    /// When the last accepted snapshot arrived.
    pub fn last_reload(&self) -> Option<DateTime<Utc>> {
        *self.last_reload.borrow()
    }

    pub fn subscribe_last_reload(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_reload.subscribe()
    }
}

fn settle(
    op: &'static str,
    product_id: &ProductId,
    result: Result<(), storefront_api::Error>,
) -> CartMutation {
    match result {
        Ok(()) => {
            debug!(op, %product_id, "cart mutation accepted");
            CartMutation::Applied
        }
        Err(e) => {
            warn!(op, %product_id, error = %e, "cart mutation failed");
            CartMutation::Failed
        }
    }
}

/// Holds a product in the busy set until dropped.
struct BusyGuard<'a> {
    busy: &'a watch::Sender<BTreeSet<ProductId>>,
    id: ProductId,
}

impl<'a> BusyGuard<'a> {
    fn mark(busy: &'a watch::Sender<BTreeSet<ProductId>>, id: ProductId) -> Self {
        busy.send_modify(|set| {
            set.insert(id.clone());
        });
        Self { busy, id }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.send_modify(|set| {
            set.remove(&self.id);
        });
    }
}
