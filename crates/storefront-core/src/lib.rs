//! Client-side state layer between `storefront-api` and UI consumers (CLI).
//!
//! This crate owns the domain model and the stores that keep local state
//! consistent with the backend, which is the only source of truth:
//!
//! - **[`Storefront`]**: Facade managing the lifecycle:
//!   [`start()`](Storefront::start) hydrates the session, loads the catalog,
//!   reconciles the cart, and spawns the session observer.
//!   [`Storefront::oneshot()`](Storefront::oneshot) wraps a single CLI run.
//!
//! - **[`SessionStore`]**: Token + user, written and cleared together,
//!   persisted through the injected [`SessionStorage`] port.
//!
//! - **[`CatalogCache`]**: Products and categories fetched once per start,
//!   filtered locally through [`CatalogFilter`].
//!
//! - **[`CartSync`]**: Cart mutations, each followed by a mandatory reload of
//!   the backend's cart. The cart is never computed locally.
//!
//! - **[`AuthFlow`]**: Login / registration modal state machine and the
//!   transient auth error.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod session;
pub mod storage;
pub mod storefront;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::{AuthFlow, AuthForm, AuthPhase, AuthView, Modal};
pub use cart::{CartMutation, CartSync};
pub use catalog::{CatalogCache, CatalogFilter, CategoryFilter, FilteredProducts};
pub use config::{DEFAULT_BACKEND_URL, StorefrontConfig, TlsVerification};
pub use error::CoreError;
pub use session::SessionStore;
pub use storage::{MemoryStorage, SessionStorage, StorageError};
pub use storefront::Storefront;

pub use model::{Cart, CartItem, HealthStatus, Product, ProductId, Session, User};
