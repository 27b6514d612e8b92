// ── Domain model ──
//
// Canonical client-side types. Everything here is a snapshot of backend
// state; nothing is derived by local arithmetic.

pub mod cart;
pub mod product;
pub mod session;

pub use cart::{Cart, CartItem};
pub use product::{Product, ProductId};
pub use session::{HealthStatus, Session, User};
