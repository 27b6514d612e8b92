// ── Cart snapshot ──

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::{Product, ProductId};

/// One cart line. The backend never reports a zero quantity; it drops the
/// line instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

/// The backend's cart, exactly as last fetched.
///
/// `total` is the backend's figure; the client never recomputes it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub total: Decimal,
}

impl Cart {
    /// The empty default shown before any session and after logout.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line quantities, for a badge.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn item(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product.id == id)
    }
}
