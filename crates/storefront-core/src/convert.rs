// ── Wire → domain conversions ──
//
// Maps `storefront-api` response types into the canonical model.

use secrecy::SecretString;

use storefront_api::{
    AuthResponse, CartItemResponse, CartResponse, HealthResponse, ProductResponse, UserResponse,
};

use crate::model::{Cart, CartItem, HealthStatus, Product, ProductId, Session, User};

impl From<ProductResponse> for Product {
    fn from(p: ProductResponse) -> Self {
        Self {
            id: ProductId::from(p.id),
            name: p.name,
            description: p.description,
            category: p.category,
            price: p.price,
            stock: p.stock,
            image: p.image,
        }
    }
}

impl From<CartItemResponse> for CartItem {
    fn from(item: CartItemResponse) -> Self {
        Self {
            product: Product::from(item.product),
            quantity: item.quantity,
        }
    }
}

impl From<CartResponse> for Cart {
    fn from(cart: CartResponse) -> Self {
        Self {
            items: cart.items.into_iter().map(CartItem::from).collect(),
            total: cart.total,
        }
    }
}

impl From<UserResponse> for User {
    fn from(u: UserResponse) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

impl From<AuthResponse> for Session {
    fn from(resp: AuthResponse) -> Self {
        Self::new(SecretString::from(resp.token), User::from(resp.user))
    }
}

impl From<HealthResponse> for HealthStatus {
    fn from(h: HealthResponse) -> Self {
        Self {
            status: h.status,
            message: h.message,
        }
    }
}
