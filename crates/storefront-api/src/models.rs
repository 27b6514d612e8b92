// Wire types for the storefront backend.
//
// These mirror the JSON the backend sends and accepts, field for field.
// `storefront-core` converts them into its domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product as served by `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub category: String,
    pub stock: u32,
}

/// `GET /api/categories` envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// One populated cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemResponse {
    pub product: ProductResponse,
    pub quantity: u32,
}

/// `GET /api/cart` body. `total` is computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartResponse {
    #[serde(default)]
    pub items: Vec<CartItemResponse>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// The public user profile returned alongside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Successful login / registration body.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

/// `GET /api/health` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Server-side filtering for `GET /api/products`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Error body. FastAPI-style backends send a string `detail` for domain
/// errors and a structured one for request validation failures.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub(crate) fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn product_price_parses_from_json_number() {
        let p: ProductResponse = serde_json::from_str(
            r#"{"id":"p1","name":"Wireless Headphones","description":"d","price":199.99,
                "image":"https://img/1","category":"Electronics","stock":50}"#,
        )
        .unwrap();
        assert_eq!(p.price, Decimal::new(19999, 2));
        assert_eq!(p.stock, 50);
    }

    #[test]
    fn empty_cart_total_zero() {
        let c: CartResponse = serde_json::from_str(r#"{"items":[],"total":0}"#).unwrap();
        assert!(c.items.is_empty());
        assert_eq!(c.total, Decimal::ZERO);
    }

    #[test]
    fn structured_detail_is_not_text() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"loc":["query","quantity"],"msg":"field required"}]}"#)
                .unwrap();
        assert_eq!(body.detail_text(), None);

        let body: ErrorBody = serde_json::from_str(r#"{"detail":"Invalid credentials"}"#).unwrap();
        assert_eq!(body.detail_text().as_deref(), Some("Invalid credentials"));
    }
}
