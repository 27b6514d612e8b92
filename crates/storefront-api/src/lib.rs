// storefront-api: Async Rust client for the storefront backend (catalog, cart, auth)

pub mod auth;
pub mod catalog;
pub mod cart;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::StorefrontClient;
pub use error::Error;
pub use models::{
    AuthResponse, CartItemResponse, CartResponse, CategoriesResponse, HealthResponse,
    LoginRequest, ProductQuery, ProductResponse, RegisterRequest, UserResponse,
};
pub use transport::{TlsMode, TransportConfig};
