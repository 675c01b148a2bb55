//! Business logic layer

pub mod auth;
pub mod cart;

pub use auth::{AuthService, LoginToken};
pub use cart::CartService;
