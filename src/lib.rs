//! Cartkeeper - shopping cart backend
//!
//! User registration and login with HS256 access tokens, and a per-user
//! active cart, served over a small path-pattern router.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod repository;
pub mod router;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, Result};
