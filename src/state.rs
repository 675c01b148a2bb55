//! Application state trait for dependency injection
//!
//! Handlers are generic over `HasServices`, so the production `AppState`
//! and the in-memory state used by the HTTP tests share the same code.

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{CartRepository, UserRepository};
use crate::service::{AuthService, CartService};
use metrics_exporter_prometheus::PrometheusHandle;

/// Outcome of the database readiness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbHealth {
    Up,
    /// No connection could be obtained
    Down,
    /// A connection was obtained but `SELECT 1` failed
    QueryFailed,
}

pub trait HasServices: Clone + Send + Sync + 'static {
    type UserRepo: UserRepository;
    type CartRepo: CartRepository;

    fn config(&self) -> &Config;

    fn jwt_manager(&self) -> &JwtManager;

    fn auth_service(&self) -> &AuthService<Self::UserRepo>;

    fn cart_service(&self) -> &CartService<Self::CartRepo>;

    /// Prometheus handle when metrics are enabled
    fn prometheus_handle(&self) -> Option<&PrometheusHandle>;

    /// Probe the database. Callers bound the wait.
    fn check_db(&self) -> impl std::future::Future<Output = DbHealth> + Send;
}
