//! Server initialization and routing
//!
//! Every request reaches [`dispatch`], which resolves the endpoint through the
//! [`PathRouter`] table, authenticates private endpoints and calls the handler.

use crate::api;
use crate::config::Config;
use crate::error::AppError;
use crate::jwt::JwtManager;
use crate::middleware::{
    authenticate, normalize_error_response, Identity, ObservabilityLayer, RedactingMakeSpan,
};
use crate::migration;
use crate::repository::{cart::CartRepositoryImpl, user::UserRepositoryImpl, DbPool};
use crate::router::{PathRouter, RouteMatch};
use crate::service::{AuthService, CartService};
use crate::state::{DbHealth, HasServices};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::postgres::PgPoolOptions;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

const DB_MAX_LIFETIME: Duration = Duration::from_secs(30 * 60);

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: DbPool,
    pub jwt_manager: JwtManager,
    pub auth_service: Arc<AuthService<UserRepositoryImpl>>,
    pub cart_service: Arc<CartService<CartRepositoryImpl>>,
    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: Config, db_pool: DbPool, prometheus_handle: Option<PrometheusHandle>) -> Self {
        let jwt_manager = JwtManager::new(config.jwt.clone());
        let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.inner().clone()));
        let cart_repo = Arc::new(CartRepositoryImpl::new(db_pool.inner().clone()));

        Self {
            config: Arc::new(config),
            auth_service: Arc::new(AuthService::new(user_repo, jwt_manager.clone())),
            cart_service: Arc::new(CartService::new(cart_repo)),
            jwt_manager,
            db_pool,
            prometheus_handle,
        }
    }
}

impl HasServices for AppState {
    type UserRepo = UserRepositoryImpl;
    type CartRepo = CartRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    fn auth_service(&self) -> &AuthService<Self::UserRepo> {
        &self.auth_service
    }

    fn cart_service(&self) -> &CartService<Self::CartRepo> {
        &self.cart_service
    }

    fn prometheus_handle(&self) -> Option<&PrometheusHandle> {
        self.prometheus_handle.as_ref()
    }

    async fn check_db(&self) -> DbHealth {
        let mut conn = match self.db_pool.acquire().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "Database ping failed");
                return DbHealth::Down;
            }
        };

        match sqlx::query("SELECT 1").execute(&mut *conn).await {
            Ok(_) => DbHealth::Up,
            Err(e) => {
                tracing::warn!(error = %e, "Database probe query failed");
                DbHealth::QueryFailed
            }
        }
    }
}

/// Endpoints reachable without a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicEndpoint {
    Health,
    Metrics,
    Register,
    Login,
}

/// Endpoints that require an authenticated [`Identity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateEndpoint {
    Me,
    GetCart,
    AddItem,
    UpdateItem,
    DeleteItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Public(PublicEndpoint),
    Private(PrivateEndpoint),
}

/// The route table, in match order
pub fn route_table() -> &'static PathRouter<Endpoint> {
    static ROUTES: OnceLock<PathRouter<Endpoint>> = OnceLock::new();
    ROUTES.get_or_init(|| {
        use Endpoint::{Private, Public};

        PathRouter::new()
            .route(Method::GET, "/health", Public(PublicEndpoint::Health))
            .route(Method::GET, "/metrics", Public(PublicEndpoint::Metrics))
            .route(Method::POST, "/v1/auth/register", Public(PublicEndpoint::Register))
            .route(Method::POST, "/v1/auth/login", Public(PublicEndpoint::Login))
            .route(Method::GET, "/v1/me", Private(PrivateEndpoint::Me))
            .route(Method::GET, "/v1/cart", Private(PrivateEndpoint::GetCart))
            .route(Method::POST, "/v1/cart/items", Private(PrivateEndpoint::AddItem))
            .route(
                Method::PATCH,
                "/v1/cart/items/{id}",
                Private(PrivateEndpoint::UpdateItem),
            )
            .route(
                Method::DELETE,
                "/v1/cart/items/{id}",
                Private(PrivateEndpoint::DeleteItem),
            )
    })
}

/// Single entry point for every request
pub async fn dispatch<S: HasServices>(
    State(state): State<S>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let matched = match route_table().dispatch(&method, uri.path()) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::debug!(error = %e, "Unrouted request");
            return AppError::NotFound("not_found".to_string()).into_response();
        }
    };

    match *matched.handler {
        Endpoint::Public(endpoint) => call_public(&state, endpoint, &body).await,
        Endpoint::Private(endpoint) => match authenticate(&headers, state.jwt_manager()) {
            Ok(identity) => call_private(&state, endpoint, identity, &matched, &body).await,
            Err(e) => e.into_response(),
        },
    }
}

async fn call_public<S: HasServices>(state: &S, endpoint: PublicEndpoint, body: &[u8]) -> Response {
    match endpoint {
        PublicEndpoint::Health => api::health::health(state).await.into_response(),
        PublicEndpoint::Metrics => api::metrics::metrics(state).await.into_response(),
        PublicEndpoint::Register => api::auth::register(state, body).await.into_response(),
        PublicEndpoint::Login => api::auth::login(state, body).await.into_response(),
    }
}

async fn call_private<S: HasServices>(
    state: &S,
    endpoint: PrivateEndpoint,
    identity: Identity,
    matched: &RouteMatch<'_, Endpoint>,
    body: &[u8],
) -> Response {
    let item_id = matched.param("id").unwrap_or_default();

    match endpoint {
        PrivateEndpoint::Me => api::auth::me(state, identity).await.into_response(),
        PrivateEndpoint::GetCart => api::cart::get_cart(state, identity).await.into_response(),
        PrivateEndpoint::AddItem => api::cart::add_item(state, identity, body)
            .await
            .into_response(),
        PrivateEndpoint::UpdateItem => api::cart::update_item(state, identity, item_id, body)
            .await
            .into_response(),
        PrivateEndpoint::DeleteItem => api::cart::delete_item(state, identity, item_id)
            .await
            .into_response(),
    }
}

/// Build the HTTP router with generic state type
///
/// Works with both the production `AppState` and test states implementing
/// `HasServices`.
pub fn build_router<S: HasServices>(state: S) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let request_timeout = Duration::from_secs(state.config().request_timeout_secs);

    Router::new()
        .fallback(dispatch::<S>)
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(axum::middleware::from_fn(normalize_error_response))
        .layer(TraceLayer::new_for_http().make_span_with(RedactingMakeSpan))
        .layer(ObservabilityLayer)
        .layer(cors)
        .with_state(state)
}

/// Connect to the database, apply migrations and serve until shutdown
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .max_lifetime(DB_MAX_LIFETIME)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    if config.run_migrations {
        migration::run_migrations(&pool).await?;
    }

    let http_addr = config.http_addr();
    let state = AppState::new(config, DbPool::new(pool), prometheus_handle);
    let app = build_router(state);

    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("Failed to bind {}", http_addr))?;
    info!("HTTP server started on {}", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
