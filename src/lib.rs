use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};

use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod views;

// Module for routing segregation (Public, Authenticated).
pub mod routes;
use auth::SessionUser;
use routes::{authenticated, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application
// entry point (main.rs).
pub use config::AppConfig;
pub use repository::{PostgresRepository, RepositoryState};

/// AppState
///
/// The single, thread-safe, immutable container holding all essential
/// application services and configuration, shared across all incoming
/// requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: Abstracts database access via the PgPool connection.
    pub repo: RepositoryState,
    /// Configuration: The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations allow handlers and extractors to selectively
// pull components from the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// require_session
///
/// The auth gate for the authenticated route group.
///
/// *Mechanism*: It attempts to extract `SessionUser` from the request.
/// Since the extractor's rejection is a redirect to /login, a request
/// without a live session never reaches the wrapped handler.
async fn require_session(_session: SessionUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global
/// and scoped middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 1. Base Router Assembly
    let base_router = Router::new()
        // Public routes: session is optional.
        .merge(public::public_routes())
        // Authenticated routes: gated by `require_session`.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), require_session)),
        )
        // Session loading runs outermost of the two middlewares, so the
        // gate below sees the resolved `SessionUser` extension.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::load_session,
        ))
        // Apply the unified state to all routes.
        .with_state(state);

    // 2. Observability and Correlation Layers (applied outermost)
    base_router.layer(
        ServiceBuilder::new()
            // 2a. Request ID generation: a unique UUID per request.
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            // 2b. Request tracing: wraps the request/response lifecycle
            // in a span correlated by the generated request ID.
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            // 2c. Request ID propagation back to the client.
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
}

/// trace_span_logger
///
/// Helper used by `TraceLayer` to customize span creation. It extracts
/// the `x-request-id` header (if present) and includes it in the
/// structured logging metadata alongside the HTTP method and URI.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
