use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Defines endpoints that are accessible to any client, anonymous or
/// logged-in. All reads here are naturally idempotent; the only writes
/// are the session lifecycle endpoints.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Homepage: every post joined with its owning user's name.
        .route("/", get(handlers::homepage))
        // GET /post/{id}
        // Single post with author, comments, and the ownership flag.
        .route("/post/{id}", get(handlers::view_post))
        // GET /login renders the form; a live session redirects to
        // /profile instead. POST /login performs the credential check
        // and creates the session.
        .route("/login", get(handlers::login_page).post(handlers::do_login))
        // GET /logout
        // Destroys the session and clears the cookie.
        .route("/logout", get(handlers::logout))
        // GET /health
        // Unauthenticated liveness check for monitoring.
        .route("/health", get(|| async { "ok" }))
}
