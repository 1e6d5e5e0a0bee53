use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Defines the routes that require a live session. The gate itself is a
/// route layer applied in `create_router`; by the time any handler here
/// runs, the `SessionUser` extension is guaranteed to be present.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /profile
        // The session user's own page: name plus authored posts. The
        // credential digest is excluded by the view-model shape.
        .route("/profile", get(handlers::profile))
        // GET /comment/{id} renders the comment form over the full post
        // shape; POST stores the comment and returns to the post.
        .route(
            "/comment/{id}",
            get(handlers::comment_page).post(handlers::post_comment),
        )
        // GET /edit/{id} renders the edit form; POST applies the edit
        // with the owner-only check enforced in the repository.
        .route(
            "/edit/{id}",
            get(handlers::edit_page).post(handlers::save_edit),
        )
}
