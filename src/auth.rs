use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use base64::engine::{Engine, general_purpose::STANDARD as BASE64_STANDARD};
use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::{AppState, error::AppError};

/// Name of the session cookie holding the opaque session token.
pub const COOKIE_NAME: &str = "blog_session";

/// SessionUser
///
/// The resolved identity of an authenticated request. Produced by the
/// session-loading middleware and consumed through the extractor impls
/// below. Holding this value in a handler argument *is* the auth gate:
/// the handler body never runs without a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i32,
}

/// Required-session extractor. Rejection redirects to the login page, so
/// gated handlers short-circuit before their body executes.
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .copied()
            .ok_or_else(|| Redirect::to("/login"))
    }
}

/// Optional-session extractor for ungated routes that still vary their
/// output on login state (homepage, post view, login page).
impl OptionalFromRequestParts<AppState> for SessionUser {
    type Rejection = ();

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<SessionUser>().copied())
    }
}

/// load_session
///
/// Global middleware that resolves the session cookie into a
/// `SessionUser` request extension. An expired or unknown token is
/// treated as logged out and the stale cookie is dropped from the jar.
pub async fn load_session(
    State(state): State<AppState>,
    mut jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<(CookieJar, Response), AppError> {
    if let Some(cookie) = jar.get(COOKIE_NAME) {
        let token = cookie.value();
        let maybe_session = state.repo.get_session(token).await?;

        match maybe_session {
            Some(session) if session.expires_at > Utc::now() => {
                request.extensions_mut().insert(SessionUser {
                    user_id: session.user_id,
                });
            }
            _ => {
                let cookie = cookie.clone();
                jar = jar.remove(cookie);
            }
        }
    }

    let response = next.run(request).await;
    Ok((jar, response))
}

/// hash_password
///
/// SHA-256 digest of the password, base64-encoded, matching the format
/// stored in `users.password`.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    BASE64_STANDARD.encode(digest)
}

/// verify_password
///
/// Constant-shape comparison of a submitted password against the stored
/// digest.
pub fn verify_password(password: &str, stored_digest: &str) -> bool {
    hash_password(password) == stored_digest
}
