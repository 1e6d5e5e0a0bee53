use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use maud::Markup;

use crate::{
    AppState, auth,
    auth::SessionUser,
    error::AppError,
    models::{CommentForm, EditPostForm, LoginRequest},
    views,
};

// --- Read Handlers ---

/// homepage
///
/// [Public Route] Lists every post joined with its owning user's name.
/// Fetch failures surface as a 500 JSON error via `AppError`.
pub async fn homepage(
    State(state): State<AppState>,
    session: Option<SessionUser>,
) -> Result<Markup, AppError> {
    let posts = state.repo.list_posts().await?;
    Ok(views::homepage(&posts, session.is_some()))
}

/// view_post
///
/// [Public Route] Single post with author and comments.
///
/// *Ownership flag*: `same_user` is a typed comparison against the
/// optional session; an anonymous request never matches any owner.
pub async fn view_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    session: Option<SessionUser>,
) -> Result<Markup, AppError> {
    let detail = state
        .repo
        .get_post_detail(id)
        .await?
        .ok_or(AppError::NotFound("post"))?;

    let same_user = session.is_some_and(|s| s.user_id == detail.user_id);

    Ok(views::post(&detail, session.is_some(), same_user))
}

/// profile
///
/// [Authenticated Route] The session user's profile with their authored
/// posts. The credential digest never enters the view model.
///
/// A session pointing at a deleted user is a fetch miss and reports
/// through the same error channel as any other failed lookup.
pub async fn profile(
    session: SessionUser,
    State(state): State<AppState>,
) -> Result<Markup, AppError> {
    let user = state
        .repo
        .get_user_profile(session.user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    Ok(views::profile(&user))
}

/// login_page
///
/// [Public Route] Login form, or a redirect to /profile when the request
/// already carries a live session. The redirect short-circuits; no
/// render call follows.
pub async fn login_page(session: Option<SessionUser>) -> Response {
    if session.is_some() {
        return Redirect::to("/profile").into_response();
    }

    views::login().into_response()
}

/// comment_page
///
/// [Authenticated Route] Comment-composition page over the same fetch
/// shape as `view_post`.
pub async fn comment_page(
    session: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Markup, AppError> {
    let detail = state
        .repo
        .get_post_detail(id)
        .await?
        .ok_or(AppError::NotFound("post"))?;

    Ok(views::comment(&detail, session.user_id))
}

/// edit_page
///
/// [Authenticated Route] Post-edit page, identical fetch shape to
/// `comment_page`.
pub async fn edit_page(
    session: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Markup, AppError> {
    let detail = state
        .repo
        .get_post_detail(id)
        .await?
        .ok_or(AppError::NotFound("post"))?;

    Ok(views::edit(&detail, session.user_id))
}

// --- Session Lifecycle ---

/// do_login
///
/// [Public Route] Verifies the submitted credentials, creates a session
/// row, sets the session cookie, and redirects to /profile. Bad
/// credentials re-render the login form with a 401 and set no cookie.
pub async fn do_login(
    State(state): State<AppState>,
    mut jar: CookieJar,
    Form(login): Form<LoginRequest>,
) -> Result<Response, AppError> {
    let user = state.repo.find_user_by_name(&login.name).await?;

    let Some(user) = user.filter(|u| auth::verify_password(&login.password, &u.password)) else {
        return Ok((StatusCode::UNAUTHORIZED, views::login()).into_response());
    };

    let session = state
        .repo
        .create_session(user.id, state.config.session_ttl_days)
        .await?;

    let cookie = Cookie::build((auth::COOKIE_NAME, session.token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    jar = jar.add(cookie);
    Ok((jar, Redirect::to("/profile")).into_response())
}

/// logout
///
/// [Public Route] Destroys the server-side session (when one exists) and
/// drops the cookie. Always lands back on the homepage.
pub async fn logout(
    State(state): State<AppState>,
    mut jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    if let Some(cookie) = jar.get(auth::COOKIE_NAME) {
        state.repo.delete_session(cookie.value()).await?;
        let cookie = cookie.clone();
        jar = jar.remove(cookie);
    }

    Ok((jar, Redirect::to("/")))
}

// --- Write Handlers ---

/// post_comment
///
/// [Authenticated Route] Stores a new comment authored by the session
/// user, then returns to the post page.
pub async fn post_comment(
    session: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<CommentForm>,
) -> Result<Redirect, AppError> {
    state
        .repo
        .add_comment(id, session.user_id, form.text)
        .await?;

    Ok(Redirect::to(&format!("/post/{id}")))
}

/// save_edit
///
/// [Authenticated Route] Applies an edit to the session user's own post.
///
/// *Authorization*: the repository updates only when the session user
/// matches the post owner; anything else reports as a fetch miss.
pub async fn save_edit(
    session: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<EditPostForm>,
) -> Result<Redirect, AppError> {
    state
        .repo
        .update_post(id, session.user_id, form.title, form.content)
        .await?
        .ok_or(AppError::NotFound("post"))?;

    Ok(Redirect::to(&format!("/post/{id}")))
}
