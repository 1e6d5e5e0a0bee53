use async_trait::async_trait;
use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use blog_portal::{
    AppState,
    auth::{self, SessionUser},
    config::AppConfig,
    handlers,
    models::{
        Comment, CommentForm, EditPostForm, LoginRequest, Post, PostDetail, PostSummary,
        SessionRecord, User, UserProfile,
    },
    repository::Repository,
};
use chrono::Utc;
use std::sync::Arc;
use tokio::test;

// --- MOCK REPOSITORY IMPLEMENTATION ---

// Central control point for testing handler logic. Handlers rely on the
// Repository trait, so tests substitute this in-memory implementation.
pub struct MockRepoControl {
    // Pre-canned outputs for handler requests
    pub posts_to_return: Vec<PostSummary>,
    pub post_detail_to_return: Option<PostDetail>,
    pub profile_to_return: Option<UserProfile>,
    pub user_to_return: Option<User>,
    pub update_post_result: Option<Post>,
    // When set, every query fails, exercising the error channel.
    pub fail_queries: bool,
}

impl Default for MockRepoControl {
    fn default() -> Self {
        MockRepoControl {
            posts_to_return: vec![],
            post_detail_to_return: Some(PostDetail::default()),
            profile_to_return: Some(UserProfile::default()),
            user_to_return: None,
            update_post_result: Some(Post::default()),
            fail_queries: false,
        }
    }
}

impl MockRepoControl {
    fn guard(&self) -> sqlx::Result<()> {
        if self.fail_queries {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Repository for MockRepoControl {
    async fn list_posts(&self) -> sqlx::Result<Vec<PostSummary>> {
        self.guard()?;
        Ok(self.posts_to_return.clone())
    }
    async fn get_post_detail(&self, _id: i32) -> sqlx::Result<Option<PostDetail>> {
        self.guard()?;
        Ok(self.post_detail_to_return.clone())
    }
    async fn get_user_profile(&self, _id: i32) -> sqlx::Result<Option<UserProfile>> {
        self.guard()?;
        Ok(self.profile_to_return.clone())
    }
    async fn find_user_by_name(&self, _name: &str) -> sqlx::Result<Option<User>> {
        self.guard()?;
        Ok(self.user_to_return.clone())
    }
    async fn add_comment(
        &self,
        post_id: i32,
        user_id: i32,
        text: String,
    ) -> sqlx::Result<Comment> {
        self.guard()?;
        Ok(Comment {
            id: 1,
            post_id,
            user_id,
            text,
            created_at: Utc::now(),
        })
    }
    async fn update_post(
        &self,
        _id: i32,
        _user_id: i32,
        _title: String,
        _content: String,
    ) -> sqlx::Result<Option<Post>> {
        self.guard()?;
        Ok(self.update_post_result.clone())
    }
    async fn create_session(&self, user_id: i32, ttl_days: i64) -> sqlx::Result<SessionRecord> {
        self.guard()?;
        Ok(SessionRecord {
            token: "test-token".to_string(),
            user_id,
            expires_at: Utc::now() + chrono::Duration::days(ttl_days),
        })
    }
    async fn get_session(&self, _token: &str) -> sqlx::Result<Option<SessionRecord>> {
        self.guard()?;
        Ok(None)
    }
    async fn delete_session(&self, _token: &str) -> sqlx::Result<bool> {
        self.guard()?;
        Ok(true)
    }
}

// --- TEST UTILITIES ---

fn create_test_state(repo_control: MockRepoControl) -> AppState {
    AppState {
        repo: Arc::new(repo_control),
        config: AppConfig::default(),
    }
}

fn session_for(user_id: i32) -> SessionUser {
    SessionUser { user_id }
}

fn sample_detail(post_id: i32, owner_id: i32) -> PostDetail {
    PostDetail {
        id: post_id,
        user_id: owner_id,
        title: "Why ducks".to_string(),
        content: "A meditation on ponds.".to_string(),
        created_at: Utc::now(),
        author_name: "alice".to_string(),
        comments: vec![],
    }
}

async fn error_body(err: blog_portal::error::AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    (parts.status, serde_json::from_slice(&bytes).unwrap())
}

// --- HOMEPAGE ---

#[test]
async fn test_homepage_lists_every_post_with_author_name() {
    let posts = vec![
        PostSummary {
            id: 1,
            title: "First".to_string(),
            created_at: Utc::now(),
            author_name: "alice".to_string(),
        },
        PostSummary {
            id: 2,
            title: "Second".to_string(),
            created_at: Utc::now(),
            author_name: "bob".to_string(),
        },
    ];
    let state = create_test_state(MockRepoControl {
        posts_to_return: posts,
        ..MockRepoControl::default()
    });

    let markup = handlers::homepage(State(state), None).await.unwrap();
    let html = markup.into_string();

    assert_eq!(html.matches("<li>").count(), 2);
    assert!(html.contains("First"));
    assert!(html.contains("Second"));
    assert!(html.contains("alice"));
    assert!(html.contains("bob"));
    // Anonymous request: nav offers login, not logout.
    assert!(html.contains("Log in"));
    assert!(!html.contains("Log out"));
}

#[test]
async fn test_homepage_query_failure_is_500_json() {
    let state = create_test_state(MockRepoControl {
        fail_queries: true,
        ..MockRepoControl::default()
    });

    let err = handlers::homepage(State(state), None).await.unwrap_err();
    let (status, body) = error_body(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

// --- POST VIEW ---

#[test]
async fn test_view_post_same_user_true_for_owner() {
    // Session user 7 viewing post 3 owned by user 7.
    let state = create_test_state(MockRepoControl {
        post_detail_to_return: Some(sample_detail(3, 7)),
        ..MockRepoControl::default()
    });

    let markup = handlers::view_post(State(state), Path(3), Some(session_for(7)))
        .await
        .unwrap();
    let html = markup.into_string();

    assert!(html.contains("Edit this post"));
}

#[test]
async fn test_view_post_same_user_false_for_other_user() {
    // Session user 7 viewing post 3 owned by user 9.
    let state = create_test_state(MockRepoControl {
        post_detail_to_return: Some(sample_detail(3, 9)),
        ..MockRepoControl::default()
    });

    let markup = handlers::view_post(State(state), Path(3), Some(session_for(7)))
        .await
        .unwrap();
    let html = markup.into_string();

    assert!(!html.contains("Edit this post"));
    // Still logged in, so the comment link is offered.
    assert!(html.contains("Add a comment"));
}

#[test]
async fn test_view_post_anonymous_never_matches_owner() {
    let state = create_test_state(MockRepoControl {
        post_detail_to_return: Some(sample_detail(3, 7)),
        ..MockRepoControl::default()
    });

    let markup = handlers::view_post(State(state), Path(3), None).await.unwrap();
    let html = markup.into_string();

    assert!(!html.contains("Edit this post"));
    assert!(!html.contains("Add a comment"));
}

#[test]
async fn test_view_post_missing_id_is_500_json() {
    let state = create_test_state(MockRepoControl {
        post_detail_to_return: None,
        ..MockRepoControl::default()
    });

    let err = handlers::view_post(State(state), Path(9999), None)
        .await
        .unwrap_err();
    let (status, body) = error_body(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "post not found");
}

#[test]
async fn test_view_post_renders_comments_with_author_names() {
    let mut detail = sample_detail(3, 7);
    detail.comments = vec![blog_portal::models::CommentView {
        text: "Great read".to_string(),
        author_name: "carol".to_string(),
        created_at: Utc::now(),
    }];
    let state = create_test_state(MockRepoControl {
        post_detail_to_return: Some(detail),
        ..MockRepoControl::default()
    });

    let markup = handlers::view_post(State(state), Path(3), None).await.unwrap();
    let html = markup.into_string();

    assert!(html.contains("Great read"));
    assert!(html.contains("carol"));
}

// --- PROFILE ---

#[test]
async fn test_profile_renders_name_and_posts_without_credential() {
    let digest = auth::hash_password("secret-pw");
    let profile = UserProfile {
        id: 7,
        name: "alice".to_string(),
        posts: vec![PostSummary {
            id: 3,
            title: "Why ducks".to_string(),
            created_at: Utc::now(),
            author_name: "alice".to_string(),
        }],
    };
    let state = create_test_state(MockRepoControl {
        profile_to_return: Some(profile),
        ..MockRepoControl::default()
    });

    let markup = handlers::profile(session_for(7), State(state)).await.unwrap();
    let html = markup.into_string();

    assert!(html.contains("alice"));
    assert!(html.contains("Why ducks"));
    // The credential digest must never appear anywhere in the page.
    assert!(!html.contains(&digest));
    assert!(!html.contains("password"));
}

#[test]
async fn test_profile_for_deleted_user_is_500_json() {
    let state = create_test_state(MockRepoControl {
        profile_to_return: None,
        ..MockRepoControl::default()
    });

    let err = handlers::profile(session_for(7), State(state))
        .await
        .unwrap_err();
    let (status, body) = error_body(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "user not found");
}

// --- LOGIN PAGE ---

#[test]
async fn test_login_page_redirects_when_already_authenticated() {
    let response = handlers::login_page(Some(session_for(7))).await;

    assert!(response.status().is_redirection());
    assert_eq!(response.headers()["location"], "/profile");
}

#[test]
async fn test_login_page_renders_form_when_anonymous() {
    let response = handlers::login_page(None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("form method=\"post\""));
    assert!(html.contains("name=\"password\""));
}

// --- COMMENT & EDIT PAGES ---

#[test]
async fn test_comment_page_renders_form_over_post_shape() {
    let state = create_test_state(MockRepoControl {
        post_detail_to_return: Some(sample_detail(3, 9)),
        ..MockRepoControl::default()
    });

    let markup = handlers::comment_page(session_for(7), State(state), Path(3))
        .await
        .unwrap();
    let html = markup.into_string();

    assert!(html.contains("Why ducks"));
    assert!(html.contains("action=\"/comment/3\""));
    assert!(html.contains("value=\"7\""));
}

#[test]
async fn test_edit_page_prefills_current_content() {
    let state = create_test_state(MockRepoControl {
        post_detail_to_return: Some(sample_detail(3, 7)),
        ..MockRepoControl::default()
    });

    let markup = handlers::edit_page(session_for(7), State(state), Path(3))
        .await
        .unwrap();
    let html = markup.into_string();

    assert!(html.contains("action=\"/edit/3\""));
    assert!(html.contains("A meditation on ponds."));
}

#[test]
async fn test_comment_page_missing_post_is_500_json() {
    // The source left this route unguarded; failures are recovered into
    // the structured channel here instead.
    let state = create_test_state(MockRepoControl {
        post_detail_to_return: None,
        ..MockRepoControl::default()
    });

    let err = handlers::comment_page(session_for(7), State(state), Path(9999))
        .await
        .unwrap_err();
    let (status, body) = error_body(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "post not found");
}

// --- SESSION LIFECYCLE ---

#[test]
async fn test_do_login_rejects_bad_credentials_without_cookie() {
    let state = create_test_state(MockRepoControl {
        user_to_return: Some(User {
            id: 7,
            name: "alice".to_string(),
            password: auth::hash_password("right-pw"),
        }),
        ..MockRepoControl::default()
    });

    let form = LoginRequest {
        name: "alice".to_string(),
        password: "wrong-pw".to_string(),
    };
    let response = handlers::do_login(
        State(state),
        axum_extra::extract::cookie::CookieJar::new(),
        Form(form),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get("set-cookie").is_none());
}

#[test]
async fn test_do_login_sets_session_cookie_and_redirects() {
    let state = create_test_state(MockRepoControl {
        user_to_return: Some(User {
            id: 7,
            name: "alice".to_string(),
            password: auth::hash_password("right-pw"),
        }),
        ..MockRepoControl::default()
    });

    let form = LoginRequest {
        name: "alice".to_string(),
        password: "right-pw".to_string(),
    };
    let response = handlers::do_login(
        State(state),
        axum_extra::extract::cookie::CookieJar::new(),
        Form(form),
    )
    .await
    .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(response.headers()["location"], "/profile");
    let cookie = response.headers()["set-cookie"].to_str().unwrap();
    assert!(cookie.contains("blog_session=test-token"));
    assert!(cookie.contains("HttpOnly"));
}

// --- WRITE HANDLERS ---

#[test]
async fn test_post_comment_redirects_back_to_post() {
    let state = create_test_state(MockRepoControl::default());

    let redirect = handlers::post_comment(
        session_for(7),
        State(state),
        Path(3),
        Form(CommentForm {
            text: "nice".to_string(),
        }),
    )
    .await
    .unwrap();

    let response = redirect.into_response();
    assert_eq!(response.headers()["location"], "/post/3");
}

#[test]
async fn test_save_edit_rejects_non_owner() {
    // update_post returns None when the session user is not the owner.
    let state = create_test_state(MockRepoControl {
        update_post_result: None,
        ..MockRepoControl::default()
    });

    let err = handlers::save_edit(
        session_for(7),
        State(state),
        Path(3),
        Form(EditPostForm {
            title: "t".to_string(),
            content: "c".to_string(),
        }),
    )
    .await
    .unwrap_err();
    let (status, _body) = error_body(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
async fn test_save_edit_owner_redirects_to_post() {
    let state = create_test_state(MockRepoControl::default());

    let redirect = handlers::save_edit(
        session_for(7),
        State(state),
        Path(3),
        Form(EditPostForm {
            title: "t".to_string(),
            content: "c".to_string(),
        }),
    )
    .await
    .unwrap();

    let response = redirect.into_response();
    assert_eq!(response.headers()["location"], "/post/3");
}
