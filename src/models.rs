use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Represents a registered user record from the `users` table.
/// This struct carries the stored credential digest and therefore must
/// **never** be handed to a view; templates only ever see `UserProfile`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct User {
    pub id: i32,
    // The user's display name, also used as the login identifier.
    pub name: String,
    // SHA-256 digest of the password, base64-encoded. Never rendered.
    pub password: String,
}

/// Post
///
/// Represents a blog post record from the `posts` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Post {
    pub id: i32,
    // FK to users.id (Owner).
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Comment
///
/// Represents a comment record from the `comments` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Comment {
    pub id: i32,
    // FK to posts.id (Parent post).
    pub post_id: i32,
    // FK to users.id (Author).
    pub user_id: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// SessionRecord
///
/// A server-side session row from the `sessions` table. The token is the
/// value stored in the client's cookie; expiry is checked on every load.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRecord {
    pub token: String,
    pub user_id: i32,
    pub expires_at: DateTime<Utc>,
}

// --- Flattened View Models (Output) ---

// These are the "plain" shapes handed to the markup layer: every
// association is materialized up front, so a view never reaches back
// into the repository.

/// PostSummary
///
/// One homepage/profile listing entry: the post's own fields joined with
/// the owning user's name, and nothing else of the owner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct PostSummary {
    pub id: i32,
    pub title: String,
    pub created_at: DateTime<Utc>,
    // Loaded via a JOIN with users; only the name is exposed.
    pub author_name: String,
}

/// CommentView
///
/// A comment flattened with its author's name for display under a post.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct CommentView {
    pub text: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

/// PostDetail
///
/// The full single-post shape: post fields, owning user's name and id,
/// and the post's comments in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PostDetail {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_name: String,
    pub comments: Vec<CommentView>,
}

/// UserProfile
///
/// The authenticated user's profile: identity fields plus their authored
/// posts. The credential field is excluded by construction.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserProfile {
    pub id: i32,
    pub name: String,
    pub posts: Vec<PostSummary>,
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Form payload for POST /login. The password is digested and compared
/// against the stored credential; it is never persisted or logged.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// CommentForm
///
/// Form payload for posting a new comment (POST /comment/{id}).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CommentForm {
    pub text: String,
}

/// EditPostForm
///
/// Form payload for saving an edited post (POST /edit/{id}).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EditPostForm {
    pub title: String,
    pub content: String,
}
