use crate::models::{
    Comment, CommentView, Post, PostDetail, PostSummary, SessionRecord, User, UserProfile,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations,
/// allowing the handlers to interact with the data layer without knowing
/// the specific implementation (Postgres, Mock, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's asynchronous
/// task boundaries.
///
/// Every read returns the fully flattened view shape: associations are
/// materialized here, in one place, and never lazily resolved later.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Post Retrieval ---
    // All posts joined with each owning user's name, in insertion order.
    async fn list_posts(&self) -> sqlx::Result<Vec<PostSummary>>;
    // One post by id with author name and comments (each with its
    // author's name, insertion order). None when the id does not exist.
    async fn get_post_detail(&self, id: i32) -> sqlx::Result<Option<PostDetail>>;

    // --- User Retrieval ---
    // A user's profile with authored posts; the credential digest is
    // excluded by the shape of `UserProfile` itself.
    async fn get_user_profile(&self, id: i32) -> sqlx::Result<Option<UserProfile>>;
    // Full user row (including the digest) for credential checking only.
    async fn find_user_by_name(&self, name: &str) -> sqlx::Result<Option<User>>;

    // --- Post & Comment Actions ---
    // Inserts a comment authored by the session user.
    async fn add_comment(&self, post_id: i32, user_id: i32, text: String) -> sqlx::Result<Comment>;
    // Owner-Only: updates only when `user_id` matches the post's owner.
    // None means the post is missing or owned by someone else.
    async fn update_post(
        &self,
        id: i32,
        user_id: i32,
        title: String,
        content: String,
    ) -> sqlx::Result<Option<Post>>;

    // --- Sessions ---
    async fn create_session(&self, user_id: i32, ttl_days: i64) -> sqlx::Result<SessionRecord>;
    async fn get_session(&self, token: &str) -> sqlx::Result<Option<SessionRecord>>;
    // Returns true if a session row was actually removed.
    async fn delete_session(&self, token: &str) -> sqlx::Result<bool>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across
/// the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the
/// PostgreSQL database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// list_posts
    ///
    /// Homepage listing: every post joined with the owning user's name.
    /// Only `u.name` leaves the users table here.
    async fn list_posts(&self) -> sqlx::Result<Vec<PostSummary>> {
        sqlx::query_as::<_, PostSummary>(
            r#"
            SELECT p.id, p.title, p.created_at, u.name AS author_name
            FROM posts p
            JOIN users u ON p.user_id = u.id
            ORDER BY p.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// get_post_detail
    ///
    /// Two-step eager load: the post row joined with its author, then the
    /// comment rows joined with their authors. Assembled into a single
    /// flattened `PostDetail` snapshot before returning.
    async fn get_post_detail(&self, id: i32) -> sqlx::Result<Option<PostDetail>> {
        let post = sqlx::query_as::<_, (i32, i32, String, String, chrono::DateTime<Utc>, String)>(
            r#"
            SELECT p.id, p.user_id, p.title, p.content, p.created_at, u.name AS author_name
            FROM posts p
            JOIN users u ON p.user_id = u.id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((id, user_id, title, content, created_at, author_name)) = post else {
            return Ok(None);
        };

        let comments = sqlx::query_as::<_, CommentView>(
            r#"
            SELECT c.text, u.name AS author_name, c.created_at
            FROM comments c
            JOIN users u ON c.user_id = u.id
            WHERE c.post_id = $1
            ORDER BY c.id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(PostDetail {
            id,
            user_id,
            title,
            content,
            created_at,
            author_name,
            comments,
        }))
    }

    /// get_user_profile
    ///
    /// Loads the identity fields and the user's authored posts. The
    /// credential digest is never selected.
    async fn get_user_profile(&self, id: i32) -> sqlx::Result<Option<UserProfile>> {
        let user = sqlx::query_as::<_, (i32, String)>("SELECT id, name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some((id, name)) = user else {
            return Ok(None);
        };

        let posts = sqlx::query_as::<_, PostSummary>(
            r#"
            SELECT p.id, p.title, p.created_at, u.name AS author_name
            FROM posts p
            JOIN users u ON p.user_id = u.id
            WHERE p.user_id = $1
            ORDER BY p.id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(UserProfile { id, name, posts }))
    }

    /// find_user_by_name
    ///
    /// Credential-check lookup. The only query that reads the digest.
    async fn find_user_by_name(&self, name: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT id, name, password FROM users WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
    }

    /// add_comment
    ///
    /// Inserts a comment and returns the stored row.
    async fn add_comment(&self, post_id: i32, user_id: i32, text: String) -> sqlx::Result<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, user_id, text, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, post_id, user_id, text, created_at
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
    }

    /// update_post
    ///
    /// Updates a post only if the provided `user_id` matches the post
    /// owner. This is the ownership-equality authorization check.
    async fn update_post(
        &self,
        id: i32,
        user_id: i32,
        title: String,
        content: String,
    ) -> sqlx::Result<Option<Post>> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = $3, content = $4
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, content, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(title)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
    }

    /// create_session
    ///
    /// Inserts a fresh session row keyed by a v4 UUID token.
    async fn create_session(&self, user_id: i32, ttl_days: i64) -> sqlx::Result<SessionRecord> {
        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + Duration::days(ttl_days);

        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        Ok(SessionRecord {
            token,
            user_id,
            expires_at,
        })
    }

    /// get_session
    ///
    /// Raw session lookup; expiry is judged by the caller so a stale
    /// cookie can also be cleared there.
    async fn get_session(&self, token: &str) -> sqlx::Result<Option<SessionRecord>> {
        sqlx::query_as::<_, SessionRecord>(
            "SELECT token, user_id, expires_at FROM sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }

    /// delete_session
    ///
    /// Logout path. Returns whether a row was removed.
    async fn delete_session(&self, token: &str) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
