//! Storage capabilities used by the service layer.
//!
//! Each trait covers one resource. [`PgStore`](super::postgres::PgStore) is the
//! production implementation; tests use an in-memory double implementing the
//! same traits.

use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{Comment, NewUser, Post, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Returns `UniqueViolation` when the email is taken, whether
    /// that is caught by the pre-check or by the unique constraint.
    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError>;

    async fn find_user(&self, id: i64) -> Result<Option<User>, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create_post(&self, author_id: i64, content: &str) -> Result<Post, DatabaseError>;

    async fn find_post(&self, id: i64) -> Result<Option<Post>, DatabaseError>;

    /// Owning user of a post, `None` if the post does not exist
    async fn post_author(&self, id: i64) -> Result<Option<i64>, DatabaseError>;

    /// Posts written by `author_id`, newest first
    async fn posts_by_author(&self, author_id: i64) -> Result<Vec<Post>, DatabaseError>;

    /// Returns `None` if the post vanished before the update ran
    async fn update_post(&self, id: i64, content: &str) -> Result<Option<Post>, DatabaseError>;

    /// Delete a post with its comments and all their likes in one transaction.
    /// Returns false if the post did not exist.
    async fn delete_post(&self, id: i64) -> Result<bool, DatabaseError>;

    /// Posts by every user `user_id` is subscribed to, newest first
    async fn feed(&self, user_id: i64) -> Result<Vec<Post>, DatabaseError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn create_comment(
        &self,
        author_id: i64,
        post_id: i64,
        content: &str,
    ) -> Result<Comment, DatabaseError>;

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, DatabaseError>;

    async fn comment_author(&self, id: i64) -> Result<Option<i64>, DatabaseError>;

    /// Comments on a post, oldest first
    async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DatabaseError>;

    async fn update_comment(&self, id: i64, content: &str) -> Result<Option<Comment>, DatabaseError>;

    /// Delete a comment and its likes in one transaction
    async fn delete_comment(&self, id: i64) -> Result<bool, DatabaseError>;
}

/// Like toggles. Each method reports whether a row was actually inserted or removed.
#[async_trait]
pub trait LikeStore: Send + Sync {
    async fn like_post(&self, user_id: i64, post_id: i64) -> Result<bool, DatabaseError>;

    async fn unlike_post(&self, user_id: i64, post_id: i64) -> Result<bool, DatabaseError>;

    async fn like_comment(&self, user_id: i64, comment_id: i64) -> Result<bool, DatabaseError>;

    async fn unlike_comment(&self, user_id: i64, comment_id: i64) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// `user_id` starts following `target_id`; false if already following
    async fn subscribe(&self, user_id: i64, target_id: i64) -> Result<bool, DatabaseError>;

    async fn unsubscribe(&self, user_id: i64, target_id: i64) -> Result<bool, DatabaseError>;

    /// Users that `user_id` follows, ordered by id
    async fn subscriptions(&self, user_id: i64) -> Result<Vec<User>, DatabaseError>;
}

/// Everything the application needs from storage
#[async_trait]
pub trait Store: UserStore + PostStore + CommentStore + LikeStore + SubscriptionStore {
    /// Round-trip to the backing database
    async fn ping(&self) -> Result<(), DatabaseError>;
}
