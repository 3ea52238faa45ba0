//! In-memory store implementing the same capabilities as `PgStore`, plus
//! helpers to build application state around it for tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::auth::{Subject, TokenKeys};
use crate::config::AppConfig;
use crate::database::models::{Comment, NewUser, Post, User};
use crate::database::{
    CommentStore, DatabaseError, LikeStore, PostStore, Store, SubscriptionStore, UserStore,
};
use crate::state::AppState;

pub const TEST_SECRET: &str = "chirp-test-secret";

#[derive(Debug, Clone)]
struct PostRow {
    id: i64,
    author_id: i64,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct CommentRow {
    id: i64,
    author_id: i64,
    post_id: i64,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, PostRow>,
    comments: BTreeMap<i64, CommentRow>,
    post_likes: BTreeSet<(i64, i64)>,
    comment_likes: BTreeSet<(i64, i64)>,
    subscriptions: BTreeSet<(i64, i64)>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn post(&self, row: &PostRow) -> Post {
        Post {
            id: row.id,
            author_id: row.author_id,
            content: row.content.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
            likes: self.post_likes.iter().filter(|(_, post_id)| *post_id == row.id).count() as i64,
        }
    }

    fn comment(&self, row: &CommentRow) -> Comment {
        Comment {
            id: row.id,
            author_id: row.author_id,
            post_id: row.post_id,
            content: row.content.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
            likes: self
                .comment_likes
                .iter()
                .filter(|(_, comment_id)| *comment_id == row.id)
                .count() as i64,
        }
    }

    /// Foreign-key check on a users column, named like the Postgres default
    fn require_user(&self, id: i64, constraint: &str) -> Result<(), DatabaseError> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(DatabaseError::ForeignKeyViolation(constraint.to_string()))
        }
    }

    fn newest_first(&self, mut rows: Vec<&PostRow>) -> Vec<Post> {
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        rows.into_iter().map(|row| self.post(row)).collect()
    }
}

/// Store backed by in-process maps. Every operation holds one lock, so
/// multi-step operations are atomic just like their transactional counterparts.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // A poisoned lock only means another test thread panicked
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn user_count(&self) -> usize {
        self.tables().users.len()
    }

    pub fn comment_count(&self) -> usize {
        self.tables().comments.len()
    }

    pub fn post_like_rows(&self) -> usize {
        self.tables().post_likes.len()
    }

    pub fn comment_like_rows(&self) -> usize {
        self.tables().comment_likes.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables();
        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
        }
        let id = tables.next_id();
        let user = User {
            id,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            password: new_user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables().users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables().users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create_post(&self, author_id: i64, content: &str) -> Result<Post, DatabaseError> {
        let mut tables = self.tables();
        tables.require_user(author_id, "posts_author_id_fkey")?;
        let id = tables.next_id();
        let now = Utc::now();
        let row = PostRow {
            id,
            author_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        let post = tables.post(&row);
        tables.posts.insert(id, row);
        Ok(post)
    }

    async fn find_post(&self, id: i64) -> Result<Option<Post>, DatabaseError> {
        let tables = self.tables();
        Ok(tables.posts.get(&id).map(|row| tables.post(row)))
    }

    async fn post_author(&self, id: i64) -> Result<Option<i64>, DatabaseError> {
        Ok(self.tables().posts.get(&id).map(|row| row.author_id))
    }

    async fn posts_by_author(&self, author_id: i64) -> Result<Vec<Post>, DatabaseError> {
        let tables = self.tables();
        let rows = tables.posts.values().filter(|row| row.author_id == author_id).collect();
        Ok(tables.newest_first(rows))
    }

    async fn update_post(&self, id: i64, content: &str) -> Result<Option<Post>, DatabaseError> {
        let mut tables = self.tables();
        let Some(row) = tables.posts.get_mut(&id) else {
            return Ok(None);
        };
        row.content = content.to_string();
        row.updated_at = Utc::now();
        let row = row.clone();
        Ok(Some(tables.post(&row)))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables();
        if !tables.posts.contains_key(&id) {
            return Ok(false);
        }
        let comment_ids: BTreeSet<i64> = tables
            .comments
            .values()
            .filter(|c| c.post_id == id)
            .map(|c| c.id)
            .collect();
        tables.comment_likes.retain(|(_, comment_id)| !comment_ids.contains(comment_id));
        tables.comments.retain(|comment_id, _| !comment_ids.contains(comment_id));
        tables.post_likes.retain(|(_, post_id)| *post_id != id);
        tables.posts.remove(&id);
        Ok(true)
    }

    async fn feed(&self, user_id: i64) -> Result<Vec<Post>, DatabaseError> {
        let tables = self.tables();
        let followed: BTreeSet<i64> = tables
            .subscriptions
            .iter()
            .filter(|(follower, _)| *follower == user_id)
            .map(|(_, target)| *target)
            .collect();
        let rows = tables
            .posts
            .values()
            .filter(|row| followed.contains(&row.author_id))
            .collect();
        Ok(tables.newest_first(rows))
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn create_comment(
        &self,
        author_id: i64,
        post_id: i64,
        content: &str,
    ) -> Result<Comment, DatabaseError> {
        let mut tables = self.tables();
        tables.require_user(author_id, "comments_author_id_fkey")?;
        if !tables.posts.contains_key(&post_id) {
            return Err(DatabaseError::ForeignKeyViolation("comments_post_id_fkey".to_string()));
        }
        let id = tables.next_id();
        let now = Utc::now();
        let row = CommentRow {
            id,
            author_id,
            post_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        let comment = tables.comment(&row);
        tables.comments.insert(id, row);
        Ok(comment)
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, DatabaseError> {
        let tables = self.tables();
        Ok(tables.comments.get(&id).map(|row| tables.comment(row)))
    }

    async fn comment_author(&self, id: i64) -> Result<Option<i64>, DatabaseError> {
        Ok(self.tables().comments.get(&id).map(|row| row.author_id))
    }

    async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DatabaseError> {
        let tables = self.tables();
        let mut rows: Vec<&CommentRow> =
            tables.comments.values().filter(|row| row.post_id == post_id).collect();
        rows.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(rows.into_iter().map(|row| tables.comment(row)).collect())
    }

    async fn update_comment(&self, id: i64, content: &str) -> Result<Option<Comment>, DatabaseError> {
        let mut tables = self.tables();
        let Some(row) = tables.comments.get_mut(&id) else {
            return Ok(None);
        };
        row.content = content.to_string();
        row.updated_at = Utc::now();
        let row = row.clone();
        Ok(Some(tables.comment(&row)))
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables();
        if tables.comments.remove(&id).is_none() {
            return Ok(false);
        }
        tables.comment_likes.retain(|(_, comment_id)| *comment_id != id);
        Ok(true)
    }
}

#[async_trait]
impl LikeStore for MemoryStore {
    async fn like_post(&self, user_id: i64, post_id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables();
        tables.require_user(user_id, "post_likes_user_id_fkey")?;
        if !tables.posts.contains_key(&post_id) {
            return Err(DatabaseError::ForeignKeyViolation("post_likes_post_id_fkey".to_string()));
        }
        Ok(tables.post_likes.insert((user_id, post_id)))
    }

    async fn unlike_post(&self, user_id: i64, post_id: i64) -> Result<bool, DatabaseError> {
        Ok(self.tables().post_likes.remove(&(user_id, post_id)))
    }

    async fn like_comment(&self, user_id: i64, comment_id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables();
        tables.require_user(user_id, "comment_likes_user_id_fkey")?;
        if !tables.comments.contains_key(&comment_id) {
            return Err(DatabaseError::ForeignKeyViolation(
                "comment_likes_comment_id_fkey".to_string(),
            ));
        }
        Ok(tables.comment_likes.insert((user_id, comment_id)))
    }

    async fn unlike_comment(&self, user_id: i64, comment_id: i64) -> Result<bool, DatabaseError> {
        Ok(self.tables().comment_likes.remove(&(user_id, comment_id)))
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn subscribe(&self, user_id: i64, target_id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables();
        tables.require_user(user_id, "subscriptions_user_id_fkey")?;
        tables.require_user(target_id, "subscriptions_subscription_id_fkey")?;
        Ok(tables.subscriptions.insert((user_id, target_id)))
    }

    async fn unsubscribe(&self, user_id: i64, target_id: i64) -> Result<bool, DatabaseError> {
        Ok(self.tables().subscriptions.remove(&(user_id, target_id)))
    }

    async fn subscriptions(&self, user_id: i64) -> Result<Vec<User>, DatabaseError> {
        let tables = self.tables();
        Ok(tables
            .subscriptions
            .iter()
            .filter(|(follower, _)| *follower == user_id)
            .filter_map(|(_, target)| tables.users.get(target).cloned())
            .collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

/// Application state over a fresh in-memory store, with cheap bcrypt
pub fn test_state() -> (AppState, MemoryStore) {
    let store = MemoryStore::new();
    let mut config = AppConfig::from_lookup(|_| None).expect("development defaults are valid");
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.security.bcrypt_cost = 4;

    let state = AppState::new(Arc::new(store.clone()), config);
    (state, store)
}

/// Token keys matching `test_state`
pub fn test_keys() -> TokenKeys {
    TokenKeys::new(TEST_SECRET, 24)
}

/// Insert a user directly and return it as an authenticated caller
pub async fn seed_user(store: &MemoryStore, email: &str) -> Subject {
    let user = store
        .create_user(NewUser {
            email: email.to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            password_hash: "hash".to_string(),
        })
        .await
        .expect("seed user");
    Subject::new(user.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@b.com")).await.unwrap();
        let err = store.create_user(new_user("a@b.com")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(_)));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn delete_post_removes_dependents() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("a@b.com")).await.unwrap();
        let post = store.create_post(user.id, "hi").await.unwrap();
        let comment = store.create_comment(user.id, post.id, "yo").await.unwrap();
        store.like_post(user.id, post.id).await.unwrap();
        store.like_comment(user.id, comment.id).await.unwrap();

        assert!(store.delete_post(post.id).await.unwrap());
        assert!(store.find_comment(comment.id).await.unwrap().is_none());
        assert_eq!(store.post_like_rows(), 0);
        assert_eq!(store.comment_like_rows(), 0);
        assert!(!store.delete_post(post.id).await.unwrap());
    }
}
