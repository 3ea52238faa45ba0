use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::manager::DatabaseError;
use super::models::{Comment, NewUser, Post, User};
use super::store::{CommentStore, LikeStore, PostStore, Store, SubscriptionStore, UserStore};

const USER_COLUMNS: &str = "id, email, first_name, last_name, password, created_at";

// Like counts are derived on every read, never stored.
const SELECT_POSTS: &str = r#"
    SELECT p.id, p.author_id, p.content, p.created_at, p.updated_at,
           (SELECT COUNT(*) FROM post_likes pl WHERE pl.post_id = p.id) AS likes
    FROM posts p
"#;

const SELECT_COMMENTS: &str = r#"
    SELECT c.id, c.author_id, c.post_id, c.content, c.created_at, c.updated_at,
           (SELECT COUNT(*) FROM comment_likes cl WHERE cl.comment_id = c.id) AS likes
    FROM comments c
"#;

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Best-effort guard; the unique constraint is what actually holds under concurrency
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(&new_user.email)
            .fetch_one(&mut *tx)
            .await?;
        if exists {
            return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, first_name, last_name, password) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&new_user.email)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.password_hash)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn create_post(&self, author_id: i64, content: &str) -> Result<Post, DatabaseError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (author_id, content)
            VALUES ($1, $2)
            RETURNING id, author_id, content, created_at, updated_at, 0::BIGINT AS likes
            "#,
        )
        .bind(author_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(post)
    }

    async fn find_post(&self, id: i64) -> Result<Option<Post>, DatabaseError> {
        let post = sqlx::query_as::<_, Post>(&format!("{} WHERE p.id = $1", SELECT_POSTS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn post_author(&self, id: i64) -> Result<Option<i64>, DatabaseError> {
        let author = sqlx::query_scalar("SELECT author_id FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    async fn posts_by_author(&self, author_id: i64) -> Result<Vec<Post>, DatabaseError> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "{} WHERE p.author_id = $1 ORDER BY p.created_at DESC, p.id DESC",
            SELECT_POSTS
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn update_post(&self, id: i64, content: &str) -> Result<Option<Post>, DatabaseError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, author_id, content, created_at, updated_at,
                      (SELECT COUNT(*) FROM post_likes pl WHERE pl.post_id = posts.id) AS likes
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Row lock blocks new comments and likes (their FK checks take KEY SHARE)
        // and waits for uncommitted ones, so the deletes below see all dependents.
        let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            // Dropping the transaction rolls it back
            return Ok(false);
        }

        let comment_likes = sqlx::query(
            "DELETE FROM comment_likes WHERE comment_id IN (SELECT id FROM comments WHERE post_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let comments = sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let post_likes = sqlx::query("DELETE FROM post_likes WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(
            post_id = id,
            comments = comments.rows_affected(),
            post_likes = post_likes.rows_affected(),
            comment_likes = comment_likes.rows_affected(),
            "Deleted post with dependents"
        );
        Ok(true)
    }

    async fn feed(&self, user_id: i64) -> Result<Vec<Post>, DatabaseError> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "{} JOIN subscriptions s ON s.subscription_id = p.author_id \
             WHERE s.user_id = $1 ORDER BY p.created_at DESC, p.id DESC",
            SELECT_POSTS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn create_comment(
        &self,
        author_id: i64,
        post_id: i64,
        content: &str,
    ) -> Result<Comment, DatabaseError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (author_id, post_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, author_id, post_id, content, created_at, updated_at, 0::BIGINT AS likes
            "#,
        )
        .bind(author_id)
        .bind(post_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, DatabaseError> {
        let comment = sqlx::query_as::<_, Comment>(&format!("{} WHERE c.id = $1", SELECT_COMMENTS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn comment_author(&self, id: i64) -> Result<Option<i64>, DatabaseError> {
        let author = sqlx::query_scalar("SELECT author_id FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DatabaseError> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "{} WHERE c.post_id = $1 ORDER BY c.created_at ASC, c.id ASC",
            SELECT_COMMENTS
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    async fn update_comment(&self, id: i64, content: &str) -> Result<Option<Comment>, DatabaseError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, author_id, post_id, content, created_at, updated_at,
                      (SELECT COUNT(*) FROM comment_likes cl WHERE cl.comment_id = comments.id) AS likes
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM comments WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(false);
        }

        sqlx::query("DELETE FROM comment_likes WHERE comment_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}

#[async_trait]
impl LikeStore for PgStore {
    async fn like_post(&self, user_id: i64, post_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO post_likes (user_id, post_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(post_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn unlike_post(&self, user_id: i64, post_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM post_likes WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn like_comment(&self, user_id: i64, comment_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO comment_likes (user_id, comment_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(comment_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn unlike_comment(&self, user_id: i64, comment_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM comment_likes WHERE user_id = $1 AND comment_id = $2")
            .bind(user_id)
            .bind(comment_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl SubscriptionStore for PgStore {
    async fn subscribe(&self, user_id: i64, target_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO subscriptions (user_id, subscription_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(target_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn unsubscribe(&self, user_id: i64, target_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND subscription_id = $2")
            .bind(user_id)
            .bind(target_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn subscriptions(&self, user_id: i64) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.first_name, u.last_name, u.password, u.created_at
            FROM users u
            JOIN subscriptions s ON s.subscription_id = u.id
            WHERE s.user_id = $1
            ORDER BY u.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
