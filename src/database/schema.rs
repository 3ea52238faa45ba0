use sqlx::PgPool;
use tracing::info;

use super::manager::DatabaseError;

/// Idempotent DDL applied at startup, in dependency order.
///
/// `comments.post_id` has no `ON DELETE CASCADE`; `PostStore::delete_post`
/// removes comments and likes itself inside one transaction.
const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        email TEXT NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        password TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT users_email_key UNIQUE (email)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id BIGSERIAL PRIMARY KEY,
        author_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        content TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS posts_author_id_idx ON posts (author_id, created_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id BIGSERIAL PRIMARY KEY,
        author_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        post_id BIGINT NOT NULL REFERENCES posts (id),
        content TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS comments_post_id_idx ON comments (post_id, created_at)",
    r#"
    CREATE TABLE IF NOT EXISTS post_likes (
        user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        post_id BIGINT NOT NULL REFERENCES posts (id),
        PRIMARY KEY (user_id, post_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS post_likes_post_id_idx ON post_likes (post_id)",
    r#"
    CREATE TABLE IF NOT EXISTS comment_likes (
        user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        comment_id BIGINT NOT NULL REFERENCES comments (id),
        PRIMARY KEY (user_id, comment_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS comment_likes_comment_id_idx ON comment_likes (comment_id)",
    r#"
    CREATE TABLE IF NOT EXISTS subscriptions (
        user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        subscription_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        PRIMARY KEY (user_id, subscription_id),
        CHECK (user_id <> subscription_id)
    )
    "#,
];

/// Create tables and indexes if they do not exist yet
pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    info!(statements = STATEMENTS.len(), "Database schema is up to date");
    Ok(())
}
