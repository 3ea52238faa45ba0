use std::sync::Arc;

use tracing::info;

use super::comment_service::comment_not_found;
use super::post_service::post_not_found;
use super::{ServiceError, ServiceResult};
use crate::auth::Subject;
use crate::database::Store;

/// Likes are keyed by (user, resource). A second like from the same user is
/// rejected, and only the user who liked can take the like back.
pub struct LikeService {
    store: Arc<dyn Store>,
}

impl LikeService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn like_post(&self, subject: &Subject, post_id: i64) -> ServiceResult<()> {
        self.store.post_author(post_id).await?.ok_or_else(post_not_found)?;
        let inserted = self
            .store
            .like_post(subject.user_id, post_id)
            .await
            .map_err(|err| ServiceError::from_reference(err, post_not_found))?;
        if !inserted {
            return Err(ServiceError::validation("Post already liked"));
        }
        info!(post_id, user_id = subject.user_id, "Liked post");
        Ok(())
    }

    pub async fn unlike_post(&self, subject: &Subject, post_id: i64) -> ServiceResult<()> {
        self.store.post_author(post_id).await?.ok_or_else(post_not_found)?;
        if !self.store.unlike_post(subject.user_id, post_id).await? {
            return Err(like_not_found());
        }
        info!(post_id, user_id = subject.user_id, "Unliked post");
        Ok(())
    }

    pub async fn like_comment(&self, subject: &Subject, comment_id: i64) -> ServiceResult<()> {
        self.store.comment_author(comment_id).await?.ok_or_else(comment_not_found)?;
        let inserted = self
            .store
            .like_comment(subject.user_id, comment_id)
            .await
            .map_err(|err| ServiceError::from_reference(err, comment_not_found))?;
        if !inserted {
            return Err(ServiceError::validation("Comment already liked"));
        }
        info!(comment_id, user_id = subject.user_id, "Liked comment");
        Ok(())
    }

    pub async fn unlike_comment(&self, subject: &Subject, comment_id: i64) -> ServiceResult<()> {
        self.store.comment_author(comment_id).await?.ok_or_else(comment_not_found)?;
        if !self.store.unlike_comment(subject.user_id, comment_id).await? {
            return Err(like_not_found());
        }
        info!(comment_id, user_id = subject.user_id, "Unliked comment");
        Ok(())
    }
}

fn like_not_found() -> ServiceError {
    ServiceError::not_found("Like not found")
}
