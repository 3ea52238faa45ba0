use std::sync::Arc;

use tracing::info;

use super::post_service::post_not_found;
use super::validation::validate_content;
use super::{ContentInput, ServiceError, ServiceResult};
use crate::auth::Subject;
use crate::database::models::Comment;
use crate::database::Store;

pub struct CommentService {
    store: Arc<dyn Store>,
}

impl CommentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        subject: &Subject,
        post_id: i64,
        input: ContentInput,
    ) -> ServiceResult<Comment> {
        self.require_post(post_id).await?;
        let content = validate_content(&input.content)?;

        let comment = self
            .store
            .create_comment(subject.user_id, post_id, &content)
            .await
            .map_err(|err| ServiceError::from_reference(err, post_not_found))?;
        info!(comment_id = comment.id, post_id, user_id = subject.user_id, "Created comment");
        Ok(comment)
    }

    /// Comments on a post, oldest first
    pub async fn list_for_post(&self, post_id: i64) -> ServiceResult<Vec<Comment>> {
        self.require_post(post_id).await?;
        Ok(self.store.comments_for_post(post_id).await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Comment> {
        self.store.find_comment(id).await?.ok_or_else(comment_not_found)
    }

    pub async fn update(
        &self,
        subject: &Subject,
        id: i64,
        input: ContentInput,
    ) -> ServiceResult<Comment> {
        self.authorize(subject, id).await?;
        let content = validate_content(&input.content)?;

        let comment = self
            .store
            .update_comment(id, &content)
            .await?
            .ok_or_else(comment_not_found)?;
        info!(comment_id = id, user_id = subject.user_id, "Updated comment");
        Ok(comment)
    }

    pub async fn delete(&self, subject: &Subject, id: i64) -> ServiceResult<()> {
        self.authorize(subject, id).await?;
        if !self.store.delete_comment(id).await? {
            return Err(comment_not_found());
        }
        info!(comment_id = id, user_id = subject.user_id, "Deleted comment");
        Ok(())
    }

    async fn authorize(&self, subject: &Subject, id: i64) -> ServiceResult<()> {
        let author_id = self.store.comment_author(id).await?.ok_or_else(comment_not_found)?;
        if !subject.owns(author_id) {
            return Err(ServiceError::forbidden("You can only modify your own comments"));
        }
        Ok(())
    }

    async fn require_post(&self, post_id: i64) -> ServiceResult<()> {
        match self.store.post_author(post_id).await? {
            Some(_) => Ok(()),
            None => Err(post_not_found()),
        }
    }
}

pub(crate) fn comment_not_found() -> ServiceError {
    ServiceError::not_found("Comment not found")
}
