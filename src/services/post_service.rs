use std::sync::Arc;

use tracing::info;

use super::validation::validate_content;
use super::{ContentInput, ServiceError, ServiceResult};
use crate::auth::Subject;
use crate::database::models::Post;
use crate::database::Store;

pub struct PostService {
    store: Arc<dyn Store>,
}

impl PostService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, subject: &Subject, input: ContentInput) -> ServiceResult<Post> {
        let content = validate_content(&input.content)?;
        let post = self
            .store
            .create_post(subject.user_id, &content)
            .await
            .map_err(|err| ServiceError::from_reference(err, || ServiceError::Unauthorized))?;
        info!(post_id = post.id, user_id = subject.user_id, "Created post");
        Ok(post)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Post> {
        self.store.find_post(id).await?.ok_or_else(post_not_found)
    }

    /// Posts written by `author_id`; the author must exist
    pub async fn list_by_author(&self, author_id: i64) -> ServiceResult<Vec<Post>> {
        self.require_user(author_id).await?;
        Ok(self.store.posts_by_author(author_id).await?)
    }

    pub async fn update(&self, subject: &Subject, id: i64, input: ContentInput) -> ServiceResult<Post> {
        self.authorize(subject, id).await?;
        let content = validate_content(&input.content)?;

        // Deleted between the ownership check and the update
        let post = self.store.update_post(id, &content).await?.ok_or_else(post_not_found)?;
        info!(post_id = id, user_id = subject.user_id, "Updated post");
        Ok(post)
    }

    /// Delete a post along with its comments and likes
    pub async fn delete(&self, subject: &Subject, id: i64) -> ServiceResult<()> {
        self.authorize(subject, id).await?;
        if !self.store.delete_post(id).await? {
            return Err(post_not_found());
        }
        info!(post_id = id, user_id = subject.user_id, "Deleted post");
        Ok(())
    }

    /// Posts from everyone the caller subscribes to
    pub async fn feed(&self, subject: &Subject) -> ServiceResult<Vec<Post>> {
        Ok(self.store.feed(subject.user_id).await?)
    }

    /// Posts from everyone `user_id` subscribes to
    pub async fn feed_of(&self, user_id: i64) -> ServiceResult<Vec<Post>> {
        self.require_user(user_id).await?;
        Ok(self.store.feed(user_id).await?)
    }

    async fn authorize(&self, subject: &Subject, id: i64) -> ServiceResult<()> {
        let author_id = self.store.post_author(id).await?.ok_or_else(post_not_found)?;
        if !subject.owns(author_id) {
            return Err(ServiceError::forbidden("You can only modify your own posts"));
        }
        Ok(())
    }

    async fn require_user(&self, user_id: i64) -> ServiceResult<()> {
        match self.store.find_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("User not found")),
        }
    }
}

pub(crate) fn post_not_found() -> ServiceError {
    ServiceError::not_found("Post not found")
}
