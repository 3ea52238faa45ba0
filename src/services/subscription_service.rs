use std::sync::Arc;

use tracing::info;

use super::{ServiceError, ServiceResult};
use crate::auth::Subject;
use crate::database::models::User;
use crate::database::Store;

pub struct SubscriptionService {
    store: Arc<dyn Store>,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Follow `target_id`
    pub async fn subscribe(&self, subject: &Subject, target_id: i64) -> ServiceResult<()> {
        if subject.owns(target_id) {
            return Err(ServiceError::validation("You cannot subscribe to yourself"));
        }
        self.require_user(target_id).await?;

        let inserted = self
            .store
            .subscribe(subject.user_id, target_id)
            .await
            .map_err(|err| ServiceError::from_reference(err, user_not_found))?;
        if !inserted {
            return Err(ServiceError::validation("Already subscribed"));
        }
        info!(user_id = subject.user_id, target_id, "Subscribed");
        Ok(())
    }

    pub async fn unsubscribe(&self, subject: &Subject, target_id: i64) -> ServiceResult<()> {
        if !self.store.unsubscribe(subject.user_id, target_id).await? {
            return Err(ServiceError::not_found("Subscription not found"));
        }
        info!(user_id = subject.user_id, target_id, "Unsubscribed");
        Ok(())
    }

    /// Users that `user_id` follows
    pub async fn list(&self, user_id: i64) -> ServiceResult<Vec<User>> {
        self.require_user(user_id).await?;
        Ok(self.store.subscriptions(user_id).await?)
    }

    async fn require_user(&self, user_id: i64) -> ServiceResult<()> {
        match self.store.find_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(user_not_found()),
        }
    }
}

fn user_not_found() -> ServiceError {
    ServiceError::not_found("User not found")
}
