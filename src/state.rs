//! Shared application state for all routes. Read-only after startup.

use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenKeys};
use crate::config::AppConfig;
use crate::database::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenKeys>,
    pub passwords: PasswordHasher,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        Self {
            store,
            tokens: Arc::new(TokenKeys::from_config(&config.security)),
            passwords: PasswordHasher::new(config.security.bcrypt_cost),
            config: Arc::new(config),
        }
    }
}
