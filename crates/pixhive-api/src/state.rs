//! Shared application state.

use crate::auth::{JwtService, PasswordHasher};
use crate::users::UserStore;
use pixhive_core::Config;
use pixhive_storage::ImageStorage;
use std::sync::Arc;

/// State shared across all handlers and middleware.
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserStore>,
    pub jwt: JwtService,
    pub passwords: PasswordHasher,
    pub storage: Arc<ImageStorage>,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn UserStore>,
        storage: Arc<ImageStorage>,
    ) -> Self {
        let jwt = JwtService::new(config.jwt_secret(), config.jwt_expiry_hours());
        let passwords = PasswordHasher::new(config.bcrypt_cost());
        Self {
            config,
            users,
            jwt,
            passwords,
            storage,
        }
    }
}
