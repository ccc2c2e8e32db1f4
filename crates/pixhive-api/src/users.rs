//! User persistence.
//!
//! The store is a trait so handlers and middleware stay independent of the
//! backing implementation. The in-memory implementation is the only one
//! shipped; it keeps an email index alongside the primary map so signin does
//! not scan.

use async_trait::async_trait;
use pixhive_core::{AppError, User};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user. Fails with [`AppError::AlreadyExists`] when the
    /// email is taken.
    async fn create(&self, user: User) -> Result<User, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Replace the persisted access token. Signin calls this so only the
    /// most recently issued token is accepted by the auth middleware.
    async fn set_access_token(&self, id: Uuid, token: String) -> Result<User, AppError>;

    /// Replace the persisted API credentials.
    async fn set_credentials(
        &self,
        id: Uuid,
        client_id: String,
        secret_key: String,
    ) -> Result<User, AppError>;
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
}

/// In-memory user store. State is lost on restart.
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, mut user: User) -> Result<User, AppError> {
        let email_key = Self::normalize_email(&user.email);
        let mut inner = self.inner.write().await;

        if inner.by_email.contains_key(&email_key) {
            return Err(AppError::AlreadyExists(format!(
                "A user with email {} already exists",
                user.email
            )));
        }

        user.email = user.email.trim().to_string();
        inner.by_email.insert(email_key, user.id);
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        let id = inner.by_email.get(&Self::normalize_email(email));
        Ok(id.and_then(|id| inner.users.get(id)).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn set_access_token(&self, id: Uuid, token: String) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
        user.access_token = Some(token);
        user.updated_at = chrono::Utc::now();
        Ok(user.clone())
    }

    async fn set_credentials(
        &self,
        id: Uuid,
        client_id: String,
        secret_key: String,
    ) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
        user.client_id = Some(client_id);
        user.secret_key = Some(secret_key);
        user.updated_at = chrono::Utc::now();
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_find() {
        let store = InMemoryUserStore::new();
        let user = store
            .create(User::new("a@b.com".to_string(), None))
            .await
            .unwrap();

        let found = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        let found = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryUserStore::new();
        store
            .create(User::new("a@b.com".to_string(), None))
            .await
            .unwrap();

        // Case and whitespace do not dodge the uniqueness check.
        let result = store.create(User::new("  A@B.COM ".to_string(), None)).await;
        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_set_access_token_replaces_previous() {
        let store = InMemoryUserStore::new();
        let user = store
            .create(User::new("a@b.com".to_string(), None))
            .await
            .unwrap();

        store
            .set_access_token(user.id, "first".to_string())
            .await
            .unwrap();
        let updated = store
            .set_access_token(user.id, "second".to_string())
            .await
            .unwrap();
        assert_eq!(updated.access_token.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_set_credentials() {
        let store = InMemoryUserStore::new();
        let user = store
            .create(User::new("a@b.com".to_string(), None))
            .await
            .unwrap();

        let updated = store
            .set_credentials(user.id, "ph_live_x".to_string(), "ph_sec_y".to_string())
            .await
            .unwrap();
        assert_eq!(updated.client_id.as_deref(), Some("ph_live_x"));
        assert_eq!(updated.secret_key.as_deref(), Some("ph_sec_y"));

        let missing = store
            .set_credentials(Uuid::new_v4(), "a".to_string(), "b".to_string())
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
