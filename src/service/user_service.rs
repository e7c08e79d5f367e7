//! User bookkeeping: the idempotent admin bootstrap.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::Role;
use crate::error::AppError;
use crate::persistence::UserStore;
use crate::persistence::models::UserRow;

/// User-account operations.
#[derive(Debug, Clone)]
pub struct UserService<S> {
    store: Arc<S>,
}

impl<S> UserService<S>
where
    S: UserStore,
{
    /// Creates a new `UserService`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Ensures an admin account exists for the given email.
    ///
    /// Idempotent startup hook: if a user with that email already exists
    /// (whatever its role), it is returned untouched; otherwise an active
    /// admin row is inserted. The password arrives pre-hashed — hashing
    /// is the upstream auth layer's concern.
    ///
    /// # Errors
    ///
    /// [`AppError::Validation`] for an empty email; otherwise propagates
    /// persistence failures.
    pub async fn ensure_admin(
        &self,
        email: &str,
        password_hash: &str,
        display_name: Option<String>,
    ) -> Result<UserRow, AppError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::Validation("admin email must not be empty".into()));
        }

        if let Some(existing) = self.store.user_by_email(email).await? {
            tracing::debug!(%email, "admin bootstrap skipped, email exists");
            return Ok(existing);
        }

        let row = UserRow {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            display_name,
            role: Role::Admin,
            is_active: true,
            created_at: Utc::now(),
        };
        self.store.insert_user(&row).await?;
        tracing::info!(%email, "bootstrap admin created");
        Ok(row)
    }

    /// Fetches a user by id.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when the user does not exist.
    pub async fn get(&self, id: Uuid) -> Result<UserRow, AppError> {
        self.store
            .user_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user not found: {id}")))
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::memory::MemStore;

    fn service() -> UserService<MemStore> {
        UserService::new(Arc::new(MemStore::default()))
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let service = service();
        let Ok(first) = service.ensure_admin("ops@example.com", "hash", None).await else {
            panic!("bootstrap failed");
        };
        let Ok(second) = service.ensure_admin("ops@example.com", "other", None).await else {
            panic!("second bootstrap failed");
        };
        assert_eq!(first.id, second.id);
        // Existing account is untouched, including its hash.
        assert_eq!(second.password_hash, "hash");
        assert_eq!(second.role, Role::Admin);
    }

    #[tokio::test]
    async fn empty_email_rejected() {
        let service = service();
        let result = service.ensure_admin("  ", "hash", None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
