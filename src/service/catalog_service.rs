//! Admin-curated board-name catalog with soft deletion.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::AuthUser;
use crate::error::AppError;
use crate::persistence::BoardNameStore;
use crate::persistence::models::BoardNameRow;

/// Input for creating a catalog entry.
#[derive(Debug, Clone)]
pub struct NewBoardName {
    /// Canonical board type (unique).
    pub board_type: String,
    /// Category metadata.
    pub category: String,
    /// Device-type metadata.
    pub device_type: String,
    /// Manufacturer metadata.
    pub manufacturer: Option<String>,
}

/// Partial update for a catalog entry; absent fields keep stored values.
#[derive(Debug, Clone, Default)]
pub struct BoardNamePatch {
    /// Replacement category.
    pub category: Option<String>,
    /// Replacement device type.
    pub device_type: Option<String>,
    /// Replacement manufacturer.
    pub manufacturer: Option<String>,
}

/// Orchestration layer for the board-name catalog.
///
/// Entries are deactivated via the `is_active` flag rather than deleted,
/// so historical scan records keep a resolvable type.
#[derive(Debug, Clone)]
pub struct CatalogService<S> {
    store: Arc<S>,
}

impl<S> CatalogService<S>
where
    S: BoardNameStore,
{
    /// Creates a new `CatalogService`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
        if auth.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "only admins may curate the catalog".into(),
            ))
        }
    }

    /// Adds a catalog entry.
    ///
    /// # Errors
    ///
    /// [`AppError::Forbidden`] for non-admins, [`AppError::Validation`]
    /// for an empty board type, [`AppError::Conflict`] for duplicates.
    pub async fn create(
        &self,
        auth: &AuthUser,
        input: NewBoardName,
    ) -> Result<BoardNameRow, AppError> {
        Self::require_admin(auth)?;
        let board_type = input.board_type.trim();
        if board_type.is_empty() {
            return Err(AppError::Validation("board type must not be empty".into()));
        }
        if self.store.board_name_by_type(board_type).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "board type already cataloged: {board_type}"
            )));
        }

        let now = Utc::now();
        let row = BoardNameRow {
            id: Uuid::new_v4(),
            board_type: board_type.to_string(),
            category: input.category,
            device_type: input.device_type,
            manufacturer: input.manufacturer,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_board_name(&row).await?;
        tracing::info!(board_type = %row.board_type, "catalog entry created");
        Ok(row)
    }

    /// Applies a partial update to an entry.
    ///
    /// # Errors
    ///
    /// [`AppError::Forbidden`] or [`AppError::NotFound`].
    pub async fn update(
        &self,
        auth: &AuthUser,
        id: Uuid,
        patch: BoardNamePatch,
    ) -> Result<BoardNameRow, AppError> {
        Self::require_admin(auth)?;
        let mut row = self
            .store
            .board_name_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("catalog entry not found: {id}")))?;

        if let Some(category) = patch.category {
            row.category = category;
        }
        if let Some(device_type) = patch.device_type {
            row.device_type = device_type;
        }
        if let Some(manufacturer) = patch.manufacturer {
            row.manufacturer = Some(manufacturer);
        }
        row.updated_at = Utc::now();
        self.store.update_board_name(&row).await?;
        Ok(row)
    }

    /// Soft-deletes an entry by clearing `is_active`.
    ///
    /// # Errors
    ///
    /// [`AppError::Forbidden`] or [`AppError::NotFound`].
    pub async fn deactivate(&self, auth: &AuthUser, id: Uuid) -> Result<BoardNameRow, AppError> {
        Self::require_admin(auth)?;
        let mut row = self
            .store
            .board_name_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("catalog entry not found: {id}")))?;
        row.is_active = false;
        row.updated_at = Utc::now();
        self.store.update_board_name(&row).await?;
        tracing::info!(board_type = %row.board_type, "catalog entry deactivated");
        Ok(row)
    }

    /// Lists catalog entries; only admins may see inactive ones.
    ///
    /// # Errors
    ///
    /// Propagates persistence failures.
    pub async fn list(
        &self,
        auth: &AuthUser,
        include_inactive: bool,
    ) -> Result<Vec<BoardNameRow>, AppError> {
        let include_inactive = include_inactive && auth.is_admin();
        self.store.list_board_names(include_inactive).await
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::persistence::memory::MemStore;

    fn service() -> CatalogService<MemStore> {
        CatalogService::new(Arc::new(MemStore::default()))
    }

    fn admin() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            role: Role::Admin,
        }
    }

    fn entry(board_type: &str) -> NewBoardName {
        NewBoardName {
            board_type: board_type.to_string(),
            category: "consumer".to_string(),
            device_type: "smartphone".to_string(),
            manufacturer: None,
        }
    }

    #[tokio::test]
    async fn duplicate_board_type_conflicts() {
        let service = service();
        let auth = admin();
        service.create(&auth, entry("phone mainboard")).await.unwrap();
        let second = service.create(&auth, entry("phone mainboard")).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn non_admin_rejected() {
        let service = service();
        let user = AuthUser {
            id: Uuid::new_v4(),
            role: Role::User,
        };
        let result = service.create(&user, entry("phone mainboard")).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn deactivate_hides_from_default_listing() {
        let service = service();
        let auth = admin();
        let Ok(row) = service.create(&auth, entry("phone mainboard")).await else {
            panic!("create failed");
        };
        service.deactivate(&auth, row.id).await.unwrap();

        let Ok(visible) = service.list(&auth, false).await else {
            panic!("list failed");
        };
        assert!(visible.is_empty());

        // Soft-deleted, not gone: admins can still see it.
        let Ok(all) = service.list(&auth, true).await else {
            panic!("list failed");
        };
        assert_eq!(all.len(), 1);
        assert!(all.iter().all(|b| !b.is_active));
    }

    #[tokio::test]
    async fn non_admin_never_sees_inactive() {
        let service = service();
        let auth = admin();
        let Ok(row) = service.create(&auth, entry("phone mainboard")).await else {
            panic!("create failed");
        };
        service.deactivate(&auth, row.id).await.unwrap();

        let user = AuthUser {
            id: Uuid::new_v4(),
            role: Role::User,
        };
        let Ok(rows) = service.list(&user, true).await else {
            panic!("list failed");
        };
        assert!(rows.is_empty());
    }
}
