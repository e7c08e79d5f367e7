//! Lot aggregation: batch lifecycle, membership, and rollup recomputes.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{AuthUser, LotStatus};
use crate::error::AppError;
use crate::persistence::models::{LotRow, ScanRecordRow};
use crate::persistence::{LotStore, ScanStore};

/// Per-lot statistics returned by [`LotService::stats`].
#[derive(Debug, Clone, Serialize)]
pub struct LotStats {
    /// Member count.
    pub total_boards: i64,
    /// Sum of member weights (absent weights count as 0).
    pub total_weight: f64,
    /// Sum of member derived prices (absent prices count as 0).
    pub total_value: f64,
    /// Member counts grouped by board type, descending by count.
    pub board_type_breakdown: Vec<BoardTypeCount>,
}

/// One entry of the per-lot board-type breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct BoardTypeCount {
    /// Board type label.
    pub board_type: String,
    /// Number of members with that type.
    pub count: i64,
}

/// Sums rollups over member rows: `(total_weight, total_value, count)`.
///
/// Absent weights and prices count as 0. This is the single source of
/// truth for rollup arithmetic; every recompute goes through it.
fn sum_members(members: &[ScanRecordRow]) -> (f64, f64, i64) {
    let weight = members.iter().filter_map(|m| m.weight_kg).sum();
    let value = members.iter().filter_map(|m| m.total_price).sum();
    (weight, value, members.len() as i64)
}

/// Recomputes a lot's rollups from its current member rows and writes all
/// three fields in one statement.
///
/// Always a full recomputation from source rows, never an incremental
/// add/subtract, so it self-heals from any prior inconsistency.
pub(crate) async fn recompute_lot_totals<S>(store: &S, lot_id: Uuid) -> Result<(), AppError>
where
    S: LotStore + ScanStore,
{
    let members = store.scans_in_lot(lot_id).await?;
    let (total_weight, total_value, item_count) = sum_members(&members);
    store
        .set_lot_totals(lot_id, total_weight, total_value, item_count)
        .await?;
    tracing::debug!(%lot_id, item_count, total_weight, total_value, "lot rollups recomputed");
    Ok(())
}

/// Orchestration layer for lot operations.
///
/// Lots are admin-managed batches of scan records with denormalized
/// rollups and a one-way `open → closed` lifecycle.
#[derive(Debug, Clone)]
pub struct LotService<S> {
    store: Arc<S>,
}

impl<S> LotService<S>
where
    S: LotStore + ScanStore,
{
    /// Creates a new `LotService`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a named lot with zeroed rollups.
    ///
    /// # Errors
    ///
    /// [`AppError::Forbidden`] for non-admin callers,
    /// [`AppError::Validation`] for an empty name, and
    /// [`AppError::Conflict`] when the name is already taken.
    pub async fn create(
        &self,
        auth: &AuthUser,
        name: &str,
        description: Option<String>,
    ) -> Result<LotRow, AppError> {
        if !auth.is_admin() {
            return Err(AppError::Forbidden("only admins may create lots".into()));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("lot name must not be empty".into()));
        }
        if self.store.lot_by_name(name).await?.is_some() {
            return Err(AppError::Conflict(format!("lot name already exists: {name}")));
        }

        let row = LotRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description,
            status: LotStatus::Open,
            total_weight: 0.0,
            total_value: 0.0,
            item_count: 0,
            created_by: auth.id,
            created_at: Utc::now(),
            closed_at: None,
        };
        self.store.insert_lot(&row).await?;
        tracing::info!(lot_id = %row.id, name = %row.name, "lot created");
        Ok(row)
    }

    /// Fetches a single lot.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when the lot does not exist.
    pub async fn get(&self, lot_id: Uuid) -> Result<LotRow, AppError> {
        self.store
            .lot_by_id(lot_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("lot not found: {lot_id}")))
    }

    /// Lists all lots, newest first.
    ///
    /// # Errors
    ///
    /// Propagates persistence failures.
    pub async fn list(&self) -> Result<Vec<LotRow>, AppError> {
        self.store.list_lots().await
    }

    /// Re-parents the given scan records into this lot.
    ///
    /// A record belongs to at most one lot; adding moves it out of any
    /// prior lot implicitly. All supplied ids are reassigned in one bulk
    /// update, after which rollups are recomputed for the target lot and
    /// for every prior lot that lost members.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when the lot is absent,
    /// [`AppError::Conflict`] when it is already closed, and
    /// [`AppError::Validation`] for an empty id list.
    pub async fn add_boards(
        &self,
        auth: &AuthUser,
        lot_id: Uuid,
        board_ids: &[Uuid],
    ) -> Result<LotRow, AppError> {
        if !auth.is_admin() {
            return Err(AppError::Forbidden("only admins may manage lots".into()));
        }
        if board_ids.is_empty() {
            return Err(AppError::Validation("no board ids supplied".into()));
        }
        let lot = self.get(lot_id).await?;
        if lot.status == LotStatus::Closed {
            return Err(AppError::Conflict(format!(
                "lot is closed: {}",
                lot.name
            )));
        }

        let prior_lots = self.store.lots_of(board_ids).await?;
        let moved = self.store.assign_lot(board_ids, lot_id).await?;

        recompute_lot_totals(self.store.as_ref(), lot_id).await?;
        for prior in prior_lots.iter().filter(|p| **p != lot_id) {
            recompute_lot_totals(self.store.as_ref(), *prior).await?;
        }

        tracing::info!(%lot_id, moved, "boards added to lot");
        self.get(lot_id).await
    }

    /// Clears lot membership on the given records and recomputes every
    /// affected lot's rollups.
    ///
    /// # Errors
    ///
    /// [`AppError::Validation`] for an empty id list; otherwise
    /// propagates persistence failures.
    pub async fn remove_boards(&self, auth: &AuthUser, board_ids: &[Uuid]) -> Result<(), AppError> {
        if !auth.is_admin() {
            return Err(AppError::Forbidden("only admins may manage lots".into()));
        }
        if board_ids.is_empty() {
            return Err(AppError::Validation("no board ids supplied".into()));
        }

        let affected = self.store.lots_of(board_ids).await?;
        let removed = self.store.clear_lot(board_ids).await?;
        for lot_id in affected {
            recompute_lot_totals(self.store.as_ref(), lot_id).await?;
        }

        tracing::info!(removed, "boards removed from lots");
        Ok(())
    }

    /// Recomputes a lot's rollups from its current members.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when the lot does not exist.
    pub async fn recompute_totals(&self, lot_id: Uuid) -> Result<LotRow, AppError> {
        let _ = self.get(lot_id).await?;
        recompute_lot_totals(self.store.as_ref(), lot_id).await?;
        self.get(lot_id).await
    }

    /// Closes a lot (one-way transition, `closed_at` set exactly once).
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when absent and [`AppError::Conflict`] when
    /// the lot is already closed.
    pub async fn close(&self, auth: &AuthUser, lot_id: Uuid) -> Result<LotRow, AppError> {
        if !auth.is_admin() {
            return Err(AppError::Forbidden("only admins may close lots".into()));
        }
        let lot = self.get(lot_id).await?;
        if lot.status == LotStatus::Closed {
            return Err(AppError::Conflict(format!(
                "lot already closed: {}",
                lot.name
            )));
        }
        self.store.close_lot(lot_id, Utc::now()).await?;
        tracing::info!(%lot_id, name = %lot.name, "lot closed");
        self.get(lot_id).await
    }

    /// Computes live statistics for a lot from its current member rows.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when the lot does not exist.
    pub async fn stats(&self, lot_id: Uuid) -> Result<LotStats, AppError> {
        let _ = self.get(lot_id).await?;
        let members = self.store.scans_in_lot(lot_id).await?;
        let (total_weight, total_value, total_boards) = sum_members(&members);

        // First-seen order, then a stable sort by descending count, so
        // ties keep enumeration order.
        let mut breakdown: Vec<BoardTypeCount> = Vec::new();
        for member in &members {
            match breakdown
                .iter_mut()
                .find(|b| b.board_type == member.board_type)
            {
                Some(entry) => entry.count += 1,
                None => breakdown.push(BoardTypeCount {
                    board_type: member.board_type.clone(),
                    count: 1,
                }),
            }
        }
        breakdown.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(LotStats {
            total_boards,
            total_weight,
            total_value,
            board_type_breakdown: breakdown,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::persistence::memory::MemStore;
    use crate::persistence::models::ScanRecordRow;

    fn admin() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            role: Role::Admin,
        }
    }

    fn service() -> LotService<MemStore> {
        LotService::new(Arc::new(MemStore::default()))
    }

    fn scan(weight: Option<f64>, price: Option<f64>, board_type: &str) -> ScanRecordRow {
        let now = Utc::now();
        ScanRecordRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            lot_id: None,
            board_type: board_type.to_string(),
            category: "consumer".to_string(),
            device_type: "phone".to_string(),
            manufacturer: None,
            model: None,
            confidence: 0.9,
            description: None,
            latitude: None,
            longitude: None,
            weight_kg: weight,
            price_per_kg: price,
            total_price: match (weight, price) {
                (Some(w), Some(p)) => Some(w * p),
                _ => None,
            },
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let service = service();
        let auth = admin();
        let first = service.create(&auth, "L1", None).await;
        assert!(first.is_ok());

        let second = service.create(&auth, "L1", None).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn non_admin_cannot_create() {
        let service = service();
        let user = AuthUser {
            id: Uuid::new_v4(),
            role: Role::User,
        };
        let result = service.create(&user, "L1", None).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn add_boards_rolls_up_weight_and_value() {
        let service = service();
        let auth = admin();
        let Ok(lot) = service.create(&auth, "L1", None).await else {
            panic!("lot creation failed");
        };

        let a = scan(Some(1.5), Some(2.0), "phone mainboard");
        let b = scan(Some(2.0), Some(3.0), "tv mainboard");
        service.store.insert_scan(&a).await.unwrap();
        service.store.insert_scan(&b).await.unwrap();

        let updated = service.add_boards(&auth, lot.id, &[a.id, b.id]).await;
        let Ok(updated) = updated else {
            panic!("add_boards failed");
        };
        assert_eq!(updated.item_count, 2);
        assert_eq!(updated.total_weight, 3.5);
        assert_eq!(updated.total_value, 9.0);

        let Ok(stats) = service.stats(lot.id).await else {
            panic!("stats failed");
        };
        assert_eq!(stats.total_boards, 2);
        assert_eq!(stats.total_weight, 3.5);
        assert_eq!(stats.total_value, 9.0);
        assert_eq!(stats.board_type_breakdown.len(), 2);
    }

    #[tokio::test]
    async fn add_boards_reparents_from_prior_lot() {
        let service = service();
        let auth = admin();
        let Ok(first) = service.create(&auth, "L1", None).await else {
            panic!("lot creation failed");
        };
        let Ok(second) = service.create(&auth, "L2", None).await else {
            panic!("lot creation failed");
        };

        let board = scan(Some(1.0), Some(4.0), "phone mainboard");
        service.store.insert_scan(&board).await.unwrap();
        service.add_boards(&auth, first.id, &[board.id]).await.unwrap();

        let moved = service.add_boards(&auth, second.id, &[board.id]).await;
        let Ok(moved) = moved else {
            panic!("re-parenting failed");
        };
        assert_eq!(moved.item_count, 1);

        // The prior lot self-heals back to zero.
        let Ok(prior) = service.get(first.id).await else {
            panic!("prior lot missing");
        };
        assert_eq!(prior.item_count, 0);
        assert_eq!(prior.total_weight, 0.0);
        assert_eq!(prior.total_value, 0.0);
    }

    #[tokio::test]
    async fn remove_boards_recomputes_affected_lot() {
        let service = service();
        let auth = admin();
        let Ok(lot) = service.create(&auth, "L1", None).await else {
            panic!("lot creation failed");
        };
        let a = scan(Some(1.5), Some(2.0), "phone mainboard");
        let b = scan(Some(2.0), Some(3.0), "tv mainboard");
        service.store.insert_scan(&a).await.unwrap();
        service.store.insert_scan(&b).await.unwrap();
        service.add_boards(&auth, lot.id, &[a.id, b.id]).await.unwrap();

        service.remove_boards(&auth, &[a.id]).await.unwrap();

        let Ok(lot) = service.get(lot.id).await else {
            panic!("lot missing");
        };
        assert_eq!(lot.item_count, 1);
        assert_eq!(lot.total_weight, 2.0);
        assert_eq!(lot.total_value, 6.0);
    }

    #[tokio::test]
    async fn recompute_is_idempotent() {
        let service = service();
        let auth = admin();
        let Ok(lot) = service.create(&auth, "L1", None).await else {
            panic!("lot creation failed");
        };
        let board = scan(Some(2.5), Some(4.0), "server board");
        service.store.insert_scan(&board).await.unwrap();
        service.add_boards(&auth, lot.id, &[board.id]).await.unwrap();

        let Ok(once) = service.recompute_totals(lot.id).await else {
            panic!("recompute failed");
        };
        let Ok(twice) = service.recompute_totals(lot.id).await else {
            panic!("recompute failed");
        };
        assert_eq!(once.total_weight, twice.total_weight);
        assert_eq!(once.total_value, twice.total_value);
        assert_eq!(once.item_count, twice.item_count);
    }

    #[tokio::test]
    async fn close_sets_status_and_timestamp_once() {
        let service = service();
        let auth = admin();
        let Ok(lot) = service.create(&auth, "L1", None).await else {
            panic!("lot creation failed");
        };

        let Ok(closed) = service.close(&auth, lot.id).await else {
            panic!("close failed");
        };
        assert_eq!(closed.status, LotStatus::Closed);
        assert!(closed.closed_at.is_some());
    }

    #[tokio::test]
    async fn close_twice_conflicts() {
        let service = service();
        let auth = admin();
        let Ok(lot) = service.create(&auth, "L1", None).await else {
            panic!("lot creation failed");
        };
        service.close(&auth, lot.id).await.unwrap();

        let again = service.close(&auth, lot.id).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn add_boards_to_closed_lot_rejected() {
        let service = service();
        let auth = admin();
        let Ok(lot) = service.create(&auth, "L1", None).await else {
            panic!("lot creation failed");
        };
        service.close(&auth, lot.id).await.unwrap();

        let board = scan(Some(1.0), Some(1.0), "phone mainboard");
        service.store.insert_scan(&board).await.unwrap();

        let result = service.add_boards(&auth, lot.id, &[board.id]).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn add_boards_to_missing_lot_not_found() {
        let service = service();
        let auth = admin();
        let result = service
            .add_boards(&auth, Uuid::new_v4(), &[Uuid::new_v4()])
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn breakdown_sorted_descending_by_count() {
        let service = service();
        let auth = admin();
        let Ok(lot) = service.create(&auth, "L1", None).await else {
            panic!("lot creation failed");
        };
        let boards = [
            scan(None, None, "tv mainboard"),
            scan(None, None, "phone mainboard"),
            scan(None, None, "phone mainboard"),
        ];
        let mut ids = Vec::new();
        for board in &boards {
            service.store.insert_scan(board).await.unwrap();
            ids.push(board.id);
        }
        service.add_boards(&auth, lot.id, &ids).await.unwrap();

        let Ok(stats) = service.stats(lot.id).await else {
            panic!("stats failed");
        };
        let Some(top) = stats.board_type_breakdown.first() else {
            panic!("breakdown empty");
        };
        assert_eq!(top.board_type, "phone mainboard");
        assert_eq!(top.count, 2);
    }
}
