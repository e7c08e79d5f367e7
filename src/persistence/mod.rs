//! Persistence layer: store traits and the PostgreSQL implementation.
//!
//! Each aggregate gets its own store trait so the service layer stays
//! testable without a live database. [`postgres::PgStore`] implements all
//! of them over a shared `sqlx::PgPool`; an in-memory counterpart backs
//! the service tests.

// Stores are only consumed through generic service types, so the futures'
// auto traits resolve at the concrete call sites.
#![allow(async_fn_in_trait)]

pub mod models;
pub mod postgres;

#[cfg(test)]
pub(crate) mod memory;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{ActivityFilter, ScanFilter};
use crate::error::AppError;
use models::{ActivitySessionRow, BoardNameRow, LotRow, ScanRecordRow, UserRow};

/// Storage for `users` rows.
pub trait UserStore {
    /// Inserts a new user row.
    async fn insert_user(&self, row: &UserRow) -> Result<(), AppError>;

    /// Looks a user up by unique email.
    async fn user_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError>;

    /// Looks a user up by id.
    async fn user_by_id(&self, id: Uuid) -> Result<Option<UserRow>, AppError>;
}

/// Storage for `scan_records` rows.
pub trait ScanStore {
    /// Inserts a new scan record.
    async fn insert_scan(&self, row: &ScanRecordRow) -> Result<(), AppError>;

    /// Fetches a single record by id.
    async fn scan_by_id(&self, id: Uuid) -> Result<Option<ScanRecordRow>, AppError>;

    /// Writes back a full (already merged) record row.
    async fn update_scan(&self, row: &ScanRecordRow) -> Result<(), AppError>;

    /// Deletes a record; returns `false` when no row matched.
    async fn delete_scan(&self, id: Uuid) -> Result<bool, AppError>;

    /// Lists records matching `filter`, newest first.
    async fn list_scans(&self, filter: &ScanFilter) -> Result<Vec<ScanRecordRow>, AppError>;

    /// Returns all current members of a lot.
    async fn scans_in_lot(&self, lot_id: Uuid) -> Result<Vec<ScanRecordRow>, AppError>;

    /// Returns the distinct non-null lot ids the given records currently
    /// belong to (the lots affected by a membership mutation).
    async fn lots_of(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, AppError>;

    /// Bulk-assigns `lot_id` on every listed record; returns rows touched.
    async fn assign_lot(&self, ids: &[Uuid], lot_id: Uuid) -> Result<u64, AppError>;

    /// Bulk-clears `lot_id` on every listed record; returns rows touched.
    async fn clear_lot(&self, ids: &[Uuid]) -> Result<u64, AppError>;

    /// Counts records created at or after `since`.
    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64, AppError>;

    /// Counts all records.
    async fn count_all(&self) -> Result<i64, AppError>;

    /// Returns `(total weight, total value)` across all records, with
    /// absent values counted as 0.
    async fn weight_value_totals(&self) -> Result<(f64, f64), AppError>;

    /// Returns the `limit` most recent records.
    async fn recent_scans(&self, limit: i64) -> Result<Vec<ScanRecordRow>, AppError>;
}

/// Storage for `lots` rows.
pub trait LotStore {
    /// Inserts a new lot row.
    async fn insert_lot(&self, row: &LotRow) -> Result<(), AppError>;

    /// Fetches a lot by id.
    async fn lot_by_id(&self, id: Uuid) -> Result<Option<LotRow>, AppError>;

    /// Fetches a lot by unique name.
    async fn lot_by_name(&self, name: &str) -> Result<Option<LotRow>, AppError>;

    /// Lists all lots, newest first.
    async fn list_lots(&self) -> Result<Vec<LotRow>, AppError>;

    /// Writes all three rollup fields in one statement.
    async fn set_lot_totals(
        &self,
        id: Uuid,
        total_weight: f64,
        total_value: f64,
        item_count: i64,
    ) -> Result<(), AppError>;

    /// Marks a lot closed with the given timestamp.
    async fn close_lot(&self, id: Uuid, closed_at: DateTime<Utc>) -> Result<(), AppError>;
}

/// Storage for `activity_sessions` rows.
pub trait SessionStore {
    /// Inserts a new session row.
    async fn insert_session(&self, row: &ActivitySessionRow) -> Result<(), AppError>;

    /// Fetches a session by id.
    async fn session_by_id(&self, id: Uuid) -> Result<Option<ActivitySessionRow>, AppError>;

    /// Returns the user's open session, if any.
    async fn open_session_for(&self, user_id: Uuid)
    -> Result<Option<ActivitySessionRow>, AppError>;

    /// Updates `last_active_at` on an *open* session; returns `false`
    /// when the session is absent or already closed.
    async fn touch_session(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AppError>;

    /// Closes an open session, writing `ended_at` and `duration_secs`
    /// together; returns `false` when the session is absent or already
    /// closed (safe against double-close).
    async fn close_session(
        &self,
        id: Uuid,
        ended_at: DateTime<Utc>,
        duration_secs: i64,
    ) -> Result<bool, AppError>;

    /// Returns sessions matching the filter (inclusive date range over
    /// `activity_date`).
    async fn sessions_in_range(
        &self,
        filter: &ActivityFilter,
    ) -> Result<Vec<ActivitySessionRow>, AppError>;
}

/// Storage for `board_names` catalog rows.
pub trait BoardNameStore {
    /// Inserts a new catalog entry.
    async fn insert_board_name(&self, row: &BoardNameRow) -> Result<(), AppError>;

    /// Fetches a catalog entry by id.
    async fn board_name_by_id(&self, id: Uuid) -> Result<Option<BoardNameRow>, AppError>;

    /// Fetches a catalog entry by its unique board type.
    async fn board_name_by_type(&self, board_type: &str)
    -> Result<Option<BoardNameRow>, AppError>;

    /// Writes back a full (already merged) catalog row.
    async fn update_board_name(&self, row: &BoardNameRow) -> Result<(), AppError>;

    /// Lists catalog entries; inactive ones only when requested.
    async fn list_board_names(&self, include_inactive: bool)
    -> Result<Vec<BoardNameRow>, AppError>;
}
