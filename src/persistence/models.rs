//! Database row models for the five tables.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::{LotStatus, Role};

/// A row from the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    /// User id.
    pub id: Uuid,
    /// Unique login email.
    pub email: String,
    /// Password hash (hashing itself happens upstream).
    pub password_hash: String,
    /// Optional display name.
    pub display_name: Option<String>,
    /// Account role.
    pub role: Role,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A row from the `scan_records` table: one persisted classification event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScanRecordRow {
    /// Record id.
    pub id: Uuid,
    /// Creator (owner) of the record.
    pub user_id: Uuid,
    /// Owning lot, when the record has been batched.
    pub lot_id: Option<Uuid>,
    /// Canonical board type from the classifier.
    pub board_type: String,
    /// Board category.
    pub category: String,
    /// Device type the board came from.
    pub device_type: String,
    /// Manufacturer, when the classifier could identify one.
    pub manufacturer: Option<String>,
    /// Model, when the classifier could identify one.
    pub model: Option<String>,
    /// Classifier confidence, clamped to `[0, 1]`.
    pub confidence: f64,
    /// Narrative description from the classifier.
    pub description: Option<String>,
    /// Capture latitude.
    pub latitude: Option<f64>,
    /// Capture longitude.
    pub longitude: Option<f64>,
    /// Measured weight in kilograms.
    pub weight_kg: Option<f64>,
    /// Price per kilogram.
    pub price_per_kg: Option<f64>,
    /// Derived `weight_kg * price_per_kg`; never client-settable and
    /// `None` whenever either input is absent.
    pub total_price: Option<f64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A row from the `lots` table: a named batch with denormalized rollups.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LotRow {
    /// Lot id.
    pub id: Uuid,
    /// Unique lot name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Lifecycle state.
    pub status: LotStatus,
    /// Rollup: sum of member weights (absent weights count as 0).
    pub total_weight: f64,
    /// Rollup: sum of member `total_price` values (absent as 0).
    pub total_value: f64,
    /// Rollup: member count.
    pub item_count: i64,
    /// Admin who created the lot.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Set exactly once on the open→closed transition.
    pub closed_at: Option<DateTime<Utc>>,
}

/// A row from the `activity_sessions` table: one continuous interval of
/// user engagement.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivitySessionRow {
    /// Session id.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Session start time.
    pub started_at: DateTime<Utc>,
    /// Last heartbeat time; exists only for abandonment detection.
    pub last_active_at: DateTime<Utc>,
    /// Close time; `None` while the session is open.
    pub ended_at: Option<DateTime<Utc>>,
    /// Whole-second duration, computed exactly once at close.
    pub duration_secs: Option<i64>,
    /// Calendar-day bucket (UTC), set at creation for grouping.
    pub activity_date: NaiveDate,
}

impl ActivitySessionRow {
    /// Returns `true` while the session has not been ended.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// A row from the `board_names` table: admin-curated catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BoardNameRow {
    /// Catalog entry id.
    pub id: Uuid,
    /// Canonical board type (unique).
    pub board_type: String,
    /// Category metadata.
    pub category: String,
    /// Device-type metadata.
    pub device_type: String,
    /// Manufacturer metadata.
    pub manufacturer: Option<String>,
    /// Soft-delete flag; entries are deactivated, never hard-deleted.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}
