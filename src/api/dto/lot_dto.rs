//! Lot DTOs for lifecycle, membership, and statistics operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::LotStatus;
use crate::persistence::models::LotRow;
use crate::service::lot_service::LotStats;

/// Request body for `POST /lots`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLotRequest {
    /// Unique lot name.
    pub name: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for `POST /lots/:id/boards` and `POST /lots/boards/remove`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BoardIdsRequest {
    /// Scan-record ids to (re)assign or release.
    pub board_ids: Vec<Uuid>,
}

/// Lot as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct LotResponse {
    /// Lot id.
    pub id: Uuid,
    /// Unique lot name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Lifecycle state.
    pub status: LotStatus,
    /// Rollup: total member weight.
    pub total_weight: f64,
    /// Rollup: total member value.
    pub total_value: f64,
    /// Rollup: member count.
    pub item_count: i64,
    /// Creating admin.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Close timestamp, once closed.
    pub closed_at: Option<DateTime<Utc>>,
}

impl From<LotRow> for LotResponse {
    fn from(row: LotRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            status: row.status,
            total_weight: row.total_weight,
            total_value: row.total_value,
            item_count: row.item_count,
            created_by: row.created_by,
            created_at: row.created_at,
            closed_at: row.closed_at,
        }
    }
}

/// One entry of the per-lot board-type breakdown.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardTypeCountDto {
    /// Board type label.
    pub board_type: String,
    /// Member count with that type.
    pub count: i64,
}

/// Response body for `GET /lots/:id/stats`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LotStatsResponse {
    /// Member count.
    pub total_boards: i64,
    /// Total member weight.
    pub total_weight: f64,
    /// Total member value.
    pub total_value: f64,
    /// Member counts grouped by board type, descending.
    pub board_type_breakdown: Vec<BoardTypeCountDto>,
}

impl From<LotStats> for LotStatsResponse {
    fn from(stats: LotStats) -> Self {
        Self {
            total_boards: stats.total_boards,
            total_weight: stats.total_weight,
            total_value: stats.total_value,
            board_type_breakdown: stats
                .board_type_breakdown
                .into_iter()
                .map(|b| BoardTypeCountDto {
                    board_type: b.board_type,
                    count: b.count,
                })
                .collect(),
        }
    }
}
