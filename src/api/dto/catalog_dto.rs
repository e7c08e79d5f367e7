//! Board-name catalog DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::persistence::models::BoardNameRow;
use crate::service::catalog_service::{BoardNamePatch, NewBoardName};

/// Request body for `POST /board-names`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBoardNameRequest {
    /// Canonical board type (unique).
    pub board_type: String,
    /// Category metadata.
    pub category: String,
    /// Device-type metadata.
    pub device_type: String,
    /// Manufacturer metadata.
    #[serde(default)]
    pub manufacturer: Option<String>,
}

impl From<CreateBoardNameRequest> for NewBoardName {
    fn from(req: CreateBoardNameRequest) -> Self {
        Self {
            board_type: req.board_type,
            category: req.category,
            device_type: req.device_type,
            manufacturer: req.manufacturer,
        }
    }
}

/// Request body for `PATCH /board-names/:id`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBoardNameRequest {
    /// Replacement category.
    #[serde(default)]
    pub category: Option<String>,
    /// Replacement device type.
    #[serde(default)]
    pub device_type: Option<String>,
    /// Replacement manufacturer.
    #[serde(default)]
    pub manufacturer: Option<String>,
}

impl From<UpdateBoardNameRequest> for BoardNamePatch {
    fn from(req: UpdateBoardNameRequest) -> Self {
        Self {
            category: req.category,
            device_type: req.device_type,
            manufacturer: req.manufacturer,
        }
    }
}

/// Query parameters for `GET /board-names`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListBoardNamesParams {
    /// Include deactivated entries (admins only).
    #[serde(default)]
    pub include_inactive: bool,
}

/// Catalog entry as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardNameResponse {
    /// Entry id.
    pub id: Uuid,
    /// Canonical board type.
    pub board_type: String,
    /// Category metadata.
    pub category: String,
    /// Device-type metadata.
    pub device_type: String,
    /// Manufacturer metadata.
    pub manufacturer: Option<String>,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<BoardNameRow> for BoardNameResponse {
    fn from(row: BoardNameRow) -> Self {
        Self {
            id: row.id,
            board_type: row.board_type,
            category: row.category,
            device_type: row.device_type,
            manufacturer: row.manufacturer,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
