//! Scan-record DTOs for create, update, get, and list operations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common_dto::ListMeta;
use crate::domain::ScanFilter;
use crate::persistence::models::ScanRecordRow;

/// Request body for `POST /scans`.
///
/// There is deliberately no `total_price` field: the stored value is
/// always derived server-side.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateScanRequest {
    /// Base64-encoded board photograph.
    pub image_base64: String,
    /// Capture latitude.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Capture longitude.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Measured weight in kilograms.
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Price per kilogram.
    #[serde(default)]
    pub price_per_kg: Option<f64>,
}

/// Request body for `PATCH /scans/:id`; absent fields keep stored values.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateScanRequest {
    /// Replacement board type.
    #[serde(default)]
    pub board_type: Option<String>,
    /// Replacement category.
    #[serde(default)]
    pub category: Option<String>,
    /// Replacement device type.
    #[serde(default)]
    pub device_type: Option<String>,
    /// Replacement manufacturer.
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Replacement model.
    #[serde(default)]
    pub model: Option<String>,
    /// Replacement weight.
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Replacement price per kilogram.
    #[serde(default)]
    pub price_per_kg: Option<f64>,
}

/// Query parameters for `GET /scans`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListScansParams {
    /// Restrict to this user's records (admins only; ignored otherwise).
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// Substring match on board type.
    #[serde(default)]
    pub board_type: Option<String>,
    /// Exact category match.
    #[serde(default)]
    pub category: Option<String>,
    /// Inclusive lower creation-date bound (UTC).
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Inclusive upper creation-date bound (UTC).
    #[serde(default)]
    pub to: Option<NaiveDate>,
    /// Page size (max 100, default 20).
    #[serde(default)]
    pub limit: Option<i64>,
    /// Row offset.
    #[serde(default)]
    pub offset: Option<i64>,
}

impl From<ListScansParams> for ScanFilter {
    fn from(params: ListScansParams) -> Self {
        Self {
            user_id: params.user_id,
            board_type_contains: params.board_type,
            category: params.category,
            created_from: params.from,
            created_to: params.to,
            limit: params.limit.unwrap_or(0),
            offset: params.offset.unwrap_or(0),
        }
    }
}

/// Scan record as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResponse {
    /// Record id.
    pub id: Uuid,
    /// Creator (owner).
    pub user_id: Uuid,
    /// Owning lot, when batched.
    pub lot_id: Option<Uuid>,
    /// Board type from the classifier.
    pub board_type: String,
    /// Board category.
    pub category: String,
    /// Device type.
    pub device_type: String,
    /// Manufacturer, when identified.
    pub manufacturer: Option<String>,
    /// Model, when identified.
    pub model: Option<String>,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f64,
    /// Narrative description.
    pub description: Option<String>,
    /// Capture latitude.
    pub latitude: Option<f64>,
    /// Capture longitude.
    pub longitude: Option<f64>,
    /// Weight in kilograms.
    pub weight_kg: Option<f64>,
    /// Price per kilogram.
    pub price_per_kg: Option<f64>,
    /// Derived total price.
    pub total_price: Option<f64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<ScanRecordRow> for ScanResponse {
    fn from(row: ScanRecordRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            lot_id: row.lot_id,
            board_type: row.board_type,
            category: row.category,
            device_type: row.device_type,
            manufacturer: row.manufacturer,
            model: row.model,
            confidence: row.confidence,
            description: row.description,
            latitude: row.latitude,
            longitude: row.longitude,
            weight_kg: row.weight_kg,
            price_per_kg: row.price_per_kg,
            total_price: row.total_price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Paginated list response for `GET /scans`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanListResponse {
    /// Records, newest first.
    pub data: Vec<ScanResponse>,
    /// Listing metadata.
    pub meta: ListMeta,
}
