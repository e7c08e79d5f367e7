//! Scan-record handlers: create, list, get, update, delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{
    CreateScanRequest, ListMeta, ScanListResponse, ScanResponse, UpdateScanRequest,
};
use crate::api::dto::scan_dto::ListScansParams;
use crate::app_state::AppState;
use crate::domain::{AuthUser, ScanFilter};
use crate::error::{AppError, ErrorResponse};
use crate::service::scan_service::{NewScan, ScanPatch};

/// `POST /scans` — Classify a board image and persist the record.
///
/// # Errors
///
/// Returns [`AppError`] on validation or upstream classification failure.
#[utoipa::path(
    post,
    path = "/api/v1/scans",
    tag = "Scans",
    summary = "Create a scan record",
    description = "Sends the image to the vision collaborator and persists the classification result. A failed classification persists nothing.",
    request_body = CreateScanRequest,
    responses(
        (status = 201, description = "Scan recorded", body = ScanResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 502, description = "Classification upstream failed", body = ErrorResponse),
    )
)]
pub async fn create_scan(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateScanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let row = state
        .scans
        .create(
            &auth,
            NewScan {
                image_b64: req.image_base64,
                latitude: req.latitude,
                longitude: req.longitude,
                weight_kg: req.weight_kg,
                price_per_kg: req.price_per_kg,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ScanResponse::from(row))))
}

/// `GET /scans` — List scan records with filters and pagination.
///
/// # Errors
///
/// Returns [`AppError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/scans",
    tag = "Scans",
    summary = "List scan records",
    description = "Newest first. Non-admin callers only ever see their own records, regardless of filters.",
    params(ListScansParams),
    responses(
        (status = 200, description = "Filtered record page", body = ScanListResponse),
    )
)]
pub async fn list_scans(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListScansParams>,
) -> Result<impl IntoResponse, AppError> {
    let filter = ScanFilter::from(params).clamped();
    let limit = filter.limit;
    let offset = filter.offset;
    let rows = state.scans.list(&auth, filter).await?;

    let data: Vec<ScanResponse> = rows.into_iter().map(ScanResponse::from).collect();
    let count = data.len();
    Ok(Json(ScanListResponse {
        data,
        meta: ListMeta {
            limit,
            offset,
            count,
        },
    }))
}

/// `GET /scans/:id` — Fetch one record (creator or admin).
///
/// # Errors
///
/// Returns [`AppError::NotFound`] or [`AppError::Forbidden`].
#[utoipa::path(
    get,
    path = "/api/v1/scans/{id}",
    tag = "Scans",
    params(("id" = Uuid, Path, description = "Scan record id")),
    responses(
        (status = 200, description = "Record detail", body = ScanResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
    )
)]
pub async fn get_scan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row = state.scans.get(&auth, id).await?;
    Ok(Json(ScanResponse::from(row)))
}

/// `PATCH /scans/:id` — Partially update a record.
///
/// # Errors
///
/// Returns [`AppError::NotFound`], [`AppError::Forbidden`], or
/// [`AppError::Validation`].
#[utoipa::path(
    patch,
    path = "/api/v1/scans/{id}",
    tag = "Scans",
    params(("id" = Uuid, Path, description = "Scan record id")),
    request_body = UpdateScanRequest,
    responses(
        (status = 200, description = "Updated record", body = ScanResponse),
        (status = 403, description = "Not the record owner", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
    )
)]
pub async fn update_scan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateScanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let patch = ScanPatch {
        board_type: req.board_type,
        category: req.category,
        device_type: req.device_type,
        manufacturer: req.manufacturer,
        model: req.model,
        weight_kg: req.weight_kg,
        price_per_kg: req.price_per_kg,
    };
    let row = state.scans.update(&auth, id, patch).await?;
    Ok(Json(ScanResponse::from(row)))
}

/// `DELETE /scans/:id` — Delete a record (creator or admin).
///
/// # Errors
///
/// Returns [`AppError::NotFound`] or [`AppError::Forbidden`].
#[utoipa::path(
    delete,
    path = "/api/v1/scans/{id}",
    tag = "Scans",
    params(("id" = Uuid, Path, description = "Scan record id")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found", body = ErrorResponse),
    )
)]
pub async fn delete_scan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.scans.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Scan-record routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/scans", post(create_scan).get(list_scans))
        .route(
            "/scans/{id}",
            get(get_scan).patch(update_scan).delete(delete_scan),
        )
}
