//! Lot handlers: lifecycle, membership, and statistics.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{BoardIdsRequest, CreateLotRequest, LotResponse, LotStatsResponse};
use crate::app_state::AppState;
use crate::domain::AuthUser;
use crate::error::{AppError, ErrorResponse};

/// `POST /lots` — Create a named lot (admin only).
///
/// # Errors
///
/// Returns [`AppError::Conflict`] for duplicate names.
#[utoipa::path(
    post,
    path = "/api/v1/lots",
    tag = "Lots",
    summary = "Create a lot",
    request_body = CreateLotRequest,
    responses(
        (status = 201, description = "Lot created", body = LotResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 409, description = "Duplicate lot name", body = ErrorResponse),
    )
)]
pub async fn create_lot(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateLotRequest>,
) -> Result<impl IntoResponse, AppError> {
    let row = state.lots.create(&auth, &req.name, req.description).await?;
    Ok((StatusCode::CREATED, Json(LotResponse::from(row))))
}

/// `GET /lots` — List all lots.
///
/// # Errors
///
/// Returns [`AppError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/lots",
    tag = "Lots",
    responses(
        (status = 200, description = "All lots, newest first", body = Vec<LotResponse>),
    )
)]
pub async fn list_lots(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let rows = state.lots.list().await?;
    let data: Vec<LotResponse> = rows.into_iter().map(LotResponse::from).collect();
    Ok(Json(data))
}

/// `GET /lots/:id` — Fetch one lot.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] when the lot does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/lots/{id}",
    tag = "Lots",
    params(("id" = Uuid, Path, description = "Lot id")),
    responses(
        (status = 200, description = "Lot detail", body = LotResponse),
        (status = 404, description = "Lot not found", body = ErrorResponse),
    )
)]
pub async fn get_lot(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row = state.lots.get(id).await?;
    Ok(Json(LotResponse::from(row)))
}

/// `POST /lots/:id/boards` — Bulk-add boards to an open lot.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] for a missing lot and
/// [`AppError::Conflict`] for a closed one.
#[utoipa::path(
    post,
    path = "/api/v1/lots/{id}/boards",
    tag = "Lots",
    summary = "Add boards to a lot",
    description = "Re-parents every supplied record into this lot and recomputes rollups for all affected lots. Closed lots reject membership changes.",
    params(("id" = Uuid, Path, description = "Lot id")),
    request_body = BoardIdsRequest,
    responses(
        (status = 200, description = "Updated lot with fresh rollups", body = LotResponse),
        (status = 404, description = "Lot not found", body = ErrorResponse),
        (status = 409, description = "Lot is closed", body = ErrorResponse),
    )
)]
pub async fn add_boards(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<BoardIdsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let row = state.lots.add_boards(&auth, id, &req.board_ids).await?;
    Ok(Json(LotResponse::from(row)))
}

/// `POST /lots/boards/remove` — Bulk-release boards from their lots.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for an empty id list.
#[utoipa::path(
    post,
    path = "/api/v1/lots/boards/remove",
    tag = "Lots",
    summary = "Remove boards from their lots",
    request_body = BoardIdsRequest,
    responses(
        (status = 204, description = "Boards released, affected lots recomputed"),
        (status = 400, description = "No board ids supplied", body = ErrorResponse),
    )
)]
pub async fn remove_boards(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BoardIdsRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.lots.remove_boards(&auth, &req.board_ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /lots/:id/close` — Close a lot (one-way).
///
/// # Errors
///
/// Returns [`AppError::NotFound`] or [`AppError::Conflict`] when
/// already closed.
#[utoipa::path(
    post,
    path = "/api/v1/lots/{id}/close",
    tag = "Lots",
    params(("id" = Uuid, Path, description = "Lot id")),
    responses(
        (status = 200, description = "Closed lot", body = LotResponse),
        (status = 404, description = "Lot not found", body = ErrorResponse),
        (status = 409, description = "Lot already closed", body = ErrorResponse),
    )
)]
pub async fn close_lot(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row = state.lots.close(&auth, id).await?;
    Ok(Json(LotResponse::from(row)))
}

/// `GET /lots/:id/stats` — Live member statistics for a lot.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] when the lot does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/lots/{id}/stats",
    tag = "Lots",
    params(("id" = Uuid, Path, description = "Lot id")),
    responses(
        (status = 200, description = "Lot statistics", body = LotStatsResponse),
        (status = 404, description = "Lot not found", body = ErrorResponse),
    )
)]
pub async fn lot_stats(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stats = state.lots.stats(id).await?;
    Ok(Json(LotStatsResponse::from(stats)))
}

/// Lot routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lots", post(create_lot).get(list_lots))
        .route("/lots/boards/remove", post(remove_boards))
        .route("/lots/{id}", get(get_lot))
        .route("/lots/{id}/boards", post(add_boards))
        .route("/lots/{id}/close", post(close_lot))
        .route("/lots/{id}/stats", get(lot_stats))
}
