//! Board-name catalog handlers (admin curation).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::catalog_dto::ListBoardNamesParams;
use crate::api::dto::{BoardNameResponse, CreateBoardNameRequest, UpdateBoardNameRequest};
use crate::app_state::AppState;
use crate::domain::AuthUser;
use crate::error::{AppError, ErrorResponse};

/// `POST /board-names` — Add a catalog entry (admin only).
///
/// # Errors
///
/// Returns [`AppError::Conflict`] for duplicate board types.
#[utoipa::path(
    post,
    path = "/api/v1/board-names",
    tag = "Catalog",
    request_body = CreateBoardNameRequest,
    responses(
        (status = 201, description = "Entry created", body = BoardNameResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 409, description = "Duplicate board type", body = ErrorResponse),
    )
)]
pub async fn create_board_name(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateBoardNameRequest>,
) -> Result<impl IntoResponse, AppError> {
    let row = state.catalog.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(BoardNameResponse::from(row))))
}

/// `GET /board-names` — List catalog entries.
///
/// # Errors
///
/// Returns [`AppError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/board-names",
    tag = "Catalog",
    params(ListBoardNamesParams),
    responses(
        (status = 200, description = "Catalog entries", body = Vec<BoardNameResponse>),
    )
)]
pub async fn list_board_names(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListBoardNamesParams>,
) -> Result<impl IntoResponse, AppError> {
    let rows = state.catalog.list(&auth, params.include_inactive).await?;
    let data: Vec<BoardNameResponse> = rows.into_iter().map(BoardNameResponse::from).collect();
    Ok(Json(data))
}

/// `PATCH /board-names/:id` — Update a catalog entry (admin only).
///
/// # Errors
///
/// Returns [`AppError::NotFound`] or [`AppError::Forbidden`].
#[utoipa::path(
    patch,
    path = "/api/v1/board-names/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Catalog entry id")),
    request_body = UpdateBoardNameRequest,
    responses(
        (status = 200, description = "Updated entry", body = BoardNameResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse),
    )
)]
pub async fn update_board_name(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBoardNameRequest>,
) -> Result<impl IntoResponse, AppError> {
    let row = state.catalog.update(&auth, id, req.into()).await?;
    Ok(Json(BoardNameResponse::from(row)))
}

/// `DELETE /board-names/:id` — Soft-delete a catalog entry (admin only).
///
/// # Errors
///
/// Returns [`AppError::NotFound`] or [`AppError::Forbidden`].
#[utoipa::path(
    delete,
    path = "/api/v1/board-names/{id}",
    tag = "Catalog",
    summary = "Deactivate a catalog entry",
    description = "Soft delete: the entry is flagged inactive, never removed, so historical scans keep a resolvable type.",
    params(("id" = Uuid, Path, description = "Catalog entry id")),
    responses(
        (status = 200, description = "Deactivated entry", body = BoardNameResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse),
    )
)]
pub async fn deactivate_board_name(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row = state.catalog.deactivate(&auth, id).await?;
    Ok(Json(BoardNameResponse::from(row)))
}

/// Catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/board-names",
            get(list_board_names).post(create_board_name),
        )
        .route(
            "/board-names/{id}",
            patch(update_board_name).delete(deactivate_board_name),
        )
}
