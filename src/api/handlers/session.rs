//! Activity-session handlers: start, ping, end, stats.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::session_dto::ActivityStatsParams;
use crate::api::dto::{ActivityStatsResponse, SessionResponse};
use crate::app_state::AppState;
use crate::domain::{ActivityFilter, AuthUser};
use crate::error::{AppError, ErrorResponse};

/// `POST /sessions/start` — Open (or return the already-open) session.
///
/// # Errors
///
/// Returns [`AppError`] on internal failures.
#[utoipa::path(
    post,
    path = "/api/v1/sessions/start",
    tag = "Sessions",
    summary = "Start an activity session",
    description = "Idempotent: if the caller already has an open session it is returned unchanged.",
    responses(
        (status = 200, description = "Open session", body = SessionResponse),
    )
)]
pub async fn start_session(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let row = state.sessions.start(&auth).await?;
    Ok(Json(SessionResponse::from(row)))
}

/// `POST /sessions/:id/ping` — Heartbeat on the caller's open session.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] when the session is absent or closed.
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/ping",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 204, description = "Heartbeat recorded"),
        (status = 404, description = "Open session not found", body = ErrorResponse),
    )
)]
pub async fn ping_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.sessions.ping(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /sessions/:id/end` — End the caller's open session.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] when the session is absent or already
/// closed (double-close is a clean failure).
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/end",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Closed session with duration", body = SessionResponse),
        (status = 404, description = "Open session not found", body = ErrorResponse),
    )
)]
pub async fn end_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row = state.sessions.end(&auth, id).await?;
    Ok(Json(SessionResponse::from(row)))
}

/// `GET /sessions/stats` — Engagement statistics over a date range.
///
/// # Errors
///
/// Returns [`AppError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/sessions/stats",
    tag = "Sessions",
    params(ActivityStatsParams),
    responses(
        (status = 200, description = "Engagement statistics", body = ActivityStatsResponse),
    )
)]
pub async fn session_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ActivityStatsParams>,
) -> Result<impl IntoResponse, AppError> {
    let stats = state
        .sessions
        .stats(&auth, ActivityFilter::from(params))
        .await?;
    Ok(Json(ActivityStatsResponse::from(stats)))
}

/// Activity-session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions/start", post(start_session))
        .route("/sessions/stats", get(session_stats))
        .route("/sessions/{id}/ping", post(ping_session))
        .route("/sessions/{id}/end", post(end_session))
}
