//! Dashboard reporting handler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::DashboardResponse;
use crate::app_state::AppState;
use crate::domain::AuthUser;
use crate::error::AppError;

/// `GET /stats/dashboard` — Aggregate counts, totals, and top-5 lists.
///
/// # Errors
///
/// Returns [`AppError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/stats/dashboard",
    tag = "Stats",
    summary = "Dashboard summary",
    description = "Creation counts for today/this month/all time, inventory totals, and top-5 board types and categories over the 100 most recent records.",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardResponse),
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let stats = state.stats.dashboard().await?;
    Ok(Json(DashboardResponse::from(stats)))
}

/// Reporting routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/stats/dashboard", get(dashboard))
}
