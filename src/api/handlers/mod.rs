//! REST endpoint handlers organized by resource.

pub mod catalog;
pub mod lot;
pub mod scan;
pub mod session;
pub mod stats;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(scan::routes())
        .merge(lot::routes())
        .merge(session::routes())
        .merge(stats::routes())
        .merge(catalog::routes())
}
