//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::persistence::postgres::PgStore;
use crate::service::{ActivityService, CatalogService, LotService, ScanService, StatsService};
use crate::vision::HttpClassifier;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Scan record service (classification, CRUD, listing).
    pub scans: Arc<ScanService<PgStore, HttpClassifier>>,
    /// Lot aggregation service.
    pub lots: Arc<LotService<PgStore>>,
    /// Activity session tracker.
    pub sessions: Arc<ActivityService<PgStore>>,
    /// Dashboard reporting service.
    pub stats: Arc<StatsService<PgStore>>,
    /// Board-name catalog service.
    pub catalog: Arc<CatalogService<PgStore>>,
}
