//! Service layer: orchestrates all business rules over the store traits.
//!
//! Every service is generic over its store so tests run against the
//! in-memory implementation while production uses
//! [`PgStore`](crate::persistence::postgres::PgStore).

pub mod catalog_service;
pub mod lot_service;
pub mod scan_service;
pub mod session_service;
pub mod stats_service;
pub mod user_service;

pub use catalog_service::CatalogService;
pub use lot_service::LotService;
pub use scan_service::ScanService;
pub use session_service::ActivityService;
pub use stats_service::StatsService;
pub use user_service::UserService;
