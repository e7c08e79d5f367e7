//! # boardtriage
//!
//! REST backend for camera-driven circuit-board intake and triage.
//!
//! Operators photograph salvaged boards; an external vision collaborator
//! classifies each image, and this service persists the resulting scan
//! records, groups them into lots with recomputed rollups, tracks
//! per-user activity sessions, and serves dashboard statistics.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── ScanService / LotService / ActivityService
//!     ├── StatsService / CatalogService / UserService (service/)
//!     │
//!     ├── BoardClassifier → vision collaborator (vision/)
//!     │
//!     └── PostgreSQL persistence (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod vision;
