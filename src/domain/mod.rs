//! Domain layer: core types shared across services and handlers.
//!
//! Holds the role/lifecycle enums, the authenticated caller identity, and
//! the filter types used by listing and reporting operations.

pub mod filters;
pub mod lot;
pub mod user;

pub use filters::{ActivityFilter, ScanFilter};
pub use lot::LotStatus;
pub use user::{AuthUser, Role};
