//! Data Transfer Objects for REST request/response serialization.

pub mod catalog_dto;
pub mod common_dto;
pub mod lot_dto;
pub mod scan_dto;
pub mod session_dto;
pub mod stats_dto;

pub use catalog_dto::*;
pub use common_dto::*;
pub use lot_dto::*;
pub use scan_dto::*;
pub use session_dto::*;
pub use stats_dto::*;
