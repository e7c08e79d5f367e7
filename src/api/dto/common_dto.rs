//! Shared DTO types used across multiple endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Listing metadata included in paginated responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListMeta {
    /// Effective page size after clamping.
    pub limit: i64,
    /// Row offset.
    pub offset: i64,
    /// Number of items in this page.
    pub count: usize,
}
