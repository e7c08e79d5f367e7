//! Filter types for listing and reporting operations.

use chrono::NaiveDate;
use uuid::Uuid;

/// Maximum page size for scan listings.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default page size for scan listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Filter and pagination for scan-record listings.
///
/// `user_id` is forced to the caller for non-admin requests in
/// [`ScanService::list`](crate::service::ScanService::list); the other
/// fields come straight from query parameters.
#[derive(Debug, Clone, Default)]
pub struct ScanFilter {
    /// Restrict to records created by this user.
    pub user_id: Option<Uuid>,
    /// Case-insensitive substring match on `board_type`.
    pub board_type_contains: Option<String>,
    /// Exact match on `category`.
    pub category: Option<String>,
    /// Inclusive lower bound on the creation date (UTC).
    pub created_from: Option<NaiveDate>,
    /// Inclusive upper bound on the creation date (UTC).
    pub created_to: Option<NaiveDate>,
    /// Page size; 0 means "use the default".
    pub limit: i64,
    /// Row offset.
    pub offset: i64,
}

impl ScanFilter {
    /// Clamps `limit` to `1..=`[`MAX_PAGE_SIZE`] (default
    /// [`DEFAULT_PAGE_SIZE`] when unset) and `offset` to non-negative.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.limit = if self.limit <= 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.limit.min(MAX_PAGE_SIZE)
        };
        self.offset = self.offset.max(0);
        self
    }
}

/// Filter for activity-session statistics.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    /// Restrict to sessions of this user.
    pub user_id: Option<Uuid>,
    /// Inclusive lower bound on `activity_date`.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on `activity_date`.
    pub to: Option<NaiveDate>,
}
