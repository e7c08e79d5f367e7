//! Dashboard DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::service::stats_service::DashboardStats;

/// One entry of a frequency breakdown.
#[derive(Debug, Serialize, ToSchema)]
pub struct FrequencyEntryDto {
    /// Board type or category label.
    pub label: String,
    /// Occurrence count inside the recent window.
    pub count: i64,
}

/// Response body for `GET /stats/dashboard`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    /// Records created today (UTC).
    pub scans_today: i64,
    /// Records created this calendar month (UTC).
    pub scans_this_month: i64,
    /// All-time record count.
    pub scans_total: i64,
    /// Total weight across all records.
    pub total_weight: f64,
    /// Total value across all records.
    pub total_value: f64,
    /// Top-5 board types over the recent window.
    pub top_board_types: Vec<FrequencyEntryDto>,
    /// Top-5 categories over the recent window.
    pub top_categories: Vec<FrequencyEntryDto>,
}

impl From<DashboardStats> for DashboardResponse {
    fn from(stats: DashboardStats) -> Self {
        let map = |entries: Vec<crate::service::stats_service::FrequencyEntry>| {
            entries
                .into_iter()
                .map(|e| FrequencyEntryDto {
                    label: e.label,
                    count: e.count,
                })
                .collect()
        };
        Self {
            scans_today: stats.scans_today,
            scans_this_month: stats.scans_this_month,
            scans_total: stats.scans_total,
            total_weight: stats.total_weight,
            total_value: stats.total_value,
            top_board_types: map(stats.top_board_types),
            top_categories: map(stats.top_categories),
        }
    }
}
