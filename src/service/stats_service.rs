//! Dashboard reporting: creation counts, inventory totals, and top-N
//! breakdowns over a bounded recent window.

use std::sync::Arc;

use chrono::{Datelike, NaiveTime, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::persistence::ScanStore;

/// Size of the recent-records window feeding the top-5 breakdowns.
///
/// A deliberate precision/performance trade-off: frequencies come from
/// the most recent records rather than a full-table scan.
const RECENT_WINDOW: i64 = 100;

/// Number of entries in each top-frequency list.
const TOP_N: usize = 5;

/// One entry of a frequency breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    /// The label (board type or category).
    pub label: String,
    /// Occurrence count inside the window.
    pub count: i64,
}

/// Dashboard summary returned by [`StatsService::dashboard`].
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// Records created today (UTC calendar day).
    pub scans_today: i64,
    /// Records created this calendar month (UTC).
    pub scans_this_month: i64,
    /// All-time record count.
    pub scans_total: i64,
    /// Sum of all weights (absent as 0).
    pub total_weight: f64,
    /// Sum of all derived prices (absent as 0).
    pub total_value: f64,
    /// Top board types over the recent window.
    pub top_board_types: Vec<FrequencyEntry>,
    /// Top categories over the recent window.
    pub top_categories: Vec<FrequencyEntry>,
}

/// Counts label frequencies in first-seen order, then stable-sorts by
/// descending count and keeps the top `n` (ties keep enumeration order).
fn top_counts<'a, I>(labels: I, n: usize) -> Vec<FrequencyEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut entries: Vec<FrequencyEntry> = Vec::new();
    for label in labels {
        match entries.iter_mut().find(|e| e.label == label) {
            Some(entry) => entry.count += 1,
            None => entries.push(FrequencyEntry {
                label: label.to_string(),
                count: 1,
            }),
        }
    }
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(n);
    entries
}

/// Assembles the dashboard summary from scan records.
#[derive(Debug, Clone)]
pub struct StatsService<S> {
    store: Arc<S>,
}

impl<S> StatsService<S>
where
    S: ScanStore,
{
    /// Creates a new `StatsService`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Computes the dashboard summary.
    ///
    /// With zero records every count is 0 and both top lists are empty.
    ///
    /// # Errors
    ///
    /// Propagates persistence failures.
    pub async fn dashboard(&self) -> Result<DashboardStats, AppError> {
        let now = Utc::now();
        let today = now.date_naive();
        let day_start = today.and_time(NaiveTime::MIN).and_utc();
        let month_start = today
            .with_day(1)
            .unwrap_or(today)
            .and_time(NaiveTime::MIN)
            .and_utc();

        let scans_today = self.store.count_created_since(day_start).await?;
        let scans_this_month = self.store.count_created_since(month_start).await?;
        let scans_total = self.store.count_all().await?;
        let (total_weight, total_value) = self.store.weight_value_totals().await?;

        let recent = self.store.recent_scans(RECENT_WINDOW).await?;
        let top_board_types = top_counts(recent.iter().map(|r| r.board_type.as_str()), TOP_N);
        let top_categories = top_counts(recent.iter().map(|r| r.category.as_str()), TOP_N);

        Ok(DashboardStats {
            scans_today,
            scans_this_month,
            scans_total,
            total_weight,
            total_value,
            top_board_types,
            top_categories,
        })
    }
}
