//! Activity-session DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ActivityFilter;
use crate::persistence::models::ActivitySessionRow;
use crate::service::session_service::ActivityStats;

/// Activity session as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Session id.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// Last heartbeat time.
    pub last_active_at: DateTime<Utc>,
    /// Close time, once ended.
    pub ended_at: Option<DateTime<Utc>>,
    /// Whole-second duration, once ended.
    pub duration_secs: Option<i64>,
    /// Calendar-day bucket (UTC).
    pub activity_date: NaiveDate,
}

impl From<ActivitySessionRow> for SessionResponse {
    fn from(row: ActivitySessionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            started_at: row.started_at,
            last_active_at: row.last_active_at,
            ended_at: row.ended_at,
            duration_secs: row.duration_secs,
            activity_date: row.activity_date,
        }
    }
}

/// Query parameters for `GET /sessions/stats`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ActivityStatsParams {
    /// Restrict to this user's sessions (admins only; ignored otherwise).
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// Inclusive lower `activity_date` bound.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Inclusive upper `activity_date` bound.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl From<ActivityStatsParams> for ActivityFilter {
    fn from(params: ActivityStatsParams) -> Self {
        Self {
            user_id: params.user_id,
            from: params.from,
            to: params.to,
        }
    }
}

/// Response body for `GET /sessions/stats`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityStatsResponse {
    /// Completed (ended) session count.
    pub completed_sessions: i64,
    /// Total minutes across completed sessions, rounded.
    pub total_minutes: i64,
    /// Average minutes per completed session; 0 when none.
    pub avg_minutes: i64,
    /// Distinct activity dates touched, completed or not.
    pub active_days: i64,
}

impl From<ActivityStats> for ActivityStatsResponse {
    fn from(stats: ActivityStats) -> Self {
        Self {
            completed_sessions: stats.completed_sessions,
            total_minutes: stats.total_minutes,
            avg_minutes: stats.avg_minutes,
            active_days: stats.active_days,
        }
    }
}
