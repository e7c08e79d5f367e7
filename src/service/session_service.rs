//! Activity session tracking: idempotent open, heartbeats, close-once
//! duration, and engagement statistics.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{ActivityFilter, AuthUser};
use crate::error::AppError;
use crate::persistence::SessionStore;
use crate::persistence::models::ActivitySessionRow;

/// Aggregated engagement statistics over a session set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityStats {
    /// Number of completed (ended) sessions.
    pub completed_sessions: i64,
    /// Sum of completed durations in minutes, rounded.
    pub total_minutes: i64,
    /// Average minutes per completed session, rounded; 0 when none.
    pub avg_minutes: i64,
    /// Distinct `activity_date` values across ALL sessions in range,
    /// completed or not.
    pub active_days: i64,
}

/// Assembles [`ActivityStats`] from already-filtered session rows.
fn assemble_stats(sessions: &[ActivitySessionRow]) -> ActivityStats {
    let total_secs: i64 = sessions.iter().filter_map(|s| s.duration_secs).sum();
    let completed = sessions.iter().filter(|s| s.duration_secs.is_some()).count() as i64;

    let mut days: Vec<chrono::NaiveDate> = Vec::new();
    for session in sessions {
        if !days.contains(&session.activity_date) {
            days.push(session.activity_date);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    let total_minutes = (total_secs as f64 / 60.0).round() as i64;
    #[allow(clippy::cast_possible_truncation)]
    let avg_minutes = if completed == 0 {
        0
    } else {
        (total_secs as f64 / completed as f64 / 60.0).round() as i64
    };

    ActivityStats {
        completed_sessions: completed,
        total_minutes,
        avg_minutes,
        active_days: days.len() as i64,
    }
}

/// Orchestration layer for per-user activity sessions.
///
/// Duration is derived once at close time from wall-clock timestamps, so
/// heartbeat frequency or loss cannot skew totals; heartbeats exist only
/// so outer policy can detect abandonment.
#[derive(Debug, Clone)]
pub struct ActivityService<S> {
    store: Arc<S>,
}

impl<S> ActivityService<S>
where
    S: SessionStore,
{
    /// Creates a new `ActivityService`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Opens a session for the caller, or returns the existing open one
    /// unchanged (idempotent open — at most one open session per user).
    ///
    /// # Errors
    ///
    /// Propagates persistence failures.
    pub async fn start(&self, auth: &AuthUser) -> Result<ActivitySessionRow, AppError> {
        if let Some(existing) = self.store.open_session_for(auth.id).await? {
            return Ok(existing);
        }

        let now = Utc::now();
        let row = ActivitySessionRow {
            id: Uuid::new_v4(),
            user_id: auth.id,
            started_at: now,
            last_active_at: now,
            ended_at: None,
            duration_secs: None,
            activity_date: now.date_naive(),
        };
        self.store.insert_session(&row).await?;
        tracing::info!(session_id = %row.id, user_id = %auth.id, "activity session started");
        Ok(row)
    }

    /// Records a heartbeat on the caller's open session.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when the session is absent, closed, or not
    /// the caller's — a closed session is never resurrected.
    pub async fn ping(&self, auth: &AuthUser, session_id: Uuid) -> Result<(), AppError> {
        let session = self.store.session_by_id(session_id).await?;
        match session {
            Some(s) if s.user_id == auth.id && s.is_open() => {}
            _ => {
                return Err(AppError::NotFound(format!(
                    "open session not found: {session_id}"
                )));
            }
        }
        if !self.store.touch_session(session_id, Utc::now()).await? {
            return Err(AppError::NotFound(format!(
                "open session not found: {session_id}"
            )));
        }
        Ok(())
    }

    /// Ends the caller's open session, computing the duration exactly
    /// once as whole seconds (floor) since `started_at`.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when the session is absent, not the
    /// caller's, or already closed (double-close is a clean failure,
    /// never a duration corruption).
    pub async fn end(&self, auth: &AuthUser, session_id: Uuid) -> Result<ActivitySessionRow, AppError> {
        let session = self
            .store
            .session_by_id(session_id)
            .await?
            .filter(|s| s.user_id == auth.id && s.is_open())
            .ok_or_else(|| AppError::NotFound(format!("open session not found: {session_id}")))?;

        let ended_at = Utc::now();
        let duration_secs = (ended_at - session.started_at).num_seconds().max(0);

        // The store refuses to close twice; a racing second `end` loses.
        if !self
            .store
            .close_session(session_id, ended_at, duration_secs)
            .await?
        {
            return Err(AppError::NotFound(format!(
                "open session not found: {session_id}"
            )));
        }

        tracing::info!(%session_id, duration_secs, "activity session ended");
        self.store
            .session_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("session not found: {session_id}")))
    }

    /// Computes engagement statistics over the filtered session set.
    ///
    /// Non-admin callers are always restricted to their own sessions.
    ///
    /// # Errors
    ///
    /// Propagates persistence failures.
    pub async fn stats(
        &self,
        auth: &AuthUser,
        mut filter: ActivityFilter,
    ) -> Result<ActivityStats, AppError> {
        if !auth.is_admin() {
            filter.user_id = Some(auth.id);
        }
        let sessions = self.store.sessions_in_range(&filter).await?;
        Ok(assemble_stats(&sessions))
    }
}
