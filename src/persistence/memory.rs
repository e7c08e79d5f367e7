//! In-memory store used by service tests in place of PostgreSQL.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::models::{ActivitySessionRow, BoardNameRow, LotRow, ScanRecordRow, UserRow};
use super::{BoardNameStore, LotStore, ScanStore, SessionStore, UserStore};
use crate::domain::{ActivityFilter, LotStatus, ScanFilter};
use crate::error::AppError;

#[derive(Debug, Default)]
struct Inner {
    users: Vec<UserRow>,
    scans: Vec<ScanRecordRow>,
    lots: Vec<LotRow>,
    sessions: Vec<ActivitySessionRow>,
    board_names: Vec<BoardNameRow>,
}

/// Mutex-guarded in-memory implementation of every store trait.
#[derive(Debug, Default)]
pub(crate) struct MemStore {
    inner: Mutex<Inner>,
}

impl UserStore for MemStore {
    async fn insert_user(&self, row: &UserRow) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.email == row.email) {
            return Err(AppError::Conflict(format!(
                "duplicate email: {}",
                row.email
            )));
        }
        inner.users.push(row.clone());
        Ok(())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<UserRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }
}

impl ScanStore for MemStore {
    async fn insert_scan(&self, row: &ScanRecordRow) -> Result<(), AppError> {
        self.inner.lock().unwrap().scans.push(row.clone());
        Ok(())
    }

    async fn scan_by_id(&self, id: Uuid) -> Result<Option<ScanRecordRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.scans.iter().find(|s| s.id == id).cloned())
    }

    async fn update_scan(&self, row: &ScanRecordRow) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = inner.scans.iter_mut().find(|s| s.id == row.id) {
            *existing = row.clone();
        }
        Ok(())
    }

    async fn delete_scan(&self, id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.scans.len();
        inner.scans.retain(|s| s.id != id);
        Ok(inner.scans.len() < before)
    }

    async fn list_scans(&self, filter: &ScanFilter) -> Result<Vec<ScanRecordRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<ScanRecordRow> = inner
            .scans
            .iter()
            .filter(|s| filter.user_id.is_none_or(|uid| s.user_id == uid))
            .filter(|s| {
                filter.board_type_contains.as_ref().is_none_or(|needle| {
                    s.board_type
                        .to_lowercase()
                        .contains(&needle.to_lowercase())
                })
            })
            .filter(|s| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|cat| &s.category == cat)
            })
            .filter(|s| {
                filter
                    .created_from
                    .is_none_or(|from| s.created_at.date_naive() >= from)
            })
            .filter(|s| {
                filter
                    .created_to
                    .is_none_or(|to| s.created_at.date_naive() <= to)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows
            .into_iter()
            .skip(usize::try_from(filter.offset).unwrap_or(0))
            .take(usize::try_from(filter.limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn scans_in_lot(&self, lot_id: Uuid) -> Result<Vec<ScanRecordRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .scans
            .iter()
            .filter(|s| s.lot_id == Some(lot_id))
            .cloned()
            .collect())
    }

    async fn lots_of(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut lots = Vec::new();
        for scan in inner.scans.iter().filter(|s| ids.contains(&s.id)) {
            if let Some(lot_id) = scan.lot_id {
                if !lots.contains(&lot_id) {
                    lots.push(lot_id);
                }
            }
        }
        Ok(lots)
    }

    async fn assign_lot(&self, ids: &[Uuid], lot_id: Uuid) -> Result<u64, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let mut touched = 0;
        for scan in inner.scans.iter_mut().filter(|s| ids.contains(&s.id)) {
            scan.lot_id = Some(lot_id);
            scan.updated_at = Utc::now();
            touched += 1;
        }
        Ok(touched)
    }

    async fn clear_lot(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let mut touched = 0;
        for scan in inner.scans.iter_mut().filter(|s| ids.contains(&s.id)) {
            scan.lot_id = None;
            scan.updated_at = Utc::now();
            touched += 1;
        }
        Ok(touched)
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.scans.iter().filter(|s| s.created_at >= since).count() as i64)
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        Ok(self.inner.lock().unwrap().scans.len() as i64)
    }

    async fn weight_value_totals(&self) -> Result<(f64, f64), AppError> {
        let inner = self.inner.lock().unwrap();
        let weight = inner.scans.iter().filter_map(|s| s.weight_kg).sum();
        let value = inner.scans.iter().filter_map(|s| s.total_price).sum();
        Ok((weight, value))
    }

    async fn recent_scans(&self, limit: i64) -> Result<Vec<ScanRecordRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<ScanRecordRow> = inner.scans.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }
}

impl LotStore for MemStore {
    async fn insert_lot(&self, row: &LotRow) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.lots.iter().any(|l| l.name == row.name) {
            return Err(AppError::Conflict(format!(
                "duplicate lot name: {}",
                row.name
            )));
        }
        inner.lots.push(row.clone());
        Ok(())
    }

    async fn lot_by_id(&self, id: Uuid) -> Result<Option<LotRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.lots.iter().find(|l| l.id == id).cloned())
    }

    async fn lot_by_name(&self, name: &str) -> Result<Option<LotRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.lots.iter().find(|l| l.name == name).cloned())
    }

    async fn list_lots(&self) -> Result<Vec<LotRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut rows = inner.lots.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn set_lot_totals(
        &self,
        id: Uuid,
        total_weight: f64,
        total_value: f64,
        item_count: i64,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(lot) = inner.lots.iter_mut().find(|l| l.id == id) {
            lot.total_weight = total_weight;
            lot.total_value = total_value;
            lot.item_count = item_count;
        }
        Ok(())
    }

    async fn close_lot(&self, id: Uuid, closed_at: DateTime<Utc>) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(lot) = inner.lots.iter_mut().find(|l| l.id == id) {
            lot.status = LotStatus::Closed;
            lot.closed_at = Some(closed_at);
        }
        Ok(())
    }
}

impl SessionStore for MemStore {
    async fn insert_session(&self, row: &ActivitySessionRow) -> Result<(), AppError> {
        self.inner.lock().unwrap().sessions.push(row.clone());
        Ok(())
    }

    async fn session_by_id(&self, id: Uuid) -> Result<Option<ActivitySessionRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn open_session_for(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ActivitySessionRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .sessions
            .iter()
            .find(|s| s.user_id == user_id && s.is_open())
            .cloned())
    }

    async fn touch_session(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.sessions.iter_mut().find(|s| s.id == id && s.is_open()) {
            Some(session) => {
                session.last_active_at = at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn close_session(
        &self,
        id: Uuid,
        ended_at: DateTime<Utc>,
        duration_secs: i64,
    ) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.sessions.iter_mut().find(|s| s.id == id && s.is_open()) {
            Some(session) => {
                session.ended_at = Some(ended_at);
                session.duration_secs = Some(duration_secs);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn sessions_in_range(
        &self,
        filter: &ActivityFilter,
    ) -> Result<Vec<ActivitySessionRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<ActivitySessionRow> = inner
            .sessions
            .iter()
            .filter(|s| filter.user_id.is_none_or(|uid| s.user_id == uid))
            .filter(|s| filter.from.is_none_or(|from| s.activity_date >= from))
            .filter(|s| filter.to.is_none_or(|to| s.activity_date <= to))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        Ok(rows)
    }
}

impl BoardNameStore for MemStore {
    async fn insert_board_name(&self, row: &BoardNameRow) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .board_names
            .iter()
            .any(|b| b.board_type == row.board_type)
        {
            return Err(AppError::Conflict(format!(
                "duplicate board type: {}",
                row.board_type
            )));
        }
        inner.board_names.push(row.clone());
        Ok(())
    }

    async fn board_name_by_id(&self, id: Uuid) -> Result<Option<BoardNameRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.board_names.iter().find(|b| b.id == id).cloned())
    }

    async fn board_name_by_type(
        &self,
        board_type: &str,
    ) -> Result<Option<BoardNameRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .board_names
            .iter()
            .find(|b| b.board_type == board_type)
            .cloned())
    }

    async fn update_board_name(&self, row: &BoardNameRow) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = inner.board_names.iter_mut().find(|b| b.id == row.id) {
            *existing = row.clone();
        }
        Ok(())
    }

    async fn list_board_names(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<BoardNameRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<BoardNameRow> = inner
            .board_names
            .iter()
            .filter(|b| include_inactive || b.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.board_type.cmp(&b.board_type));
        Ok(rows)
    }
}
