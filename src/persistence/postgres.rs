//! PostgreSQL implementation of the store traits.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::models::{ActivitySessionRow, BoardNameRow, LotRow, ScanRecordRow, UserRow};
use super::{BoardNameStore, LotStore, ScanStore, SessionStore, UserStore};
use crate::domain::{ActivityFilter, LotStatus, ScanFilter};
use crate::error::AppError;

/// PostgreSQL-backed store using a shared `sqlx::PgPool`.
///
/// Implements every store trait in [`crate::persistence`]; one instance
/// is shared by all services through the application state.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Start of the given UTC calendar day as a timestamp.
fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl UserStore for PgStore {
    async fn insert_user(&self, row: &UserRow) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, display_name, role, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(row.id)
        .bind(&row.email)
        .bind(&row.password_hash)
        .bind(&row.display_name)
        .bind(row.role)
        .bind(row.is_active)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<UserRow>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

impl ScanStore for PgStore {
    async fn insert_scan(&self, row: &ScanRecordRow) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO scan_records \
             (id, user_id, lot_id, board_type, category, device_type, manufacturer, model, \
              confidence, description, latitude, longitude, weight_kg, price_per_kg, total_price, \
              created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(row.lot_id)
        .bind(&row.board_type)
        .bind(&row.category)
        .bind(&row.device_type)
        .bind(&row.manufacturer)
        .bind(&row.model)
        .bind(row.confidence)
        .bind(&row.description)
        .bind(row.latitude)
        .bind(row.longitude)
        .bind(row.weight_kg)
        .bind(row.price_per_kg)
        .bind(row.total_price)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn scan_by_id(&self, id: Uuid) -> Result<Option<ScanRecordRow>, AppError> {
        let row = sqlx::query_as::<_, ScanRecordRow>("SELECT * FROM scan_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_scan(&self, row: &ScanRecordRow) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE scan_records SET \
             board_type = $2, category = $3, device_type = $4, manufacturer = $5, model = $6, \
             description = $7, latitude = $8, longitude = $9, weight_kg = $10, price_per_kg = $11, \
             total_price = $12, updated_at = $13 \
             WHERE id = $1",
        )
        .bind(row.id)
        .bind(&row.board_type)
        .bind(&row.category)
        .bind(&row.device_type)
        .bind(&row.manufacturer)
        .bind(&row.model)
        .bind(&row.description)
        .bind(row.latitude)
        .bind(row.longitude)
        .bind(row.weight_kg)
        .bind(row.price_per_kg)
        .bind(row.total_price)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_scan(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM scan_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_scans(&self, filter: &ScanFilter) -> Result<Vec<ScanRecordRow>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM scan_records WHERE TRUE");
        if let Some(user_id) = filter.user_id {
            qb.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(needle) = &filter.board_type_contains {
            qb.push(" AND board_type ILIKE ")
                .push_bind(format!("%{needle}%"));
        }
        if let Some(category) = &filter.category {
            qb.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(from) = filter.created_from {
            qb.push(" AND created_at >= ").push_bind(day_start(from));
        }
        if let Some(to) = filter.created_to {
            // Inclusive upper bound: everything before the next day.
            qb.push(" AND created_at < ")
                .push_bind(day_start(to) + chrono::Duration::days(1));
        }
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows = qb
            .build_query_as::<ScanRecordRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn scans_in_lot(&self, lot_id: Uuid) -> Result<Vec<ScanRecordRow>, AppError> {
        let rows = sqlx::query_as::<_, ScanRecordRow>(
            "SELECT * FROM scan_records WHERE lot_id = $1 ORDER BY created_at DESC",
        )
        .bind(lot_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn lots_of(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, AppError> {
        let rows = sqlx::query_scalar::<_, Uuid>(
            "SELECT DISTINCT lot_id FROM scan_records \
             WHERE id = ANY($1) AND lot_id IS NOT NULL",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn assign_lot(&self, ids: &[Uuid], lot_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE scan_records SET lot_id = $1, updated_at = NOW() WHERE id = ANY($2)",
        )
        .bind(lot_id)
        .bind(ids)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn clear_lot(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE scan_records SET lot_id = NULL, updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM scan_records WHERE created_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM scan_records")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn weight_value_totals(&self) -> Result<(f64, f64), AppError> {
        let totals = sqlx::query_as::<_, (f64, f64)>(
            "SELECT COALESCE(SUM(weight_kg), 0), COALESCE(SUM(total_price), 0) \
             FROM scan_records",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    async fn recent_scans(&self, limit: i64) -> Result<Vec<ScanRecordRow>, AppError> {
        let rows = sqlx::query_as::<_, ScanRecordRow>(
            "SELECT * FROM scan_records ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

impl LotStore for PgStore {
    async fn insert_lot(&self, row: &LotRow) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO lots \
             (id, name, description, status, total_weight, total_value, item_count, \
              created_by, created_at, closed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(row.id)
        .bind(&row.name)
        .bind(&row.description)
        .bind(row.status)
        .bind(row.total_weight)
        .bind(row.total_value)
        .bind(row.item_count)
        .bind(row.created_by)
        .bind(row.created_at)
        .bind(row.closed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn lot_by_id(&self, id: Uuid) -> Result<Option<LotRow>, AppError> {
        let row = sqlx::query_as::<_, LotRow>("SELECT * FROM lots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn lot_by_name(&self, name: &str) -> Result<Option<LotRow>, AppError> {
        let row = sqlx::query_as::<_, LotRow>("SELECT * FROM lots WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_lots(&self) -> Result<Vec<LotRow>, AppError> {
        let rows = sqlx::query_as::<_, LotRow>("SELECT * FROM lots ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn set_lot_totals(
        &self,
        id: Uuid,
        total_weight: f64,
        total_value: f64,
        item_count: i64,
    ) -> Result<(), AppError> {
        // All three rollup fields move together in one statement.
        sqlx::query(
            "UPDATE lots SET total_weight = $2, total_value = $3, item_count = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(total_weight)
        .bind(total_value)
        .bind(item_count)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn close_lot(&self, id: Uuid, closed_at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE lots SET status = $2, closed_at = $3 WHERE id = $1")
            .bind(id)
            .bind(LotStatus::Closed)
            .bind(closed_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

impl SessionStore for PgStore {
    async fn insert_session(&self, row: &ActivitySessionRow) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO activity_sessions \
             (id, user_id, started_at, last_active_at, ended_at, duration_secs, activity_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(row.started_at)
        .bind(row.last_active_at)
        .bind(row.ended_at)
        .bind(row.duration_secs)
        .bind(row.activity_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn session_by_id(&self, id: Uuid) -> Result<Option<ActivitySessionRow>, AppError> {
        let row =
            sqlx::query_as::<_, ActivitySessionRow>("SELECT * FROM activity_sessions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    async fn open_session_for(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ActivitySessionRow>, AppError> {
        let row = sqlx::query_as::<_, ActivitySessionRow>(
            "SELECT * FROM activity_sessions WHERE user_id = $1 AND ended_at IS NULL",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn touch_session(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE activity_sessions SET last_active_at = $2 \
             WHERE id = $1 AND ended_at IS NULL",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn close_session(
        &self,
        id: Uuid,
        ended_at: DateTime<Utc>,
        duration_secs: i64,
    ) -> Result<bool, AppError> {
        // The ended_at IS NULL guard makes double-close a no-match.
        let result = sqlx::query(
            "UPDATE activity_sessions SET ended_at = $2, duration_secs = $3 \
             WHERE id = $1 AND ended_at IS NULL",
        )
        .bind(id)
        .bind(ended_at)
        .bind(duration_secs)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn sessions_in_range(
        &self,
        filter: &ActivityFilter,
    ) -> Result<Vec<ActivitySessionRow>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM activity_sessions WHERE TRUE");
        if let Some(user_id) = filter.user_id {
            qb.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(from) = filter.from {
            qb.push(" AND activity_date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" AND activity_date <= ").push_bind(to);
        }
        qb.push(" ORDER BY started_at ASC");

        let rows = qb
            .build_query_as::<ActivitySessionRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

impl BoardNameStore for PgStore {
    async fn insert_board_name(&self, row: &BoardNameRow) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO board_names \
             (id, board_type, category, device_type, manufacturer, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(row.id)
        .bind(&row.board_type)
        .bind(&row.category)
        .bind(&row.device_type)
        .bind(&row.manufacturer)
        .bind(row.is_active)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn board_name_by_id(&self, id: Uuid) -> Result<Option<BoardNameRow>, AppError> {
        let row = sqlx::query_as::<_, BoardNameRow>("SELECT * FROM board_names WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn board_name_by_type(
        &self,
        board_type: &str,
    ) -> Result<Option<BoardNameRow>, AppError> {
        let row =
            sqlx::query_as::<_, BoardNameRow>("SELECT * FROM board_names WHERE board_type = $1")
                .bind(board_type)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    async fn update_board_name(&self, row: &BoardNameRow) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE board_names SET \
             board_type = $2, category = $3, device_type = $4, manufacturer = $5, \
             is_active = $6, updated_at = $7 \
             WHERE id = $1",
        )
        .bind(row.id)
        .bind(&row.board_type)
        .bind(&row.category)
        .bind(&row.device_type)
        .bind(&row.manufacturer)
        .bind(row.is_active)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_board_names(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<BoardNameRow>, AppError> {
        let rows = if include_inactive {
            sqlx::query_as::<_, BoardNameRow>("SELECT * FROM board_names ORDER BY board_type ASC")
                .fetch_all(&self.pool)
                .await?
        } else {
            sqlx::query_as::<_, BoardNameRow>(
                "SELECT * FROM board_names WHERE is_active ORDER BY board_type ASC",
            )
            .fetch_all(&self.pool)
            .await?
        };
        Ok(rows)
    }
}
