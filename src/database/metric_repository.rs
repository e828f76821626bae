use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{BodyMetricEntry, NewBodyMetricEntry};
use crate::database::store::BodyMetricStore;

const COLUMNS: &str = "id, user_id, metric_type, value, unit, log_date, notes, created_at, updated_at";

/// Postgres-backed body metric log
pub struct PgBodyMetricStore {
    pool: PgPool,
}

impl PgBodyMetricStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BodyMetricStore for PgBodyMetricStore {
    async fn insert_entry(&self, entry: NewBodyMetricEntry) -> Result<BodyMetricEntry, DatabaseError> {
        let sql = format!(
            "INSERT INTO body_metric_entries (user_id, metric_type, value, unit, log_date, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, BodyMetricEntry>(&sql)
            .bind(&entry.user_id)
            .bind(&entry.metric_type)
            .bind(entry.value)
            .bind(&entry.unit)
            .bind(entry.log_date)
            .bind(&entry.notes)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_entry(&self, id: i64) -> Result<Option<BodyMetricEntry>, DatabaseError> {
        let sql = format!("SELECT {} FROM body_metric_entries WHERE id = $1", COLUMNS);
        let row = sqlx::query_as::<_, BodyMetricEntry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<BodyMetricEntry>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM body_metric_entries WHERE user_id = $1 AND log_date = $2 \
             ORDER BY metric_type ASC, id ASC",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, BodyMetricEntry>(&sql)
            .bind(user_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_type(
        &self,
        user_id: &str,
        metric_type: &str,
        start: NaiveDate,
        end: NaiveDate,
        limit: i64,
    ) -> Result<Vec<BodyMetricEntry>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM body_metric_entries \
             WHERE user_id = $1 AND metric_type = $2 AND log_date BETWEEN $3 AND $4 \
             ORDER BY log_date ASC, id ASC LIMIT $5",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, BodyMetricEntry>(&sql)
            .bind(user_id)
            .bind(metric_type)
            .bind(start)
            .bind(end)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_recent(&self, user_id: &str, limit: i64) -> Result<Vec<BodyMetricEntry>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM body_metric_entries WHERE user_id = $1 \
             ORDER BY log_date DESC, id DESC LIMIT $2",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, BodyMetricEntry>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_entry(&self, entry: &BodyMetricEntry) -> Result<BodyMetricEntry, DatabaseError> {
        let sql = format!(
            "UPDATE body_metric_entries \
             SET value = $2, unit = $3, log_date = $4, notes = $5, updated_at = now() \
             WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        sqlx::query_as::<_, BodyMetricEntry>(&sql)
            .bind(entry.id)
            .bind(entry.value)
            .bind(&entry.unit)
            .bind(entry.log_date)
            .bind(&entry.notes)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Metric entry {} not found", entry.id)))
    }

    async fn delete_entry(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM body_metric_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Metric entry {} not found", id)));
        }
        Ok(())
    }
}
