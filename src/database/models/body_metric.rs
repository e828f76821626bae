use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One logged measurement. Computed metric types are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BodyMetricEntry {
    pub id: i64,
    pub user_id: String,
    pub metric_type: String,
    pub value: f64,
    pub unit: String,
    pub log_date: NaiveDate,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload; id and timestamps are assigned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewBodyMetricEntry {
    pub user_id: String,
    pub metric_type: String,
    pub value: f64,
    pub unit: String,
    pub log_date: NaiveDate,
    pub notes: String,
}
