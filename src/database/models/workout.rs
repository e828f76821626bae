use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

use crate::types::{ItemType, SessionStatus};

/// A workout session, standalone (no routine template)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkoutSession {
    pub user_id: String,
    pub name: String,
    pub started_at: DateTime<Utc>,
}

/// A single set row inside a session.
///
/// Weights and distance keep the client's string form: "0" or anything
/// unparsable means "no value". `actual_reps == 0` means not performed and
/// `completed_at == None` means not completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: i64,
    pub session_id: i64,
    pub user_id: String,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub item_type: ItemType,
    pub order_in_session: i32,
    pub set_number: i32,
    pub planned_reps: i32,
    pub planned_weight_kg: String,
    pub actual_reps: i32,
    pub actual_weight_kg: String,
    pub duration_seconds: i32,
    pub distance_km: String,
    pub rpe: i32,
    pub is_personal_best: bool,
    pub notes: String,
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkoutSet {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkoutSet {
    pub session_id: i64,
    pub user_id: String,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub item_type: ItemType,
    pub order_in_session: i32,
    pub set_number: i32,
    pub planned_reps: i32,
    pub planned_weight_kg: String,
    pub actual_reps: i32,
    pub actual_weight_kg: String,
    pub duration_seconds: i32,
    pub distance_km: String,
    pub rpe: i32,
    pub notes: String,
    pub completed_at: Option<DateTime<Utc>>,
}

fn decode_error(column: &str, value: &str) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("unexpected value '{}'", value).into(),
    }
}

impl<'r> FromRow<'r, PgRow> for WorkoutSession {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            status: SessionStatus::parse(&status).ok_or_else(|| decode_error("status", &status))?,
            started_at: row.try_get("started_at")?,
            completed_at: row.try_get("completed_at")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for WorkoutSet {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let item_type: String = row.try_get("item_type")?;
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            user_id: row.try_get("user_id")?,
            exercise_id: row.try_get("exercise_id")?,
            exercise_name: row.try_get("exercise_name")?,
            item_type: ItemType::parse(&item_type).ok_or_else(|| decode_error("item_type", &item_type))?,
            order_in_session: row.try_get("order_in_session")?,
            set_number: row.try_get("set_number")?,
            planned_reps: row.try_get("planned_reps")?,
            planned_weight_kg: row.try_get("planned_weight_kg")?,
            actual_reps: row.try_get("actual_reps")?,
            actual_weight_kg: row.try_get("actual_weight_kg")?,
            duration_seconds: row.try_get("duration_seconds")?,
            distance_km: row.try_get("distance_km")?,
            rpe: row.try_get("rpe")?,
            is_personal_best: row.try_get("is_personal_best")?,
            notes: row.try_get("notes")?,
            completed_at: row.try_get("completed_at")?,
        })
    }
}
