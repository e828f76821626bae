use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewWorkoutSession, NewWorkoutSet, WorkoutSession, WorkoutSet};
use crate::database::store::WorkoutStore;
use crate::types::{ItemType, SessionStatus};

const SESSION_COLUMNS: &str =
    "id, user_id, name, status, started_at, completed_at, notes, created_at, updated_at";

const SET_COLUMNS: &str = "id, session_id, user_id, exercise_id, exercise_name, item_type, \
     order_in_session, set_number, planned_reps, planned_weight_kg, actual_reps, actual_weight_kg, \
     duration_seconds, distance_km, rpe, is_personal_best, notes, completed_at";

/// Postgres-backed workout sessions and sets
pub struct PgWorkoutStore {
    pool: PgPool,
}

impl PgWorkoutStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn not_found(what: &str, id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("{} {} not found", what, id))
}

#[async_trait]
impl WorkoutStore for PgWorkoutStore {
    async fn insert_session(&self, session: NewWorkoutSession) -> Result<WorkoutSession, DatabaseError> {
        let sql = format!(
            "INSERT INTO workout_sessions (user_id, name, status, started_at) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            SESSION_COLUMNS
        );
        let row = sqlx::query_as::<_, WorkoutSession>(&sql)
            .bind(&session.user_id)
            .bind(&session.name)
            .bind(SessionStatus::InProgress.as_str())
            .bind(session.started_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_session(&self, id: i64) -> Result<Option<WorkoutSession>, DatabaseError> {
        let sql = format!("SELECT {} FROM workout_sessions WHERE id = $1", SESSION_COLUMNS);
        let row = sqlx::query_as::<_, WorkoutSession>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_sessions(
        &self,
        user_id: &str,
        status: Option<SessionStatus>,
    ) -> Result<Vec<WorkoutSession>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM workout_sessions \
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2) \
             ORDER BY started_at DESC, id DESC",
            SESSION_COLUMNS
        );
        let rows = sqlx::query_as::<_, WorkoutSession>(&sql)
            .bind(user_id)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_session(&self, session: &WorkoutSession) -> Result<WorkoutSession, DatabaseError> {
        let sql = format!(
            "UPDATE workout_sessions SET name = $2, notes = $3, updated_at = now() \
             WHERE id = $1 RETURNING {}",
            SESSION_COLUMNS
        );
        sqlx::query_as::<_, WorkoutSession>(&sql)
            .bind(session.id)
            .bind(&session.name)
            .bind(&session.notes)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("Workout session", session.id))
    }

    async fn complete_session(&self, id: i64, completed_at: DateTime<Utc>) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE workout_sessions SET status = $2, completed_at = $3, updated_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(SessionStatus::Completed.as_str())
        .bind(completed_at)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("Workout session", id));
        }
        Ok(())
    }

    async fn delete_session(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM workout_sets WHERE session_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM workout_sessions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("Workout session", id));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn insert_set(&self, set: NewWorkoutSet) -> Result<WorkoutSet, DatabaseError> {
        let sql = format!(
            "INSERT INTO workout_sets (session_id, user_id, exercise_id, exercise_name, item_type, \
             order_in_session, set_number, planned_reps, planned_weight_kg, actual_reps, \
             actual_weight_kg, duration_seconds, distance_km, rpe, notes, completed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {}",
            SET_COLUMNS
        );
        let row = sqlx::query_as::<_, WorkoutSet>(&sql)
            .bind(set.session_id)
            .bind(&set.user_id)
            .bind(set.exercise_id)
            .bind(&set.exercise_name)
            .bind(set.item_type.as_str())
            .bind(set.order_in_session)
            .bind(set.set_number)
            .bind(set.planned_reps)
            .bind(&set.planned_weight_kg)
            .bind(set.actual_reps)
            .bind(&set.actual_weight_kg)
            .bind(set.duration_seconds)
            .bind(&set.distance_km)
            .bind(set.rpe)
            .bind(&set.notes)
            .bind(set.completed_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_set(&self, id: i64) -> Result<Option<WorkoutSet>, DatabaseError> {
        let sql = format!("SELECT {} FROM workout_sets WHERE id = $1", SET_COLUMNS);
        let row = sqlx::query_as::<_, WorkoutSet>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_sets_by_session(&self, session_id: i64, user_id: &str) -> Result<Vec<WorkoutSet>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM workout_sets WHERE session_id = $1 AND user_id = $2 \
             ORDER BY order_in_session ASC, set_number ASC, id ASC",
            SET_COLUMNS
        );
        let rows = sqlx::query_as::<_, WorkoutSet>(&sql)
            .bind(session_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_set(&self, set: &WorkoutSet) -> Result<WorkoutSet, DatabaseError> {
        let sql = format!(
            "UPDATE workout_sets SET planned_reps = $2, planned_weight_kg = $3, actual_reps = $4, \
             actual_weight_kg = $5, duration_seconds = $6, distance_km = $7, rpe = $8, notes = $9, \
             completed_at = $10, is_personal_best = $11 \
             WHERE id = $1 RETURNING {}",
            SET_COLUMNS
        );
        sqlx::query_as::<_, WorkoutSet>(&sql)
            .bind(set.id)
            .bind(set.planned_reps)
            .bind(&set.planned_weight_kg)
            .bind(set.actual_reps)
            .bind(&set.actual_weight_kg)
            .bind(set.duration_seconds)
            .bind(&set.distance_km)
            .bind(set.rpe)
            .bind(&set.notes)
            .bind(set.completed_at)
            .bind(set.is_personal_best)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("Workout set", set.id))
    }

    async fn delete_set(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM workout_sets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("Workout set", id));
        }
        Ok(())
    }

    async fn exercise_history(
        &self,
        user_id: &str,
        exercise_id: i64,
        limit: i64,
    ) -> Result<Vec<WorkoutSet>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM workout_sets \
             WHERE user_id = $1 AND exercise_id = $2 AND item_type = $3 AND completed_at IS NOT NULL \
             ORDER BY completed_at DESC, id DESC LIMIT $4",
            SET_COLUMNS
        );
        let rows = sqlx::query_as::<_, WorkoutSet>(&sql)
            .bind(user_id)
            .bind(exercise_id)
            .bind(ItemType::Exercise.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn mark_personal_best(&self, set_id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE workout_sets SET is_personal_best = TRUE WHERE id = $1")
            .bind(set_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("Workout set", set_id));
        }
        Ok(())
    }
}
