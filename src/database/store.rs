// Storage seams: services only ever talk to these traits, so the Postgres
// and in-memory backends are interchangeable.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::database::manager::DatabaseError;
use crate::database::models::{
    BodyMetricEntry, NewBodyMetricEntry, NewWorkoutSession, NewWorkoutSet, WorkoutSession,
    WorkoutSet,
};
use crate::types::SessionStatus;

#[async_trait]
pub trait BodyMetricStore: Send + Sync {
    async fn insert_entry(&self, entry: NewBodyMetricEntry) -> Result<BodyMetricEntry, DatabaseError>;

    async fn find_entry(&self, id: i64) -> Result<Option<BodyMetricEntry>, DatabaseError>;

    /// Entries logged on `date`, sorted by metric type
    async fn find_by_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<BodyMetricEntry>, DatabaseError>;

    /// Entries of one type within `[start, end]`, oldest first
    async fn find_by_type(
        &self,
        user_id: &str,
        metric_type: &str,
        start: NaiveDate,
        end: NaiveDate,
        limit: i64,
    ) -> Result<Vec<BodyMetricEntry>, DatabaseError>;

    /// Most recent entries by log date, newest first
    async fn find_recent(&self, user_id: &str, limit: i64) -> Result<Vec<BodyMetricEntry>, DatabaseError>;

    async fn update_entry(&self, entry: &BodyMetricEntry) -> Result<BodyMetricEntry, DatabaseError>;

    async fn delete_entry(&self, id: i64) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait WorkoutStore: Send + Sync {
    async fn insert_session(&self, session: NewWorkoutSession) -> Result<WorkoutSession, DatabaseError>;

    async fn find_session(&self, id: i64) -> Result<Option<WorkoutSession>, DatabaseError>;

    /// Sessions for a user, most recently started first
    async fn list_sessions(
        &self,
        user_id: &str,
        status: Option<SessionStatus>,
    ) -> Result<Vec<WorkoutSession>, DatabaseError>;

    /// Rename / re-note a session
    async fn update_session(&self, session: &WorkoutSession) -> Result<WorkoutSession, DatabaseError>;

    async fn complete_session(&self, id: i64, completed_at: DateTime<Utc>) -> Result<(), DatabaseError>;

    /// Delete a session together with all of its sets
    async fn delete_session(&self, id: i64) -> Result<(), DatabaseError>;

    async fn insert_set(&self, set: NewWorkoutSet) -> Result<WorkoutSet, DatabaseError>;

    async fn find_set(&self, id: i64) -> Result<Option<WorkoutSet>, DatabaseError>;

    /// Sets in a session ordered by slot, then set number
    async fn find_sets_by_session(&self, session_id: i64, user_id: &str) -> Result<Vec<WorkoutSet>, DatabaseError>;

    async fn update_set(&self, set: &WorkoutSet) -> Result<WorkoutSet, DatabaseError>;

    async fn delete_set(&self, id: i64) -> Result<(), DatabaseError>;

    /// Completed EXERCISE sets for a user and exercise, most recently completed first
    async fn exercise_history(
        &self,
        user_id: &str,
        exercise_id: i64,
        limit: i64,
    ) -> Result<Vec<WorkoutSet>, DatabaseError>;

    /// Set the personal-best flag on a set. Never clears it.
    async fn mark_personal_best(&self, set_id: i64) -> Result<(), DatabaseError>;
}
