// Process-local backend used when no DATABASE_URL is configured and by the
// integration tests. Mirrors the ordering and filtering of the Postgres stores.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    BodyMetricEntry, NewBodyMetricEntry, NewWorkoutSession, NewWorkoutSet, WorkoutSession,
    WorkoutSet,
};
use crate::database::store::{BodyMetricStore, WorkoutStore};
use crate::types::{ItemType, SessionStatus};

#[derive(Default)]
struct Tables {
    next_id: i64,
    entries: BTreeMap<i64, BodyMetricEntry>,
    sessions: BTreeMap<i64, WorkoutSession>,
    sets: BTreeMap<i64, WorkoutSet>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory implementation of every store trait
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(what: &str, id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("{} {} not found", what, id))
}

#[async_trait]
impl BodyMetricStore for MemoryStore {
    async fn insert_entry(&self, entry: NewBodyMetricEntry) -> Result<BodyMetricEntry, DatabaseError> {
        let mut tables = self.tables.write().await;
        let id = tables.allocate_id();
        let now = Utc::now();
        let stored = BodyMetricEntry {
            id,
            user_id: entry.user_id,
            metric_type: entry.metric_type,
            value: entry.value,
            unit: entry.unit,
            log_date: entry.log_date,
            notes: entry.notes,
            created_at: now,
            updated_at: now,
        };
        tables.entries.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_entry(&self, id: i64) -> Result<Option<BodyMetricEntry>, DatabaseError> {
        Ok(self.tables.read().await.entries.get(&id).cloned())
    }

    async fn find_by_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<BodyMetricEntry>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<BodyMetricEntry> = tables
            .entries
            .values()
            .filter(|e| e.user_id == user_id && e.log_date == date)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.metric_type.cmp(&b.metric_type).then(a.id.cmp(&b.id)));
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
        let tables = self.tables.read().await;
        let mut rows: Vec<BodyMetricEntry> = tables
            .entries
            .values()
            .filter(|e| {
                e.user_id == user_id
                    && e.metric_type == metric_type
                    && e.log_date >= start
                    && e.log_date <= end
            })
            .cloned()
            .collect();
        rows.sort_by_key(|e| (e.log_date, e.id));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn find_recent(&self, user_id: &str, limit: i64) -> Result<Vec<BodyMetricEntry>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<BodyMetricEntry> = tables
            .entries
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|e| Reverse((e.log_date, e.id)));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn update_entry(&self, entry: &BodyMetricEntry) -> Result<BodyMetricEntry, DatabaseError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .entries
            .get_mut(&entry.id)
            .ok_or_else(|| not_found("Metric entry", entry.id))?;
        *stored = BodyMetricEntry {
            updated_at: Utc::now(),
            ..entry.clone()
        };
        Ok(stored.clone())
    }

    async fn delete_entry(&self, id: i64) -> Result<(), DatabaseError> {
        self.tables
            .write()
            .await
            .entries
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("Metric entry", id))
    }
}

#[async_trait]
impl WorkoutStore for MemoryStore {
    async fn insert_session(&self, session: NewWorkoutSession) -> Result<WorkoutSession, DatabaseError> {
        let mut tables = self.tables.write().await;
        let id = tables.allocate_id();
        let now = Utc::now();
        let stored = WorkoutSession {
            id,
            user_id: session.user_id,
            name: session.name,
            status: SessionStatus::InProgress,
            started_at: session.started_at,
            completed_at: None,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        };
        tables.sessions.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_session(&self, id: i64) -> Result<Option<WorkoutSession>, DatabaseError> {
        Ok(self.tables.read().await.sessions.get(&id).cloned())
    }

    async fn list_sessions(
        &self,
        user_id: &str,
        status: Option<SessionStatus>,
    ) -> Result<Vec<WorkoutSession>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<WorkoutSession> = tables
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && status.map_or(true, |st| s.status == st))
            .cloned()
            .collect();
        rows.sort_by_key(|s| Reverse((s.started_at, s.id)));
        Ok(rows)
    }

    async fn update_session(&self, session: &WorkoutSession) -> Result<WorkoutSession, DatabaseError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .sessions
            .get_mut(&session.id)
            .ok_or_else(|| not_found("Workout session", session.id))?;
        stored.name = session.name.clone();
        stored.notes = session.notes.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn complete_session(&self, id: i64, completed_at: DateTime<Utc>) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .sessions
            .get_mut(&id)
            .ok_or_else(|| not_found("Workout session", id))?;
        stored.status = SessionStatus::Completed;
        stored.completed_at = Some(completed_at);
        stored.updated_at = completed_at;
        Ok(())
    }

    async fn delete_session(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        tables
            .sessions
            .remove(&id)
            .ok_or_else(|| not_found("Workout session", id))?;
        tables.sets.retain(|_, set| set.session_id != id);
        Ok(())
    }

    async fn insert_set(&self, set: NewWorkoutSet) -> Result<WorkoutSet, DatabaseError> {
        let mut tables = self.tables.write().await;
        let id = tables.allocate_id();
        let stored = WorkoutSet {
            id,
            session_id: set.session_id,
            user_id: set.user_id,
            exercise_id: set.exercise_id,
            exercise_name: set.exercise_name,
            item_type: set.item_type,
            order_in_session: set.order_in_session,
            set_number: set.set_number,
            planned_reps: set.planned_reps,
            planned_weight_kg: set.planned_weight_kg,
            actual_reps: set.actual_reps,
            actual_weight_kg: set.actual_weight_kg,
            duration_seconds: set.duration_seconds,
            distance_km: set.distance_km,
            rpe: set.rpe,
            is_personal_best: false,
            notes: set.notes,
            completed_at: set.completed_at,
        };
        tables.sets.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_set(&self, id: i64) -> Result<Option<WorkoutSet>, DatabaseError> {
        Ok(self.tables.read().await.sets.get(&id).cloned())
    }

    async fn find_sets_by_session(&self, session_id: i64, user_id: &str) -> Result<Vec<WorkoutSet>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<WorkoutSet> = tables
            .sets
            .values()
            .filter(|s| s.session_id == session_id && s.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| (s.order_in_session, s.set_number, s.id));
        Ok(rows)
    }

    async fn update_set(&self, set: &WorkoutSet) -> Result<WorkoutSet, DatabaseError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .sets
            .get_mut(&set.id)
            .ok_or_else(|| not_found("Workout set", set.id))?;
        *stored = set.clone();
        Ok(stored.clone())
    }

    async fn delete_set(&self, id: i64) -> Result<(), DatabaseError> {
        self.tables
            .write()
            .await
            .sets
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("Workout set", id))
    }

    async fn exercise_history(
        &self,
        user_id: &str,
        exercise_id: i64,
        limit: i64,
    ) -> Result<Vec<WorkoutSet>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<WorkoutSet> = tables
            .sets
            .values()
            .filter(|s| {
                s.user_id == user_id
                    && s.exercise_id == exercise_id
                    && s.item_type == ItemType::Exercise
                    && s.is_completed()
            })
            .cloned()
            .collect();
        rows.sort_by_key(|s| Reverse((s.completed_at, s.id)));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn mark_personal_best(&self, set_id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .sets
            .get_mut(&set_id)
            .ok_or_else(|| not_found("Workout set", set_id))?;
        stored.is_personal_best = true;
        Ok(())
    }
}
