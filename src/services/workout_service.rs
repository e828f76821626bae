use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::api::format::{WorkoutSessionResponse, WorkoutSessionSummaryResponse, WorkoutSetResponse};
use crate::api::requests::{AddSetRequest, PatchWorkoutRequest, StartWorkoutRequest, UpdateSetRequest};
use crate::database::models::{NewWorkoutSession, NewWorkoutSet, WorkoutSession, WorkoutSet};
use crate::database::WorkoutStore;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::personal_best::{evaluate_and_flag_personal_bests, parse_weight};
use crate::types::{ItemType, SessionStatus};

const MAX_NAME_LEN: usize = 100;
const DEFAULT_SESSION_PAGE_SIZE: i64 = 20;
const DEFAULT_HISTORY_PAGE_SIZE: i64 = 50;

/// One page of a listing plus its position
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

impl<T> Paged<T> {
    /// Slice `all` to the requested page; page is at least 1, size within `1..=max_size`
    fn slice(all: Vec<T>, page: Option<i64>, page_size: Option<i64>, default_size: i64, max_size: i64) -> Self {
        let page = page.unwrap_or(1).max(1);
        let page_size = page_size.unwrap_or(default_size).clamp(1, max_size.max(1));
        let total = all.len() as i64;
        let skip = ((page - 1).saturating_mul(page_size)).min(total) as usize;
        let items = all.into_iter().skip(skip).take(page_size as usize).collect();
        Self {
            items,
            page,
            page_size,
            total,
        }
    }
}

/// Limits applied by the workout service
#[derive(Debug, Clone, Copy)]
pub struct WorkoutLimits {
    pub history_limit: i64,
    pub max_page_size: i64,
    pub max_history_page_size: i64,
}

/// Workout sessions, their sets, completion and personal-best queries
pub struct WorkoutService {
    store: Arc<dyn WorkoutStore>,
    limits: WorkoutLimits,
}

impl WorkoutService {
    pub fn new(store: Arc<dyn WorkoutStore>, limits: WorkoutLimits) -> Self {
        Self { store, limits }
    }

    /// Start a standalone session. Name defaults to "Free Workout - <date>".
    pub async fn start_session(&self, user_id: &str, request: StartWorkoutRequest) -> ServiceResult<WorkoutSessionResponse> {
        let now = Utc::now();
        let started_at = match request.started_at.as_deref() {
            Some(raw) => parse_timestamp("startedAt", raw)?,
            None => now,
        };
        let name = match request.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => check_name_len("name", name)?,
            None => format!("Free Workout - {}", now.format("%Y-%m-%d")),
        };

        let session = self
            .store
            .insert_session(NewWorkoutSession {
                user_id: user_id.to_string(),
                name,
                started_at,
            })
            .await?;
        info!("Started workout session {} for user {}", session.id, user_id);
        Ok(WorkoutSessionResponse::new(session, &[]))
    }

    /// Caller's sessions, most recently started first. An unknown status matches nothing.
    pub async fn list_sessions(
        &self,
        user_id: &str,
        status: Option<&str>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> ServiceResult<Paged<WorkoutSessionSummaryResponse>> {
        let sessions = match status {
            Some(raw) => match SessionStatus::parse(raw) {
                Some(status) => self.store.list_sessions(user_id, Some(status)).await?,
                None => Vec::new(),
            },
            None => self.store.list_sessions(user_id, None).await?,
        };
        let summaries = sessions.into_iter().map(WorkoutSessionSummaryResponse::from).collect();
        Ok(Paged::slice(
            summaries,
            page,
            page_size,
            DEFAULT_SESSION_PAGE_SIZE,
            self.limits.max_page_size,
        ))
    }

    pub async fn get_session(&self, user_id: &str, id: i64) -> ServiceResult<WorkoutSessionResponse> {
        let session = self.owned_session(user_id, id).await?;
        self.session_response(session).await
    }

    pub async fn patch_session(
        &self,
        user_id: &str,
        id: i64,
        request: PatchWorkoutRequest,
    ) -> ServiceResult<WorkoutSessionResponse> {
        let existing = self.owned_session(user_id, id).await?;
        let name = match request.name.as_deref() {
            Some(name) => check_name_len("name", name.trim())?,
            None => existing.name.clone(),
        };
        let updated = WorkoutSession {
            name,
            notes: request.notes.unwrap_or_else(|| existing.notes.clone()),
            ..existing
        };
        let saved = self.store.update_session(&updated).await?;
        self.session_response(saved).await
    }

    /// Mark the session COMPLETED and flag personal bests.
    /// Completing an already completed session returns it unchanged.
    pub async fn complete_session(&self, user_id: &str, id: i64) -> ServiceResult<WorkoutSessionResponse> {
        let existing = self.owned_session(user_id, id).await?;
        if existing.status == SessionStatus::Completed {
            return self.session_response(existing).await;
        }

        // Flags are written before the status flips; a failed run leaves the session IN_PROGRESS
        let sets = self.store.find_sets_by_session(id, user_id).await?;
        let store = self.store.as_ref();
        let history_limit = self.limits.history_limit;
        evaluate_and_flag_personal_bests(
            id,
            user_id,
            &sets,
            |exercise_id| store.exercise_history(user_id, exercise_id, history_limit),
            |set_id| store.mark_personal_best(set_id),
        )
        .await?;

        self.store.complete_session(id, Utc::now()).await?;
        info!("Completed workout session {} for user {}", id, user_id);

        let session = self.owned_session(user_id, id).await?;
        self.session_response(session).await
    }

    /// Delete a session and all of its sets
    pub async fn delete_session(&self, user_id: &str, id: i64) -> ServiceResult<()> {
        self.owned_session(user_id, id).await?;
        self.store.delete_session(id).await?;
        info!("Deleted workout session {} for user {}", id, user_id);
        Ok(())
    }

    pub async fn add_set(&self, user_id: &str, session_id: i64, request: AddSetRequest) -> ServiceResult<WorkoutSetResponse> {
        self.owned_session(user_id, session_id).await?;

        let item_type = ItemType::parse(&request.item_type).ok_or_else(|| {
            ServiceError::invalid(format!(
                "Invalid itemType '{}'. Expected one of EXERCISE, REST, CARDIO.",
                request.item_type
            ))
        })?;
        check_rpe(request.rpe)?;
        let exercise_name = check_name_len("exerciseName", request.exercise_name.trim())?;
        let completed_at = request
            .completed_at
            .as_deref()
            .map(|raw| parse_timestamp("completedAt", raw))
            .transpose()?;

        let set = self
            .store
            .insert_set(NewWorkoutSet {
                session_id,
                user_id: user_id.to_string(),
                exercise_id: request.exercise_id,
                exercise_name,
                item_type,
                order_in_session: request.order_in_session,
                set_number: request.set_number,
                planned_reps: request.planned_reps,
                planned_weight_kg: request.planned_weight_kg,
                actual_reps: request.actual_reps,
                actual_weight_kg: request.actual_weight_kg,
                duration_seconds: request.duration_seconds,
                distance_km: request.distance_km,
                rpe: request.rpe,
                notes: request.notes,
                completed_at,
            })
            .await?;
        Ok(WorkoutSetResponse::from(&set))
    }

    pub async fn update_set(
        &self,
        user_id: &str,
        session_id: i64,
        set_id: i64,
        request: UpdateSetRequest,
    ) -> ServiceResult<WorkoutSetResponse> {
        let existing = self.session_set(user_id, session_id, set_id).await?;
        if let Some(rpe) = request.rpe {
            check_rpe(rpe)?;
        }
        let completed_at = match request.completed_at.as_deref() {
            Some(raw) => Some(parse_timestamp("completedAt", raw)?),
            None => existing.completed_at,
        };

        let updated = WorkoutSet {
            actual_reps: request.actual_reps.unwrap_or(existing.actual_reps),
            actual_weight_kg: request.actual_weight_kg.unwrap_or_else(|| existing.actual_weight_kg.clone()),
            planned_reps: request.planned_reps.unwrap_or(existing.planned_reps),
            planned_weight_kg: request.planned_weight_kg.unwrap_or_else(|| existing.planned_weight_kg.clone()),
            duration_seconds: request.duration_seconds.unwrap_or(existing.duration_seconds),
            distance_km: request.distance_km.unwrap_or_else(|| existing.distance_km.clone()),
            rpe: request.rpe.unwrap_or(existing.rpe),
            notes: request.notes.unwrap_or_else(|| existing.notes.clone()),
            completed_at,
            ..existing
        };
        let saved = self.store.update_set(&updated).await?;
        Ok(WorkoutSetResponse::from(&saved))
    }

    pub async fn delete_set(&self, user_id: &str, session_id: i64, set_id: i64) -> ServiceResult<()> {
        self.session_set(user_id, session_id, set_id).await?;
        self.store.delete_set(set_id).await?;
        Ok(())
    }

    /// Completed sets of an exercise, most recent first
    pub async fn exercise_history(
        &self,
        user_id: &str,
        exercise_id: i64,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> ServiceResult<Paged<WorkoutSetResponse>> {
        let history = self
            .store
            .exercise_history(user_id, exercise_id, self.limits.history_limit)
            .await?;
        let rows = history.iter().map(WorkoutSetResponse::from).collect();
        Ok(Paged::slice(
            rows,
            page,
            page_size,
            DEFAULT_HISTORY_PAGE_SIZE,
            self.limits.max_history_page_size,
        ))
    }

    /// Heaviest completed set for each rep count, highest rep count first
    pub async fn personal_bests(&self, user_id: &str, exercise_id: i64) -> ServiceResult<Vec<WorkoutSetResponse>> {
        let history = self
            .store
            .exercise_history(user_id, exercise_id, self.limits.history_limit)
            .await?;
        Ok(best_per_rep_count(&history)
            .into_iter()
            .map(WorkoutSetResponse::from)
            .collect())
    }

    async fn owned_session(&self, user_id: &str, id: i64) -> ServiceResult<WorkoutSession> {
        let session = self
            .store
            .find_session(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Workout session with id '{}' not found", id)))?;
        if session.user_id != user_id {
            return Err(ServiceError::forbidden(format!("Session {} does not belong to this user", id)));
        }
        Ok(session)
    }

    async fn session_set(&self, user_id: &str, session_id: i64, set_id: i64) -> ServiceResult<WorkoutSet> {
        self.owned_session(user_id, session_id).await?;
        let set = self
            .store
            .find_set(set_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Set with id '{}' not found", set_id)))?;
        if set.session_id != session_id {
            return Err(ServiceError::not_found(format!(
                "Set {} does not belong to session {}",
                set_id, session_id
            )));
        }
        Ok(set)
    }

    async fn session_response(&self, session: WorkoutSession) -> ServiceResult<WorkoutSessionResponse> {
        let sets = self.store.find_sets_by_session(session.id, &session.user_id).await?;
        Ok(WorkoutSessionResponse::new(session, &sets))
    }
}

/// Among performed sets, keep the heaviest per rep count (unparsable weight
/// counts as 0; the earliest in `history` wins ties), sorted by reps descending.
fn best_per_rep_count(history: &[WorkoutSet]) -> Vec<&WorkoutSet> {
    let mut best: Vec<(&WorkoutSet, f64)> = Vec::new();
    for set in history.iter().filter(|s| s.actual_reps > 0) {
        let weight = parse_weight(&set.actual_weight_kg).unwrap_or(0.0);
        match best.iter_mut().find(|(b, _)| b.actual_reps == set.actual_reps) {
            Some(slot) if weight > slot.1 => *slot = (set, weight),
            Some(_) => {}
            None => best.push((set, weight)),
        }
    }
    best.sort_by(|a, b| b.0.actual_reps.cmp(&a.0.actual_reps));
    best.into_iter().map(|(set, _)| set).collect()
}

fn check_rpe(rpe: i32) -> ServiceResult<()> {
    if !(0..=10).contains(&rpe) {
        return Err(ServiceError::validation("rpe", "must be between 0 and 10"));
    }
    Ok(())
}

fn check_name_len(field: &str, name: &str) -> ServiceResult<String> {
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ServiceError::validation(field, format!("size must be between 0 and {}", MAX_NAME_LEN)));
    }
    Ok(name.to_string())
}

/// ISO-8601 timestamp; offset-less values are taken as UTC
fn parse_timestamp(field: &str, raw: &str) -> ServiceResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ServiceError::invalid(format!("Invalid {} '{}'. Expected an ISO-8601 timestamp.", field, raw)))
}
