// Public wire format for stored records

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::database::models::{BodyMetricEntry, WorkoutSession, WorkoutSet};
use crate::types::{ItemType, SessionStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricEntryResponse {
    pub id: i64,
    pub metric_type: String,
    pub value: f64,
    pub unit: String,
    pub log_date: NaiveDate,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BodyMetricEntry> for MetricEntryResponse {
    fn from(entry: BodyMetricEntry) -> Self {
        Self {
            id: entry.id,
            metric_type: entry.metric_type,
            value: entry.value,
            unit: entry.unit,
            log_date: entry.log_date,
            notes: entry.notes,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// One set row. Fields that were never filled in are `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSetResponse {
    pub id: i64,
    pub session_id: i64,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub item_type: ItemType,
    pub order_in_session: i32,
    pub set_number: i32,
    pub planned_reps: i32,
    pub planned_weight_kg: String,
    pub actual_reps: Option<i32>,
    pub actual_weight_kg: Option<String>,
    pub duration_seconds: i32,
    pub distance_km: String,
    pub rpe: Option<i32>,
    pub is_personal_best: bool,
    pub notes: String,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&WorkoutSet> for WorkoutSetResponse {
    fn from(set: &WorkoutSet) -> Self {
        let weight = set.actual_weight_kg.trim();
        Self {
            id: set.id,
            session_id: set.session_id,
            exercise_id: set.exercise_id,
            exercise_name: set.exercise_name.clone(),
            item_type: set.item_type,
            order_in_session: set.order_in_session,
            set_number: set.set_number,
            planned_reps: set.planned_reps,
            planned_weight_kg: set.planned_weight_kg.clone(),
            actual_reps: (set.actual_reps > 0).then_some(set.actual_reps),
            actual_weight_kg: (!weight.is_empty() && weight != "0").then(|| set.actual_weight_kg.clone()),
            duration_seconds: set.duration_seconds,
            distance_km: set.distance_km.clone(),
            rpe: (set.rpe > 0).then_some(set.rpe),
            is_personal_best: set.is_personal_best,
            notes: set.notes.clone(),
            completed_at: set.completed_at,
        }
    }
}

/// Sets sharing one `orderInSession` slot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionItemGroup {
    pub order_in_session: i32,
    pub item_type: ItemType,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub sets: Vec<WorkoutSetResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSessionResponse {
    pub id: i64,
    pub name: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub exercises: Vec<SessionItemGroup>,
}

impl WorkoutSessionResponse {
    pub fn new(session: WorkoutSession, sets: &[WorkoutSet]) -> Self {
        Self {
            id: session.id,
            name: session.name,
            status: session.status,
            started_at: session.started_at,
            completed_at: session.completed_at,
            notes: session.notes,
            created_at: session.created_at,
            updated_at: session.updated_at,
            exercises: group_sets(sets),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSessionSummaryResponse {
    pub id: i64,
    pub name: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorkoutSession> for WorkoutSessionSummaryResponse {
    fn from(session: WorkoutSession) -> Self {
        Self {
            id: session.id,
            name: session.name,
            status: session.status,
            started_at: session.started_at,
            completed_at: session.completed_at,
            updated_at: session.updated_at,
        }
    }
}

/// Group sets by slot, ascending; sets inside a slot ascend by set number.
/// The first set of a slot names the group.
pub fn group_sets(sets: &[WorkoutSet]) -> Vec<SessionItemGroup> {
    let mut ordered: Vec<&WorkoutSet> = sets.iter().collect();
    ordered.sort_by_key(|s| (s.order_in_session, s.set_number, s.id));

    let mut groups: Vec<SessionItemGroup> = Vec::new();
    for set in ordered {
        match groups.last_mut() {
            Some(group) if group.order_in_session == set.order_in_session => {
                group.sets.push(WorkoutSetResponse::from(set));
            }
            _ => groups.push(SessionItemGroup {
                order_in_session: set.order_in_session,
                item_type: set.item_type,
                exercise_id: set.exercise_id,
                exercise_name: set.exercise_name.clone(),
                sets: vec![WorkoutSetResponse::from(set)],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(id: i64, order: i32, number: i32, item_type: ItemType) -> WorkoutSet {
        WorkoutSet {
            id,
            session_id: 1,
            user_id: "u1".to_string(),
            exercise_id: order as i64,
            exercise_name: format!("slot {}", order),
            item_type,
            order_in_session: order,
            set_number: number,
            planned_reps: 5,
            planned_weight_kg: "60".to_string(),
            actual_reps: 0,
            actual_weight_kg: "0".to_string(),
            duration_seconds: 0,
            distance_km: "0".to_string(),
            rpe: 0,
            is_personal_best: false,
            notes: String::new(),
            completed_at: None,
        }
    }

    #[test]
    fn groups_by_slot_and_sorts_sets() {
        let sets = vec![
            set(1, 2, 2, ItemType::Exercise),
            set(2, 1, 1, ItemType::Rest),
            set(3, 2, 1, ItemType::Exercise),
        ];
        let groups = group_sets(&sets);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].order_in_session, 1);
        assert_eq!(groups[0].item_type, ItemType::Rest);
        let numbers: Vec<i32> = groups[1].sets.iter().map(|s| s.set_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn unperformed_fields_serialize_as_null() {
        let response = WorkoutSetResponse::from(&set(1, 1, 1, ItemType::Exercise));
        let json = serde_json::to_value(&response).unwrap();

        assert!(json["actualReps"].is_null());
        assert!(json["actualWeightKg"].is_null());
        assert!(json["rpe"].is_null());
        assert!(json["completedAt"].is_null());
        assert_eq!(json["itemType"], "EXERCISE");
        assert_eq!(json["plannedWeightKg"], "60");
    }
}
