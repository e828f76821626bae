// Request bodies and query strings accepted by the HTTP layer

use serde::Deserialize;

fn zero_string() -> String {
    "0".to_string()
}

fn exercise_item() -> String {
    "EXERCISE".to_string()
}

fn one() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMetricEntryRequest {
    pub metric_type: String,
    pub value: f64,
    pub unit: String,
    /// YYYY-MM-DD; defaults to today
    pub log_date: Option<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchLogMetricRequest {
    pub entries: Vec<LogMetricEntryRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMetricEntryRequest {
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub log_date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntriesQuery {
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InsightsQuery {
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartWorkoutRequest {
    pub name: Option<String>,
    /// ISO-8601; defaults to now
    pub started_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchWorkoutRequest {
    pub name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSessionsQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// A set to add to a session. REST and CARDIO slots leave the rep and weight fields at zero.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSetRequest {
    #[serde(default)]
    pub exercise_id: i64,
    #[serde(default)]
    pub exercise_name: String,
    #[serde(default = "exercise_item")]
    pub item_type: String,
    #[serde(default = "one")]
    pub order_in_session: i32,
    #[serde(default = "one")]
    pub set_number: i32,
    #[serde(default)]
    pub planned_reps: i32,
    #[serde(default = "zero_string")]
    pub planned_weight_kg: String,
    #[serde(default)]
    pub actual_reps: i32,
    #[serde(default = "zero_string")]
    pub actual_weight_kg: String,
    #[serde(default)]
    pub duration_seconds: i32,
    #[serde(default = "zero_string")]
    pub distance_km: String,
    #[serde(default)]
    pub rpe: i32,
    #[serde(default)]
    pub notes: String,
    /// ISO-8601; absent while the set is not done
    pub completed_at: Option<String>,
}

impl Default for AddSetRequest {
    fn default() -> Self {
        Self {
            exercise_id: 0,
            exercise_name: String::new(),
            item_type: exercise_item(),
            order_in_session: 1,
            set_number: 1,
            planned_reps: 0,
            planned_weight_kg: zero_string(),
            actual_reps: 0,
            actual_weight_kg: zero_string(),
            duration_seconds: 0,
            distance_km: zero_string(),
            rpe: 0,
            notes: String::new(),
            completed_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSetRequest {
    pub actual_reps: Option<i32>,
    pub actual_weight_kg: Option<String>,
    pub planned_reps: Option<i32>,
    pub planned_weight_kg: Option<String>,
    pub duration_seconds: Option<i32>,
    pub distance_km: Option<String>,
    pub rpe: Option<i32>,
    pub notes: Option<String>,
    pub completed_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_set_defaults_fill_missing_fields() {
        let req: AddSetRequest =
            serde_json::from_str(r#"{"exerciseId": 4, "actualReps": 5, "actualWeightKg": "60"}"#).unwrap();
        assert_eq!(req.exercise_id, 4);
        assert_eq!(req.item_type, "EXERCISE");
        assert_eq!(req.order_in_session, 1);
        assert_eq!(req.set_number, 1);
        assert_eq!(req.planned_weight_kg, "0");
        assert_eq!(req.distance_km, "0");
        assert!(req.completed_at.is_none());
    }

    #[test]
    fn metric_entry_log_date_is_optional() {
        let req: LogMetricEntryRequest =
            serde_json::from_str(r#"{"metricType": "weight", "value": 80.5, "unit": "kg"}"#).unwrap();
        assert!(req.log_date.is_none());
        assert_eq!(req.notes, "");
    }
}
