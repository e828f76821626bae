use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use crate::api::format::MetricEntryResponse;
use crate::api::requests::{BatchLogMetricRequest, UpdateMetricEntryRequest};
use crate::database::models::{BodyMetricEntry, NewBodyMetricEntry};
use crate::database::BodyMetricStore;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::snapshot::{build_snapshot, is_computed_type, MetricSnapshotItem};

/// Body metric log: batch logging, per-day and per-type reads, and the snapshot
pub struct MetricService {
    store: Arc<dyn BodyMetricStore>,
    history_limit: i64,
    default_history_days: i64,
}

impl MetricService {
    pub fn new(store: Arc<dyn BodyMetricStore>, history_limit: i64, default_history_days: i64) -> Self {
        Self {
            store,
            history_limit,
            default_history_days,
        }
    }

    /// Validate the whole batch, then store every entry.
    /// Computed metric types are rejected.
    pub async fn batch_log(
        &self,
        user_id: &str,
        request: BatchLogMetricRequest,
    ) -> ServiceResult<Vec<MetricEntryResponse>> {
        if request.entries.is_empty() {
            return Err(ServiceError::validation("entries", "must not be empty"));
        }

        let today = Utc::now().date_naive();
        let mut pending = Vec::with_capacity(request.entries.len());
        for (idx, entry) in request.entries.into_iter().enumerate() {
            let metric_type = entry.metric_type.trim().to_string();
            if metric_type.is_empty() {
                return Err(ServiceError::validation(format!("entries[{}].metricType", idx), "must not be blank"));
            }
            if entry.unit.trim().is_empty() {
                return Err(ServiceError::validation(format!("entries[{}].unit", idx), "must not be blank"));
            }
            if is_computed_type(&metric_type) {
                return Err(ServiceError::invalid(format!(
                    "'{}' is a computed metric and cannot be stored directly.",
                    metric_type
                )));
            }
            let log_date = match entry.log_date.as_deref() {
                Some(raw) => parse_log_date(raw)?,
                None => today,
            };
            pending.push(NewBodyMetricEntry {
                user_id: user_id.to_string(),
                metric_type,
                value: entry.value,
                unit: entry.unit.trim().to_string(),
                log_date,
                notes: entry.notes.trim().to_string(),
            });
        }

        let mut saved = Vec::with_capacity(pending.len());
        for entry in pending {
            saved.push(MetricEntryResponse::from(self.store.insert_entry(entry).await?));
        }
        info!("Logged {} metric entries for user {}", saved.len(), user_id);
        Ok(saved)
    }

    /// Entries logged on `date` (default today), sorted by metric type
    pub async fn entries_for_date(&self, user_id: &str, date: Option<&str>) -> ServiceResult<Vec<MetricEntryResponse>> {
        let date = match date {
            Some(raw) => parse_log_date(raw)?,
            None => Utc::now().date_naive(),
        };
        let rows = self.store.find_by_date(user_id, date).await?;
        Ok(rows.into_iter().map(MetricEntryResponse::from).collect())
    }

    /// One metric type over a date range, oldest first. Defaults to the trailing window ending today.
    pub async fn history(
        &self,
        user_id: &str,
        metric_type: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> ServiceResult<Vec<MetricEntryResponse>> {
        let end = match end {
            Some(raw) => parse_log_date(raw)?,
            None => Utc::now().date_naive(),
        };
        let start = match start {
            Some(raw) => parse_log_date(raw)?,
            None => end - Duration::days(self.default_history_days),
        };
        let rows = self
            .store
            .find_by_type(user_id, metric_type.trim(), start, end, self.history_limit)
            .await?;
        Ok(rows.into_iter().map(MetricEntryResponse::from).collect())
    }

    /// Latest value per metric type, plus derived bmi / smiComputed
    pub async fn snapshot(&self, user_id: &str) -> ServiceResult<Vec<MetricSnapshotItem>> {
        let recent = self.store.find_recent(user_id, self.history_limit).await?;
        Ok(build_snapshot(&recent))
    }

    pub async fn update_entry(
        &self,
        user_id: &str,
        id: i64,
        request: UpdateMetricEntryRequest,
    ) -> ServiceResult<MetricEntryResponse> {
        let existing = self.owned_entry(user_id, id).await?;
        let log_date = match request.log_date.as_deref() {
            Some(raw) => parse_log_date(raw)?,
            None => existing.log_date,
        };

        let updated = BodyMetricEntry {
            value: request.value.unwrap_or(existing.value),
            unit: request.unit.map(|u| u.trim().to_string()).unwrap_or_else(|| existing.unit.clone()),
            log_date,
            notes: request.notes.map(|n| n.trim().to_string()).unwrap_or_else(|| existing.notes.clone()),
            ..existing
        };
        let saved = self.store.update_entry(&updated).await?;
        Ok(MetricEntryResponse::from(saved))
    }

    pub async fn delete_entry(&self, user_id: &str, id: i64) -> ServiceResult<()> {
        self.owned_entry(user_id, id).await?;
        self.store.delete_entry(id).await?;
        Ok(())
    }

    async fn owned_entry(&self, user_id: &str, id: i64) -> ServiceResult<BodyMetricEntry> {
        let entry = self
            .store
            .find_entry(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Metric entry {} not found", id)))?;
        if entry.user_id != user_id {
            return Err(ServiceError::forbidden(format!(
                "Metric entry {} does not belong to this user",
                id
            )));
        }
        Ok(entry)
    }
}

/// Strict `YYYY-MM-DD` date
pub fn parse_log_date(raw: &str) -> ServiceResult<NaiveDate> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    shaped
        .then(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .flatten()
        .ok_or_else(|| ServiceError::invalid(format!("Invalid logDate '{}'. Expected format: YYYY-MM-DD.", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::requests::LogMetricEntryRequest;
    use crate::database::MemoryStore;

    fn service() -> MetricService {
        MetricService::new(Arc::new(MemoryStore::new()), 300, 90)
    }

    fn log(metric_type: &str, value: f64, unit: &str, date: &str) -> LogMetricEntryRequest {
        LogMetricEntryRequest {
            metric_type: metric_type.to_string(),
            value,
            unit: unit.to_string(),
            log_date: Some(date.to_string()),
            notes: "  ".to_string(),
        }
    }

    #[test]
    fn log_dates_must_be_iso() {
        assert!(parse_log_date("2025-01-10").is_ok());
        assert!(parse_log_date("2025-1-10").is_err());
        assert!(parse_log_date("10/01/2025").is_err());
        assert!(parse_log_date("2025-02-30").is_err());
    }

    #[tokio::test]
    async fn computed_types_cannot_be_logged() {
        let svc = service();
        let err = svc
            .batch_log(
                "u1",
                BatchLogMetricRequest {
                    entries: vec![log("weight", 80.0, "kg", "2025-01-10"), log("bmi", 24.0, "kg/m²", "2025-01-10")],
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "'bmi' is a computed metric and cannot be stored directly.");
        // nothing from the rejected batch is stored
        assert!(svc.snapshot("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let err = service()
            .batch_log("u1", BatchLogMetricRequest { entries: vec![] })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    #[tokio::test]
    async fn snapshot_includes_derived_bmi() {
        let svc = service();
        svc.batch_log(
            "u1",
            BatchLogMetricRequest {
                entries: vec![log("weight", 80.0, "kg", "2025-01-10"), log("height", 180.0, "cm", "2025-01-05")],
            },
        )
        .await
        .unwrap();

        let snapshot = svc.snapshot("u1").await.unwrap();
        let bmi = snapshot.iter().find(|i| i.metric_type == "bmi").unwrap();
        assert_eq!(bmi.value, 24.7);
        assert_eq!(bmi.log_date.to_string(), "2025-01-10");
    }

    #[tokio::test]
    async fn only_the_owner_may_modify_an_entry() {
        let svc = service();
        let saved = svc
            .batch_log("u1", BatchLogMetricRequest { entries: vec![log("weight", 80.0, "kg", "2025-01-10")] })
            .await
            .unwrap();
        let id = saved[0].id;
        assert_eq!(saved[0].notes, "");

        let err = svc.delete_entry("intruder", id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        let err = svc.delete_entry("u1", id + 100).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let updated = svc
            .update_entry("u1", id, UpdateMetricEntryRequest { value: Some(79.5), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.value, 79.5);
        assert_eq!(updated.unit, "kg");
    }

    #[tokio::test]
    async fn history_is_ascending_within_range() {
        let svc = service();
        svc.batch_log(
            "u1",
            BatchLogMetricRequest {
                entries: vec![
                    log("weight", 81.0, "kg", "2025-01-03"),
                    log("weight", 80.0, "kg", "2025-01-01"),
                    log("weight", 79.0, "kg", "2025-02-01"),
                ],
            },
        )
        .await
        .unwrap();

        let rows = svc
            .history("u1", "weight", Some("2025-01-01"), Some("2025-01-31"))
            .await
            .unwrap();
        let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![80.0, 81.0]);
    }
}
