use std::sync::Arc;

use crate::insights::{compute_insights, MetricInsight};
use crate::services::error::ServiceResult;
use crate::services::metric_service::MetricService;
use crate::services::snapshot::snapshot_map;
use crate::types::Gender;

/// Health insights over the caller's latest metric snapshot
pub struct InsightsService {
    metrics: Arc<MetricService>,
}

impl InsightsService {
    pub fn new(metrics: Arc<MetricService>) -> Self {
        Self { metrics }
    }

    /// Empty when the user has not logged anything yet
    pub async fn insights(&self, user_id: &str, gender: Gender) -> ServiceResult<Vec<MetricInsight>> {
        let snapshot = self.metrics.snapshot(user_id).await?;
        if snapshot.is_empty() {
            return Ok(Vec::new());
        }
        Ok(compute_insights(&snapshot_map(snapshot), gender))
    }
}
