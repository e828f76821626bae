use std::collections::HashMap;

use crate::services::snapshot::MetricSnapshotItem;
use crate::types::Gender;

/// Immutable input shared by every engine during one evaluation
#[derive(Debug, Clone, Default)]
pub struct InsightContext {
    snapshot: HashMap<String, MetricSnapshotItem>,
    gender: Gender,
}

impl InsightContext {
    pub fn new(snapshot: HashMap<String, MetricSnapshotItem>, gender: Gender) -> Self {
        Self { snapshot, gender }
    }

    /// Build from a snapshot list; a later item replaces an earlier one with the same type
    pub fn from_items(items: impl IntoIterator<Item = MetricSnapshotItem>, gender: Gender) -> Self {
        let snapshot = items
            .into_iter()
            .map(|item| (item.metric_type.clone(), item))
            .collect();
        Self { snapshot, gender }
    }

    pub fn get(&self, metric_type: &str) -> Option<&MetricSnapshotItem> {
        self.snapshot.get(metric_type)
    }

    /// Finite value for a metric, if present
    pub fn value(&self, metric_type: &str) -> Option<f64> {
        self.get(metric_type)
            .map(|item| item.value)
            .filter(|v| v.is_finite())
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }
}
