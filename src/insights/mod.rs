// Insights engine: rule-based evaluation of a user's latest metric snapshot
// Engines are registered explicitly on a composite runner; each one reads the
// same immutable context and contributes zero or more insights.

pub mod composite;
pub mod context;
pub mod engines;
pub mod error;
pub mod insight;
pub mod traits;

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::services::snapshot::MetricSnapshotItem;
use crate::types::Gender;

// Re-export core types
pub use composite::*;
pub use context::*;
pub use error::*;
pub use insight::*;
pub use traits::*;

/// Process-wide runner with the built-in engines registered at startup
static DEFAULT_ENGINE: Lazy<CompositeInsightsEngine> = Lazy::new(CompositeInsightsEngine::with_default_engines);

/// Shared default runner
pub fn default_engine() -> &'static CompositeInsightsEngine {
    &DEFAULT_ENGINE
}

/// Evaluate a snapshot keyed by metric type against every registered engine.
/// An empty snapshot yields an empty list; this never fails.
pub fn compute_insights(
    snapshot: &HashMap<String, MetricSnapshotItem>,
    gender: Gender,
) -> Vec<MetricInsight> {
    if snapshot.is_empty() {
        return Vec::new();
    }
    let context = InsightContext::new(snapshot.clone(), gender);
    default_engine().analyze(&context)
}
