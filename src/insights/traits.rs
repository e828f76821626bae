use crate::insights::context::InsightContext;
use crate::insights::error::InsightError;
use crate::insights::insight::MetricInsight;

/// Contract for an engine that derives insights from a metric snapshot.
///
/// Engines are stateless and read-only against the context. Returning an
/// empty list is the normal answer when the context lacks the data an engine
/// needs; `Err` is reserved for genuine failures.
pub trait InsightEngine: Send + Sync {
    /// Short identifier for logging
    fn name(&self) -> &'static str;

    /// Evaluate the context and return zero or more insights
    fn analyze(&self, ctx: &InsightContext) -> Result<Vec<MetricInsight>, InsightError>;
}
