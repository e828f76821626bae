// Composite runner: executes registered engines in registration order and
// merges their results. One failing engine never blocks the others.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::insights::context::InsightContext;
use crate::insights::engines::ReferenceRangeEngine;
use crate::insights::error::InsightError;
use crate::insights::insight::MetricInsight;
use crate::insights::traits::InsightEngine;

/// Ordered registry of insight engines
pub struct CompositeInsightsEngine {
    engines: Vec<Box<dyn InsightEngine>>,
}

impl CompositeInsightsEngine {
    /// Create runner with an empty engine registry
    pub fn new() -> Self {
        Self { engines: Vec::new() }
    }

    /// Runner with the built-in engines, in evaluation order
    pub fn with_default_engines() -> Self {
        let mut composite = Self::new();
        composite.register(Box::new(ReferenceRangeEngine));
        composite
    }

    /// Append an engine; it runs after every engine registered before it
    pub fn register(&mut self, engine: Box<dyn InsightEngine>) {
        tracing::debug!("Registered insight engine '{}'", engine.name());
        self.engines.push(engine);
    }

    pub fn engine_names(&self) -> Vec<&'static str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Run every engine against `ctx` and concatenate the successful results.
    ///
    /// Errors and panics are contained per engine: they are logged and that
    /// engine contributes nothing. Insights for the same metric from two
    /// engines are both kept.
    pub fn analyze(&self, ctx: &InsightContext) -> Vec<MetricInsight> {
        tracing::info!(
            "Running {} insight engine(s) over {} metric(s): {:?}",
            self.len(),
            ctx.len(),
            self.engine_names()
        );

        let mut merged = Vec::new();
        for engine in &self.engines {
            let started = Instant::now();
            match Self::run_isolated(engine.as_ref(), ctx) {
                Ok(results) => {
                    tracing::debug!(
                        "Engine '{}' produced {} insight(s) in {:?}",
                        engine.name(),
                        results.len(),
                        started.elapsed()
                    );
                    merged.extend(results);
                }
                Err(error) => {
                    tracing::error!("Insight engine '{}' dropped: {}", engine.name(), error);
                }
            }
        }
        merged
    }

    fn run_isolated(
        engine: &dyn InsightEngine,
        ctx: &InsightContext,
    ) -> Result<Vec<MetricInsight>, InsightError> {
        // The context is never mutated, so observing it after an unwind is sound
        match panic::catch_unwind(AssertUnwindSafe(|| engine.analyze(ctx))) {
            Ok(result) => result,
            Err(payload) => Err(InsightError::Panicked {
                engine: engine.name().to_string(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

impl Default for CompositeInsightsEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
