use thiserror::Error;

/// Failures an insight engine can report. The composite runner logs these
/// and drops the failing engine's contribution.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InsightError {
    #[error("Engine '{engine}' failed: {message}")]
    EngineFailure { engine: String, message: String },

    #[error("Engine '{engine}' panicked: {message}")]
    Panicked { engine: String, message: String },
}

impl InsightError {
    pub fn failure(engine: &str, message: impl Into<String>) -> Self {
        InsightError::EngineFailure {
            engine: engine.to_string(),
            message: message.into(),
        }
    }
}
