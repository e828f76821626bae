pub mod error;
pub mod insights_service;
pub mod metric_service;
pub mod personal_best;
pub mod snapshot;
pub mod workout_service;

pub use error::{ServiceError, ServiceResult};
pub use insights_service::InsightsService;
pub use metric_service::MetricService;
pub use workout_service::{Paged, WorkoutLimits, WorkoutService};
