pub mod body_metric;
pub mod workout;

pub use body_metric::{BodyMetricEntry, NewBodyMetricEntry};
pub use workout::{NewWorkoutSession, NewWorkoutSet, WorkoutSession, WorkoutSet};
