pub mod manager;
pub mod memory;
pub mod metric_repository;
pub mod models;
pub mod store;
pub mod workout_repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use metric_repository::PgBodyMetricStore;
pub use store::{BodyMetricStore, WorkoutStore};
pub use workout_repository::PgWorkoutStore;
