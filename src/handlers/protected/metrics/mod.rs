pub mod entries;
pub mod history;
pub mod insights;

pub use entries::{entries_get, entries_post, entry_delete, entry_put};
pub use history::{history_get, snapshot_get};
pub use insights::insights_get;
