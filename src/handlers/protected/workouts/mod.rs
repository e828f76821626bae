pub mod session;
pub mod sets;

pub use session::{session_complete, session_delete, session_get, session_patch, sessions_get, sessions_post};
pub use sets::{set_delete, set_put, sets_post};
