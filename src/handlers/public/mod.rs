// handlers/public - endpoints reachable without a user identity

pub mod health;

pub use health::{health, root};
