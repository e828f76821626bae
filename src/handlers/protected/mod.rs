// handlers/protected - endpoints behind the trusted user header
//
// Every handler here reads the caller from the `AuthUser` extension inserted
// by `user_header_middleware`.

pub mod exercises;
pub mod metrics;
pub mod workouts;
