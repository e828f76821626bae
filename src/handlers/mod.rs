// handlers/mod.rs - two security tiers
//
// Public (no identity) -> Protected (trusted user header required, /api/v1/*)
pub mod protected;
pub mod public;
