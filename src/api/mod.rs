// Wire-level request and response shapes for /api/v1

pub mod format;
pub mod requests;
