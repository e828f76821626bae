pub mod auth;
pub mod response;

pub use auth::{user_header_middleware, AuthUser};
pub use response::{ApiMeta, ApiResponse, ApiResult};
