pub mod api;
pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod insights;
pub mod middleware;
pub mod services;
pub mod types;

pub use app::{app, AppState};
