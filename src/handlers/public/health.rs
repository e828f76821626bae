// handlers/public/health.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::DatabaseManager;

/// GET / - service description and route overview
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Gym Journal API",
            "version": version,
            "description": "Personal fitness tracking backend with metric insights and personal-best detection",
            "endpoints": {
                "health": "/health (public)",
                "metrics": "/api/v1/metrics/* (entries, history, snapshot, insights)",
                "workouts": "/api/v1/workouts[/:id[/sets[/:setId]|/complete]]",
                "exercises": "/api/v1/exercises/:exerciseId/(history|pbs)"
            }
        }
    }))
}

/// GET /health - liveness plus storage connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let Some(pool) = state.pool.as_ref() else {
        return (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "memory" }
            })),
        );
    };

    match DatabaseManager::health_check(pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": { "code": "SERVICE_UNAVAILABLE", "message": "database unavailable" },
                    "data": { "status": "degraded", "timestamp": now }
                })),
            )
        }
    }
}
