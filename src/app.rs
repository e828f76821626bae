use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::{
    BodyMetricStore, DatabaseError, DatabaseManager, MemoryStore, PgBodyMetricStore, PgWorkoutStore,
    WorkoutStore,
};
use crate::handlers::{protected, public};
use crate::middleware::user_header_middleware;
use crate::services::{InsightsService, MetricService, WorkoutLimits, WorkoutService};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<MetricService>,
    pub insights: Arc<InsightsService>,
    pub workouts: Arc<WorkoutService>,
    pub user_header: String,
    pub cors_origins: Vec<String>,
    /// Present when running on Postgres
    pub pool: Option<PgPool>,
}

impl AppState {
    pub fn new(
        metric_store: Arc<dyn BodyMetricStore>,
        workout_store: Arc<dyn WorkoutStore>,
        config: &AppConfig,
        pool: Option<PgPool>,
    ) -> Self {
        let metrics = Arc::new(MetricService::new(
            metric_store,
            config.database.history_limit,
            config.api.default_history_days,
        ));
        let workouts = Arc::new(WorkoutService::new(
            workout_store,
            WorkoutLimits {
                history_limit: config.database.history_limit,
                max_page_size: config.api.max_page_size,
                max_history_page_size: config.api.max_history_page_size,
            },
        ));
        Self {
            insights: Arc::new(InsightsService::new(metrics.clone())),
            metrics,
            workouts,
            user_header: config.security.user_header.clone(),
            cors_origins: config.security.cors_origins.clone(),
            pool,
        }
    }

    /// State backed by a fresh in-process store
    pub fn in_memory(config: &AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, config, None)
    }

    /// Connect to Postgres, apply migrations and build the state over it
    pub async fn connect(config: &AppConfig) -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::main_pool(&config.database).await?;
        DatabaseManager::migrate(&pool).await?;
        Ok(Self::new(
            Arc::new(PgBodyMetricStore::new(pool.clone())),
            Arc::new(PgWorkoutStore::new(pool.clone())),
            config,
            Some(pool),
        ))
    }
}

pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(metrics_routes())
        .merge(workout_routes())
        .merge(exercise_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), user_header_middleware));

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected API (trusted user header)
        .merge(protected)
        // Global middleware
        .layer(cors_layer(&state.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    if allowed.is_empty() {
        return CorsLayer::permissive();
    }
    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

fn metrics_routes() -> Router<AppState> {
    use protected::metrics;

    Router::new()
        .route(
            "/api/v1/metrics/entries",
            post(metrics::entries_post).get(metrics::entries_get),
        )
        .route(
            "/api/v1/metrics/entries/:id",
            put(metrics::entry_put).delete(metrics::entry_delete),
        )
        .route("/api/v1/metrics/history/:metric_type", get(metrics::history_get))
        .route("/api/v1/metrics/snapshot", get(metrics::snapshot_get))
        .route("/api/v1/metrics/insights", get(metrics::insights_get))
}

fn workout_routes() -> Router<AppState> {
    use protected::workouts;

    Router::new()
        .route(
            "/api/v1/workouts",
            post(workouts::sessions_post).get(workouts::sessions_get),
        )
        .route(
            "/api/v1/workouts/:id",
            get(workouts::session_get)
                .patch(workouts::session_patch)
                .delete(workouts::session_delete),
        )
        .route("/api/v1/workouts/:id/complete", post(workouts::session_complete))
        .route("/api/v1/workouts/:id/sets", post(workouts::sets_post))
        .route(
            "/api/v1/workouts/:id/sets/:set_id",
            put(workouts::set_put).delete(workouts::set_delete),
        )
}

fn exercise_routes() -> Router<AppState> {
    use protected::exercises;

    Router::new()
        .route("/api/v1/exercises/:exercise_id/history", get(exercises::history_get))
        .route("/api/v1/exercises/:exercise_id/pbs", get(exercises::pbs_get))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn router() -> Router {
        app(AppState::in_memory(&AppConfig::default()))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn protected_routes_require_user_header() {
        let response = router()
            .oneshot(Request::get("/api/v1/metrics/snapshot").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn blank_user_header_is_rejected() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/workouts")
                    .header("x-user-id", "   ")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn health_reports_memory_store() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["database"], "memory");
    }

    #[tokio::test]
    async fn malformed_json_is_an_invalid_request() {
        let response = router()
            .oneshot(
                Request::post("/api/v1/metrics/entries")
                    .header("x-user-id", "u1")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn empty_snapshot_yields_no_insights() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/metrics/insights?gender=female")
                    .header("x-user-id", "u1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"], Value::Array(vec![]));
    }
}
