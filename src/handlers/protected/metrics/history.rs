// handlers/protected/metrics/history.rs - trend history and latest snapshot

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension,
};

use crate::api::format::MetricEntryResponse;
use crate::api::requests::HistoryQuery;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::snapshot::MetricSnapshotItem;

/// GET /api/v1/metrics/history/:metricType?startDate=&endDate=
pub async fn history_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(metric_type): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Vec<MetricEntryResponse>> {
    let Query(query) = query?;
    let rows = state
        .metrics
        .history(
            &user.user_id,
            &metric_type,
            query.start_date.as_deref(),
            query.end_date.as_deref(),
        )
        .await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/v1/metrics/snapshot - latest value per metric, with bmi / smiComputed
pub async fn snapshot_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<MetricSnapshotItem>> {
    let snapshot = state.metrics.snapshot(&user.user_id).await?;
    Ok(ApiResponse::success(snapshot))
}
