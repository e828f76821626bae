// handlers/protected/metrics/entries.rs - /api/v1/metrics/entries[/:id]

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};

use crate::api::format::MetricEntryResponse;
use crate::api::requests::{BatchLogMetricRequest, EntriesQuery, UpdateMetricEntryRequest};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// POST /api/v1/metrics/entries - log a batch of measurements
pub async fn entries_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<BatchLogMetricRequest>, JsonRejection>,
) -> ApiResult<Vec<MetricEntryResponse>> {
    let Json(request) = body?;
    let saved = state.metrics.batch_log(&user.user_id, request).await?;
    Ok(ApiResponse::created(saved))
}

/// GET /api/v1/metrics/entries?date=YYYY-MM-DD - entries for one day (default today)
pub async fn entries_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<EntriesQuery>, QueryRejection>,
) -> ApiResult<Vec<MetricEntryResponse>> {
    let Query(query) = query?;
    let entries = state
        .metrics
        .entries_for_date(&user.user_id, query.date.as_deref())
        .await?;
    Ok(ApiResponse::success(entries))
}

/// PUT /api/v1/metrics/entries/:id
pub async fn entry_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    body: Result<Json<UpdateMetricEntryRequest>, JsonRejection>,
) -> ApiResult<MetricEntryResponse> {
    let Json(request) = body?;
    let updated = state.metrics.update_entry(&user.user_id, id, request).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/v1/metrics/entries/:id
pub async fn entry_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    state.metrics.delete_entry(&user.user_id, id).await?;
    Ok(ApiResponse::<()>::no_content())
}
