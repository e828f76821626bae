// handlers/protected/metrics/insights.rs - GET /api/v1/metrics/insights

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension,
};

use crate::api::requests::InsightsQuery;
use crate::app::AppState;
use crate::insights::MetricInsight;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::types::Gender;

/// Insights over the caller's latest metrics.
///
/// `gender` (male / female, any case) switches body fat and SMI to
/// gender-specific thresholds; anything else uses the blended ones.
pub async fn insights_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<InsightsQuery>, QueryRejection>,
) -> ApiResult<Vec<MetricInsight>> {
    let Query(query) = query?;
    let gender = Gender::from_param(query.gender.as_deref());
    let insights = state.insights.insights(&user.user_id, gender).await?;
    Ok(ApiResponse::success(insights))
}
