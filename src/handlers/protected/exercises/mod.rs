// handlers/protected/exercises - per-exercise history and personal bests

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension,
};

use crate::api::format::WorkoutSetResponse;
use crate::api::requests::PageQuery;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/v1/exercises/:exerciseId/history?page=&pageSize=
pub async fn history_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(exercise_id): Path<i64>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Vec<WorkoutSetResponse>> {
    let Query(query) = query?;
    let page = state
        .workouts
        .exercise_history(&user.user_id, exercise_id, query.page, query.page_size)
        .await?;
    Ok(ApiResponse::paged(page))
}

/// GET /api/v1/exercises/:exerciseId/pbs - best set per rep count
pub async fn pbs_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(exercise_id): Path<i64>,
) -> ApiResult<Vec<WorkoutSetResponse>> {
    let pbs = state.workouts.personal_bests(&user.user_id, exercise_id).await?;
    Ok(ApiResponse::success(pbs))
}
