// handlers/protected/workouts/session.rs - /api/v1/workouts[/:id[/complete]]

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};

use crate::api::format::{WorkoutSessionResponse, WorkoutSessionSummaryResponse};
use crate::api::requests::{ListSessionsQuery, PatchWorkoutRequest, StartWorkoutRequest};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// POST /api/v1/workouts - start a standalone session
pub async fn sessions_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<StartWorkoutRequest>, JsonRejection>,
) -> ApiResult<WorkoutSessionResponse> {
    let Json(request) = body?;
    let session = state.workouts.start_session(&user.user_id, request).await?;
    Ok(ApiResponse::created(session))
}

/// GET /api/v1/workouts?status=&page=&pageSize=
pub async fn sessions_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<ListSessionsQuery>, QueryRejection>,
) -> ApiResult<Vec<WorkoutSessionSummaryResponse>> {
    let Query(query) = query?;
    let page = state
        .workouts
        .list_sessions(&user.user_id, query.status.as_deref(), query.page, query.page_size)
        .await?;
    Ok(ApiResponse::paged(page))
}

/// GET /api/v1/workouts/:id - session with its sets grouped by slot
pub async fn session_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<WorkoutSessionResponse> {
    let session = state.workouts.get_session(&user.user_id, id).await?;
    Ok(ApiResponse::success(session))
}

/// PATCH /api/v1/workouts/:id - rename or re-note
pub async fn session_patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    body: Result<Json<PatchWorkoutRequest>, JsonRejection>,
) -> ApiResult<WorkoutSessionResponse> {
    let Json(request) = body?;
    let session = state.workouts.patch_session(&user.user_id, id, request).await?;
    Ok(ApiResponse::success(session))
}

/// POST /api/v1/workouts/:id/complete - finish the session and flag personal bests
pub async fn session_complete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<WorkoutSessionResponse> {
    let session = state.workouts.complete_session(&user.user_id, id).await?;
    Ok(ApiResponse::success(session))
}

/// DELETE /api/v1/workouts/:id - removes the session and its sets
pub async fn session_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    state.workouts.delete_session(&user.user_id, id).await?;
    Ok(ApiResponse::<()>::no_content())
}
