// handlers/protected/workouts/sets.rs - /api/v1/workouts/:id/sets[/:setId]

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::api::format::WorkoutSetResponse;
use crate::api::requests::{AddSetRequest, UpdateSetRequest};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

pub async fn sets_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(session_id): Path<i64>,
    body: Result<Json<AddSetRequest>, JsonRejection>,
) -> ApiResult<WorkoutSetResponse> {
    let Json(request) = body?;
    let set = state.workouts.add_set(&user.user_id, session_id, request).await?;
    Ok(ApiResponse::created(set))
}

pub async fn set_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((session_id, set_id)): Path<(i64, i64)>,
    body: Result<Json<UpdateSetRequest>, JsonRejection>,
) -> ApiResult<WorkoutSetResponse> {
    let Json(request) = body?;
    let set = state
        .workouts
        .update_set(&user.user_id, session_id, set_id, request)
        .await?;
    Ok(ApiResponse::success(set))
}

pub async fn set_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((session_id, set_id)): Path<(i64, i64)>,
) -> ApiResult<()> {
    state.workouts.delete_set(&user.user_id, session_id, set_id).await?;
    Ok(ApiResponse::<()>::no_content())
}
