use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::guard::require_owner;
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{CreateDeadlineDto, Deadline, UpdateDeadlineDto};
use super::service::DeadlineService;

#[instrument(skip(state))]
pub async fn list_deadlines(
    State(state): State<AppState>,
    MaybeAuthUser(auth_user): MaybeAuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Vec<Deadline>>, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    let viewer_id = match &auth_user {
        Some(user) => Some(user.user_id()?),
        None => None,
    };
    CourseService::check_visible(&course, viewer_id)?;

    let deadlines = DeadlineService::list_for_course(&state.db, course.id).await?;
    Ok(Json(deadlines))
}

#[instrument(skip(state, dto))]
pub async fn create_deadline(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateDeadlineDto>,
) -> Result<(StatusCode, Json<Deadline>), AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    require_owner(&auth_user, course.teacher_id)?;

    let deadline = DeadlineService::create_deadline(&state.db, course.id, dto).await?;
    Ok((StatusCode::CREATED, Json(deadline)))
}

#[instrument(skip(state, dto))]
pub async fn update_deadline(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((course_id, deadline_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateDeadlineDto>,
) -> Result<Json<Deadline>, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    let deadline = DeadlineService::find_deadline(&state.db, course.id, deadline_id).await?;
    require_owner(&auth_user, course.teacher_id)?;

    let deadline = DeadlineService::update_deadline(&state.db, deadline, dto).await?;
    Ok(Json(deadline))
}

#[instrument(skip(state))]
pub async fn delete_deadline(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((course_id, deadline_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    let deadline = DeadlineService::find_deadline(&state.db, course.id, deadline_id).await?;
    require_owner(&auth_user, course.teacher_id)?;

    DeadlineService::delete_deadline(&state.db, deadline.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
