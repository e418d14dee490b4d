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

use super::model::{CreateScheduleDto, Schedule, UpdateScheduleDto};
use super::service::ScheduleService;

#[instrument(skip(state))]
pub async fn list_schedules(
    State(state): State<AppState>,
    MaybeAuthUser(auth_user): MaybeAuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Vec<Schedule>>, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    let viewer_id = match &auth_user {
        Some(user) => Some(user.user_id()?),
        None => None,
    };
    CourseService::check_visible(&course, viewer_id)?;

    let schedules = ScheduleService::list_for_course(&state.db, course.id).await?;
    Ok(Json(schedules))
}

#[instrument(skip(state))]
pub async fn get_schedule(
    State(state): State<AppState>,
    MaybeAuthUser(auth_user): MaybeAuthUser,
    Path((course_id, schedule_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Schedule>, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    let viewer_id = match &auth_user {
        Some(user) => Some(user.user_id()?),
        None => None,
    };
    CourseService::check_visible(&course, viewer_id)?;

    let schedule = ScheduleService::find_schedule(&state.db, course.id, schedule_id).await?;
    Ok(Json(schedule))
}

#[instrument(skip(state, dto))]
pub async fn create_schedule(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateScheduleDto>,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    require_owner(&auth_user, course.teacher_id)?;

    let schedule = ScheduleService::create_schedule(&state.db, course.id, dto).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

#[instrument(skip(state, dto))]
pub async fn update_schedule(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((course_id, schedule_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateScheduleDto>,
) -> Result<Json<Schedule>, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    let schedule = ScheduleService::find_schedule(&state.db, course.id, schedule_id).await?;
    require_owner(&auth_user, course.teacher_id)?;

    let schedule = ScheduleService::update_schedule(&state.db, schedule, dto).await?;
    Ok(Json(schedule))
}

#[instrument(skip(state))]
pub async fn delete_schedule(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((course_id, schedule_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    let schedule = ScheduleService::find_schedule(&state.db, course.id, schedule_id).await?;
    require_owner(&auth_user, course.teacher_id)?;

    ScheduleService::delete_schedule(&state.db, schedule.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
