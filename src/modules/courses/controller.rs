use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::guard::{require_owner, require_role};
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{Course, CourseFilterParams, CreateCourseDto, UpdateCourseDto};
use super::service::CourseService;

/// Create a course. Teachers only; the new course starts in draft.
#[instrument(skip(state, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    require_role(&auth_user, UserRole::Teacher)?;

    let course = CourseService::create_course(&state.db, auth_user.user_id()?, dto).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// Browse courses. Anonymous and student callers see active courses only;
/// a teacher sees their own courses in every status.
#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    MaybeAuthUser(auth_user): MaybeAuthUser,
    Query(filters): Query<CourseFilterParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let teacher_id = match &auth_user {
        Some(user) if user.role()? == UserRole::Teacher => Some(user.user_id()?),
        _ => None,
    };

    let courses = CourseService::list_courses(&state.db, teacher_id, filters).await?;
    Ok(Json(courses))
}

#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    MaybeAuthUser(auth_user): MaybeAuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;

    let viewer_id = match &auth_user {
        Some(user) => Some(user.user_id()?),
        None => None,
    };
    CourseService::check_visible(&course, viewer_id)?;

    Ok(Json(course))
}

#[instrument(skip(state, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    require_owner(&auth_user, course.teacher_id)?;

    let course = CourseService::update_course(&state.db, course, dto).await?;
    Ok(Json(course))
}

#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    require_owner(&auth_user, course.teacher_id)?;

    CourseService::delete_course(&state.db, state.storage.as_ref(), course.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
