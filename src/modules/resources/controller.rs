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

use super::model::{CreateResourceDto, Resource, UpdateResourceDto};
use super::service::ResourceService;

#[instrument(skip(state))]
pub async fn list_resources(
    State(state): State<AppState>,
    MaybeAuthUser(auth_user): MaybeAuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Vec<Resource>>, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    let viewer_id = match &auth_user {
        Some(user) => Some(user.user_id()?),
        None => None,
    };
    CourseService::check_visible(&course, viewer_id)?;

    let resources = ResourceService::list_for_course(&state.db, course.id).await?;
    Ok(Json(resources))
}

#[instrument(skip(state, dto))]
pub async fn create_resource(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateResourceDto>,
) -> Result<(StatusCode, Json<Resource>), AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    require_owner(&auth_user, course.teacher_id)?;

    let resource = ResourceService::create_resource(&state.db, course.id, dto).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

#[instrument(skip(state, dto))]
pub async fn update_resource(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((course_id, resource_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateResourceDto>,
) -> Result<Json<Resource>, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    let resource = ResourceService::find_resource(&state.db, course.id, resource_id).await?;
    require_owner(&auth_user, course.teacher_id)?;

    let resource = ResourceService::update_resource(&state.db, resource, dto).await?;
    Ok(Json(resource))
}

#[instrument(skip(state))]
pub async fn delete_resource(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((course_id, resource_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    let resource = ResourceService::find_resource(&state.db, course.id, resource_id).await?;
    require_owner(&auth_user, course.teacher_id)?;

    ResourceService::delete_resource(&state.db, resource.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
