use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::guard::require_owner;
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{AttachmentDownload, CreateAttachmentDto};
use super::service::AttachmentService;

pub async fn list_attachments(
    State(state): State<AppState>,
    MaybeAuthUser(auth): MaybeAuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    let viewer_id = match &auth {
        Some(user) => Some(user.user_id()?),
        None => None,
    };
    CourseService::check_visible(&course, viewer_id)?;

    let attachments = AttachmentService::list_for_course(&state.db, course_id).await?;
    Ok(Json(attachments))
}

pub async fn create_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateAttachmentDto>,
) -> Result<impl IntoResponse, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    require_owner(&auth, course.teacher_id)?;

    let upload =
        AttachmentService::create_attachment(&state.db, state.storage.as_ref(), course_id, dto)
            .await?;
    Ok((StatusCode::CREATED, Json(upload)))
}

pub async fn download_attachment(
    State(state): State<AppState>,
    MaybeAuthUser(auth): MaybeAuthUser,
    Path((course_id, attachment_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    let viewer_id = match &auth {
        Some(user) => Some(user.user_id()?),
        None => None,
    };
    CourseService::check_visible(&course, viewer_id)?;

    let attachment = AttachmentService::find_attachment(&state.db, course_id, attachment_id).await?;
    let download_url = AttachmentService::download_url(state.storage.as_ref(), &attachment)?;
    Ok(Json(AttachmentDownload { download_url }))
}

pub async fn delete_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((course_id, attachment_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    require_owner(&auth, course.teacher_id)?;

    AttachmentService::delete_attachment(
        &state.db,
        state.storage.as_ref(),
        course_id,
        attachment_id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
