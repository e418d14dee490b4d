use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::guard::{require_owner, require_role};
use crate::modules::courses::service::CourseService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    CreateFeedbackDto, CreateFeedbackItemDto, UpdateFeedbackDto, UpdateFeedbackItemDto,
};
use super::service::FeedbackService;

/// Loads the course and checks the caller owns it, the shared prologue of
/// every feedback mutation.
async fn owned_course(
    state: &AppState,
    auth: &AuthUser,
    course_id: Uuid,
) -> Result<(), AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    require_owner(auth, course.teacher_id)
}

pub async fn list_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    owned_course(&state, &auth, course_id).await?;

    let entries = FeedbackService::list_for_course(&state.db, course_id).await?;
    Ok(Json(entries))
}

pub async fn create_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateFeedbackDto>,
) -> Result<impl IntoResponse, AppError> {
    owned_course(&state, &auth, course_id).await?;

    let feedback = FeedbackService::create_feedback(&state.db, course_id, dto).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

pub async fn update_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((course_id, feedback_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateFeedbackDto>,
) -> Result<impl IntoResponse, AppError> {
    owned_course(&state, &auth, course_id).await?;
    FeedbackService::find_feedback(&state.db, course_id, feedback_id).await?;

    let feedback =
        FeedbackService::update_feedback(&state.db, course_id, feedback_id, dto).await?;
    Ok(Json(feedback))
}

pub async fn delete_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((course_id, feedback_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    owned_course(&state, &auth, course_id).await?;

    FeedbackService::delete_feedback(&state.db, course_id, feedback_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_feedback_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((course_id, feedback_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<CreateFeedbackItemDto>,
) -> Result<impl IntoResponse, AppError> {
    owned_course(&state, &auth, course_id).await?;
    FeedbackService::find_feedback(&state.db, course_id, feedback_id).await?;

    let item = FeedbackService::add_item(&state.db, feedback_id, dto).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_feedback_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((course_id, feedback_id, item_id)): Path<(Uuid, Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateFeedbackItemDto>,
) -> Result<impl IntoResponse, AppError> {
    owned_course(&state, &auth, course_id).await?;
    FeedbackService::find_feedback(&state.db, course_id, feedback_id).await?;

    let item = FeedbackService::update_item(&state.db, feedback_id, item_id, dto).await?;
    Ok(Json(item))
}

pub async fn delete_feedback_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((course_id, feedback_id, item_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    owned_course(&state, &auth, course_id).await?;
    FeedbackService::find_feedback(&state.db, course_id, feedback_id).await?;

    FeedbackService::delete_item(&state.db, feedback_id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/feedback/mine`, student side of the module.
pub async fn list_my_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    require_role(&auth, UserRole::Student)?;

    let entries = FeedbackService::list_mine(&state.db, auth.user_id()?).await?;
    Ok(Json(entries))
}
