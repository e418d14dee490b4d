use axum::{
    Json,
    extract::{Path, Query, State},
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

use super::model::{CreateGradeDto, GradeFilterParams, UpdateGradeDto};
use super::service::GradeService;

async fn owned_course(
    state: &AppState,
    auth: &AuthUser,
    course_id: Uuid,
) -> Result<(), AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    require_owner(auth, course.teacher_id)
}

pub async fn list_grades(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
    Query(filters): Query<GradeFilterParams>,
) -> Result<impl IntoResponse, AppError> {
    owned_course(&state, &auth, course_id).await?;

    let grades = GradeService::list_for_course(&state.db, course_id, filters.student_id).await?;
    Ok(Json(grades))
}

pub async fn create_grade(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateGradeDto>,
) -> Result<impl IntoResponse, AppError> {
    owned_course(&state, &auth, course_id).await?;

    let grade = GradeService::create_grade(&state.db, course_id, dto).await?;
    Ok((StatusCode::CREATED, Json(grade)))
}

pub async fn update_grade(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((course_id, grade_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateGradeDto>,
) -> Result<impl IntoResponse, AppError> {
    owned_course(&state, &auth, course_id).await?;

    let grade = GradeService::update_grade(&state.db, course_id, grade_id, dto).await?;
    Ok(Json(grade))
}

pub async fn delete_grade(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((course_id, grade_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    owned_course(&state, &auth, course_id).await?;

    GradeService::delete_grade(&state.db, course_id, grade_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/grades/mine`, student side of the module.
pub async fn list_my_grades(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    require_role(&auth, UserRole::Student)?;

    let grades = GradeService::list_mine(&state.db, auth.user_id()?).await?;
    Ok(Json(grades))
}
