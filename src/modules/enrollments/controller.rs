use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::guard::{require_owner, require_role};
use crate::modules::courses::model::CourseStatus;
use crate::modules::courses::service::CourseService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    ApplyEnrollmentDto, CourseEnrollment, Enrollment, EnrollmentFilterParams, MyEnrollment,
    ReviewEnrollmentDto,
};
use super::service::EnrollmentService;

/// A student applies to an active course. Applying twice for the same
/// course conflicts, whatever state the earlier application is in.
#[instrument(skip(state, dto))]
pub async fn apply(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ApplyEnrollmentDto>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    require_role(&auth_user, UserRole::Student)?;

    let course = CourseService::find_course(&state.db, dto.course_id).await?;
    if course.status != CourseStatus::Active {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "This course is not accepting applications"
        )));
    }

    let enrollment =
        EnrollmentService::apply(&state.db, auth_user.user_id()?, course.id, dto.note).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// The owning teacher approves or rejects a pending application. Ownership
/// is transitive through the course the application points at.
#[instrument(skip(state, dto))]
pub async fn review(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(enrollment_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<ReviewEnrollmentDto>,
) -> Result<Json<Enrollment>, AppError> {
    require_role(&auth_user, UserRole::Teacher)?;

    let enrollment = EnrollmentService::find_enrollment(&state.db, enrollment_id).await?;
    let course = CourseService::find_course(&state.db, enrollment.course_id).await?;
    require_owner(&auth_user, course.teacher_id)?;

    let enrollment =
        EnrollmentService::review(&state.db, enrollment, dto.status, dto.reject_reason).await?;
    Ok(Json(enrollment))
}

/// The applying student withdraws a still-pending application.
#[instrument(skip(state))]
pub async fn cancel(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(enrollment_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let enrollment = EnrollmentService::find_enrollment(&state.db, enrollment_id).await?;
    require_owner(&auth_user, enrollment.student_id)?;

    EnrollmentService::cancel(&state.db, &enrollment).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The calling student's own applications.
#[instrument(skip(state))]
pub async fn list_mine(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<EnrollmentFilterParams>,
) -> Result<Json<Vec<MyEnrollment>>, AppError> {
    require_role(&auth_user, UserRole::Student)?;

    let enrollments =
        EnrollmentService::list_mine(&state.db, auth_user.user_id()?, filters.status).await?;
    Ok(Json(enrollments))
}

/// Applications for one course, owner only.
#[instrument(skip(state))]
pub async fn list_for_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<Uuid>,
    Query(filters): Query<EnrollmentFilterParams>,
) -> Result<Json<Vec<CourseEnrollment>>, AppError> {
    let course = CourseService::find_course(&state.db, course_id).await?;
    require_owner(&auth_user, course.teacher_id)?;

    let enrollments =
        EnrollmentService::list_for_course(&state.db, course.id, filters.status).await?;
    Ok(Json(enrollments))
}
