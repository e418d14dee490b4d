//! Enrollment entity, lifecycle states and DTOs.
//!
//! An enrollment moves from `pending` to exactly one of `approved` or
//! `rejected`. Both are terminal for the row; a student who wants to try
//! again after a cancellation applies with a fresh row.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub status: EnrollmentStatus,
    pub note: Option<String>,
    pub reject_reason: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApplyEnrollmentDto {
    pub course_id: Uuid,
    pub note: Option<String>,
}

/// The only two states a review may set. `pending` or any unknown value in
/// the request body fails deserialization and surfaces as a bad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewEnrollmentDto {
    pub status: ReviewDecision,
    pub reject_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollmentFilterParams {
    pub status: Option<EnrollmentStatus>,
}

/// A student's own enrollment joined with course and teacher context.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MyEnrollment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub status: EnrollmentStatus,
    pub note: Option<String>,
    pub reject_reason: Option<String>,
    pub course_title: String,
    pub teacher_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// An application as the course owner sees it, joined with applicant details.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CourseEnrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub status: EnrollmentStatus,
    pub note: Option<String>,
    pub reject_reason: Option<String>,
    pub student_name: String,
    pub student_email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
