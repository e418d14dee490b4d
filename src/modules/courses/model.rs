//! Course entity, status and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Publication status. Any status may be set from any other status; the
/// value only governs visibility to non-owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CourseStatus {
    Draft,
    Active,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: Option<String>,
    pub status: CourseStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub status: Option<CourseStatus>,
}

/// Query parameters for course listing. The status filter only takes effect
/// for a teacher listing their own courses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseFilterParams {
    pub status: Option<CourseStatus>,
    pub category: Option<String>,
}
