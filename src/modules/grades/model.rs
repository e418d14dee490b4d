use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// One graded piece of work for a student on a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Grade {
    pub id: Uuid,
    pub course_id: Uuid,
    pub student_id: Uuid,
    pub title: String,
    pub score: f64,
    pub max_score: f64,
    pub comment: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Student-facing view with course context joined in.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MyGrade {
    pub id: Uuid,
    pub course_id: Uuid,
    pub course_title: String,
    pub title: String,
    pub score: f64,
    pub max_score: f64,
    pub comment: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGradeDto {
    pub student_id: Uuid,
    #[validate(length(min = 1, message = "Grade title must not be empty"))]
    pub title: String,
    #[validate(range(min = 0.0, message = "Score must not be negative"))]
    pub score: f64,
    #[validate(range(exclusive_min = 0.0, message = "Maximum score must be positive"))]
    pub max_score: f64,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGradeDto {
    #[validate(length(min = 1, message = "Grade title must not be empty"))]
    pub title: Option<String>,
    #[validate(range(min = 0.0, message = "Score must not be negative"))]
    pub score: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "Maximum score must be positive"))]
    pub max_score: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradeFilterParams {
    pub student_id: Option<Uuid>,
}
