use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A scheduled lesson belonging to a course. Owned transitively through the
/// course's teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Schedule {
    pub id: Uuid,
    pub course_id: Uuid,
    pub lesson_number: i64,
    pub title: String,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub ends_at: chrono::DateTime<chrono::Utc>,
    pub room: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateScheduleDto {
    #[validate(range(min = 1, message = "Lesson number must be positive"))]
    pub lesson_number: i64,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub ends_at: chrono::DateTime<chrono::Utc>,
    pub room: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateScheduleDto {
    #[validate(range(min = 1, message = "Lesson number must be positive"))]
    pub lesson_number: Option<i64>,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub starts_at: Option<chrono::DateTime<chrono::Utc>>,
    pub ends_at: Option<chrono::DateTime<chrono::Utc>>,
    pub room: Option<String>,
}
