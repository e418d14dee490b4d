use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// An assignment or exam deadline published for a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Deadline {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDeadlineDto {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    pub description: Option<String>,
    pub due_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDeadlineDto {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
}
