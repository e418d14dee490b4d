use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A link shared with a course (reading material, slides, external tools).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Resource {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateResourceDto {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(url(message = "URL must be valid"))]
    pub url: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateResourceDto {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(url(message = "URL must be valid"))]
    pub url: Option<String>,
    pub description: Option<String>,
}
