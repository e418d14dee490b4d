use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A teacher's written feedback for one student on one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub course_id: Uuid,
    pub student_id: Uuid,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A concrete follow-up task hanging off a feedback entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FeedbackItem {
    pub id: Uuid,
    pub feedback_id: Uuid,
    pub text: String,
    pub done: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Feedback entry with its action items inlined, as returned by the API.
#[derive(Debug, Serialize)]
pub struct FeedbackWithItems {
    #[serde(flatten)]
    pub feedback: Feedback,
    pub items: Vec<FeedbackItem>,
}

/// Student-facing view: feedback joined with course context.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MyFeedback {
    pub id: Uuid,
    pub course_id: Uuid,
    pub course_title: String,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct MyFeedbackWithItems {
    #[serde(flatten)]
    pub feedback: MyFeedback,
    pub items: Vec<FeedbackItem>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFeedbackDto {
    pub student_id: Uuid,
    #[validate(length(min = 1, message = "Feedback body must not be empty"))]
    pub body: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFeedbackDto {
    #[validate(length(min = 1, message = "Feedback body must not be empty"))]
    pub body: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFeedbackItemDto {
    #[validate(length(min = 1, message = "Item text must not be empty"))]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFeedbackItemDto {
    #[validate(length(min = 1, message = "Item text must not be empty"))]
    pub text: Option<String>,
    pub done: Option<bool>,
}
