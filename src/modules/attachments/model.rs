use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// File metadata attached to a course, optionally pinned to one lesson.
/// The bytes themselves live behind the storage backend; the API only
/// hands out upload and download URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Attachment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub schedule_id: Option<Uuid>,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAttachmentDto {
    #[validate(length(min = 1, message = "File name must not be empty"))]
    pub file_name: String,
    #[validate(length(min = 1, message = "Content type must not be empty"))]
    pub content_type: String,
    #[validate(range(min = 1, message = "File size must be positive"))]
    pub size_bytes: i64,
    pub schedule_id: Option<Uuid>,
}

/// Registration response: the stored metadata plus the URL to PUT bytes to.
#[derive(Debug, Serialize)]
pub struct AttachmentUpload {
    pub attachment: Attachment,
    pub upload_url: String,
}

#[derive(Debug, Serialize)]
pub struct AttachmentDownload {
    pub download_url: String,
}
