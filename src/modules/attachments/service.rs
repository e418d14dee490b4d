use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;
use crate::utils::storage::FileStorage;

use super::model::{Attachment, AttachmentUpload, CreateAttachmentDto};

const ATTACHMENT_COLUMNS: &str =
    "id, course_id, schedule_id, file_name, content_type, size_bytes, storage_key, created_at";

/// Derive a storage key from the attachment id and the client-supplied file
/// name. Anything the backend would reject is mapped to '-', so the key is
/// always valid regardless of what the client sent.
fn storage_key_for(id: Uuid, file_name: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.').to_string();
    if sanitized.is_empty() {
        id.to_string()
    } else {
        format!("{id}-{sanitized}")
    }
}

pub struct AttachmentService;

impl AttachmentService {
    #[instrument(skip(db))]
    pub async fn find_attachment(
        db: &SqlitePool,
        course_id: Uuid,
        attachment_id: Uuid,
    ) -> Result<Attachment, AppError> {
        sqlx::query_as::<_, Attachment>(&format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM attachments WHERE id = ? AND course_id = ?"
        ))
        .bind(attachment_id)
        .bind(course_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Attachment not found")))
    }

    #[instrument(skip(db))]
    pub async fn list_for_course(
        db: &SqlitePool,
        course_id: Uuid,
    ) -> Result<Vec<Attachment>, AppError> {
        let attachments = sqlx::query_as::<_, Attachment>(&format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM attachments WHERE course_id = ? ORDER BY created_at"
        ))
        .bind(course_id)
        .fetch_all(db)
        .await?;

        Ok(attachments)
    }

    /// Records the metadata row and returns it with a freshly issued upload
    /// URL. When `schedule_id` is set it must name a lesson of this course.
    #[instrument(skip(db, storage, dto))]
    pub async fn create_attachment(
        db: &SqlitePool,
        storage: &dyn FileStorage,
        course_id: Uuid,
        dto: CreateAttachmentDto,
    ) -> Result<AttachmentUpload, AppError> {
        if let Some(schedule_id) = dto.schedule_id {
            let exists: Option<Uuid> = sqlx::query_scalar(
                "SELECT id FROM schedules WHERE id = ? AND course_id = ?",
            )
            .bind(schedule_id)
            .bind(course_id)
            .fetch_optional(db)
            .await?;

            if exists.is_none() {
                return Err(AppError::not_found(anyhow::anyhow!("Schedule not found")));
            }
        }

        let id = Uuid::new_v4();
        let storage_key = storage_key_for(id, &dto.file_name);
        let now = chrono::Utc::now();

        sqlx::query(
            "INSERT INTO attachments (id, course_id, schedule_id, file_name, content_type, size_bytes, storage_key, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(course_id)
        .bind(dto.schedule_id)
        .bind(&dto.file_name)
        .bind(&dto.content_type)
        .bind(dto.size_bytes)
        .bind(&storage_key)
        .bind(now)
        .execute(db)
        .await?;

        let upload_url = storage
            .upload_url(&storage_key)
            .map_err(|e| AppError::internal(anyhow::anyhow!("{}", e)))?;

        Ok(AttachmentUpload {
            attachment: Attachment {
                id,
                course_id,
                schedule_id: dto.schedule_id,
                file_name: dto.file_name,
                content_type: dto.content_type,
                size_bytes: dto.size_bytes,
                storage_key,
                created_at: now,
            },
            upload_url,
        })
    }

    pub fn download_url(
        storage: &dyn FileStorage,
        attachment: &Attachment,
    ) -> Result<String, AppError> {
        storage
            .download_url(&attachment.storage_key)
            .map_err(|e| AppError::internal(anyhow::anyhow!("{}", e)))
    }

    /// Removes the metadata row, then tells the backend to drop the bytes.
    /// A storage failure after the row is gone is logged, not surfaced.
    #[instrument(skip(db, storage))]
    pub async fn delete_attachment(
        db: &SqlitePool,
        storage: &dyn FileStorage,
        course_id: Uuid,
        attachment_id: Uuid,
    ) -> Result<(), AppError> {
        let attachment = Self::find_attachment(db, course_id, attachment_id).await?;

        sqlx::query("DELETE FROM attachments WHERE id = ?")
            .bind(attachment_id)
            .execute(db)
            .await?;

        if let Err(e) = storage.delete(&attachment.storage_key).await {
            tracing::warn!(
                storage_key = %attachment.storage_key,
                error = %e,
                "failed to delete attachment bytes from storage"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_keeps_safe_characters() {
        let id = Uuid::new_v4();
        let key = storage_key_for(id, "notes_week-1.pdf");
        assert_eq!(key, format!("{id}-notes_week-1.pdf"));
    }

    #[test]
    fn storage_key_replaces_path_separators() {
        let id = Uuid::new_v4();
        let key = storage_key_for(id, "../etc/passwd");
        assert!(!key.contains('/'));
        assert!(!key.contains(".."));
        assert!(key.starts_with(&id.to_string()));
    }

    #[test]
    fn storage_key_falls_back_to_id_for_dot_only_names() {
        let id = Uuid::new_v4();
        assert_eq!(storage_key_for(id, "..."), id.to_string());
    }
}
