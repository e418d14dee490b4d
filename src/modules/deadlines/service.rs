use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;

use super::model::{CreateDeadlineDto, Deadline, UpdateDeadlineDto};

const DEADLINE_COLUMNS: &str =
    "id, course_id, title, description, due_at, created_at, updated_at";

pub struct DeadlineService;

impl DeadlineService {
    #[instrument(skip(db))]
    pub async fn list_for_course(
        db: &SqlitePool,
        course_id: Uuid,
    ) -> Result<Vec<Deadline>, AppError> {
        let deadlines = sqlx::query_as::<_, Deadline>(&format!(
            "SELECT {DEADLINE_COLUMNS} FROM deadlines WHERE course_id = ? ORDER BY due_at"
        ))
        .bind(course_id)
        .fetch_all(db)
        .await?;

        Ok(deadlines)
    }

    #[instrument(skip(db))]
    pub async fn find_deadline(
        db: &SqlitePool,
        course_id: Uuid,
        id: Uuid,
    ) -> Result<Deadline, AppError> {
        let deadline = sqlx::query_as::<_, Deadline>(&format!(
            "SELECT {DEADLINE_COLUMNS} FROM deadlines WHERE id = ? AND course_id = ?"
        ))
        .bind(id)
        .bind(course_id)
        .fetch_optional(db)
        .await?;

        deadline.ok_or_else(|| AppError::not_found(anyhow::anyhow!("Deadline not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_deadline(
        db: &SqlitePool,
        course_id: Uuid,
        dto: CreateDeadlineDto,
    ) -> Result<Deadline, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO deadlines (id, course_id, title, description, due_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(course_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.due_at)
        .bind(now)
        .bind(now)
        .execute(db)
        .await?;

        Ok(Deadline {
            id,
            course_id,
            title: dto.title,
            description: dto.description,
            due_at: dto.due_at,
            created_at: now,
            updated_at: now,
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_deadline(
        db: &SqlitePool,
        deadline: Deadline,
        dto: UpdateDeadlineDto,
    ) -> Result<Deadline, AppError> {
        let title = dto.title.unwrap_or(deadline.title);
        let description = dto.description.or(deadline.description);
        let due_at = dto.due_at.unwrap_or(deadline.due_at);
        let now = Utc::now();

        sqlx::query(
            "UPDATE deadlines SET title = ?, description = ?, due_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&title)
        .bind(&description)
        .bind(due_at)
        .bind(now)
        .bind(deadline.id)
        .execute(db)
        .await?;

        Ok(Deadline {
            title,
            description,
            due_at,
            updated_at: now,
            ..deadline
        })
    }

    #[instrument(skip(db))]
    pub async fn delete_deadline(db: &SqlitePool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM deadlines WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Deadline not found")));
        }

        Ok(())
    }
}
