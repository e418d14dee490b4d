use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;

use super::model::{CreateResourceDto, Resource, UpdateResourceDto};

const RESOURCE_COLUMNS: &str =
    "id, course_id, title, url, description, created_at, updated_at";

pub struct ResourceService;

impl ResourceService {
    #[instrument(skip(db))]
    pub async fn list_for_course(
        db: &SqlitePool,
        course_id: Uuid,
    ) -> Result<Vec<Resource>, AppError> {
        let resources = sqlx::query_as::<_, Resource>(&format!(
            "SELECT {RESOURCE_COLUMNS} FROM resources WHERE course_id = ? ORDER BY created_at DESC"
        ))
        .bind(course_id)
        .fetch_all(db)
        .await?;

        Ok(resources)
    }

    #[instrument(skip(db))]
    pub async fn find_resource(
        db: &SqlitePool,
        course_id: Uuid,
        id: Uuid,
    ) -> Result<Resource, AppError> {
        let resource = sqlx::query_as::<_, Resource>(&format!(
            "SELECT {RESOURCE_COLUMNS} FROM resources WHERE id = ? AND course_id = ?"
        ))
        .bind(id)
        .bind(course_id)
        .fetch_optional(db)
        .await?;

        resource.ok_or_else(|| AppError::not_found(anyhow::anyhow!("Resource not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_resource(
        db: &SqlitePool,
        course_id: Uuid,
        dto: CreateResourceDto,
    ) -> Result<Resource, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO resources (id, course_id, title, url, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(course_id)
        .bind(&dto.title)
        .bind(&dto.url)
        .bind(&dto.description)
        .bind(now)
        .bind(now)
        .execute(db)
        .await?;

        Ok(Resource {
            id,
            course_id,
            title: dto.title,
            url: dto.url,
            description: dto.description,
            created_at: now,
            updated_at: now,
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_resource(
        db: &SqlitePool,
        resource: Resource,
        dto: UpdateResourceDto,
    ) -> Result<Resource, AppError> {
        let title = dto.title.unwrap_or(resource.title);
        let url = dto.url.unwrap_or(resource.url);
        let description = dto.description.or(resource.description);
        let now = Utc::now();

        sqlx::query(
            "UPDATE resources SET title = ?, url = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&title)
        .bind(&url)
        .bind(&description)
        .bind(now)
        .bind(resource.id)
        .execute(db)
        .await?;

        Ok(Resource {
            title,
            url,
            description,
            updated_at: now,
            ..resource
        })
    }

    #[instrument(skip(db))]
    pub async fn delete_resource(db: &SqlitePool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM resources WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Resource not found")));
        }

        Ok(())
    }
}
