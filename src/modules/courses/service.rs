use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;
use crate::utils::storage::FileStorage;

use super::model::{Course, CourseFilterParams, CourseStatus, CreateCourseDto, UpdateCourseDto};

const COURSE_COLUMNS: &str =
    "id, teacher_id, title, description, price, category, status, created_at, updated_at";

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db, dto))]
    pub async fn create_course(
        db: &SqlitePool,
        teacher_id: Uuid,
        dto: CreateCourseDto,
    ) -> Result<Course, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO courses (id, teacher_id, title, description, price, category, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, 'draft', ?, ?)",
        )
        .bind(id)
        .bind(teacher_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.price)
        .bind(&dto.category)
        .bind(now)
        .bind(now)
        .execute(db)
        .await?;

        Ok(Course {
            id,
            teacher_id,
            title: dto.title,
            description: dto.description,
            price: dto.price,
            category: dto.category,
            status: CourseStatus::Draft,
            created_at: now,
            updated_at: now,
        })
    }

    /// Loads a course or reports not-found. Existence is always decided
    /// before any ownership or visibility check.
    #[instrument(skip(db))]
    pub async fn find_course(db: &SqlitePool, id: Uuid) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        course.ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    /// Visibility rule shared by every course-scoped read: the owner sees the
    /// course in any status, everyone else only when it is active.
    pub fn check_visible(course: &Course, viewer_id: Option<Uuid>) -> Result<(), AppError> {
        if viewer_id == Some(course.teacher_id) || course.status == CourseStatus::Active {
            return Ok(());
        }

        Err(AppError::forbidden(anyhow::anyhow!(
            "This course is not available"
        )))
    }

    /// Course listing. A teacher sees their own courses in every status and
    /// may filter by status; any other caller sees active courses only and a
    /// supplied status filter is ignored.
    #[instrument(skip(db))]
    pub async fn list_courses(
        db: &SqlitePool,
        teacher_id: Option<Uuid>,
        filters: CourseFilterParams,
    ) -> Result<Vec<Course>, AppError> {
        let courses = if let Some(teacher_id) = teacher_id {
            let mut sql = format!(
                "SELECT {COURSE_COLUMNS} FROM courses WHERE teacher_id = ?"
            );
            if filters.status.is_some() {
                sql.push_str(" AND status = ?");
            }
            if filters.category.is_some() {
                sql.push_str(" AND category = ?");
            }
            sql.push_str(" ORDER BY created_at DESC");

            let mut query = sqlx::query_as::<_, Course>(&sql).bind(teacher_id);
            if let Some(status) = filters.status {
                query = query.bind(status);
            }
            if let Some(category) = &filters.category {
                query = query.bind(category);
            }
            query.fetch_all(db).await?
        } else {
            let mut sql = format!(
                "SELECT {COURSE_COLUMNS} FROM courses WHERE status = 'active'"
            );
            if filters.category.is_some() {
                sql.push_str(" AND category = ?");
            }
            sql.push_str(" ORDER BY created_at DESC");

            let mut query = sqlx::query_as::<_, Course>(&sql);
            if let Some(category) = &filters.category {
                query = query.bind(category);
            }
            query.fetch_all(db).await?
        };

        Ok(courses)
    }

    /// Partial update: omitted fields keep their current values. Optional
    /// fields like `category` cannot be cleared back to null through this
    /// path.
    #[instrument(skip(db, dto))]
    pub async fn update_course(
        db: &SqlitePool,
        course: Course,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let title = dto.title.unwrap_or(course.title);
        let description = dto.description.unwrap_or(course.description);
        let price = dto.price.unwrap_or(course.price);
        let category = dto.category.or(course.category);
        // No transition restrictions: any status is reachable from any other.
        let status = dto.status.unwrap_or(course.status);
        let now = Utc::now();

        sqlx::query(
            "UPDATE courses SET title = ?, description = ?, price = ?, category = ?, status = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&title)
        .bind(&description)
        .bind(price)
        .bind(&category)
        .bind(status)
        .bind(now)
        .bind(course.id)
        .execute(db)
        .await?;

        Ok(Course {
            id: course.id,
            teacher_id: course.teacher_id,
            title,
            description,
            price,
            category,
            status,
            created_at: course.created_at,
            updated_at: now,
        })
    }

    /// Physical delete. Dependent rows are removed in the same transaction;
    /// stored attachment files are cleaned up best-effort afterwards.
    #[instrument(skip(db, storage))]
    pub async fn delete_course(
        db: &SqlitePool,
        storage: &dyn FileStorage,
        id: Uuid,
    ) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        // Keys are read inside the transaction so attachments created
        // concurrently are not orphaned on disk.
        let storage_keys: Vec<String> =
            sqlx::query_scalar("SELECT storage_key FROM attachments WHERE course_id = ?")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query(
            "DELETE FROM feedback_items WHERE feedback_id IN (SELECT id FROM feedback WHERE course_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        for table in [
            "feedback",
            "grades",
            "deadlines",
            "attachments",
            "resources",
            "schedules",
            "enrollments",
        ] {
            sqlx::query(&format!("DELETE FROM {table} WHERE course_id = ?"))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        tx.commit().await?;

        for key in storage_keys {
            if let Err(e) = storage.delete(&key).await {
                tracing::warn!(key = %key, error = %e, "failed to delete stored attachment");
            }
        }

        Ok(())
    }
}
