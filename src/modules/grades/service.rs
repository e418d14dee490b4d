use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;

use super::model::{CreateGradeDto, Grade, MyGrade, UpdateGradeDto};

const GRADE_COLUMNS: &str =
    "id, course_id, student_id, title, score, max_score, comment, created_at, updated_at";

pub struct GradeService;

impl GradeService {
    #[instrument(skip(db))]
    pub async fn find_grade(
        db: &SqlitePool,
        course_id: Uuid,
        grade_id: Uuid,
    ) -> Result<Grade, AppError> {
        sqlx::query_as::<_, Grade>(&format!(
            "SELECT {GRADE_COLUMNS} FROM grades WHERE id = ? AND course_id = ?"
        ))
        .bind(grade_id)
        .bind(course_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Grade not found")))
    }

    #[instrument(skip(db))]
    pub async fn list_for_course(
        db: &SqlitePool,
        course_id: Uuid,
        student_id: Option<Uuid>,
    ) -> Result<Vec<Grade>, AppError> {
        let grades = match student_id {
            Some(student_id) => {
                sqlx::query_as::<_, Grade>(&format!(
                    "SELECT {GRADE_COLUMNS} FROM grades
                     WHERE course_id = ? AND student_id = ?
                     ORDER BY created_at"
                ))
                .bind(course_id)
                .bind(student_id)
                .fetch_all(db)
                .await?
            }
            None => {
                sqlx::query_as::<_, Grade>(&format!(
                    "SELECT {GRADE_COLUMNS} FROM grades WHERE course_id = ? ORDER BY created_at"
                ))
                .bind(course_id)
                .fetch_all(db)
                .await?
            }
        };

        Ok(grades)
    }

    /// Scores above the maximum are rejected up front, not clamped. Grades
    /// are only recorded for students with an approved enrollment.
    #[instrument(skip(db, dto))]
    pub async fn create_grade(
        db: &SqlitePool,
        course_id: Uuid,
        dto: CreateGradeDto,
    ) -> Result<Grade, AppError> {
        if dto.score > dto.max_score {
            return Err(AppError::bad_request(anyhow::anyhow!("Score cannot exceed the maximum score")));
        }

        let student: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = ? AND role = 'student'")
                .bind(dto.student_id)
                .fetch_optional(db)
                .await?;
        if student.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        let enrolled: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM enrollments
             WHERE student_id = ? AND course_id = ? AND status = 'approved'",
        )
        .bind(dto.student_id)
        .bind(course_id)
        .fetch_optional(db)
        .await?;
        if enrolled.is_none() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Student is not enrolled in this course"
            )));
        }

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            "INSERT INTO grades (id, course_id, student_id, title, score, max_score, comment, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(course_id)
        .bind(dto.student_id)
        .bind(&dto.title)
        .bind(dto.score)
        .bind(dto.max_score)
        .bind(&dto.comment)
        .bind(now)
        .bind(now)
        .execute(db)
        .await?;

        Ok(Grade {
            id,
            course_id,
            student_id: dto.student_id,
            title: dto.title,
            score: dto.score,
            max_score: dto.max_score,
            comment: dto.comment,
            created_at: now,
            updated_at: now,
        })
    }

    /// Partial update: omitted fields keep their current values, so a set
    /// `comment` cannot be cleared back to null through this path.
    #[instrument(skip(db, dto))]
    pub async fn update_grade(
        db: &SqlitePool,
        course_id: Uuid,
        grade_id: Uuid,
        dto: UpdateGradeDto,
    ) -> Result<Grade, AppError> {
        let grade = Self::find_grade(db, course_id, grade_id).await?;

        let title = dto.title.unwrap_or(grade.title);
        let score = dto.score.unwrap_or(grade.score);
        let max_score = dto.max_score.unwrap_or(grade.max_score);
        let comment = dto.comment.or(grade.comment);

        if score > max_score {
            return Err(AppError::bad_request(anyhow::anyhow!("Score cannot exceed the maximum score")));
        }

        let now = chrono::Utc::now();
        sqlx::query(
            "UPDATE grades SET title = ?, score = ?, max_score = ?, comment = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&title)
        .bind(score)
        .bind(max_score)
        .bind(&comment)
        .bind(now)
        .bind(grade_id)
        .execute(db)
        .await?;

        Ok(Grade {
            title,
            score,
            max_score,
            comment,
            updated_at: now,
            ..grade
        })
    }

    #[instrument(skip(db))]
    pub async fn delete_grade(
        db: &SqlitePool,
        course_id: Uuid,
        grade_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM grades WHERE id = ? AND course_id = ?")
            .bind(grade_id)
            .bind(course_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Grade not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn list_mine(db: &SqlitePool, student_id: Uuid) -> Result<Vec<MyGrade>, AppError> {
        let grades = sqlx::query_as::<_, MyGrade>(
            "SELECT g.id, g.course_id, c.title AS course_title, g.title, g.score, g.max_score,
                    g.comment, g.created_at
             FROM grades g
             JOIN courses c ON c.id = g.course_id
             WHERE g.student_id = ?
             ORDER BY g.created_at DESC",
        )
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(grades)
    }
}
