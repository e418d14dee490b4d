use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;

use super::model::{
    CourseEnrollment, Enrollment, EnrollmentStatus, MyEnrollment, ReviewDecision,
};

const ENROLLMENT_COLUMNS: &str =
    "id, student_id, course_id, status, note, reject_reason, created_at, updated_at";

pub struct EnrollmentService;

impl EnrollmentService {
    #[instrument(skip(db))]
    pub async fn find_enrollment(db: &SqlitePool, id: Uuid) -> Result<Enrollment, AppError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        enrollment.ok_or_else(|| AppError::not_found(anyhow::anyhow!("Enrollment not found")))
    }

    /// Creates a pending application. A row for this (student, course) pair
    /// in any status blocks a new one; the unique constraint turns a racing
    /// second insert into the same conflict answer.
    #[instrument(skip(db, note))]
    pub async fn apply(
        db: &SqlitePool,
        student_id: Uuid,
        course_id: Uuid,
        note: Option<String>,
    ) -> Result<Enrollment, AppError> {
        let existing: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM enrollments WHERE student_id = ? AND course_id = ?",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(db)
        .await?;

        if existing.is_some() {
            return Err(AppError::conflict(anyhow::anyhow!(
                "You have already applied to this course"
            )));
        }

        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO enrollments (id, student_id, course_id, status, note, reject_reason, created_at, updated_at)
             VALUES (?, ?, ?, 'pending', ?, NULL, ?, ?)",
        )
        .bind(id)
        .bind(student_id)
        .bind(course_id)
        .bind(&note)
        .bind(now)
        .bind(now)
        .execute(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict(anyhow::anyhow!(
                    "You have already applied to this course"
                ));
            }
            AppError::from(e)
        })?;

        Ok(Enrollment {
            id,
            student_id,
            course_id,
            status: EnrollmentStatus::Pending,
            note,
            reject_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Decides a pending application. The update is conditional on the row
    /// still being pending, so two concurrent decisions cannot both land.
    /// A reject reason is stored only with a rejection.
    #[instrument(skip(db, reject_reason))]
    pub async fn review(
        db: &SqlitePool,
        enrollment: Enrollment,
        decision: ReviewDecision,
        reject_reason: Option<String>,
    ) -> Result<Enrollment, AppError> {
        if enrollment.status != EnrollmentStatus::Pending {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Only pending applications can be reviewed"
            )));
        }

        let (status, reason) = match decision {
            ReviewDecision::Approved => (EnrollmentStatus::Approved, None),
            ReviewDecision::Rejected => (EnrollmentStatus::Rejected, reject_reason),
        };
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE enrollments SET status = ?, reject_reason = ?, updated_at = ?
             WHERE id = ? AND status = 'pending'",
        )
        .bind(status)
        .bind(&reason)
        .bind(now)
        .bind(enrollment.id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Only pending applications can be reviewed"
            )));
        }

        Ok(Enrollment {
            status,
            reject_reason: reason,
            updated_at: now,
            ..enrollment
        })
    }

    /// A student withdraws a pending application. The row is physically
    /// deleted, which also frees the (student, course) pair for a later
    /// re-application.
    #[instrument(skip(db))]
    pub async fn cancel(db: &SqlitePool, enrollment: &Enrollment) -> Result<(), AppError> {
        if enrollment.status != EnrollmentStatus::Pending {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Only pending applications can be cancelled"
            )));
        }

        let result = sqlx::query("DELETE FROM enrollments WHERE id = ? AND status = 'pending'")
            .bind(enrollment.id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Only pending applications can be cancelled"
            )));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn list_mine(
        db: &SqlitePool,
        student_id: Uuid,
        status: Option<EnrollmentStatus>,
    ) -> Result<Vec<MyEnrollment>, AppError> {
        let mut sql = String::from(
            "SELECT e.id, e.course_id, e.status, e.note, e.reject_reason,
                    c.title AS course_title, u.display_name AS teacher_name,
                    e.created_at, e.updated_at
             FROM enrollments e
             INNER JOIN courses c ON c.id = e.course_id
             INNER JOIN users u ON u.id = c.teacher_id
             WHERE e.student_id = ?",
        );
        if status.is_some() {
            sql.push_str(" AND e.status = ?");
        }
        sql.push_str(" ORDER BY e.created_at DESC");

        let mut query = sqlx::query_as::<_, MyEnrollment>(&sql).bind(student_id);
        if let Some(status) = status {
            query = query.bind(status);
        }

        Ok(query.fetch_all(db).await?)
    }

    #[instrument(skip(db))]
    pub async fn list_for_course(
        db: &SqlitePool,
        course_id: Uuid,
        status: Option<EnrollmentStatus>,
    ) -> Result<Vec<CourseEnrollment>, AppError> {
        let mut sql = String::from(
            "SELECT e.id, e.student_id, e.status, e.note, e.reject_reason,
                    u.display_name AS student_name, u.email AS student_email,
                    e.created_at, e.updated_at
             FROM enrollments e
             INNER JOIN users u ON u.id = e.student_id
             WHERE e.course_id = ?",
        );
        if status.is_some() {
            sql.push_str(" AND e.status = ?");
        }
        sql.push_str(" ORDER BY e.created_at DESC");

        let mut query = sqlx::query_as::<_, CourseEnrollment>(&sql).bind(course_id);
        if let Some(status) = status {
            query = query.bind(status);
        }

        Ok(query.fetch_all(db).await?)
    }
}
