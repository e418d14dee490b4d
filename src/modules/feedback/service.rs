use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;

use super::model::{
    CreateFeedbackDto, CreateFeedbackItemDto, Feedback, FeedbackItem, FeedbackWithItems,
    MyFeedback, MyFeedbackWithItems, UpdateFeedbackDto, UpdateFeedbackItemDto,
};

const FEEDBACK_COLUMNS: &str = "id, course_id, student_id, body, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, feedback_id, text, done, created_at";

pub struct FeedbackService;

impl FeedbackService {
    #[instrument(skip(db))]
    pub async fn find_feedback(
        db: &SqlitePool,
        course_id: Uuid,
        feedback_id: Uuid,
    ) -> Result<Feedback, AppError> {
        sqlx::query_as::<_, Feedback>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE id = ? AND course_id = ?"
        ))
        .bind(feedback_id)
        .bind(course_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Feedback not found")))
    }

    async fn load_items(
        db: &SqlitePool,
        feedback_id: Uuid,
    ) -> Result<Vec<FeedbackItem>, AppError> {
        let items = sqlx::query_as::<_, FeedbackItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM feedback_items WHERE feedback_id = ? ORDER BY created_at"
        ))
        .bind(feedback_id)
        .fetch_all(db)
        .await?;

        Ok(items)
    }

    #[instrument(skip(db))]
    pub async fn list_for_course(
        db: &SqlitePool,
        course_id: Uuid,
    ) -> Result<Vec<FeedbackWithItems>, AppError> {
        let entries = sqlx::query_as::<_, Feedback>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE course_id = ? ORDER BY created_at"
        ))
        .bind(course_id)
        .fetch_all(db)
        .await?;

        let mut result = Vec::with_capacity(entries.len());
        for feedback in entries {
            let items = Self::load_items(db, feedback.id).await?;
            result.push(FeedbackWithItems { feedback, items });
        }
        Ok(result)
    }

    /// Feedback is only recorded for students with an approved enrollment
    /// in the course.
    #[instrument(skip(db, dto))]
    pub async fn create_feedback(
        db: &SqlitePool,
        course_id: Uuid,
        dto: CreateFeedbackDto,
    ) -> Result<FeedbackWithItems, AppError> {
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
            "INSERT INTO feedback (id, course_id, student_id, body, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(course_id)
        .bind(dto.student_id)
        .bind(&dto.body)
        .bind(now)
        .bind(now)
        .execute(db)
        .await?;

        Ok(FeedbackWithItems {
            feedback: Feedback {
                id,
                course_id,
                student_id: dto.student_id,
                body: dto.body,
                created_at: now,
                updated_at: now,
            },
            items: Vec::new(),
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_feedback(
        db: &SqlitePool,
        course_id: Uuid,
        feedback_id: Uuid,
        dto: UpdateFeedbackDto,
    ) -> Result<FeedbackWithItems, AppError> {
        let now = chrono::Utc::now();
        let result =
            sqlx::query("UPDATE feedback SET body = ?, updated_at = ? WHERE id = ? AND course_id = ?")
                .bind(&dto.body)
                .bind(now)
                .bind(feedback_id)
                .bind(course_id)
                .execute(db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Feedback not found")));
        }

        let feedback = Self::find_feedback(db, course_id, feedback_id).await?;
        let items = Self::load_items(db, feedback_id).await?;
        Ok(FeedbackWithItems { feedback, items })
    }

    /// Removes the entry and its action items in one transaction.
    #[instrument(skip(db))]
    pub async fn delete_feedback(
        db: &SqlitePool,
        course_id: Uuid,
        feedback_id: Uuid,
    ) -> Result<(), AppError> {
        Self::find_feedback(db, course_id, feedback_id).await?;

        let mut tx = db.begin().await?;
        sqlx::query("DELETE FROM feedback_items WHERE feedback_id = ?")
            .bind(feedback_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM feedback WHERE id = ?")
            .bind(feedback_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(db, dto))]
    pub async fn add_item(
        db: &SqlitePool,
        feedback_id: Uuid,
        dto: CreateFeedbackItemDto,
    ) -> Result<FeedbackItem, AppError> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            "INSERT INTO feedback_items (id, feedback_id, text, done, created_at)
             VALUES (?, ?, ?, 0, ?)",
        )
        .bind(id)
        .bind(feedback_id)
        .bind(&dto.text)
        .bind(now)
        .execute(db)
        .await?;

        Ok(FeedbackItem {
            id,
            feedback_id,
            text: dto.text,
            done: false,
            created_at: now,
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_item(
        db: &SqlitePool,
        feedback_id: Uuid,
        item_id: Uuid,
        dto: UpdateFeedbackItemDto,
    ) -> Result<FeedbackItem, AppError> {
        let item = sqlx::query_as::<_, FeedbackItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM feedback_items WHERE id = ? AND feedback_id = ?"
        ))
        .bind(item_id)
        .bind(feedback_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Feedback item not found")))?;

        let text = dto.text.unwrap_or(item.text);
        let done = dto.done.unwrap_or(item.done);

        sqlx::query("UPDATE feedback_items SET text = ?, done = ? WHERE id = ?")
            .bind(&text)
            .bind(done)
            .bind(item_id)
            .execute(db)
            .await?;

        Ok(FeedbackItem {
            text,
            done,
            ..item
        })
    }

    #[instrument(skip(db))]
    pub async fn delete_item(
        db: &SqlitePool,
        feedback_id: Uuid,
        item_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM feedback_items WHERE id = ? AND feedback_id = ?")
            .bind(item_id)
            .bind(feedback_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Feedback item not found")));
        }
        Ok(())
    }

    /// Everything written about the calling student, newest course first.
    #[instrument(skip(db))]
    pub async fn list_mine(
        db: &SqlitePool,
        student_id: Uuid,
    ) -> Result<Vec<MyFeedbackWithItems>, AppError> {
        let entries = sqlx::query_as::<_, MyFeedback>(
            "SELECT f.id, f.course_id, c.title AS course_title, f.body, f.created_at, f.updated_at
             FROM feedback f
             JOIN courses c ON c.id = f.course_id
             WHERE f.student_id = ?
             ORDER BY f.created_at DESC",
        )
        .bind(student_id)
        .fetch_all(db)
        .await?;

        let mut result = Vec::with_capacity(entries.len());
        for feedback in entries {
            let items = Self::load_items(db, feedback.id).await?;
            result.push(MyFeedbackWithItems { feedback, items });
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::model::UserRole;

    async fn seed_user(db: &SqlitePool, role: UserRole) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO users (id, email, password, display_name, role, created_at, updated_at)
             VALUES (?, ?, 'x', 'Seeded', ?, datetime('now'), datetime('now'))",
        )
        .bind(id)
        .bind(format!("{id}@example.com"))
        .bind(role.as_str())
        .execute(db)
        .await
        .unwrap();
        id
    }

    async fn seed_course(db: &SqlitePool, teacher_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO courses (id, teacher_id, title, status, created_at, updated_at)
             VALUES (?, ?, 'Rust 101', 'active', datetime('now'), datetime('now'))",
        )
        .bind(id)
        .bind(teacher_id)
        .execute(db)
        .await
        .unwrap();
        id
    }

    async fn seed_enrollment(db: &SqlitePool, student_id: Uuid, course_id: Uuid, status: &str) {
        sqlx::query(
            "INSERT INTO enrollments (id, student_id, course_id, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, datetime('now'), datetime('now'))",
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(course_id)
        .bind(status)
        .execute(db)
        .await
        .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn feedback_requires_existing_student(db: SqlitePool) {
        let teacher = seed_user(&db, UserRole::Teacher).await;
        let course = seed_course(&db, teacher).await;

        let err = FeedbackService::create_feedback(
            &db,
            course,
            CreateFeedbackDto {
                student_id: Uuid::new_v4(),
                body: "Good work".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn feedback_requires_approved_enrollment(db: SqlitePool) {
        let teacher = seed_user(&db, UserRole::Teacher).await;
        let student = seed_user(&db, UserRole::Student).await;
        let course = seed_course(&db, teacher).await;

        let dto = || CreateFeedbackDto {
            student_id: student,
            body: "Good work".into(),
        };

        // No application at all.
        let err = FeedbackService::create_feedback(&db, course, dto())
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);

        // A still-pending application is not enough either.
        seed_enrollment(&db, student, course, "pending").await;
        let err = FeedbackService::create_feedback(&db, course, dto())
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);

        sqlx::query("UPDATE enrollments SET status = 'approved' WHERE student_id = ?")
            .bind(student)
            .execute(&db)
            .await
            .unwrap();
        assert!(FeedbackService::create_feedback(&db, course, dto())
            .await
            .is_ok());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn items_toggle_and_survive_partial_updates(db: SqlitePool) {
        let teacher = seed_user(&db, UserRole::Teacher).await;
        let student = seed_user(&db, UserRole::Student).await;
        let course = seed_course(&db, teacher).await;
        seed_enrollment(&db, student, course, "approved").await;

        let feedback = FeedbackService::create_feedback(
            &db,
            course,
            CreateFeedbackDto {
                student_id: student,
                body: "Solid progress this term".into(),
            },
        )
        .await
        .unwrap();

        let item = FeedbackService::add_item(
            &db,
            feedback.feedback.id,
            CreateFeedbackItemDto {
                text: "Revise chapter 4".into(),
            },
        )
        .await
        .unwrap();
        assert!(!item.done);

        let toggled = FeedbackService::update_item(
            &db,
            feedback.feedback.id,
            item.id,
            UpdateFeedbackItemDto {
                text: None,
                done: Some(true),
            },
        )
        .await
        .unwrap();
        assert!(toggled.done);
        assert_eq!(toggled.text, "Revise chapter 4");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn delete_feedback_takes_items_with_it(db: SqlitePool) {
        let teacher = seed_user(&db, UserRole::Teacher).await;
        let student = seed_user(&db, UserRole::Student).await;
        let course = seed_course(&db, teacher).await;
        seed_enrollment(&db, student, course, "approved").await;

        let feedback = FeedbackService::create_feedback(
            &db,
            course,
            CreateFeedbackDto {
                student_id: student,
                body: "See items".into(),
            },
        )
        .await
        .unwrap();
        FeedbackService::add_item(
            &db,
            feedback.feedback.id,
            CreateFeedbackItemDto {
                text: "Practice borrow checker drills".into(),
            },
        )
        .await
        .unwrap();

        FeedbackService::delete_feedback(&db, course, feedback.feedback.id)
            .await
            .unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedback_items")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn list_mine_only_returns_own_feedback(db: SqlitePool) {
        let teacher = seed_user(&db, UserRole::Teacher).await;
        let student = seed_user(&db, UserRole::Student).await;
        let other = seed_user(&db, UserRole::Student).await;
        let course = seed_course(&db, teacher).await;
        seed_enrollment(&db, student, course, "approved").await;
        seed_enrollment(&db, other, course, "approved").await;

        FeedbackService::create_feedback(
            &db,
            course,
            CreateFeedbackDto {
                student_id: student,
                body: "For you".into(),
            },
        )
        .await
        .unwrap();
        FeedbackService::create_feedback(
            &db,
            course,
            CreateFeedbackDto {
                student_id: other,
                body: "For someone else".into(),
            },
        )
        .await
        .unwrap();

        let mine = FeedbackService::list_mine(&db, student).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].feedback.body, "For you");
        assert_eq!(mine[0].feedback.course_title, "Rust 101");
    }
}
