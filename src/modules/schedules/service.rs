use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;

use super::model::{CreateScheduleDto, Schedule, UpdateScheduleDto};

const SCHEDULE_COLUMNS: &str =
    "id, course_id, lesson_number, title, starts_at, ends_at, room, created_at, updated_at";

pub struct ScheduleService;

impl ScheduleService {
    #[instrument(skip(db))]
    pub async fn list_for_course(
        db: &SqlitePool,
        course_id: Uuid,
    ) -> Result<Vec<Schedule>, AppError> {
        let schedules = sqlx::query_as::<_, Schedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE course_id = ? ORDER BY lesson_number"
        ))
        .bind(course_id)
        .fetch_all(db)
        .await?;

        Ok(schedules)
    }

    #[instrument(skip(db))]
    pub async fn find_schedule(
        db: &SqlitePool,
        course_id: Uuid,
        id: Uuid,
    ) -> Result<Schedule, AppError> {
        let schedule = sqlx::query_as::<_, Schedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = ? AND course_id = ?"
        ))
        .bind(id)
        .bind(course_id)
        .fetch_optional(db)
        .await?;

        schedule.ok_or_else(|| AppError::not_found(anyhow::anyhow!("Schedule not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_schedule(
        db: &SqlitePool,
        course_id: Uuid,
        dto: CreateScheduleDto,
    ) -> Result<Schedule, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO schedules (id, course_id, lesson_number, title, starts_at, ends_at, room, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(course_id)
        .bind(dto.lesson_number)
        .bind(&dto.title)
        .bind(dto.starts_at)
        .bind(dto.ends_at)
        .bind(&dto.room)
        .bind(now)
        .bind(now)
        .execute(db)
        .await?;

        Ok(Schedule {
            id,
            course_id,
            lesson_number: dto.lesson_number,
            title: dto.title,
            starts_at: dto.starts_at,
            ends_at: dto.ends_at,
            room: dto.room,
            created_at: now,
            updated_at: now,
        })
    }

    /// Partial update: omitted fields keep their current values, so a set
    /// `room` cannot be cleared back to null through this path.
    #[instrument(skip(db, dto))]
    pub async fn update_schedule(
        db: &SqlitePool,
        schedule: Schedule,
        dto: UpdateScheduleDto,
    ) -> Result<Schedule, AppError> {
        let lesson_number = dto.lesson_number.unwrap_or(schedule.lesson_number);
        let title = dto.title.unwrap_or(schedule.title);
        let starts_at = dto.starts_at.unwrap_or(schedule.starts_at);
        let ends_at = dto.ends_at.unwrap_or(schedule.ends_at);
        let room = dto.room.or(schedule.room);
        let now = Utc::now();

        sqlx::query(
            "UPDATE schedules SET lesson_number = ?, title = ?, starts_at = ?, ends_at = ?, room = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(lesson_number)
        .bind(&title)
        .bind(starts_at)
        .bind(ends_at)
        .bind(&room)
        .bind(now)
        .bind(schedule.id)
        .execute(db)
        .await?;

        Ok(Schedule {
            lesson_number,
            title,
            starts_at,
            ends_at,
            room,
            updated_at: now,
            ..schedule
        })
    }

    #[instrument(skip(db))]
    pub async fn delete_schedule(db: &SqlitePool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Schedule not found")));
        }

        Ok(())
    }
}
