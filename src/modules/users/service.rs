use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;
use crate::utils::password::{hash_password, verify_password};

use super::model::{ChangePasswordDto, UpdateProfileDto, User};

const USER_COLUMNS: &str =
    "id, email, display_name, role, avatar_url, created_at, updated_at";

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_user(db: &SqlitePool, id: Uuid) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        user.ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    /// Partial update: omitted fields keep their current values, so a set
    /// `avatar_url` cannot be cleared back to null through this path.
    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &SqlitePool,
        id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        let current = Self::get_user(db, id).await?;

        let display_name = dto.display_name.unwrap_or(current.display_name);
        let avatar_url = dto.avatar_url.or(current.avatar_url);

        sqlx::query(
            "UPDATE users SET display_name = ?, avatar_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&display_name)
        .bind(&avatar_url)
        .bind(Utc::now())
        .bind(id)
        .execute(db)
        .await?;

        Self::get_user(db, id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &SqlitePool,
        id: Uuid,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let stored: Option<String> = sqlx::query_scalar("SELECT password FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await?;

        let stored = stored.ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        if !verify_password(&dto.current_password, &stored)? {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Current password is incorrect"
            )));
        }

        let hashed = hash_password(&dto.new_password)?;

        sqlx::query("UPDATE users SET password = ?, updated_at = ? WHERE id = ?")
            .bind(&hashed)
            .bind(Utc::now())
            .bind(id)
            .execute(db)
            .await?;

        Ok(())
    }
}
