use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::{User, UserRole};
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::{hash_password, verify_password};

use super::model::{LoginRequest, LoginResponse, RegisterRequestDto};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto))]
    pub async fn register_user(db: &SqlitePool, dto: RegisterRequestDto) -> Result<User, AppError> {
        let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
            .bind(&dto.email)
            .fetch_optional(db)
            .await?;

        if existing.is_some() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Email already exists"
            )));
        }

        let hashed_password = hash_password(&dto.password)?;
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, email, password, display_name, role, avatar_url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, NULL, ?, ?)",
        )
        .bind(id)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(&dto.display_name)
        .bind(dto.role)
        .bind(now)
        .bind(now)
        .execute(db)
        .await?;

        Ok(User {
            id,
            email: dto.email,
            display_name: dto.display_name,
            role: dto.role,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        })
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login_user(
        db: &SqlitePool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: Uuid,
            email: String,
            password: String,
            display_name: String,
            role: UserRole,
            avatar_url: Option<String>,
            created_at: chrono::DateTime<chrono::Utc>,
            updated_at: chrono::DateTime<chrono::Utc>,
        }

        let row = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, email, password, display_name, role, avatar_url, created_at, updated_at
             FROM users WHERE email = ?",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Invalid email or password")))?;

        if !verify_password(&dto.password, &row.password)? {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Invalid email or password"
            )));
        }

        let access_token =
            create_access_token(row.id, &row.email, &row.display_name, row.role, jwt_config)?;

        Ok(LoginResponse {
            access_token,
            user: User {
                id: row.id,
                email: row.email,
                display_name: row.display_name,
                role: row.role,
                avatar_url: row.avatar_url,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        })
    }
}
