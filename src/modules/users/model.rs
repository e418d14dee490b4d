//! User entity, roles and profile DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Role assigned at registration. Immutable for the lifetime of the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
    Teacher,
    Student,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Teacher => "teacher",
            UserRole::Student => "student",
        }
    }
}

impl FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teacher" => Ok(UserRole::Teacher),
            "student" => Ok(UserRole::Student),
            _ => Err(()),
        }
    }
}

/// A user account. The password hash never leaves the auth service, so it is
/// not part of this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Profile update. Email and role are fixed at registration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, message = "Display name must not be empty"))]
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}
