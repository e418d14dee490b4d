use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{ChangePasswordDto, UpdateProfileDto, User};
use super::service::UserService;

/// Current user's profile.
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(&state.db, auth_user.user_id()?).await?;
    Ok(Json(user))
}

#[instrument(skip(state, dto))]
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_profile(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(user))
}

#[instrument(skip(state, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<StatusCode, AppError> {
    UserService::change_password(&state.db, auth_user.user_id()?, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}
