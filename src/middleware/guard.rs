//! Reusable authorization checks.
//!
//! Every mutating operation funnels through the same two checks: a role gate
//! for the operation class and an exact owner-id comparison for the loaded
//! resource. Callers must load the resource before checking ownership, so a
//! missing resource is reported as not-found rather than forbidden.

use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;

/// Restricts an operation class to one role ("only teachers create courses").
pub fn require_role(auth_user: &AuthUser, required_role: UserRole) -> Result<(), AppError> {
    let user_role = auth_user.role()?;

    if user_role != required_role {
        return Err(AppError::forbidden(anyhow::anyhow!(
            "Access denied. This operation requires the {} role",
            required_role.as_str()
        )));
    }

    Ok(())
}

/// Compares the caller against a loaded resource's owner id. Exact match
/// only; there is no admin override.
pub fn require_owner(auth_user: &AuthUser, owner_id: Uuid) -> Result<(), AppError> {
    if auth_user.user_id()? != owner_id {
        return Err(AppError::forbidden(anyhow::anyhow!(
            "Access denied. You do not own this resource"
        )));
    }

    Ok(())
}
