use axum::{extract::State, Json};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::user::{RoleUpdate, UserResponse};

/// Assigns `student` or `teacher` to the caller. There is no transition
/// back to unset, and unknown roles are rejected outright.
pub(crate) async fn set_role(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<RoleUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    let role = validation::parse_assignable_role(&payload.role)?;

    let updated = repositories::users::set_role(state.db(), &user.id, role, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update role"))?;

    tracing::info!(user_id = %updated.id, role = %updated.role.as_str(), "Role assigned");

    Ok(Json(UserResponse::from_db(updated)))
}
