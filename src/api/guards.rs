use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::{security, state::AppState};
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;

pub(crate) struct CurrentUser(pub(crate) User);
pub(crate) struct CurrentTeacher(pub(crate) User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))?;

        // Role is re-read from storage on every request so a role change
        // takes effect without reissuing the token.
        let user = repositories::users::find_by_id(app_state.db(), &claims.sub)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load user"))?;

        let Some(user) = user else {
            return Err(ApiError::Unauthorized("User not found"));
        };

        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentTeacher {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        require_role(&user, &[UserRole::Teacher])?;
        Ok(CurrentTeacher(user))
    }
}

/// `Unset` gets its own message so clients can prompt a role choice instead
/// of showing a generic permission error.
pub(crate) fn require_role(user: &User, allowed: &[UserRole]) -> Result<(), ApiError> {
    if user.role == UserRole::Unset {
        return Err(ApiError::Forbidden("Choose a role before performing this action"));
    }

    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Not enough permissions"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;

    fn user_with_role(role: UserRole) -> User {
        let now = primitive_now_utc();
        User {
            id: "u-1".to_string(),
            name: "Maria".to_string(),
            email: "maria@escola.br".to_string(),
            hashed_password: "x".to_string(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn teacher_passes_teacher_check() {
        let user = user_with_role(UserRole::Teacher);
        assert!(require_role(&user, &[UserRole::Teacher]).is_ok());
    }

    #[test]
    fn student_is_forbidden_from_teacher_actions() {
        let user = user_with_role(UserRole::Student);
        let err = require_role(&user, &[UserRole::Teacher]).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(message) if message == "Not enough permissions"));
    }

    #[test]
    fn unset_role_gets_a_distinct_message() {
        let user = user_with_role(UserRole::Unset);
        let err = require_role(&user, &[UserRole::Teacher, UserRole::Student]).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(message) if message.contains("Choose a role")));
    }
}
