use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::types::UserRole;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UserCreate {
    #[validate(length(min = 1, max = 200))]
    pub(crate) name: String,
    #[validate(email)]
    pub(crate) email: String,
    pub(crate) password: String,
    /// Free-form on the wire; only exactly "student" or "teacher" is honored.
    #[serde(default)]
    #[serde(alias = "requestedRole")]
    pub(crate) requested_role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserLogin {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoleUpdate {
    pub(crate) role: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) role: UserRole,
    pub(crate) created_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: crate::db::models::User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: format_primitive(user.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn user_create_rejects_bad_email() {
        let payload = UserCreate {
            name: "Maria".to_string(),
            email: "not-an-email".to_string(),
            password: "secret-pass".to_string(),
            requested_role: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn user_create_accepts_camel_case_role_alias() {
        let payload: UserCreate = serde_json::from_value(serde_json::json!({
            "name": "Maria",
            "email": "maria@escola.br",
            "password": "secret-pass",
            "requestedRole": "teacher"
        }))
        .expect("payload");
        assert_eq!(payload.requested_role.as_deref(), Some("teacher"));
    }
}
