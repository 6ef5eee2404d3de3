use crate::api::errors::ApiError;
use crate::db::types::UserRole;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

/// Canonical email form used for storage and uniqueness checks.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn validate_password_len(password: &str) -> Result<(), ApiError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )))
    }
}

/// Only an explicit `student` or `teacher` request is honored at signup;
/// anything else leaves the role unset for a later choice.
pub(crate) fn requested_role(value: Option<&str>) -> UserRole {
    match value {
        Some("student") => UserRole::Student,
        Some("teacher") => UserRole::Teacher,
        _ => UserRole::Unset,
    }
}

pub(crate) fn parse_assignable_role(value: &str) -> Result<UserRole, ApiError> {
    match value {
        "student" => Ok(UserRole::Student),
        "teacher" => Ok(UserRole::Teacher),
        other => Err(ApiError::BadRequest(format!("Invalid role: {other}"))),
    }
}

pub(crate) fn is_answer_choice(value: &str) -> bool {
    matches!(value, "A" | "B" | "C" | "D" | "E")
}

/// Trims and collapses internal whitespace runs to single spaces.
pub(crate) fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Maria@Escola.BR "), "maria@escola.br");
    }

    #[test]
    fn requested_role_accepts_only_known_roles() {
        assert_eq!(requested_role(Some("student")), UserRole::Student);
        assert_eq!(requested_role(Some("teacher")), UserRole::Teacher);
        assert_eq!(requested_role(Some("admin")), UserRole::Unset);
        assert_eq!(requested_role(Some("Teacher")), UserRole::Unset);
        assert_eq!(requested_role(None), UserRole::Unset);
    }

    #[test]
    fn parse_assignable_role_rejects_unset() {
        assert!(parse_assignable_role("student").is_ok());
        assert!(parse_assignable_role("teacher").is_ok());
        assert!(parse_assignable_role("unset").is_err());
        assert!(parse_assignable_role("").is_err());
    }

    #[test]
    fn answer_choices_are_a_through_e() {
        for choice in ["A", "B", "C", "D", "E"] {
            assert!(is_answer_choice(choice));
        }
        assert!(!is_answer_choice("F"));
        assert!(!is_answer_choice("a"));
        assert!(!is_answer_choice(""));
    }

    #[test]
    fn collapse_whitespace_normalizes_runs() {
        assert_eq!(collapse_whitespace("  João   da  Silva "), "João da Silva");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn password_length_boundary() {
        assert!(validate_password_len("12345678").is_ok());
        assert!(validate_password_len("1234567").is_err());
    }
}
