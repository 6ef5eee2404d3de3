use serde::{Deserialize, Serialize};
use sqlx::Type;

/// Role is a three-way variant, not a nullable field: a fresh signup may
/// defer the choice, and every authorization check matches on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "userrole", rename_all = "lowercase")]
pub(crate) enum UserRole {
    Unset,
    Student,
    Teacher,
}

impl UserRole {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }
}
