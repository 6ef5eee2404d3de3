use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// One numbered slot of an assessment. Numbers are 1-based and local to
/// the assessment, independent of any question-bank identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AssessmentQuestion {
    pub(crate) number: i32,
    pub(crate) subject: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Assessment {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) question_count: i32,
    pub(crate) questions: Json<Vec<AssessmentQuestion>>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct KeyAnswer {
    pub(crate) question_number: i32,
    pub(crate) correct_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct AnswerKey {
    pub(crate) id: String,
    pub(crate) assessment_id: String,
    pub(crate) answers: Json<Vec<KeyAnswer>>,
    pub(crate) created_at: PrimitiveDateTime,
}

/// A graded item. `is_correct` is always derived server-side against the
/// authoritative key; it never comes from a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct GradedAnswer {
    pub(crate) question_number: i32,
    pub(crate) answer: String,
    pub(crate) is_correct: bool,
    pub(crate) subject: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct StudentSubmission {
    pub(crate) id: String,
    pub(crate) assessment_id: String,
    pub(crate) student_name: String,
    pub(crate) identity_id: Option<String>,
    pub(crate) answers: Json<Vec<GradedAnswer>>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Form {
    pub(crate) id: String,
    pub(crate) token: String,
    pub(crate) assessment_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) require_name: bool,
    pub(crate) created_at: PrimitiveDateTime,
}
