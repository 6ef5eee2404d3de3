use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::{GradedAnswer, StudentSubmission};

/// Incoming answer item. Correctness is intentionally not part of this
/// shape: whatever a client claims is discarded at deserialization.
#[derive(Debug, Deserialize)]
pub(crate) struct SubmittedAnswerInput {
    #[serde(alias = "questionNumber")]
    pub(crate) question_number: i32,
    #[serde(default)]
    pub(crate) answer: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionCreate {
    #[serde(alias = "assessmentId")]
    pub(crate) assessment_id: String,
    #[serde(alias = "studentName")]
    pub(crate) student_name: String,
    pub(crate) answers: Vec<SubmittedAnswerInput>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: String,
    pub(crate) assessment_id: String,
    pub(crate) student_name: String,
    pub(crate) identity_id: Option<String>,
    pub(crate) answers: Vec<GradedAnswer>,
    pub(crate) created_at: String,
}

impl SubmissionResponse {
    pub(crate) fn from_db(submission: StudentSubmission) -> Self {
        Self {
            id: submission.id,
            assessment_id: submission.assessment_id,
            student_name: submission.student_name,
            identity_id: submission.identity_id,
            answers: submission.answers.0,
            created_at: format_primitive(submission.created_at),
        }
    }
}
