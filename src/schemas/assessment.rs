use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Assessment, AnswerKey, KeyAnswer};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct QuestionInput {
    pub(crate) number: i32,
    pub(crate) subject: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AssessmentCreate {
    #[validate(length(min = 1, max = 200))]
    pub(crate) name: String,
    #[serde(alias = "questionCount")]
    pub(crate) question_count: i32,
    pub(crate) questions: Vec<QuestionInput>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AssessmentFromBank {
    #[validate(length(min = 1, max = 200))]
    pub(crate) name: String,
    #[serde(alias = "questionIds")]
    pub(crate) question_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct KeyAnswerInput {
    #[serde(alias = "questionNumber")]
    pub(crate) question_number: i32,
    #[serde(alias = "correctAnswer")]
    pub(crate) correct_answer: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerKeyCreate {
    #[serde(alias = "assessmentId")]
    pub(crate) assessment_id: String,
    pub(crate) answers: Vec<KeyAnswerInput>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssessmentResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) question_count: i32,
    pub(crate) questions: Vec<QuestionInput>,
    pub(crate) created_at: String,
}

impl AssessmentResponse {
    pub(crate) fn from_db(assessment: Assessment) -> Self {
        Self {
            id: assessment.id,
            name: assessment.name,
            question_count: assessment.question_count,
            questions: assessment
                .questions
                .0
                .into_iter()
                .map(|question| QuestionInput {
                    number: question.number,
                    subject: question.subject,
                })
                .collect(),
            created_at: format_primitive(assessment.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerKeyResponse {
    pub(crate) id: String,
    pub(crate) assessment_id: String,
    pub(crate) answers: Vec<KeyAnswer>,
    pub(crate) created_at: String,
}

impl AnswerKeyResponse {
    pub(crate) fn from_db(key: AnswerKey) -> Self {
        Self {
            id: key.id,
            assessment_id: key.assessment_id,
            answers: key.answers.0,
            created_at: format_primitive(key.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssessmentWithKeyResponse {
    pub(crate) assessment: AssessmentResponse,
    pub(crate) answer_key: AnswerKeyResponse,
}

/// Dashboard payload. Key and submissions are only populated for teachers;
/// students get the assessment shape alone.
#[derive(Debug, Serialize)]
pub(crate) struct AllDataResponse {
    pub(crate) assessment: Option<AssessmentResponse>,
    pub(crate) answer_key: Option<Vec<KeyAnswer>>,
    pub(crate) submissions: Vec<crate::schemas::submission::SubmissionResponse>,
}
