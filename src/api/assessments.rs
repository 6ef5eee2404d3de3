use std::collections::HashSet;

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentTeacher, CurrentUser};
use crate::api::validation;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{AssessmentQuestion, KeyAnswer};
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::assessment::{
    AllDataResponse, AnswerKeyCreate, AnswerKeyResponse, AssessmentCreate, AssessmentFromBank,
    AssessmentResponse, AssessmentWithKeyResponse,
};
use crate::schemas::submission::SubmissionResponse;

pub(crate) async fn create_assessment(
    CurrentTeacher(_teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<AssessmentCreate>,
) -> Result<(StatusCode, Json<AssessmentResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if payload.question_count <= 0 {
        return Err(ApiError::BadRequest("question_count must be positive".to_string()));
    }

    // The count invariant is enforced here once; assessments are immutable
    // afterwards and never re-validated.
    if payload.questions.len() != payload.question_count as usize {
        return Err(ApiError::BadRequest(format!(
            "Expected {} questions, got {}",
            payload.question_count,
            payload.questions.len()
        )));
    }

    if payload.questions.iter().any(|question| question.number < 1) {
        return Err(ApiError::BadRequest("Question numbers must be 1-based".to_string()));
    }

    let questions = payload
        .questions
        .into_iter()
        .map(|question| AssessmentQuestion {
            number: question.number,
            subject: question.subject,
        })
        .collect();

    let assessment = repositories::assessments::create(
        state.db(),
        repositories::assessments::CreateAssessment {
            id: &Uuid::new_v4().to_string(),
            name: payload.name.trim(),
            question_count: payload.question_count,
            questions,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create assessment"))?;

    tracing::info!(assessment_id = %assessment.id, "Assessment created");

    Ok((StatusCode::CREATED, Json(AssessmentResponse::from_db(assessment))))
}

pub(crate) async fn create_from_bank(
    CurrentTeacher(_teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<AssessmentFromBank>,
) -> Result<(StatusCode, Json<AssessmentWithKeyResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if payload.question_ids.is_empty() {
        return Err(ApiError::BadRequest("question_ids must not be empty".to_string()));
    }

    let found = repositories::question_bank::find_by_ids(state.db(), &payload.question_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve bank questions"))?;

    // Atomic resolution: one missing id fails the whole request.
    let found_ids: HashSet<&str> = found.iter().map(|question| question.id.as_str()).collect();
    let missing: Vec<&str> = payload
        .question_ids
        .iter()
        .map(String::as_str)
        .filter(|id| !found_ids.contains(id))
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::NotFound(format!(
            "Questions not found in bank: {}",
            missing.join(", ")
        )));
    }

    // Numbers are assigned 1..N by position in the requested order; they are
    // local to the assessment, not the bank's identifiers.
    let mut questions = Vec::with_capacity(payload.question_ids.len());
    let mut answers = Vec::with_capacity(payload.question_ids.len());
    for (index, id) in payload.question_ids.iter().enumerate() {
        let bank_question = found
            .iter()
            .find(|question| question.id == *id)
            .ok_or_else(|| ApiError::Internal("Resolved bank question missing".to_string()))?;
        let number = (index + 1) as i32;
        questions.push(AssessmentQuestion {
            number,
            subject: bank_question.subject.clone(),
        });
        answers.push(KeyAnswer {
            question_number: number,
            correct_answer: bank_question.correct_answer.clone(),
        });
    }

    let now = primitive_now_utc();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let assessment = repositories::assessments::create(
        &mut *tx,
        repositories::assessments::CreateAssessment {
            id: &Uuid::new_v4().to_string(),
            name: payload.name.trim(),
            question_count: payload.question_ids.len() as i32,
            questions,
            created_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create assessment"))?;

    // Key and assessment land together so they are never out of step.
    let key = repositories::answer_keys::create(
        &mut *tx,
        repositories::answer_keys::CreateAnswerKey {
            id: &Uuid::new_v4().to_string(),
            assessment_id: &assessment.id,
            answers,
            created_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create answer key"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    tracing::info!(assessment_id = %assessment.id, "Assessment created from bank");

    Ok((
        StatusCode::CREATED,
        Json(AssessmentWithKeyResponse {
            assessment: AssessmentResponse::from_db(assessment),
            answer_key: AnswerKeyResponse::from_db(key),
        }),
    ))
}

pub(crate) async fn save_answer_key(
    CurrentTeacher(_teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<AnswerKeyCreate>,
) -> Result<(StatusCode, Json<AnswerKeyResponse>), ApiError> {
    if payload.answers.is_empty() {
        return Err(ApiError::BadRequest("answers must not be empty".to_string()));
    }

    for answer in &payload.answers {
        if answer.question_number < 1 {
            return Err(ApiError::BadRequest("Question numbers must be 1-based".to_string()));
        }
        if !validation::is_answer_choice(&answer.correct_answer) {
            return Err(ApiError::BadRequest(format!(
                "Invalid correct answer for question {}: {}",
                answer.question_number, answer.correct_answer
            )));
        }
    }

    let assessment = repositories::assessments::find_by_id(state.db(), &payload.assessment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assessment"))?;
    if assessment.is_none() {
        return Err(ApiError::NotFound("Assessment not found".to_string()));
    }

    let answers = payload
        .answers
        .into_iter()
        .map(|answer| KeyAnswer {
            question_number: answer.question_number,
            correct_answer: answer.correct_answer,
        })
        .collect();

    // Appends unconditionally; the newest key becomes authoritative and
    // older ones stay as history.
    let key = repositories::answer_keys::create(
        state.db(),
        repositories::answer_keys::CreateAnswerKey {
            id: &Uuid::new_v4().to_string(),
            assessment_id: &payload.assessment_id,
            answers,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save answer key"))?;

    tracing::info!(assessment_id = %key.assessment_id, key_id = %key.id, "Answer key saved");

    Ok((StatusCode::CREATED, Json(AnswerKeyResponse::from_db(key))))
}

pub(crate) async fn all_data(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<AllDataResponse>, ApiError> {
    let assessment = repositories::assessments::latest(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch latest assessment"))?;

    let Some(assessment) = assessment else {
        return Ok(Json(AllDataResponse {
            assessment: None,
            answer_key: None,
            submissions: Vec::new(),
        }));
    };

    // Students only ever see the assessment shape; the key and other
    // students' submissions are withheld at this boundary.
    if user.role != UserRole::Teacher {
        return Ok(Json(AllDataResponse {
            assessment: Some(AssessmentResponse::from_db(assessment)),
            answer_key: None,
            submissions: Vec::new(),
        }));
    }

    let key = repositories::answer_keys::latest_for_assessment(state.db(), &assessment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch answer key"))?;

    let submissions = repositories::submissions::list_by_assessment(state.db(), &assessment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch submissions"))?;

    Ok(Json(AllDataResponse {
        assessment: Some(AssessmentResponse::from_db(assessment)),
        answer_key: key.map(|key| key.answers.0),
        submissions: submissions.into_iter().map(SubmissionResponse::from_db).collect(),
    }))
}

pub(crate) async fn clear_data(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    repositories::maintenance::clear_assessment_data(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to clear data"))?;

    tracing::warn!(user_id = %teacher.id, "All assessment data cleared");

    Ok(Json(serde_json::json!({ "message": "All assessment data cleared" })))
}
