use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::submission::{SubmissionCreate, SubmissionResponse};
use crate::services::grading::{self, SubmittedAnswer};

pub(crate) async fn create_student_answer(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<SubmissionCreate>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let student_name = validation::collapse_whitespace(&payload.student_name);
    if student_name.is_empty() {
        return Err(ApiError::BadRequest("student_name must not be empty".to_string()));
    }
    if payload.answers.is_empty() {
        return Err(ApiError::BadRequest("answers must not be empty".to_string()));
    }

    for answer in &payload.answers {
        if answer.question_number < 1 {
            return Err(ApiError::BadRequest("Question numbers must be 1-based".to_string()));
        }
        if !answer.answer.is_empty() && !validation::is_answer_choice(&answer.answer) {
            return Err(ApiError::BadRequest(format!(
                "Invalid answer for question {}: {}",
                answer.question_number, answer.answer
            )));
        }
    }

    let assessment = repositories::assessments::find_by_id(state.db(), &payload.assessment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assessment"))?
        .ok_or_else(|| ApiError::NotFound("Assessment not found".to_string()))?;

    // Nothing to grade against means the submission is rejected outright.
    let key = repositories::answer_keys::latest_for_assessment(state.db(), &assessment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch answer key"))?
        .ok_or_else(|| {
            ApiError::BadRequest("Assessment has no answer key yet".to_string())
        })?;

    let subject_by_number: HashMap<i32, &str> = assessment
        .questions
        .0
        .iter()
        .map(|question| (question.number, question.subject.as_str()))
        .collect();

    let submitted: Vec<SubmittedAnswer> = payload
        .answers
        .into_iter()
        .map(|answer| SubmittedAnswer {
            question_number: answer.question_number,
            subject: subject_by_number
                .get(&answer.question_number)
                .map(|subject| subject.to_string())
                .unwrap_or_default(),
            answer: answer.answer,
        })
        .collect();

    let graded = grading::grade(submitted, &key.answers.0);

    let submission = repositories::submissions::create(
        state.db(),
        repositories::submissions::CreateSubmission {
            id: &Uuid::new_v4().to_string(),
            assessment_id: &assessment.id,
            student_name: &student_name,
            identity_id: Some(&user.id),
            answers: graded,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to store submission"))?;

    tracing::info!(
        assessment_id = %submission.assessment_id,
        submission_id = %submission.id,
        identity_id = %user.id,
        "Submission graded and stored"
    );

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from_db(submission))))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use axum::Router;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::api::router::router;
    use crate::test_support;

    async fn signup(app: &Router, name: &str, email: &str, role: &str) -> String {
        let response = app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/auth/signup",
                None,
                Some(json!({
                    "name": name,
                    "email": email,
                    "password": "secret-pass",
                    "requested_role": role
                })),
            ))
            .await
            .expect("signup");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {body}");
        body["access_token"].as_str().expect("token").to_string()
    }

    async fn create_assessment(
        app: &Router,
        token: &str,
        questions: serde_json::Value,
    ) -> String {
        let count = questions.as_array().expect("questions array").len();
        let response = app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/assessments",
                Some(token),
                Some(json!({
                    "name": "Prova 1",
                    "question_count": count,
                    "questions": questions
                })),
            ))
            .await
            .expect("create assessment");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {body}");
        body["id"].as_str().expect("assessment id").to_string()
    }

    async fn save_key(app: &Router, token: &str, assessment_id: &str, answers: serde_json::Value) {
        let response = app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/answer-keys",
                Some(token),
                Some(json!({ "assessment_id": assessment_id, "answers": answers })),
            ))
            .await
            .expect("save key");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {body}");
    }

    #[tokio::test]
    async fn submission_is_graded_against_the_newest_key() {
        let _guard = test_support::env_lock();
        let Some(state) = test_support::setup_db_state().await else { return };
        let app = router(state);

        let teacher_token = signup(&app, "Ana", "ana@escola.br", "teacher").await;
        let assessment_id = create_assessment(
            &app,
            &teacher_token,
            json!([{"number": 1, "subject": "Física"}]),
        )
        .await;

        // Two keys, saved in order; the second one must decide correctness.
        save_key(
            &app,
            &teacher_token,
            &assessment_id,
            json!([{"question_number": 1, "correct_answer": "A"}]),
        )
        .await;
        save_key(
            &app,
            &teacher_token,
            &assessment_id,
            json!([{"question_number": 1, "correct_answer": "B"}]),
        )
        .await;

        let response = app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/student-answers",
                Some(&teacher_token),
                Some(json!({
                    "assessment_id": assessment_id,
                    "student_name": "João",
                    "answers": [{"question_number": 1, "answer": "B"}]
                })),
            ))
            .await
            .expect("submit");

        let status = response.status();
        let submission = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {submission}");
        assert_eq!(submission["answers"][0]["is_correct"], true);
    }

    #[tokio::test]
    async fn create_key_submit_and_review_flow() {
        let _guard = test_support::env_lock();
        let Some(state) = test_support::setup_db_state().await else { return };
        let app = router(state);

        let teacher_token = signup(&app, "Ana", "ana@escola.br", "teacher").await;
        let student_token = signup(&app, "Bruno Lima", "bruno@escola.br", "student").await;

        let assessment_id = create_assessment(
            &app,
            &teacher_token,
            json!([
                {"number": 1, "subject": "Física"},
                {"number": 2, "subject": "Matemática"}
            ]),
        )
        .await;
        save_key(
            &app,
            &teacher_token,
            &assessment_id,
            json!([
                {"question_number": 1, "correct_answer": "A"},
                {"question_number": 2, "correct_answer": "C"}
            ]),
        )
        .await;

        let response = app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/student-answers",
                Some(&student_token),
                Some(json!({
                    "assessment_id": assessment_id,
                    "student_name": "Bruno Lima",
                    "answers": [
                        {"question_number": 1, "answer": "A"},
                        {"question_number": 2, "answer": "B"}
                    ]
                })),
            ))
            .await
            .expect("submit");

        let status = response.status();
        let submission = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {submission}");
        assert_eq!(submission["answers"][0]["is_correct"], true);
        assert_eq!(submission["answers"][1]["is_correct"], false);
        assert_eq!(submission["answers"][1]["subject"], "Matemática");
        assert!(submission["identity_id"].is_string());

        // The student sees the assessment shape only.
        let response = app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                "/all-data",
                Some(&student_token),
                None,
            ))
            .await
            .expect("student all-data");
        let body = test_support::read_json(response).await;
        assert_eq!(body["assessment"]["id"], assessment_id.as_str());
        assert!(body["answer_key"].is_null());
        assert_eq!(body["submissions"].as_array().expect("submissions").len(), 0);

        // The teacher sees the key and the graded submission.
        let response = app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                "/all-data",
                Some(&teacher_token),
                None,
            ))
            .await
            .expect("teacher all-data");
        let body = test_support::read_json(response).await;
        assert_eq!(body["answer_key"].as_array().expect("key").len(), 2);
        let submissions = body["submissions"].as_array().expect("submissions");
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0]["student_name"], "Bruno Lima");
    }
}
