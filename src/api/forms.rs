use std::collections::HashMap;

use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentTeacher;
use crate::api::validation;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::AssessmentQuestion;
use crate::repositories;
use crate::schemas::form::{FormCreate, FormCreated};
use crate::services::form_render;
use crate::services::form_tokens;
use crate::services::grading::{self, SubmittedAnswer};

pub(crate) const ANONYMOUS_STUDENT_NAME: &str = "Anônimo";

/// Public endpoints answer a browser, not an API client: every failure is
/// a terse human-readable page with no internal detail.
pub(crate) struct FormPageError {
    status: StatusCode,
    message: &'static str,
}

impl FormPageError {
    fn link_not_found() -> Self {
        Self { status: StatusCode::NOT_FOUND, message: "Formulário não encontrado." }
    }

    fn assessment_incomplete() -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: "Esta prova ainda não está pronta para receber respostas.",
        }
    }

    fn incomplete_submission() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Responda todas as questões antes de enviar.",
        }
    }

    fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Algo deu errado. Tente novamente mais tarde.",
        }
    }
}

impl IntoResponse for FormPageError {
    fn into_response(self) -> Response {
        let title = if self.status.is_server_error() { "Erro" } else { "Ops" };
        (self.status, Html(form_render::render_message_page(title, self.message)))
            .into_response()
    }
}

pub(crate) async fn create_form(
    CurrentTeacher(_teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<FormCreate>,
) -> Result<(StatusCode, Json<FormCreated>), ApiError> {
    let assessment = repositories::assessments::find_by_id(state.db(), &payload.assessment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assessment"))?
        .ok_or_else(|| ApiError::NotFound("Assessment not found".to_string()))?;

    let token = form_tokens::generate_form_token();
    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(&assessment.name);

    let form = repositories::forms::create(
        state.db(),
        repositories::forms::CreateForm {
            id: &Uuid::new_v4().to_string(),
            token: &token,
            assessment_id: &assessment.id,
            title,
            description: payload.description.as_deref(),
            require_name: payload.require_name,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create form"))?;

    let url = form_tokens::form_url(&state.settings().api().public_base_url, &form.token);

    tracing::info!(assessment_id = %form.assessment_id, form_id = %form.id, "Form link minted");

    Ok((StatusCode::CREATED, Json(FormCreated { id: form.id, token: form.token, url })))
}

pub(crate) async fn show_form(
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> Result<Html<String>, FormPageError> {
    let form = repositories::forms::find_by_token(state.db(), &token)
        .await
        .map_err(|e| FormPageError::internal(e, "Failed to fetch form"))?
        .ok_or_else(FormPageError::link_not_found)?;

    let assessment = repositories::assessments::find_by_id(state.db(), &form.assessment_id)
        .await
        .map_err(|e| FormPageError::internal(e, "Failed to fetch assessment"))?
        .ok_or_else(FormPageError::link_not_found)?;

    // A form is never shown before the assessment can actually be graded.
    let key = repositories::answer_keys::latest_for_assessment(state.db(), &assessment.id)
        .await
        .map_err(|e| FormPageError::internal(e, "Failed to fetch answer key"))?;
    if key.is_none() {
        return Err(FormPageError::assessment_incomplete());
    }

    Ok(Html(form_render::render_form_page(&form, &assessment)))
}

pub(crate) async fn submit_form(
    Path(token): Path<String>,
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Html<String>, FormPageError> {
    let form = repositories::forms::find_by_token(state.db(), &token)
        .await
        .map_err(|e| FormPageError::internal(e, "Failed to fetch form"))?
        .ok_or_else(FormPageError::link_not_found)?;

    let assessment = repositories::assessments::find_by_id(state.db(), &form.assessment_id)
        .await
        .map_err(|e| FormPageError::internal(e, "Failed to fetch assessment"))?
        .ok_or_else(FormPageError::link_not_found)?;

    let key = repositories::answer_keys::latest_for_assessment(state.db(), &assessment.id)
        .await
        .map_err(|e| FormPageError::internal(e, "Failed to fetch answer key"))?
        .ok_or_else(FormPageError::assessment_incomplete)?;

    let submitted = extract_submitted_answers(&fields, &assessment.questions.0);

    // The public flow demands full completion, unlike the authenticated API.
    if submitted.iter().any(|answer| answer.answer.is_empty()) {
        return Err(FormPageError::incomplete_submission());
    }

    let student_name = resolve_student_name(fields.get("student_name").map(String::as_str));
    let graded = grading::grade(submitted, &key.answers.0);

    let submission = repositories::submissions::create(
        state.db(),
        repositories::submissions::CreateSubmission {
            id: &Uuid::new_v4().to_string(),
            assessment_id: &assessment.id,
            student_name: &student_name,
            identity_id: None,
            answers: graded,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| FormPageError::internal(e, "Failed to store submission"))?;

    tracing::info!(
        assessment_id = %submission.assessment_id,
        submission_id = %submission.id,
        "Anonymous submission graded and stored"
    );

    Ok(Html(form_render::render_message_page(
        "Respostas enviadas",
        &format!("Obrigado, {student_name}! Suas respostas foram registradas."),
    )))
}

/// One answer per question, looked up by its `q{number}` field. Missing or
/// out-of-range values normalize to the empty string rather than erroring.
fn extract_submitted_answers(
    fields: &HashMap<String, String>,
    questions: &[AssessmentQuestion],
) -> Vec<SubmittedAnswer> {
    questions
        .iter()
        .map(|question| {
            let raw = fields
                .get(&format!("q{}", question.number))
                .map(|value| value.trim().to_ascii_uppercase())
                .unwrap_or_default();
            let answer = if validation::is_answer_choice(&raw) { raw } else { String::new() };

            SubmittedAnswer {
                question_number: question.number,
                answer,
                subject: question.subject.clone(),
            }
        })
        .collect()
}

fn resolve_student_name(raw: Option<&str>) -> String {
    let collapsed = raw.map(validation::collapse_whitespace).unwrap_or_default();
    if collapsed.is_empty() {
        ANONYMOUS_STUDENT_NAME.to_string()
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(subjects: &[(i32, &str)]) -> Vec<AssessmentQuestion> {
        subjects
            .iter()
            .map(|(number, subject)| AssessmentQuestion {
                number: *number,
                subject: subject.to_string(),
            })
            .collect()
    }

    #[test]
    fn extracts_one_answer_per_question() {
        let mut fields = HashMap::new();
        fields.insert("q1".to_string(), "a".to_string());
        fields.insert("q2".to_string(), " B ".to_string());
        fields.insert("unrelated".to_string(), "C".to_string());

        let extracted =
            extract_submitted_answers(&fields, &questions(&[(1, "Física"), (2, "Física")]));

        assert_eq!(extracted.len(), 2);
        assert_eq!(extracted[0].answer, "A");
        assert_eq!(extracted[1].answer, "B");
        assert_eq!(extracted[0].subject, "Física");
    }

    #[test]
    fn missing_or_out_of_range_answers_become_empty() {
        let mut fields = HashMap::new();
        fields.insert("q1".to_string(), "F".to_string());

        let extracted =
            extract_submitted_answers(&fields, &questions(&[(1, "Física"), (2, "Química")]));

        assert_eq!(extracted[0].answer, "");
        assert_eq!(extracted[1].answer, "");
    }

    #[test]
    fn student_name_defaults_to_anonymous() {
        assert_eq!(resolve_student_name(None), ANONYMOUS_STUDENT_NAME);
        assert_eq!(resolve_student_name(Some("   ")), ANONYMOUS_STUDENT_NAME);
        assert_eq!(resolve_student_name(Some(" João  da Silva ")), "João da Silva");
    }
}
