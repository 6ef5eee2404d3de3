use sqlx::types::Json;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{GradedAnswer, StudentSubmission};

const COLUMNS: &str = "id, assessment_id, student_name, identity_id, answers, created_at";

pub(crate) struct CreateSubmission<'a> {
    pub id: &'a str,
    pub assessment_id: &'a str,
    pub student_name: &'a str,
    pub identity_id: Option<&'a str>,
    pub answers: Vec<GradedAnswer>,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateSubmission<'_>,
) -> Result<StudentSubmission, sqlx::Error> {
    sqlx::query_as::<_, StudentSubmission>(&format!(
        "INSERT INTO student_submissions
            (id, assessment_id, student_name, identity_id, answers, created_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.assessment_id)
    .bind(params.student_name)
    .bind(params.identity_id)
    .bind(Json(params.answers))
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_by_assessment(
    pool: &PgPool,
    assessment_id: &str,
) -> Result<Vec<StudentSubmission>, sqlx::Error> {
    sqlx::query_as::<_, StudentSubmission>(&format!(
        "SELECT {COLUMNS} FROM student_submissions
         WHERE assessment_id = $1
         ORDER BY created_at DESC",
    ))
    .bind(assessment_id)
    .fetch_all(pool)
    .await
}
