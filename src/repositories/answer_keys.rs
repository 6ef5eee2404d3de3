use sqlx::postgres::PgExecutor;
use sqlx::types::Json;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{AnswerKey, KeyAnswer};

const COLUMNS: &str = "id, assessment_id, answers, created_at";

pub(crate) struct CreateAnswerKey<'a> {
    pub id: &'a str,
    pub assessment_id: &'a str,
    pub answers: Vec<KeyAnswer>,
    pub created_at: PrimitiveDateTime,
}

/// Always appends; prior keys for the same assessment are kept as history.
pub(crate) async fn create<'e>(
    executor: impl PgExecutor<'e>,
    params: CreateAnswerKey<'_>,
) -> Result<AnswerKey, sqlx::Error> {
    sqlx::query_as::<_, AnswerKey>(&format!(
        "INSERT INTO answer_keys (id, assessment_id, answers, created_at)
         VALUES ($1,$2,$3,$4)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.assessment_id)
    .bind(Json(params.answers))
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

/// The authoritative key: most-recently-created key for the assessment.
pub(crate) async fn latest_for_assessment(
    pool: &PgPool,
    assessment_id: &str,
) -> Result<Option<AnswerKey>, sqlx::Error> {
    sqlx::query_as::<_, AnswerKey>(&format!(
        "SELECT {COLUMNS} FROM answer_keys
         WHERE assessment_id = $1
         ORDER BY created_at DESC, id DESC
         LIMIT 1",
    ))
    .bind(assessment_id)
    .fetch_optional(pool)
    .await
}
