use sqlx::postgres::PgExecutor;
use sqlx::types::Json;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{Assessment, AssessmentQuestion};

const COLUMNS: &str = "id, name, question_count, questions, created_at";

pub(crate) struct CreateAssessment<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub question_count: i32,
    pub questions: Vec<AssessmentQuestion>,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn create<'e>(
    executor: impl PgExecutor<'e>,
    params: CreateAssessment<'_>,
) -> Result<Assessment, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "INSERT INTO assessments (id, name, question_count, questions, created_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.name)
    .bind(params.question_count)
    .bind(Json(params.questions))
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!("SELECT {COLUMNS} FROM assessments WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// The assessment with the greatest creation time, if any exist. Id breaks
/// ties so equal timestamps still resolve deterministically.
pub(crate) async fn latest(pool: &PgPool) -> Result<Option<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {COLUMNS} FROM assessments ORDER BY created_at DESC, id DESC LIMIT 1",
    ))
    .fetch_optional(pool)
    .await
}
