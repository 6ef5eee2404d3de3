use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Form;

const COLUMNS: &str = "id, token, assessment_id, title, description, require_name, created_at";

pub(crate) struct CreateForm<'a> {
    pub id: &'a str,
    pub token: &'a str,
    pub assessment_id: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub require_name: bool,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateForm<'_>) -> Result<Form, sqlx::Error> {
    sqlx::query_as::<_, Form>(&format!(
        "INSERT INTO forms (id, token, assessment_id, title, description, require_name, created_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.token)
    .bind(params.assessment_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.require_name)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_token(
    pool: &PgPool,
    token: &str,
) -> Result<Option<Form>, sqlx::Error> {
    sqlx::query_as::<_, Form>(&format!("SELECT {COLUMNS} FROM forms WHERE token = $1"))
        .bind(token)
        .fetch_optional(pool)
        .await
}
