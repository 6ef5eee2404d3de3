use sqlx::PgPool;

/// The slice of a bank record the catalog consumes when assembling an
/// assessment from bank ids.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct BankQuestionRef {
    pub(crate) id: String,
    pub(crate) correct_answer: String,
    pub(crate) subject: String,
}

pub(crate) async fn find_by_ids(
    pool: &PgPool,
    ids: &[String],
) -> Result<Vec<BankQuestionRef>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, BankQuestionRef>(
        "SELECT id, correct_answer, subject FROM bank_questions WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
}
