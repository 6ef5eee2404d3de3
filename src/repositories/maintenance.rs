use sqlx::PgPool;

/// Administrative wipe of assessment data. Identities and the question
/// bank are left untouched.
pub(crate) async fn clear_assessment_data(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("TRUNCATE student_submissions, forms, answer_keys, assessments")
        .execute(pool)
        .await?;
    Ok(())
}
