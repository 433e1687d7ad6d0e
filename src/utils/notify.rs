use sqlx::PgPool;
use tracing::warn;

/// Enqueues an outbound notification for the household.
///
/// Fire-and-forget: the insert runs on a spawned task and a failure to
/// enqueue must never fail the operation that triggered it. The outbox is
/// drained by an external SMS/talk dispatcher.
pub fn enqueue(db: PgPool, household_token: String, message: String) {
    tokio::spawn(async move {
        let result = sqlx::query(
            r#"INSERT INTO notification_outbox (household_token, message)
            VALUES ($1, $2)"#,
        )
        .bind(&household_token)
        .bind(&message)
        .execute(&db)
        .await;

        if let Err(e) = result {
            warn!(household = %household_token, error = %e, "Failed to enqueue notification");
        }
    });
}
