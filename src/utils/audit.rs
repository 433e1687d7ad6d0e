use sqlx::PgPool;
use tracing::warn;

/// Writes an audit log entry.
///
/// Audit writes are best-effort: a failed insert is logged and swallowed so
/// that the primary operation is never rolled back on account of auditing.
pub async fn record(
    db: &PgPool,
    actor: &str,
    action: &str,
    target: Option<&str>,
    details: Option<serde_json::Value>,
) {
    let result = sqlx::query(
        r#"INSERT INTO audit_logs (actor, action, target, details)
        VALUES ($1, $2, $3, $4)"#,
    )
    .bind(actor)
    .bind(action)
    .bind(target)
    .bind(details)
    .execute(db)
    .await;

    if let Err(e) = result {
        warn!(actor = %actor, action = %action, error = %e, "Failed to write audit log entry");
    }
}
