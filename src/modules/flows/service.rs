use sqlx::PgPool;
use tracing::instrument;

use crate::utils::errors::AppError;

use super::model::{FlowDefinition, FlowRecord, Step};

/// The canonical catalog seeded by `init_flows`:
/// (flow_key, name, branch, program_type, steps as (key, name, order)).
type SeedStep = (&'static str, &'static str, i32);

const CANONICAL_FLOWS: &[(&str, &str, &str, &str, &[SeedStep])] = &[
    (
        "kinder_regular",
        "Kinder Regular Admission",
        "kinder",
        "regular",
        &[
            ("seminar", "Attend admission seminar", 1),
            ("forms", "Submit admission forms", 2),
            ("entrance_payment", "Pay entrance fee", 3),
            ("consent", "Sign consent documents", 4),
            ("enrollment", "Complete enrollment", 5),
        ],
    ),
    (
        "kinder_transfer",
        "Kinder Transfer Admission",
        "kinder",
        "transfer",
        &[
            ("consultation", "Admission consultation", 1),
            ("forms", "Submit admission forms", 2),
            ("placement", "Class placement", 3),
            ("consent", "Sign consent documents", 4),
            ("enrollment", "Complete enrollment", 5),
        ],
    ),
    (
        "junior",
        "Junior Admission",
        "junior",
        "regular",
        &[
            ("consultation", "Admission consultation", 1),
            ("placement", "Class placement", 2),
            ("tuition_payment", "Pay tuition", 3),
            ("consent", "Sign consent documents", 4),
            ("enrollment", "Complete enrollment", 5),
        ],
    ),
    (
        "middle",
        "Middle Admission",
        "middle",
        "regular",
        &[
            ("exam", "Entrance exam", 1),
            ("placement", "Class placement", 2),
            ("tuition_payment", "Pay tuition", 3),
            ("consent", "Sign consent documents", 4),
            ("enrollment", "Complete enrollment", 5),
        ],
    ),
    (
        "junior_single",
        "Junior Single-Subject Admission",
        "kinder_single",
        "single",
        &[
            ("consultation", "Admission consultation", 1),
            ("placement", "Class placement", 2),
            ("tuition_payment", "Pay tuition", 3),
            ("guides", "Read required guides", 4),
            ("enrollment", "Complete enrollment", 5),
        ],
    ),
];

/// Fetches a flow definition with its steps sorted ascending by order.
#[instrument(skip(db))]
pub async fn get_flow(db: &PgPool, flow_key: &str) -> Result<FlowDefinition, AppError> {
    let flow = sqlx::query_as::<_, FlowRecord>(
        r#"SELECT flow_key, name, branch, program_type, active, created_at
        FROM enrollment_flows WHERE flow_key = $1"#,
    )
    .bind(flow_key)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found("Flow not found"))?;

    let steps = sqlx::query_as::<_, Step>(
        r#"SELECT step_key, name, step_order, required, description
        FROM flow_steps WHERE flow_key = $1
        ORDER BY step_order ASC"#,
    )
    .bind(flow_key)
    .fetch_all(db)
    .await?;

    Ok(FlowDefinition { flow, steps })
}

/// Fetches a flow that must be active, for progress initialization.
#[instrument(skip(db))]
pub async fn get_active_flow(db: &PgPool, flow_key: &str) -> Result<FlowDefinition, AppError> {
    let definition = get_flow(db, flow_key).await?;
    if !definition.flow.active {
        return Err(AppError::not_found("Flow not found"));
    }
    Ok(definition)
}

/// Idempotent bootstrap of the five canonical flows.
///
/// The no-op check is the total catalog count, not per-flow, so a partial
/// catalog is never completed automatically.
#[instrument(skip(db))]
pub async fn init_flows(db: &PgPool) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM enrollment_flows"#)
        .fetch_one(db)
        .await?;

    if count > 0 {
        return Ok(false);
    }

    let mut tx = db.begin().await?;

    for (flow_key, name, branch, program_type, steps) in CANONICAL_FLOWS {
        sqlx::query(
            r#"INSERT INTO enrollment_flows (flow_key, name, branch, program_type)
            VALUES ($1, $2, $3, $4)"#,
        )
        .bind(flow_key)
        .bind(name)
        .bind(branch)
        .bind(program_type)
        .execute(&mut *tx)
        .await?;

        for (step_key, step_name, order) in *steps {
            sqlx::query(
                r#"INSERT INTO flow_steps (flow_key, step_key, name, step_order)
                VALUES ($1, $2, $3, $4)"#,
            )
            .bind(flow_key)
            .bind(step_key)
            .bind(step_name)
            .bind(order)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_five_flows_of_five_steps() {
        assert_eq!(CANONICAL_FLOWS.len(), 5);
        for (_, _, _, _, steps) in CANONICAL_FLOWS {
            assert_eq!(steps.len(), 5);
        }
    }

    #[test]
    fn test_step_orders_strictly_increasing() {
        for (flow_key, _, _, _, steps) in CANONICAL_FLOWS {
            for pair in steps.windows(2) {
                assert!(
                    pair[0].2 < pair[1].2,
                    "step order not increasing in {}",
                    flow_key
                );
            }
        }
    }

    #[test]
    fn test_junior_flow_step_sequence() {
        let (_, _, _, _, steps) = CANONICAL_FLOWS
            .iter()
            .find(|(key, ..)| *key == "junior")
            .unwrap();

        let keys: Vec<&str> = steps.iter().map(|(k, _, _)| *k).collect();
        assert_eq!(
            keys,
            vec![
                "consultation",
                "placement",
                "tuition_payment",
                "consent",
                "enrollment"
            ]
        );
    }
}
