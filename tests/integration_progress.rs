//! Persistence-level behavior of the progress store and event processor,
//! run against a migrated test database.

use frage_edu::modules::events::model::TriggerEventDto;
use frage_edu::modules::events::service as events_service;
use frage_edu::modules::flows::service as flows_service;
use frage_edu::modules::progress::service as progress_service;
use frage_edu::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

async fn create_test_student(pool: &PgPool, branch: &str, household_token: &str) -> Uuid {
    sqlx::query_scalar(
        r#"INSERT INTO students (name, branch, household_token)
        VALUES ($1, $2, $3)
        RETURNING id"#,
    )
    .bind(format!("Student {}", Uuid::new_v4()))
    .bind(branch)
    .bind(household_token)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_init_progress_seeds_first_step(pool: PgPool) {
    flows_service::init_flows(&pool).await.unwrap();
    let student_id = create_test_student(&pool, "junior", "hh-init-1").await;

    let response = progress_service::init_progress(&pool, student_id, "hh-init-1", "junior")
        .await
        .unwrap();

    assert_eq!(response.student_id, student_id);
    assert_eq!(response.flow_key, "junior");
    assert_eq!(response.current_step, "consultation");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_init_progress_is_already_exists(pool: PgPool) {
    flows_service::init_flows(&pool).await.unwrap();
    let student_id = create_test_student(&pool, "junior", "hh-dup-1").await;

    let first = progress_service::init_progress(&pool, student_id, "hh-dup-1", "junior")
        .await
        .unwrap();

    // Second init for the same student must surface the unique index as
    // AlreadyExists, even with a different flow key.
    let second = progress_service::init_progress(&pool, student_id, "hh-dup-1", "middle").await;
    assert!(matches!(second, Err(AppError::AlreadyExists(_))));

    // And the first record is untouched.
    let progress = progress_service::get_progress(&pool, student_id)
        .await
        .unwrap();
    assert_eq!(progress.id, first.progress_id);
    assert_eq!(progress.flow_key, "junior");
    assert_eq!(progress.current_step, "consultation");
    assert_eq!(progress.version, 0);
    assert!(progress.completed_steps.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_init_progress_unknown_flow_is_not_found(pool: PgPool) {
    flows_service::init_flows(&pool).await.unwrap();
    let student_id = create_test_student(&pool, "junior", "hh-missing-1").await;

    let result = progress_service::init_progress(&pool, student_id, "hh-missing-1", "nope").await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_observational_event_is_logged_but_not_applied(pool: PgPool) {
    flows_service::init_flows(&pool).await.unwrap();
    let student_id = create_test_student(&pool, "junior", "hh-obs-1").await;
    progress_service::init_progress(&pool, student_id, "hh-obs-1", "junior")
        .await
        .unwrap();

    let dto = TriggerEventDto {
        student_id,
        event_type: "parent.viewed_guide".to_string(),
        step_key: "consultation".to_string(),
        event_data: serde_json::json!({}),
    };

    let response = events_service::trigger_event(&pool, dto, "parent:test")
        .await
        .unwrap();

    // The append happens regardless of whether the transition applied.
    assert!(!response.applied);
    let events = events_service::recent_events(&pool, student_id, 10)
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, response.event_id);
    assert_eq!(events[0].event_type, "parent.viewed_guide");

    let progress = progress_service::get_progress(&pool, student_id)
        .await
        .unwrap();
    assert_eq!(progress.version, 0);
    assert!(progress.completed_steps.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_completion_event_advances_persisted_progress(pool: PgPool) {
    flows_service::init_flows(&pool).await.unwrap();
    let student_id = create_test_student(&pool, "junior", "hh-adv-1").await;
    progress_service::init_progress(&pool, student_id, "hh-adv-1", "junior")
        .await
        .unwrap();

    let dto = TriggerEventDto {
        student_id,
        event_type: "consultation.completed".to_string(),
        step_key: "consultation".to_string(),
        event_data: serde_json::json!({"notes": "done"}),
    };

    let response = events_service::trigger_event(&pool, dto, "admin:test")
        .await
        .unwrap();
    assert!(response.applied);

    let progress = progress_service::get_progress(&pool, student_id)
        .await
        .unwrap();
    assert_eq!(progress.current_step, "placement");
    assert_eq!(progress.completed_steps, vec!["consultation"]);
    assert_eq!(progress.version, 1);
    assert_eq!(progress.step_data["consultation"]["notes"], "done");
}
