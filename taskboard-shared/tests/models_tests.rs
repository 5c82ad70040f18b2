/// Integration tests for the user and task models
///
/// These tests require a running PostgreSQL database.
/// Run with: cargo test --test models_tests
///
/// Each test creates its own users, so tests can share one database.

use taskboard_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
use taskboard_shared::db::schema::initialize_schema;
use taskboard_shared::models::task::{Task, TaskInput, TaskStatus};
use taskboard_shared::models::user::{CreateUser, User};
use taskboard_shared::StoreError;
use sqlx::PgPool;
use std::env;

fn test_database_config() -> DatabaseConfig {
    DatabaseConfig {
        host: env::var("DATABASE_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: env::var("DATABASE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5432),
        database: env::var("DATABASE_NAME").unwrap_or_else(|_| "taskboard_test".to_string()),
        username: env::var("DATABASE_USER").unwrap_or_else(|_| "postgres".to_string()),
        password: env::var("DATABASE_PASSWORD").unwrap_or_else(|_| "postgres".to_string()),
        ..Default::default()
    }
}

async fn setup() -> PgPool {
    let pool = create_pool(&test_database_config())
        .await
        .expect("Failed to create pool");
    initialize_schema(&pool).await.expect("Schema initialization failed");
    pool
}

fn input(title: &str, user_id: i32) -> TaskInput {
    TaskInput {
        title: title.to_string(),
        description: None,
        status: TaskStatus::default(),
        user_id,
    }
}

#[tokio::test]
async fn test_create_task_defaults() {
    let pool = setup().await;
    let ana = User::create(&pool, CreateUser { name: "Ana".to_string() }).await.unwrap();

    let task = Task::create(&pool, &input("Write report", ana.user_id)).await.unwrap();

    assert_eq!(task.title, "Write report");
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.description, None);
    assert_eq!(task.user_id, ana.user_id);

    let listed = Task::list(&pool, Some(ana.user_id)).await.unwrap();
    assert_eq!(listed, vec![task]);

    User::delete(&pool, ana.user_id).await.unwrap();
    close_pool(pool).await;
}

#[tokio::test]
async fn test_task_ids_increase() {
    let pool = setup().await;
    let user = User::create(&pool, CreateUser { name: "Sequencer".to_string() }).await.unwrap();

    let mut last_id = 0;
    for i in 0..5 {
        let task = Task::create(&pool, &input(&format!("step {}", i), user.user_id))
            .await
            .unwrap();
        assert!(task.id > last_id, "ids must increase: {} after {}", task.id, last_id);
        last_id = task.id;
    }

    User::delete(&pool, user.user_id).await.unwrap();
    close_pool(pool).await;
}

#[tokio::test]
async fn test_create_task_for_missing_user() {
    let pool = setup().await;

    let mut tx = pool.begin().await.unwrap();
    let result = Task::create(&mut *tx, &input("Orphan", i32::MAX)).await;
    drop(tx);

    assert!(
        matches!(result, Err(StoreError::ForeignKeyViolation { ref constraint }) if constraint == "tasks_user_id_fkey"),
        "Expected foreign key violation, got {:?}",
        result
    );

    close_pool(pool).await;
}

#[tokio::test]
async fn test_update_task_replaces_fields() {
    let pool = setup().await;
    let ana = User::create(&pool, CreateUser { name: "Ana".to_string() }).await.unwrap();
    let bruno = User::create(&pool, CreateUser { name: "Bruno".to_string() }).await.unwrap();

    let original = Task::create(
        &pool,
        &TaskInput {
            description: Some("draft".to_string()),
            ..input("Write report", ana.user_id)
        },
    )
    .await
    .unwrap();

    let updated = Task::update(
        &pool,
        original.id,
        &TaskInput {
            title: "Write report v2".to_string(),
            description: None,
            status: TaskStatus::Completed,
            user_id: bruno.user_id,
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.title, "Write report v2");
    assert_eq!(updated.description, None);
    assert_eq!(updated.status, TaskStatus::Completed);
    assert_eq!(updated.user_id, bruno.user_id);

    let stored = Task::find_by_id(&pool, original.id).await.unwrap().unwrap();
    assert_eq!(stored, updated);

    User::delete(&pool, ana.user_id).await.unwrap();
    User::delete(&pool, bruno.user_id).await.unwrap();
    close_pool(pool).await;
}

#[tokio::test]
async fn test_status_moves_freely() {
    let pool = setup().await;
    let user = User::create(&pool, CreateUser { name: "Flip".to_string() }).await.unwrap();
    let task = Task::create(&pool, &input("Toggle", user.user_id)).await.unwrap();

    for status in [
        TaskStatus::Completed,
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::InProgress,
    ] {
        let updated = Task::update(&pool, task.id, &TaskInput { status, ..input("Toggle", user.user_id) })
            .await
            .unwrap();
        assert_eq!(updated.status, status);
    }

    User::delete(&pool, user.user_id).await.unwrap();
    close_pool(pool).await;
}

#[tokio::test]
async fn test_update_missing_task_is_not_found() {
    let pool = setup().await;
    let user = User::create(&pool, CreateUser { name: "Ghost".to_string() }).await.unwrap();

    let result = Task::update(&pool, i32::MAX, &input("Nothing", user.user_id)).await;
    assert!(matches!(result, Err(StoreError::NotFound("task"))));

    assert!(Task::find_by_id(&pool, i32::MAX).await.unwrap().is_none());

    User::delete(&pool, user.user_id).await.unwrap();
    close_pool(pool).await;
}

#[tokio::test]
async fn test_filter_is_subset_of_unfiltered() {
    let pool = setup().await;
    let a = User::create(&pool, CreateUser { name: "A".to_string() }).await.unwrap();
    let b = User::create(&pool, CreateUser { name: "B".to_string() }).await.unwrap();

    Task::create(&pool, &input("a1", a.user_id)).await.unwrap();
    Task::create(&pool, &input("a2", a.user_id)).await.unwrap();
    Task::create(&pool, &input("b1", b.user_id)).await.unwrap();

    let for_a = Task::list(&pool, Some(a.user_id)).await.unwrap();
    let all = Task::list(&pool, None).await.unwrap();

    assert_eq!(for_a.len(), 2);
    assert!(for_a.iter().all(|t| t.user_id == a.user_id));
    assert!(for_a.iter().all(|t| all.contains(t)));

    // Zero is a filter value, not "no filter"
    let for_zero = Task::list(&pool, Some(0)).await.unwrap();
    assert!(for_zero.iter().all(|t| t.user_id == 0));

    User::delete(&pool, a.user_id).await.unwrap();
    User::delete(&pool, b.user_id).await.unwrap();
    close_pool(pool).await;
}

#[tokio::test]
async fn test_disabled_users_hidden_but_keep_tasks() {
    let pool = setup().await;
    let user = User::create(&pool, CreateUser { name: "Hidden".to_string() }).await.unwrap();
    assert!(user.enabled);

    Task::create(&pool, &input("Still here", user.user_id)).await.unwrap();

    let disabled = User::set_enabled(&pool, user.user_id, false).await.unwrap();
    assert!(!disabled.enabled);

    let visible = User::list_enabled(&pool).await.unwrap();
    assert!(visible.iter().all(|u| u.user_id != user.user_id));
    assert!(visible.iter().all(|u| u.enabled));

    assert_eq!(Task::list(&pool, Some(user.user_id)).await.unwrap().len(), 1);
    assert!(User::find_by_id(&pool, user.user_id).await.unwrap().is_some());

    User::delete(&pool, user.user_id).await.unwrap();
    close_pool(pool).await;
}

#[tokio::test]
async fn test_delete_user_cascades_to_tasks() {
    let pool = setup().await;
    let user = User::create(&pool, CreateUser { name: "Leaving".to_string() }).await.unwrap();

    let task = Task::create(&pool, &input("Doomed", user.user_id)).await.unwrap();

    assert!(User::delete(&pool, user.user_id).await.unwrap());

    assert!(Task::find_by_id(&pool, task.id).await.unwrap().is_none());
    assert!(Task::list(&pool, Some(user.user_id)).await.unwrap().is_empty());
    assert!(!User::delete(&pool, user.user_id).await.unwrap());

    close_pool(pool).await;
}

#[tokio::test]
async fn test_rolled_back_write_leaves_no_row() {
    let pool = setup().await;
    let user = User::create(&pool, CreateUser { name: "Undo".to_string() }).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let task = Task::create(&mut *tx, &input("Never committed", user.user_id))
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    assert!(Task::find_by_id(&pool, task.id).await.unwrap().is_none());

    User::delete(&pool, user.user_id).await.unwrap();
    close_pool(pool).await;
}

#[tokio::test]
async fn test_set_enabled_missing_user() {
    let pool = setup().await;

    let result = User::set_enabled(&pool, i32::MAX, false).await;
    assert!(matches!(result, Err(StoreError::NotFound("user"))));

    close_pool(pool).await;
}
