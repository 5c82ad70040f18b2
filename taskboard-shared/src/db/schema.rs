/// Schema initializer
///
/// Creates the `users` and `tasks` tables when absent. Every statement is
/// `IF NOT EXISTS`, so running it on every startup is safe. The server must
/// not accept traffic until this has returned `Ok`.
///
/// Because an existing table is left untouched, the initializer then checks
/// the column types the row decoders rely on. A database created with plain
/// `TIMESTAMP` columns, for example, is rejected here instead of failing on
/// every read later.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE IF NOT EXISTS users (
///     user_id SERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL CHECK (name <> ''),
///     enabled BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE IF NOT EXISTS tasks (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL CHECK (title <> ''),
///     description TEXT,
///     status VARCHAR(50) NOT NULL DEFAULT 'pending'
///         CONSTRAINT tasks_status_check
///         CHECK (status IN ('pending', 'in progress', 'completed')),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     user_id INTEGER NOT NULL
///         CONSTRAINT tasks_user_id_fkey
///         REFERENCES users(user_id) ON DELETE CASCADE
/// );
/// ```

use crate::error::{StoreError, StoreResult};
use sqlx::{PgExecutor, PgPool};
use tracing::{debug, error, info};

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL CHECK (name <> ''),
        enabled BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_TASKS: &str = r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id SERIAL PRIMARY KEY,
        title VARCHAR(255) NOT NULL CHECK (title <> ''),
        description TEXT,
        status VARCHAR(50) NOT NULL DEFAULT 'pending'
            CONSTRAINT tasks_status_check
            CHECK (status IN ('pending', 'in progress', 'completed')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        user_id INTEGER NOT NULL
            CONSTRAINT tasks_user_id_fkey
            REFERENCES users(user_id) ON DELETE CASCADE
    )
"#;

const CREATE_TASKS_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks (user_id)";

/// Advisory lock key serializing concurrent initializers
const SCHEMA_LOCK_KEY: i64 = 0x7461_736b_626f_6172;

/// `(table, column, information_schema data_type)` for every decoded column
const EXPECTED_COLUMNS: &[(&str, &str, &str)] = &[
    ("users", "user_id", "integer"),
    ("users", "name", "character varying"),
    ("users", "enabled", "boolean"),
    ("users", "created_at", "timestamp with time zone"),
    ("tasks", "id", "integer"),
    ("tasks", "title", "character varying"),
    ("tasks", "description", "text"),
    ("tasks", "status", "character varying"),
    ("tasks", "created_at", "timestamp with time zone"),
    ("tasks", "user_id", "integer"),
];

/// Creates both tables (and the task owner index) inside one transaction
///
/// # Errors
///
/// Any failure rolls the transaction back and is returned; the caller is
/// expected to abort startup. Pre-existing tables whose columns do not match
/// yield `StoreError::SchemaMismatch`.
pub async fn initialize_schema(pool: &PgPool) -> StoreResult<()> {
    info!("Initializing database schema");

    let mut tx = pool.begin().await?;

    // Concurrent IF NOT EXISTS creates can still collide in pg_type.
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    for statement in [CREATE_USERS, CREATE_TASKS, CREATE_TASKS_USER_INDEX] {
        if let Err(e) = sqlx::query(statement).execute(&mut *tx).await {
            error!(error = %e, "Schema statement failed, rolling back");
            tx.rollback().await?;
            return Err(e.into());
        }
    }

    if let Err(e) = verify_columns(&mut *tx).await {
        error!(error = %e, "Existing schema is incompatible");
        tx.rollback().await?;
        return Err(e);
    }

    tx.commit().await?;

    info!("Database schema ready");
    Ok(())
}

/// Reports whether both tables are present in the current schema
pub async fn schema_exists(pool: &PgPool) -> StoreResult<bool> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM information_schema.tables
        WHERE table_schema = current_schema()
          AND table_name IN ('users', 'tasks')
        "#,
    )
    .fetch_one(pool)
    .await?;

    debug!(tables_found = count, "Checked schema presence");
    Ok(count == 2)
}

/// Compares the live column types against `EXPECTED_COLUMNS`
pub async fn verify_columns<'e, E>(executor: E) -> StoreResult<()>
where
    E: PgExecutor<'e>,
{
    // information_schema columns are domain types; cast so they decode as text
    let found: Vec<(String, String, String)> = sqlx::query_as(
        r#"
        SELECT table_name::text, column_name::text, data_type::text
        FROM information_schema.columns
        WHERE table_schema = current_schema()
          AND table_name IN ('users', 'tasks')
        "#,
    )
    .fetch_all(executor)
    .await?;

    match first_mismatch(&found) {
        Some(err) => Err(err),
        None => {
            debug!(columns = found.len(), "Schema columns verified");
            Ok(())
        }
    }
}

fn first_mismatch(found: &[(String, String, String)]) -> Option<StoreError> {
    EXPECTED_COLUMNS
        .iter()
        .find_map(|&(table, column, expected)| {
            let actual = found
                .iter()
                .find(|(t, c, _)| t == table && c == column)
                .map(|(_, _, data_type)| data_type.as_str());

            match actual {
                Some(data_type) if data_type == expected => None,
                other => Some(StoreError::SchemaMismatch {
                    table,
                    column,
                    expected,
                    found: other.unwrap_or("missing").to_string(),
                }),
            }
        })
}
