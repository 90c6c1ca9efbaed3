//! SQLite-backed persistence for the machine inventory.

use std::path::Path;

use sqlx::{migrate::Migrator, sqlite::SqlitePoolOptions, Pool, Row, Sqlite};
use tokio::fs;

use crate::{CorralError, CorralResult};

use super::MachineConfig;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Migrator for the machine inventory database.
pub static MACHINE_DB_MIGRATOR: Migrator = sqlx::migrate!("lib/store/migrations");

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Initializes a new SQLite database if it doesn't already exist at the specified path.
///
/// ## Arguments
///
/// * `db_path` - Path where the SQLite database file should be created
/// * `migrator` - SQLx migrator containing database schema migrations to run
pub async fn init_db(db_path: impl AsRef<Path>, migrator: &Migrator) -> CorralResult<Pool<Sqlite>> {
    let db_path = db_path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    // Create an empty database file if it doesn't exist
    if !db_path.exists() {
        fs::File::create(&db_path).await?;
    }

    // Create database connection pool
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&format!("sqlite://{}?mode=rwc", db_path.display()))
        .await?;

    // Run migrations
    migrator.run(&pool).await?;

    Ok(pool)
}

/// Creates and returns a connection pool for an existing machine inventory database.
pub async fn get_db_pool(db_path: impl AsRef<Path>) -> CorralResult<Pool<Sqlite>> {
    let db_path = db_path.as_ref();
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&format!("sqlite://{}?mode=rwc", db_path.display()))
        .await?;

    Ok(pool)
}

/// Gets an existing database connection pool or creates a new one if the database doesn't exist.
///
/// If the database doesn't exist, it will be created and migrations will be run before
/// returning the connection pool.
pub async fn get_or_create_db_pool(
    db_path: impl AsRef<Path>,
    migrator: &Migrator,
) -> CorralResult<Pool<Sqlite>> {
    // Initialize the database if it doesn't exist
    init_db(&db_path, migrator).await
}

/// Saves a machine configuration record and returns its row ID.
///
/// When the record carries the default flag, every other record's flag is
/// cleared in the same transaction so at most one machine is the default.
pub async fn save_machine(pool: &Pool<Sqlite>, config: &MachineConfig) -> CorralResult<i64> {
    let mut tx = pool.begin().await?;

    if config.is_default {
        sqlx::query("UPDATE machines SET is_default = 0")
            .execute(&mut *tx)
            .await?;
    }

    let record = sqlx::query(
        r#"
        INSERT INTO machines (name, memory_bytes, disk_bytes, is_default, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&config.name)
    .bind(config.memory_bytes as i64)
    .bind(config.disk_bytes as i64)
    .bind(config.is_default)
    .bind(config.created_at)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(record.get::<i64, _>("id"))
}

/// Returns every machine configuration record, ordered by name.
///
/// The fixed ordering keeps the listing deterministic across repeated calls
/// regardless of probe latency or row insertion order.
pub async fn list_machines(pool: &Pool<Sqlite>) -> CorralResult<Vec<MachineConfig>> {
    let rows = sqlx::query(
        r#"
        SELECT name, memory_bytes, disk_bytes, is_default, created_at
        FROM machines
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let machines = rows.iter().map(config_from_row).collect();

    Ok(machines)
}

/// Returns the machine configuration record with the given name, if any.
pub async fn get_machine(pool: &Pool<Sqlite>, name: &str) -> CorralResult<Option<MachineConfig>> {
    let row = sqlx::query(
        r#"
        SELECT name, memory_bytes, disk_bytes, is_default, created_at
        FROM machines
        WHERE name = ?
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(config_from_row))
}

/// Returns the machine configuration record marked as the default, if any.
pub async fn get_default_machine(pool: &Pool<Sqlite>) -> CorralResult<Option<MachineConfig>> {
    let row = sqlx::query(
        r#"
        SELECT name, memory_bytes, disk_bytes, is_default, created_at
        FROM machines
        WHERE is_default = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(config_from_row))
}

/// Marks the named machine as the default, clearing the flag everywhere else.
pub async fn set_default_machine(pool: &Pool<Sqlite>, name: &str) -> CorralResult<()> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query("SELECT id FROM machines WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(CorralError::MachineNotFound(name.to_string()));
    }

    sqlx::query("UPDATE machines SET is_default = 0")
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE machines SET is_default = 1 WHERE name = ?")
        .bind(name)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// Deletes the named machine record. Returns whether a record was deleted.
pub async fn delete_machine(pool: &Pool<Sqlite>, name: &str) -> CorralResult<bool> {
    let result = sqlx::query("DELETE FROM machines WHERE name = ?")
        .bind(name)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns the number of machine records in the store.
pub async fn count_machines(pool: &Pool<Sqlite>) -> CorralResult<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM machines")
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

fn config_from_row(row: &sqlx::sqlite::SqliteRow) -> MachineConfig {
    MachineConfig {
        name: row.get("name"),
        memory_bytes: row.get::<i64, _>("memory_bytes") as u64,
        disk_bytes: row.get::<i64, _>("disk_bytes") as u64,
        is_default: row.get("is_default"),
        created_at: row.get("created_at"),
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
