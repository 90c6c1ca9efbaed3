use sqlx::{Pool, Sqlite};

use crate::{state::MachineBackend, store::db, CorralError, CorralResult};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Removes a machine from the inventory along with its runtime record.
///
/// The next listing reflects the removal immediately; no stale reporter is
/// ever produced for a removed machine.
pub async fn remove(
    pool: &Pool<Sqlite>,
    backend: &dyn MachineBackend,
    name: &str,
) -> CorralResult<()> {
    if !db::delete_machine(pool, name).await? {
        return Err(CorralError::MachineNotFound(name.to_string()));
    }

    backend.forget(name).await?;

    tracing::info!(machine = %name, "machine removed");
    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        machine,
        state::{MachineBackend, ProcessBackend, Readiness},
        store::db::{init_db, MACHINE_DB_MIGRATOR},
    };
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_remove_deletes_record_and_runtime_state() -> CorralResult<()> {
        let temp_dir = tempdir()?;
        let pool = init_db(temp_dir.path().join("machines.db"), &MACHINE_DB_MIGRATOR).await?;
        let backend = ProcessBackend::new(temp_dir.path().join("state"));

        machine::init(&pool, Some("m1".into()), 2048, 11).await?;
        machine::start(&pool, &backend, Some("m1")).await?;

        remove(&pool, &backend, "m1").await?;

        assert!(db::get_machine(&pool, "m1").await?.is_none());
        assert_eq!(backend.probe("m1").await?, Readiness::NotFound);

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_unknown_machine_fails() -> CorralResult<()> {
        let temp_dir = tempdir()?;
        let pool = init_db(temp_dir.path().join("machines.db"), &MACHINE_DB_MIGRATOR).await?;
        let backend = ProcessBackend::new(temp_dir.path().join("state"));

        let result = remove(&pool, &backend, "ghost").await;
        assert!(matches!(result, Err(CorralError::MachineNotFound(_))));

        Ok(())
    }
}
