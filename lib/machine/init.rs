use sqlx::{Pool, Sqlite};

use crate::{
    store::{db, MachineConfig},
    utils::DEFAULT_MACHINE_NAME,
    CorralError, CorralResult,
};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Registers a new machine configuration record.
///
/// Only the inventory record is created here; disk image provisioning and
/// process setup belong to the backend. The first machine registered in an
/// empty store becomes the default machine.
pub async fn init(
    pool: &Pool<Sqlite>,
    name: Option<String>,
    memory_mib: u64,
    disk_gib: u64,
) -> CorralResult<MachineConfig> {
    let name = name.unwrap_or_else(|| DEFAULT_MACHINE_NAME.to_string());

    if db::get_machine(pool, &name).await?.is_some() {
        return Err(CorralError::MachineExists(name));
    }

    let memory_bytes = memory_mib
        .checked_mul(1024 * 1024)
        .ok_or_else(|| CorralError::ResourceLimitOutOfRange(format!("{} MiB of memory", memory_mib)))?;
    let disk_bytes = disk_gib
        .checked_mul(1024 * 1024 * 1024)
        .ok_or_else(|| CorralError::ResourceLimitOutOfRange(format!("{} GiB of disk", disk_gib)))?;

    let config = MachineConfig::builder()
        .name(name)
        .memory_bytes(memory_bytes)
        .disk_bytes(disk_bytes)
        .is_default(db::count_machines(pool).await? == 0)
        .build();

    db::save_machine(pool, &config).await?;

    tracing::info!(machine = %config.name, "machine registered");
    Ok(config)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
