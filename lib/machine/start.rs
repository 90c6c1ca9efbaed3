use sqlx::{Pool, Sqlite};

use crate::{state::MachineBackend, store::db, CorralError, CorralResult};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Requests a start for the named machine, or the default machine when no
/// name is given.
///
/// The trigger is fire-and-forget: the backend's supervisor drives the
/// machine to readiness and publishes it on its own. Listing concurrently
/// with the in-flight start reports the machine as `Starting` until then.
pub async fn start(
    pool: &Pool<Sqlite>,
    backend: &dyn MachineBackend,
    name: Option<&str>,
) -> CorralResult<String> {
    let name = resolve_target(pool, name).await?;
    backend.trigger_start(&name).await?;
    Ok(name)
}

/// Resolves the machine a lifecycle trigger targets, verifying it exists.
pub(crate) async fn resolve_target(
    pool: &Pool<Sqlite>,
    name: Option<&str>,
) -> CorralResult<String> {
    match name {
        Some(name) => match db::get_machine(pool, name).await? {
            Some(config) => Ok(config.name),
            None => Err(CorralError::MachineNotFound(name.to_string())),
        },
        None => match db::get_default_machine(pool).await? {
            Some(config) => Ok(config.name),
            None => Err(CorralError::NoDefaultMachine),
        },
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
