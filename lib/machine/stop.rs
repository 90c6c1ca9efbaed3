use sqlx::{Pool, Sqlite};

use crate::{state::MachineBackend, CorralResult};

use super::start::resolve_target;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Records a stop for the named machine, or the default machine when no name
/// is given.
///
/// The recorded stop time is what subsequent listings bucket into the
/// `LAST UP` column.
pub async fn stop(
    pool: &Pool<Sqlite>,
    backend: &dyn MachineBackend,
    name: Option<&str>,
) -> CorralResult<String> {
    let name = resolve_target(pool, name).await?;
    backend.trigger_stop(&name).await?;
    Ok(name)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
