use std::{env, path::PathBuf, time::Duration};

use crate::{CorralError, CorralResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The environment variable overriding the corral home directory.
pub const CORRAL_HOME_ENV: &str = "CORRAL_HOME";

/// The directory under the user's home used when no override is set.
pub const DEFAULT_CORRAL_HOME_DIR: &str = ".corral";

/// The filename of the machine inventory database under the corral home.
pub const MACHINE_DB_FILENAME: &str = "machines.db";

/// The subdirectory of the corral home holding per-machine runtime state
/// records.
pub const STATE_SUBDIR: &str = "state";

/// The machine name used when `init` is not given one.
pub const DEFAULT_MACHINE_NAME: &str = "corral-machine-default";

/// How long one machine probe may run before it degrades to an unknown state.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// The overall deadline for one listing pass across all machines.
pub const DEFAULT_LIST_DEADLINE: Duration = Duration::from_secs(5);

/// The default memory limit for newly registered machines, in MiB.
pub const DEFAULT_MEMORY_MIB: u64 = 2048;

/// The default disk limit for newly registered machines, in GiB.
pub const DEFAULT_DISK_GIB: u64 = 11;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns the corral home directory.
///
/// Honors the `CORRAL_HOME` environment variable; otherwise resolves to
/// `~/.corral`.
pub fn corral_home() -> CorralResult<PathBuf> {
    if let Ok(home) = env::var(CORRAL_HOME_ENV) {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir()
        .map(|home| home.join(DEFAULT_CORRAL_HOME_DIR))
        .ok_or_else(|| CorralError::custom(anyhow::anyhow!("could not determine home directory")))
}
