use std::{collections::HashMap, time::Duration};

use chrono::{DateTime, Utc};
use futures::future;
use tokio::time::{self, Instant};
use tracing::warn;

use crate::store::MachineConfig;

use super::{MachineBackend, Readiness};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The externally observable lifecycle state of a machine at list time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    /// The machine is not running.
    Stopped,

    /// A start is in flight; the backend has not yet signaled readiness.
    Starting,

    /// The backend signaled readiness.
    Running,

    /// The probe failed or timed out; the state could not be determined.
    Unknown,
}

/// The outcome of resolving one machine's runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The resolved lifecycle state.
    pub state: RuntimeState,

    /// The time the machine last stopped, when the backend recorded one.
    pub last_stop: Option<DateTime<Utc>>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Resolution {
    /// The resolution for a machine whose probe failed or timed out.
    pub fn unknown() -> Self {
        Self {
            state: RuntimeState::Unknown,
            last_stop: None,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Resolves the runtime state of every machine in the inventory.
///
/// Probes run concurrently, one per machine, each bounded by `probe_timeout`
/// and all bounded by one overall `deadline`. A probe that fails, times out
/// or is cut off by the deadline degrades that one machine to
/// [`RuntimeState::Unknown`]; it never aborts the listing or blocks the
/// caller. All probes complete (or are abandoned) before this returns;
/// nothing is streamed.
pub async fn resolve_all(
    backend: &dyn MachineBackend,
    configs: &[MachineConfig],
    probe_timeout: Duration,
    deadline: Duration,
) -> HashMap<String, Resolution> {
    let cutoff = Instant::now() + deadline;

    let probes = configs.iter().map(|config| {
        let name = config.name.clone();
        async move {
            let outcome =
                time::timeout_at(cutoff, time::timeout(probe_timeout, backend.probe(&name))).await;

            let resolution = match outcome {
                Ok(Ok(Ok(readiness))) => Resolution::from(readiness),
                Ok(Ok(Err(error))) => {
                    warn!(machine = %name, %error, "machine probe failed");
                    Resolution::unknown()
                }
                Ok(Err(_)) => {
                    warn!(machine = %name, "machine probe timed out");
                    Resolution::unknown()
                }
                Err(_) => {
                    warn!(machine = %name, "machine probe abandoned at listing deadline");
                    Resolution::unknown()
                }
            };

            (name, resolution)
        }
    });

    future::join_all(probes).await.into_iter().collect()
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<Readiness> for Resolution {
    fn from(readiness: Readiness) -> Self {
        match readiness {
            Readiness::NotFound => Self {
                state: RuntimeState::Stopped,
                last_stop: None,
            },
            Readiness::Starting { since } => Self {
                state: RuntimeState::Starting,
                last_stop: since,
            },
            Readiness::Ready => Self {
                state: RuntimeState::Running,
                last_stop: None,
            },
            Readiness::Stopped { since } => Self {
                state: RuntimeState::Stopped,
                last_stop: since,
            },
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
