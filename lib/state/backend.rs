use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::{fs, process::Command};
use tracing::warn;

use crate::CorralResult;

use super::{state_file_path, MachinePhase, MachineState};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The readiness of one machine's backend, as published by the backend itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// No runtime record exists for the machine; it has never run.
    NotFound,

    /// A start is in flight; the backend has not yet signaled readiness.
    Starting {
        /// The time the machine last stopped before this start, when one was
        /// recorded.
        since: Option<DateTime<Utc>>,
    },

    /// The backend signaled readiness.
    Ready,

    /// The backend is stopped.
    Stopped {
        /// The time the machine last stopped, when one was recorded.
        since: Option<DateTime<Utc>>,
    },
}

/// The narrow seam between corral and the VM backend.
///
/// `probe` must be a side-effect-free query of the backend's published state;
/// the start and stop triggers are fire-and-forget from corral's perspective.
#[async_trait]
pub trait MachineBackend: Send + Sync {
    /// Probes the machine's published runtime state.
    async fn probe(&self, name: &str) -> CorralResult<Readiness>;

    /// Requests a start for the machine. The backend's supervisor publishes
    /// readiness on its own once the machine is actually usable.
    async fn trigger_start(&self, name: &str) -> CorralResult<()>;

    /// Records a stop for the machine.
    async fn trigger_stop(&self, name: &str) -> CorralResult<()>;

    /// Discards any runtime record for the machine.
    async fn forget(&self, name: &str) -> CorralResult<()>;
}

/// A [`MachineBackend`] over per-machine state records and live processes.
///
/// The start flow publishes lifecycle records as JSON files under a state
/// directory; readiness is whatever the record says, gated by the recorded
/// process actually being alive. A record claiming `Running` for a dead
/// process is reported stopped as of the record's last transition.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    state_dir: PathBuf,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ProcessBackend {
    /// Creates a backend publishing records under the given state directory.
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    async fn load_or_new(&self, name: &str) -> CorralResult<MachineState> {
        let path = state_file_path(&self.state_dir, name);
        if !fs::try_exists(&path).await? {
            return Ok(MachineState::new(name, Utc::now()));
        }

        let mut state = MachineState::load(&path).await?;

        // A record claiming Running for a dead process is reconciled here so
        // the machine can be restarted without a manual stop. The stop time
        // is the record's last transition, matching what probes report.
        if *state.get_phase() == MachinePhase::Running {
            let alive = match state.get_pid() {
                Some(pid) => is_process_running(*pid).await,
                None => false,
            };
            if !alive {
                warn!(machine = %name, "reconciling state record whose process is gone");
                let stopped_at = *state.get_updated_at();
                state.record_stop(stopped_at)?;
            }
        }

        Ok(state)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Helper function to check if a process is running
pub async fn is_process_running(pid: u32) -> bool {
    Command::new("kill")
        .arg("-0") // Only check process existence
        .arg(pid.to_string())
        .output()
        .await
        .map_or(false, |output| output.status.success())
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl MachineBackend for ProcessBackend {
    async fn probe(&self, name: &str) -> CorralResult<Readiness> {
        let path = state_file_path(&self.state_dir, name);
        if !fs::try_exists(&path).await? {
            return Ok(Readiness::NotFound);
        }

        let state = MachineState::load(&path).await?;
        let readiness = match state.get_phase() {
            MachinePhase::Running => match state.get_pid() {
                Some(pid) if is_process_running(*pid).await => Readiness::Ready,
                _ => {
                    // The record outlived its process. Probes are pure, so the
                    // stale record is left for the next lifecycle trigger to
                    // reconcile.
                    warn!(
                        machine = %name,
                        "state record claims a running machine but its process is gone"
                    );
                    Readiness::Stopped {
                        since: Some(*state.get_updated_at()),
                    }
                }
            },
            MachinePhase::Starting => Readiness::Starting {
                since: *state.get_last_stop(),
            },
            MachinePhase::Stopped => Readiness::Stopped {
                since: *state.get_last_stop(),
            },
        };

        Ok(readiness)
    }

    async fn trigger_start(&self, name: &str) -> CorralResult<()> {
        let mut state = self.load_or_new(name).await?;
        state.request_start(Utc::now())?;
        state.save(state_file_path(&self.state_dir, name)).await?;

        tracing::info!(machine = %name, "start requested");
        Ok(())
    }

    async fn trigger_stop(&self, name: &str) -> CorralResult<()> {
        let mut state = self.load_or_new(name).await?;
        state.record_stop(Utc::now())?;
        state.save(state_file_path(&self.state_dir, name)).await?;

        tracing::info!(machine = %name, "stop recorded");
        Ok(())
    }

    async fn forget(&self, name: &str) -> CorralResult<()> {
        let path = state_file_path(&self.state_dir, name);
        if fs::try_exists(&path).await? {
            fs::remove_file(&path).await?;
        }
        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
