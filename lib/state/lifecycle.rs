use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use getset::Getters;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::{CorralError, CorralResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The lifecycle phase of a machine's backend process, as published by the
/// start flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachinePhase {
    /// No backend process is active.
    Stopped,

    /// A start was requested; the backend has not yet signaled readiness.
    Starting,

    /// The backend signaled readiness.
    Running,
}

/// The persisted runtime state record of one machine.
///
/// Transitions take their timestamps from the caller rather than reading the
/// clock, so tests can drive the `Stopped -> Starting -> Running` machine with
/// a virtual clock instead of sleeping.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[getset(get = "pub with_prefix")]
pub struct MachineState {
    /// The name of the machine this record belongs to.
    name: String,

    /// The process ID of the backend process, once known.
    pid: Option<u32>,

    /// The current lifecycle phase.
    phase: MachinePhase,

    /// The time the machine last recorded a stop, if it ever ran.
    last_stop: Option<DateTime<Utc>>,

    /// The time of the last transition.
    updated_at: DateTime<Utc>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl MachineState {
    /// Creates a fresh stopped record for a machine that has never run.
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            pid: None,
            phase: MachinePhase::Stopped,
            last_stop: None,
            updated_at: now,
        }
    }

    /// Records a start request. Valid only from `Stopped`.
    pub fn request_start(&mut self, now: DateTime<Utc>) -> CorralResult<()> {
        self.transition(MachinePhase::Stopped, MachinePhase::Starting, now)
    }

    /// Records the backend's readiness signal. Valid only from `Starting`.
    pub fn signal_ready(&mut self, pid: u32, now: DateTime<Utc>) -> CorralResult<()> {
        self.transition(MachinePhase::Starting, MachinePhase::Running, now)?;
        self.pid = Some(pid);
        Ok(())
    }

    /// Records a stop. Valid from `Starting` or `Running`.
    pub fn record_stop(&mut self, now: DateTime<Utc>) -> CorralResult<()> {
        match self.phase {
            MachinePhase::Starting | MachinePhase::Running => {
                self.phase = MachinePhase::Stopped;
                self.pid = None;
                self.last_stop = Some(now);
                self.updated_at = now;
                Ok(())
            }
            from => Err(CorralError::InvalidStateTransition {
                machine: self.name.clone(),
                from,
                to: MachinePhase::Stopped,
            }),
        }
    }

    fn transition(
        &mut self,
        expected: MachinePhase,
        to: MachinePhase,
        now: DateTime<Utc>,
    ) -> CorralResult<()> {
        if self.phase != expected {
            return Err(CorralError::InvalidStateTransition {
                machine: self.name.clone(),
                from: self.phase,
                to,
            });
        }
        self.phase = to;
        self.updated_at = now;
        Ok(())
    }

    /// Saves the record to a file.
    ///
    /// The record is written to a temporary file and renamed into place so
    /// that concurrent probes only ever observe a complete record.
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> CorralResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let serialized = serde_json::to_string(self).map_err(CorralError::custom)?;
        let staged = path.with_extension("json.tmp");
        fs::write(&staged, serialized).await?;
        fs::rename(&staged, path).await?;

        Ok(())
    }

    /// Loads a record from a file.
    pub async fn load<P: AsRef<Path>>(path: P) -> CorralResult<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).await?;
        let state =
            serde_json::from_str(&data).map_err(|error| CorralError::CorruptStateRecord {
                path: path.to_path_buf(),
                error,
            })?;
        Ok(state)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns the path of the state record for the named machine under a state
/// directory.
pub fn state_file_path(state_dir: impl AsRef<Path>, name: &str) -> PathBuf {
    state_dir.as_ref().join(format!("{}.json", name))
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_lifecycle_happy_path() -> CorralResult<()> {
        let mut state = MachineState::new("m1", at(0));
        assert_eq!(*state.get_phase(), MachinePhase::Stopped);
        assert_eq!(*state.get_last_stop(), None);

        state.request_start(at(1))?;
        assert_eq!(*state.get_phase(), MachinePhase::Starting);

        state.signal_ready(4242, at(5))?;
        assert_eq!(*state.get_phase(), MachinePhase::Running);
        assert_eq!(*state.get_pid(), Some(4242));

        state.record_stop(at(60))?;
        assert_eq!(*state.get_phase(), MachinePhase::Stopped);
        assert_eq!(*state.get_pid(), None);
        assert_eq!(*state.get_last_stop(), Some(at(60)));

        Ok(())
    }

    #[test]
    fn test_ready_signal_requires_start_request() {
        let mut state = MachineState::new("m1", at(0));
        let result = state.signal_ready(4242, at(1));
        assert!(matches!(
            result,
            Err(CorralError::InvalidStateTransition {
                from: MachinePhase::Stopped,
                to: MachinePhase::Running,
                ..
            })
        ));
    }

    #[test]
    fn test_double_start_request_rejected() {
        let mut state = MachineState::new("m1", at(0));
        state.request_start(at(1)).unwrap();
        let result = state.request_start(at(2));
        assert!(matches!(
            result,
            Err(CorralError::InvalidStateTransition {
                from: MachinePhase::Starting,
                to: MachinePhase::Starting,
                ..
            })
        ));
    }

    #[test]
    fn test_stop_before_any_run_rejected() {
        let mut state = MachineState::new("m1", at(0));
        let result = state.record_stop(at(1));
        assert!(matches!(
            result,
            Err(CorralError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_stop_while_starting_records_stop_time() -> CorralResult<()> {
        let mut state = MachineState::new("m1", at(0));
        state.request_start(at(1))?;
        state.record_stop(at(3))?;
        assert_eq!(*state.get_last_stop(), Some(at(3)));
        Ok(())
    }

    #[tokio::test]
    async fn test_save_and_load_machine_state() -> CorralResult<()> {
        let temp_dir = tempfile::tempdir()?;
        let path = state_file_path(temp_dir.path(), "m1");

        let mut state = MachineState::new("m1", at(0));
        state.request_start(at(1))?;
        state.save(&path).await?;

        let loaded = MachineState::load(&path).await?;
        assert_eq!(state, loaded);

        // No staging leftovers after the rename
        assert!(!path.with_extension("json.tmp").exists());

        Ok(())
    }

    #[tokio::test]
    async fn test_load_corrupt_record_fails() -> CorralResult<()> {
        let temp_dir = tempfile::tempdir()?;
        let path = state_file_path(temp_dir.path(), "m1");
        tokio::fs::write(&path, "not json").await?;

        let result = MachineState::load(&path).await;
        assert!(matches!(
            result,
            Err(CorralError::CorruptStateRecord { .. })
        ));

        Ok(())
    }
}
