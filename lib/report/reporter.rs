use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::{
    state::{Resolution, RuntimeState},
    store::MachineConfig,
};

use super::bucket_last_up;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The canonical, format-agnostic record describing one machine at list time.
///
/// Every output format is a projection of this record; none of them recompute
/// underlying values. The serialized form is the structured-output schema:
/// byte counts are emitted as decimal strings so downstream consumers can
/// parse them without precision loss, and the default flag stays out of it
/// since it is presentation-only (the `*` name marker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reporter {
    /// The machine name.
    #[serde(rename = "Name")]
    pub name: String,

    /// Whether this machine is the store's default machine.
    #[serde(skip)]
    pub is_default: bool,

    /// Whether the backend has signaled readiness.
    #[serde(rename = "Running")]
    pub running: bool,

    /// Whether a start is in flight.
    #[serde(rename = "Starting")]
    pub starting: bool,

    /// The bucketed last-up time.
    #[serde(rename = "LastUp")]
    pub last_up: String,

    /// The memory limit in bytes.
    #[serde(rename = "Memory", serialize_with = "as_decimal_string")]
    pub memory_bytes: u64,

    /// The disk limit in bytes.
    #[serde(rename = "DiskSize", serialize_with = "as_decimal_string")]
    pub disk_bytes: u64,

    /// The time the machine configuration was created.
    #[serde(rename = "CreatedAt", serialize_with = "as_rfc3339")]
    pub created_at: DateTime<Utc>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Reporter {
    /// Returns the machine name with the default marker glyph applied.
    ///
    /// Stripping trailing `*` from the result recovers the stored name
    /// exactly; stored names never end in the marker.
    pub fn display_name(&self) -> String {
        if self.is_default {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Joins machine configurations with their resolutions into the ordered
/// reporter sequence.
///
/// The join is total: a configuration whose resolution is missing is reported
/// state-indeterminate rather than dropped. The sequence is ordered by name
/// so repeated listings of the same inventory are byte-stable no matter how
/// probe latencies interleave.
pub fn build_reporters(
    configs: Vec<MachineConfig>,
    mut resolutions: HashMap<String, Resolution>,
    now: DateTime<Utc>,
) -> Vec<Reporter> {
    let mut reporters: Vec<Reporter> = configs
        .into_iter()
        .map(|config| {
            let resolution = resolutions
                .remove(&config.name)
                .unwrap_or_else(Resolution::unknown);

            Reporter {
                last_up: bucket_last_up(now, resolution.last_stop, resolution.state),
                name: config.name,
                is_default: config.is_default,
                running: resolution.state == RuntimeState::Running,
                starting: resolution.state == RuntimeState::Starting,
                memory_bytes: config.memory_bytes,
                disk_bytes: config.disk_bytes,
                created_at: config.created_at,
            }
        })
        .collect();

    reporters.sort_by(|a, b| a.name.cmp(&b.name));
    reporters
}

fn as_decimal_string<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

fn as_rfc3339<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CURRENTLY_RUNNING, NEVER};
    use chrono::Duration;

    fn config(name: &str, is_default: bool) -> MachineConfig {
        MachineConfig::builder()
            .name(name)
            .memory_bytes(2_147_483_648)
            .disk_bytes(11_811_160_064)
            .is_default(is_default)
            .build()
    }

    fn resolution(state: RuntimeState) -> Resolution {
        Resolution {
            state,
            last_stop: None,
        }
    }

    #[test]
    fn test_reporters_are_ordered_by_name() {
        let now = Utc::now();
        let configs = vec![config("zeta", false), config("alpha", true)];
        let mut resolutions = HashMap::new();
        resolutions.insert("zeta".to_string(), resolution(RuntimeState::Running));
        resolutions.insert("alpha".to_string(), resolution(RuntimeState::Stopped));

        let reporters = build_reporters(configs, resolutions, now);
        let names: Vec<&str> = reporters.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_join_is_total_missing_resolution_is_indeterminate() {
        let now = Utc::now();
        let reporters = build_reporters(vec![config("orphan", false)], HashMap::new(), now);

        assert_eq!(reporters.len(), 1);
        assert!(!reporters[0].running);
        assert!(!reporters[0].starting);
        assert_eq!(reporters[0].last_up, NEVER);
    }

    #[test]
    fn test_running_and_starting_flags_are_exclusive() {
        let now = Utc::now();
        let mut resolutions = HashMap::new();
        resolutions.insert("starting".to_string(), resolution(RuntimeState::Starting));
        resolutions.insert("running".to_string(), resolution(RuntimeState::Running));

        let reporters = build_reporters(
            vec![config("starting", false), config("running", false)],
            resolutions,
            now,
        );

        let running = reporters.iter().find(|r| r.name == "running").unwrap();
        assert!(running.running && !running.starting);
        assert_eq!(running.last_up, CURRENTLY_RUNNING);

        let starting = reporters.iter().find(|r| r.name == "starting").unwrap();
        assert!(starting.starting && !starting.running);
        assert_ne!(starting.last_up, CURRENTLY_RUNNING);
    }

    #[test]
    fn test_display_name_marks_default_recoverably() {
        let now = Utc::now();
        let reporters = build_reporters(
            vec![config("m1", true), config("m2", false)],
            HashMap::new(),
            now,
        );

        assert_eq!(reporters[0].display_name(), "m1*");
        assert_eq!(reporters[1].display_name(), "m2");
        assert_eq!(reporters[0].display_name().trim_end_matches('*'), "m1");
    }

    #[test]
    fn test_structured_schema_field_names_and_raw_bytes() {
        let now = Utc::now();
        let mut resolutions = HashMap::new();
        resolutions.insert(
            "m1".to_string(),
            Resolution {
                state: RuntimeState::Stopped,
                last_stop: Some(now - Duration::minutes(5)),
            },
        );

        let reporters = build_reporters(vec![config("m1", true)], resolutions, now);
        let value = serde_json::to_value(&reporters).unwrap();

        let entry = &value[0];
        assert_eq!(entry["Name"], "m1");
        assert_eq!(entry["Running"], false);
        assert_eq!(entry["Starting"], false);
        assert_eq!(entry["LastUp"], "5 minutes ago");
        // Raw decimal byte counts, parseable as integers
        assert_eq!(entry["Memory"], "2147483648");
        assert_eq!(entry["DiskSize"], "11811160064");
        assert_eq!(
            entry["Memory"].as_str().unwrap().parse::<u64>().unwrap(),
            2_147_483_648
        );
        // The default flag is presentation-only and stays out of the schema
        assert!(entry.get("Default").is_none());
        assert!(entry.get("IsDefault").is_none());
        // CreatedAt is RFC 3339
        assert!(entry["CreatedAt"].as_str().unwrap().contains('T'));
    }
}
