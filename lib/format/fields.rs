use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::{report::Reporter, utils::human_bytes, CorralError, CorralResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The enumerated set of reporter fields a format template may reference.
///
/// Field references resolve here rather than through reflection; anything not
/// in this set is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The machine name, with the default marker applied.
    Name,
    /// Whether the backend has signaled readiness.
    Running,
    /// Whether a start is in flight.
    Starting,
    /// The bucketed last-up time.
    LastUp,
    /// The memory limit, rendered in binary units.
    Memory,
    /// The disk limit, rendered in binary units.
    DiskSize,
    /// The creation time, rendered as elapsed time.
    CreatedAt,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Field {
    /// Returns the table header label of the field.
    pub fn header(&self) -> &'static str {
        match self {
            Field::Name => "NAME",
            Field::Running => "RUNNING",
            Field::Starting => "STARTING",
            Field::LastUp => "LAST UP",
            Field::Memory => "MEMORY",
            Field::DiskSize => "DISK SIZE",
            Field::CreatedAt => "CREATED",
        }
    }

    /// Resolves the field against a reporter, in human-facing presentation.
    pub fn value(&self, reporter: &Reporter, now: DateTime<Utc>) -> String {
        match self {
            Field::Name => reporter.display_name(),
            Field::Running => reporter.running.to_string(),
            Field::Starting => reporter.starting.to_string(),
            Field::LastUp => reporter.last_up.clone(),
            Field::Memory => human_bytes(reporter.memory_bytes),
            Field::DiskSize => human_bytes(reporter.disk_bytes),
            Field::CreatedAt => crate::report::humanize_since(now, reporter.created_at),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Parses a whitespace-separated `{{.Field}}` template into fields.
pub fn parse_template(template: &str) -> CorralResult<Vec<Field>> {
    let tokens: Vec<&str> = template.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(CorralError::MalformedTemplate(template.to_string()));
    }

    tokens
        .into_iter()
        .map(|token| {
            token
                .strip_prefix("{{.")
                .and_then(|rest| rest.strip_suffix("}}"))
                .ok_or_else(|| CorralError::MalformedTemplate(token.to_string()))?
                .parse()
        })
        .collect()
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl FromStr for Field {
    type Err = CorralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Name" => Ok(Field::Name),
            "Running" => Ok(Field::Running),
            "Starting" => Ok(Field::Starting),
            "LastUp" => Ok(Field::LastUp),
            "Memory" => Ok(Field::Memory),
            "DiskSize" => Ok(Field::DiskSize),
            "CreatedAt" => Ok(Field::CreatedAt),
            unknown => Err(CorralError::UnknownField(unknown.to_string())),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
