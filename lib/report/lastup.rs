use chrono::{DateTime, Utc};

use crate::state::RuntimeState;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The last-up marker for a machine whose backend is currently ready.
pub const CURRENTLY_RUNNING: &str = "Currently running";

/// The last-up marker for a machine that has never completed a run.
pub const NEVER: &str = "Never";

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Buckets a machine's last-up time into a human string.
///
/// A running machine always reports [`CURRENTLY_RUNNING`], regardless of
/// elapsed time; a machine with no recorded stop reports [`NEVER`]. Everything
/// else is floor-rounded into whole seconds, minutes, hours or days. The
/// function is pure and monotonic under repeated polling with a moving `now`.
pub fn bucket_last_up(
    now: DateTime<Utc>,
    last_stop: Option<DateTime<Utc>>,
    state: RuntimeState,
) -> String {
    if state == RuntimeState::Running {
        return CURRENTLY_RUNNING.to_string();
    }

    match last_stop {
        Some(stopped_at) => humanize_since(now, stopped_at),
        None => NEVER.to_string(),
    }
}

/// Renders the elapsed time since `then` as a floor-rounded bucket.
///
/// The smallest emitted granularity is one whole second; sub-second elapsed
/// values render as `"1 second ago"` rather than anything smaller.
///
/// ## Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use corral::report::humanize_since;
///
/// let now = Utc::now();
/// assert_eq!(humanize_since(now, now - Duration::seconds(42)), "42 seconds ago");
/// assert_eq!(humanize_since(now, now - Duration::minutes(5)), "5 minutes ago");
/// assert_eq!(humanize_since(now, now - Duration::days(3)), "3 days ago");
/// ```
pub fn humanize_since(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(then).num_seconds().max(0);

    let (count, unit) = if secs < 60 {
        (secs.max(1), "second")
    } else if secs < 3_600 {
        (secs / 60, "minute")
    } else if secs < 86_400 {
        (secs / 3_600, "hour")
    } else {
        (secs / 86_400, "day")
    };

    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
