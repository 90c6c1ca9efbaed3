use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::{
    format::{parse_format, render},
    report::build_reporters,
    state::{resolve_all, MachineBackend},
    store::db,
    utils::{DEFAULT_LIST_DEADLINE, DEFAULT_PROBE_TIMEOUT},
    CorralResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Options controlling a machine listing.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Print machine names only, no header.
    pub quiet: bool,

    /// Suppress the table header row.
    pub noheading: bool,

    /// Format expression: unset for the default table, `json`, a `{{.Field}}`
    /// template, or `table {{.Field}} ...`.
    pub format: Option<String>,
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Produces a point-in-time listing of every machine in the inventory.
///
/// The format expression is validated first, then the full inventory is read
/// (any store error aborts the listing; a partial inventory would silently
/// hide machines), every machine's state is resolved concurrently, and the
/// joined reporter sequence is rendered. Nothing is emitted until every step
/// has succeeded.
///
/// Listing is safe to call while starts are in flight: the resolver only
/// reads the backend's published state and reports `Starting` machines as
/// such without waiting for them.
pub async fn list(
    pool: &Pool<Sqlite>,
    backend: &dyn MachineBackend,
    options: &ListOptions,
) -> CorralResult<String> {
    let format = parse_format(options.format.as_deref(), options.quiet, options.noheading)?;

    let configs = db::list_machines(pool).await?;
    let resolutions = resolve_all(
        backend,
        &configs,
        DEFAULT_PROBE_TIMEOUT,
        DEFAULT_LIST_DEADLINE,
    )
    .await;

    let now = Utc::now();
    let reporters = build_reporters(configs, resolutions, now);

    render(&reporters, &format, now)
}
