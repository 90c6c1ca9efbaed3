//! The canonical machine listing record.
//!
//! A [`Reporter`] joins one machine's stored configuration with its resolved
//! runtime state. It is built fresh on every listing and is the single source
//! every output format renders from; the formats differ only in presentation.

mod lastup;
mod reporter;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use lastup::*;
pub use reporter::*;
