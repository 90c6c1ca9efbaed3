//! Per-machine runtime state.
//!
//! A machine's runtime state is never stored in the inventory. The start flow
//! publishes an explicit lifecycle record (`Stopped -> Starting -> Running`)
//! through the backend, and the listing path resolves each machine's state
//! with an independent, timeout-bounded, side-effect-free probe. A machine is
//! only ever reported running once the backend has signaled readiness; a
//! spawned-but-not-ready process stays `Starting`.

mod backend;
mod lifecycle;
mod resolve;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use backend::*;
pub use lifecycle::*;
pub use resolve::*;
