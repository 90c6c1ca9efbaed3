//! Machine lifecycle and listing operations.
//!
//! This module provides the user-facing operations over the machine
//! inventory. Each operation is constructed explicitly from a store pool and
//! a backend per invocation; there are no process-wide singletons. The main
//! operations are:
//! - `init`: register a new machine configuration
//! - `list`: resolve and render the live status of every machine
//! - `start` / `stop`: fire-and-forget lifecycle triggers
//! - `remove`: delete a machine and its runtime record

mod init;
mod list;
mod remove;
mod start;
mod stop;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use init::*;
pub use list::*;
pub use remove::*;
pub use start::*;
pub use stop::*;
