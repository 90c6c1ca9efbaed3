//! `corral` manages a local inventory of lightweight virtual machines used as
//! container-runtime backends.
//!
//! # Overview
//!
//! corral keeps machine configuration records in a small SQLite inventory and
//! answers, at any instant, whether each machine is stopped, starting up, or
//! running. The answer is rendered losslessly in several output formats:
//!
//! - a human table (optionally headerless)
//! - a quiet, name-only listing
//! - a structured JSON document with raw byte counts
//! - a caller-supplied field-projection template
//!
//! All formats are projections of one canonical [`report::Reporter`] sequence;
//! they never recompute underlying values.
//!
//! # Architecture
//!
//! - [`store`] - persisted machine configuration records
//! - [`state`] - per-machine runtime state probing and lifecycle transitions
//! - [`report`] - the canonical reporter record and last-up bucketing
//! - [`format`] - output format selection and rendering
//! - [`machine`] - the user-facing operations (`init`, `list`, `start`, ...)
//! - [`cli`] - command-line argument definitions
//! - [`utils`] - defaults, paths and unit conversion helpers
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use corral::{
//!     machine::{self, ListOptions},
//!     state::ProcessBackend,
//!     store::db,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::get_or_create_db_pool("machines.db", &db::MACHINE_DB_MIGRATOR).await?;
//!     let backend = ProcessBackend::new("state");
//!
//!     let listing = machine::list(&pool, &backend, &ListOptions::default()).await?;
//!     print!("{}", listing);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod error;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod cli;
pub mod format;
pub mod machine;
pub mod report;
pub mod state;
pub mod store;
pub mod utils;

pub use error::*;
