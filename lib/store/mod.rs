//! Machine configuration store.
//!
//! The store is the persistent inventory of machine configuration records. It
//! is the only durable state corral owns; everything else (runtime phase, last
//! stop time) is recomputed from the backend on every listing. Records are
//! kept in a small SQLite database managed through `sqlx` migrations.

mod machine;

pub mod db;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use machine::*;
