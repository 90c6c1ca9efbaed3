use std::{
    error::Error,
    fmt::{self, Display},
    path::PathBuf,
};
use thiserror::Error;

use crate::state::MachinePhase;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a corral-related operation.
pub type CorralResult<T> = Result<T, CorralError>;

/// An error that occurred during a corral operation.
#[derive(Debug, Error)]
pub enum CorralError {
    /// An I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that can represent any error.
    #[error(transparent)]
    Custom(#[from] AnyError),

    /// An error reading from or writing to the machine store. Any store read
    /// failure aborts a listing; an incomplete inventory would silently hide
    /// machines.
    #[error("machine store error: {0}")]
    Store(#[from] sqlx::Error),

    /// An error running machine store migrations.
    #[error("machine store migration error: {0}")]
    StoreMigration(#[from] sqlx::migrate::MigrateError),

    /// An error that occurred when a machine was not found in the store.
    #[error("machine not found: {0}")]
    MachineNotFound(String),

    /// An error that occurred when a machine name is already taken.
    #[error("machine already exists: {0}")]
    MachineExists(String),

    /// An error that occurred when no machine name was given and no default
    /// machine is configured.
    #[error("no machine name given and no default machine is configured")]
    NoDefaultMachine,

    /// An error that occurred when a lifecycle transition was requested from
    /// a phase it is not valid in.
    #[error("invalid lifecycle transition for machine {machine}: {from:?} -> {to:?}")]
    InvalidStateTransition {
        /// The machine the transition was requested for.
        machine: String,
        /// The phase the machine was in.
        from: MachinePhase,
        /// The phase the transition targets.
        to: MachinePhase,
    },

    /// An error that occurred when a requested resource limit does not fit
    /// the byte representation.
    #[error("resource limit out of range: {0}")]
    ResourceLimitOutOfRange(String),

    /// An error that occurred when a format template could not be parsed.
    #[error("malformed format template: {0}")]
    MalformedTemplate(String),

    /// An error that occurred when a format template referenced a field that
    /// is not part of the reporter record.
    #[error("unknown field in format template: {0}")]
    UnknownField(String),

    /// An error that occurred when a persisted machine state record could not
    /// be decoded.
    #[error("corrupt machine state record at {path}: {error}")]
    CorruptStateRecord {
        /// The path of the offending state record.
        path: PathBuf,
        /// The decode failure.
        error: serde_json::Error,
    },

    /// An error that occurred when the reporter sequence could not be encoded
    /// for structured output. The reporter model is defined to always be
    /// encodable, so this signals an internal invariant violation.
    #[error("internal error: machine listing could not be encoded: {0}")]
    ReporterEncode(serde_json::Error),
}

/// An error that can represent any error.
#[derive(Debug)]
pub struct AnyError {
    error: anyhow::Error,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl CorralError {
    /// Creates a new `Err` result.
    pub fn custom(error: impl Into<anyhow::Error>) -> CorralError {
        CorralError::Custom(AnyError {
            error: error.into(),
        })
    }
}

impl AnyError {
    /// Downcasts the error to a `T`.
    pub fn downcast<T>(&self) -> Option<&T>
    where
        T: Display + fmt::Debug + Send + Sync + 'static,
    {
        self.error.downcast_ref::<T>()
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates an `Ok` `CorralResult`.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> CorralResult<T> {
    Result::Ok(value)
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl PartialEq for AnyError {
    fn eq(&self, other: &Self) -> bool {
        self.error.to_string() == other.error.to_string()
    }
}

impl Display for AnyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl Error for AnyError {}
