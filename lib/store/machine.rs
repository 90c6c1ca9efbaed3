use chrono::{DateTime, Utc};
use typed_builder::TypedBuilder;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A machine configuration record as persisted in the inventory store.
///
/// Records are created by the provisioning flow (`corral init`), enumerated by
/// the listing path and deleted on removal. Runtime state is deliberately not
/// part of this record; it is resolved fresh on every listing.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct MachineConfig {
    /// The unique name of the machine.
    #[builder(setter(into))]
    pub name: String,

    /// The memory limit of the machine in bytes.
    pub memory_bytes: u64,

    /// The disk limit of the machine in bytes.
    pub disk_bytes: u64,

    /// Whether this machine is the implicit target when no machine name is
    /// given. At most one record in the store carries this flag.
    #[builder(default)]
    pub is_default: bool,

    /// The time the configuration record was created.
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
}
