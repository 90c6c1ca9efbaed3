use clap::Parser;

use crate::{
    cli::styles,
    utils::{DEFAULT_DISK_GIB, DEFAULT_MEMORY_MIB},
};

//-------------------------------------------------------------------------------------------------
// Types
//-------------------------------------------------------------------------------------------------

/// `corral` is a tool for managing a local inventory of lightweight virtual machines
#[derive(Debug, Parser)]
#[command(name = "corral", author, styles=styles::styles())]
pub struct CorralArgs {
    /// The subcommand to run
    #[command(subcommand)]
    pub subcommand: Option<CorralSubcommand>,

    /// Show version
    #[arg(short = 'v', long)]
    pub version: bool,
}

/// Available subcommands for managing machines
#[derive(Debug, Parser)]
pub enum CorralSubcommand {
    /// Register a new machine configuration
    #[command(name = "init")]
    Init {
        /// Name of the machine
        #[arg(name = "NAME")]
        name: Option<String>,

        /// Memory limit in MiB
        #[arg(short, long, default_value_t = DEFAULT_MEMORY_MIB)]
        memory: u64,

        /// Disk limit in GiB
        #[arg(short, long = "disk-size", default_value_t = DEFAULT_DISK_GIB)]
        disk_size: u64,
    },

    /// List machines and their live status
    #[command(name = "list", alias = "ls")]
    List {
        /// Only print machine names
        #[arg(short, long)]
        quiet: bool,

        /// Omit the table heading
        #[arg(long)]
        noheading: bool,

        /// Output format: 'json', a '{{.Field}}' template, or 'table {{.Field}} ...'
        #[arg(long)]
        format: Option<String>,
    },

    /// Start a machine
    #[command(name = "start")]
    Start {
        /// Name of the machine; defaults to the default machine
        #[arg(name = "NAME")]
        name: Option<String>,
    },

    /// Stop a machine
    #[command(name = "stop")]
    Stop {
        /// Name of the machine; defaults to the default machine
        #[arg(name = "NAME")]
        name: Option<String>,
    },

    /// Remove a machine
    #[command(name = "rm")]
    Rm {
        /// Name of the machine
        #[arg(name = "NAME", required = true)]
        name: String,
    },
}
