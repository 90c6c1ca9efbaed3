mod handlers;

use clap::{CommandFactory, Parser};
use corral::{
    cli::{CorralArgs, CorralSubcommand},
    CorralResult,
};
use tracing_subscriber::EnvFilter;

//--------------------------------------------------------------------------------------------------
// Functions: main
//--------------------------------------------------------------------------------------------------

#[tokio::main]
async fn main() -> CorralResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args = CorralArgs::parse();

    if args.version {
        println!("corral {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    match args.subcommand {
        Some(CorralSubcommand::Init {
            name,
            memory,
            disk_size,
        }) => {
            handlers::init_subcommand(name, memory, disk_size).await?;
        }
        Some(CorralSubcommand::List {
            quiet,
            noheading,
            format,
        }) => {
            handlers::list_subcommand(quiet, noheading, format).await?;
        }
        Some(CorralSubcommand::Start { name }) => {
            handlers::start_subcommand(name).await?;
        }
        Some(CorralSubcommand::Stop { name }) => {
            handlers::stop_subcommand(name).await?;
        }
        Some(CorralSubcommand::Rm { name }) => {
            handlers::rm_subcommand(name).await?;
        }
        None => {
            CorralArgs::command().print_help()?;
        }
    }

    Ok(())
}
