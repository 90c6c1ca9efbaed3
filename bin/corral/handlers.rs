use sqlx::{Pool, Sqlite};

use corral::{
    machine::{self, ListOptions},
    state::ProcessBackend,
    store::db,
    utils::{self, MACHINE_DB_FILENAME, STATE_SUBDIR},
    CorralResult,
};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

pub async fn init_subcommand(
    name: Option<String>,
    memory_mib: u64,
    disk_gib: u64,
) -> CorralResult<()> {
    let (pool, _) = open_environment().await?;
    let config = machine::init(&pool, name, memory_mib, disk_gib).await?;
    println!("{}", config.name);

    Ok(())
}

pub async fn list_subcommand(
    quiet: bool,
    noheading: bool,
    format: Option<String>,
) -> CorralResult<()> {
    let (pool, backend) = open_environment().await?;
    let options = ListOptions {
        quiet,
        noheading,
        format,
    };

    let output = machine::list(&pool, &backend, &options).await?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}

pub async fn start_subcommand(name: Option<String>) -> CorralResult<()> {
    let (pool, backend) = open_environment().await?;
    let started = machine::start(&pool, &backend, name.as_deref()).await?;
    println!("{}", started);

    Ok(())
}

pub async fn stop_subcommand(name: Option<String>) -> CorralResult<()> {
    let (pool, backend) = open_environment().await?;
    let stopped = machine::stop(&pool, &backend, name.as_deref()).await?;
    println!("{}", stopped);

    Ok(())
}

pub async fn rm_subcommand(name: String) -> CorralResult<()> {
    let (pool, backend) = open_environment().await?;
    machine::remove(&pool, &backend, &name).await?;

    Ok(())
}

/// Opens the store pool and backend under the corral home directory.
async fn open_environment() -> CorralResult<(Pool<Sqlite>, ProcessBackend)> {
    let home = utils::corral_home()?;
    let pool =
        db::get_or_create_db_pool(home.join(MACHINE_DB_FILENAME), &db::MACHINE_DB_MIGRATOR).await?;
    let backend = ProcessBackend::new(home.join(STATE_SUBDIR));

    Ok((pool, backend))
}
