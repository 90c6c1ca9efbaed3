//! End-to-end listing behavior against a temporary store and a scripted
//! backend.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use corral::{
    machine::{self, ListOptions},
    state::{MachineBackend, Readiness},
    store::db::{init_db, MACHINE_DB_MIGRATOR},
    CorralResult,
};
use sqlx::{Pool, Sqlite};
use tempfile::TempDir;
use tokio::sync::Mutex;

//--------------------------------------------------------------------------------------------------
// Helpers
//--------------------------------------------------------------------------------------------------

/// A backend whose published readiness is driven directly by the test,
/// standing in for the external supervisor.
struct ScriptedBackend {
    readiness: Mutex<HashMap<String, Readiness>>,
}

impl ScriptedBackend {
    fn new() -> Self {
        Self {
            readiness: Mutex::new(HashMap::new()),
        }
    }

    async fn publish(&self, name: &str, readiness: Readiness) {
        self.readiness
            .lock()
            .await
            .insert(name.to_string(), readiness);
    }
}

#[async_trait]
impl MachineBackend for ScriptedBackend {
    async fn probe(&self, name: &str) -> CorralResult<Readiness> {
        Ok(self
            .readiness
            .lock()
            .await
            .get(name)
            .copied()
            .unwrap_or(Readiness::NotFound))
    }

    async fn trigger_start(&self, name: &str) -> CorralResult<()> {
        let mut readiness = self.readiness.lock().await;
        let since = match readiness.get(name) {
            Some(Readiness::Stopped { since }) => *since,
            _ => None,
        };
        readiness.insert(name.to_string(), Readiness::Starting { since });
        Ok(())
    }

    async fn trigger_stop(&self, name: &str) -> CorralResult<()> {
        self.publish(
            name,
            Readiness::Stopped {
                since: Some(Utc::now()),
            },
        )
        .await;
        Ok(())
    }

    async fn forget(&self, name: &str) -> CorralResult<()> {
        self.readiness.lock().await.remove(name);
        Ok(())
    }
}

async fn test_environment() -> CorralResult<(TempDir, Pool<Sqlite>, ScriptedBackend)> {
    let temp_dir = TempDir::new()?;
    let pool = init_db(temp_dir.path().join("machines.db"), &MACHINE_DB_MIGRATOR).await?;
    Ok((temp_dir, pool, ScriptedBackend::new()))
}

fn options(quiet: bool, noheading: bool, format: Option<&str>) -> ListOptions {
    ListOptions {
        quiet,
        noheading,
        format: format.map(str::to_string),
    }
}

fn lines(output: &str) -> Vec<&str> {
    output.lines().collect()
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[tokio::test]
async fn test_list_machines() -> CorralResult<()> {
    let (_guard, pool, backend) = test_environment().await?;

    // An empty inventory lists just the header
    let out = machine::list(&pool, &backend, &options(false, false, None)).await?;
    assert_eq!(lines(&out).len(), 1);

    // No header and no machine should be empty
    let out = machine::list(&pool, &backend, &options(true, false, None)).await?;
    assert!(out.is_empty());
    let out = machine::list(&pool, &backend, &options(false, true, None)).await?;
    assert!(out.is_empty());

    // One machine and the header
    machine::init(&pool, Some("m1".into()), 2048, 11).await?;
    let out = machine::list(&pool, &backend, &options(false, false, None)).await?;
    assert_eq!(lines(&out).len(), 2);

    // Two machines, no header in quiet mode
    machine::init(&pool, Some("m2".into()), 2048, 11).await?;
    let out = machine::list(&pool, &backend, &options(true, false, None)).await?;
    let names: Vec<String> = lines(&out)
        .iter()
        .map(|line| line.trim_end_matches('*').to_string())
        .collect();
    assert_eq!(names, vec!["m1", "m2"]);

    // Field projection, one row per machine, no header
    let out = machine::list(&pool, &backend, &options(false, false, Some("{{.Name}}"))).await?;
    let names: Vec<String> = lines(&out)
        .iter()
        .map(|line| line.trim_end_matches('*').to_string())
        .collect();
    assert_eq!(names, vec!["m1", "m2"]);

    // The table form of the same projection includes the header
    let out = machine::list(
        &pool,
        &backend,
        &options(false, false, Some("table {{.Name}}")),
    )
    .await?;
    assert_eq!(lines(&out).len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_exactly_one_machine_carries_the_default_marker() -> CorralResult<()> {
    let (_guard, pool, backend) = test_environment().await?;

    machine::init(&pool, Some("m1".into()), 2048, 11).await?;
    machine::init(&pool, Some("m2".into()), 2048, 11).await?;

    let out = machine::list(&pool, &backend, &options(true, false, None)).await?;
    let marked: Vec<&str> = lines(&out)
        .into_iter()
        .filter(|line| line.ends_with('*'))
        .collect();
    assert_eq!(marked, vec!["m1*"]);
    assert_eq!(marked[0].trim_end_matches('*'), "m1");

    Ok(())
}

#[tokio::test]
async fn test_json_listing_has_raw_parseable_byte_counts() -> CorralResult<()> {
    let (_guard, pool, backend) = test_environment().await?;

    machine::init(&pool, Some("m1".into()), 2048, 11).await?;
    machine::init(&pool, Some("m2".into()), 2048, 11).await?;

    let out = machine::list(&pool, &backend, &options(false, false, Some("json"))).await?;
    let reporters: Vec<serde_json::Value> = serde_json::from_str(&out).expect("valid json");
    assert_eq!(reporters.len(), 2);

    for reporter in &reporters {
        let memory: u64 = reporter["Memory"].as_str().unwrap().parse().unwrap();
        assert!(memory > 2_000_000_000); // 2GiB
        let disk_size: u64 = reporter["DiskSize"].as_str().unwrap().parse().unwrap();
        assert!(disk_size > 11_000_000_000); // 11GiB
    }

    Ok(())
}

#[tokio::test]
async fn test_human_listing_renders_binary_units() -> CorralResult<()> {
    let (_guard, pool, backend) = test_environment().await?;

    machine::init(&pool, Some("m1".into()), 2048, 11).await?;

    let out = machine::list(
        &pool,
        &backend,
        &options(false, false, Some("{{.Memory}} {{.DiskSize}}")),
    )
    .await?;
    assert_eq!(out, "2GiB 11GiB");

    Ok(())
}

#[tokio::test]
async fn test_running_while_starting() -> CorralResult<()> {
    let (_guard, pool, backend) = test_environment().await?;

    machine::init(&pool, Some("m1".into()), 2048, 11).await?;

    // A freshly created, never-started machine has never been up
    let out = machine::list(&pool, &backend, &options(false, false, Some("{{.LastUp}}"))).await?;
    assert_eq!(out, "Never");

    // While the start is in flight the machine must not read as running
    machine::start(&pool, &backend, Some("m1")).await?;
    let out = machine::list(&pool, &backend, &options(false, false, None)).await?;
    assert!(!out.contains("Currently running"));

    let out = machine::list(&pool, &backend, &options(false, false, Some("json"))).await?;
    let reporters: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
    assert_eq!(reporters[0]["Starting"], true);
    assert_eq!(reporters[0]["Running"], false);

    // Once the backend signals readiness the listing flips over, and no
    // sub-second bucket ever shows up for the transition
    backend.publish("m1", Readiness::Ready).await;
    let out = machine::list(&pool, &backend, &options(false, false, None)).await?;
    assert!(out.contains("Currently running"));
    assert!(!out.contains("Less than a second ago"));

    Ok(())
}

#[tokio::test]
async fn test_stopped_machine_reports_a_relative_last_up() -> CorralResult<()> {
    let (_guard, pool, backend) = test_environment().await?;

    machine::init(&pool, Some("m1".into()), 2048, 11).await?;
    machine::start(&pool, &backend, Some("m1")).await?;
    backend.publish("m1", Readiness::Ready).await;
    machine::stop(&pool, &backend, Some("m1")).await?;

    let out = machine::list(&pool, &backend, &options(false, false, Some("{{.LastUp}}"))).await?;
    assert!(out.ends_with("ago"), "unexpected last up: {}", out);
    assert!(!out.contains("Less than a second ago"));

    Ok(())
}

#[tokio::test]
async fn test_restart_window_keeps_the_last_stop_bucket() -> CorralResult<()> {
    let (_guard, pool, backend) = test_environment().await?;

    machine::init(&pool, Some("m1".into()), 2048, 11).await?;
    machine::start(&pool, &backend, Some("m1")).await?;
    backend.publish("m1", Readiness::Ready).await;
    machine::stop(&pool, &backend, Some("m1")).await?;

    // A machine that already ran once keeps its last stop visible while a
    // restart is in flight
    machine::start(&pool, &backend, Some("m1")).await?;
    let out = machine::list(&pool, &backend, &options(false, false, Some("{{.LastUp}}"))).await?;
    assert!(out.ends_with("ago"), "unexpected last up: {}", out);
    assert_ne!(out, "Never");

    Ok(())
}

#[tokio::test]
async fn test_removal_is_reflected_immediately() -> CorralResult<()> {
    let (_guard, pool, backend) = test_environment().await?;

    machine::init(&pool, Some("m1".into()), 2048, 11).await?;
    machine::init(&pool, Some("m2".into()), 2048, 11).await?;
    machine::start(&pool, &backend, Some("m2")).await?;

    machine::remove(&pool, &backend, "m2").await?;

    let out = machine::list(&pool, &backend, &options(true, false, None)).await?;
    assert_eq!(lines(&out).len(), 1);
    assert!(!out.contains("m2"));

    Ok(())
}

#[tokio::test]
async fn test_invalid_format_expression_fails_before_output() -> CorralResult<()> {
    let (_guard, pool, backend) = test_environment().await?;

    machine::init(&pool, Some("m1".into()), 2048, 11).await?;

    let result = machine::list(&pool, &backend, &options(false, false, Some("{{.VMType}}"))).await;
    let error = result.expect_err("unknown field must fail");
    assert!(error.to_string().contains("VMType"));

    Ok(())
}
