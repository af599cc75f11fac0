//! Embedded PostgreSQL helpers for the Diesel adapter suites.
//!
//! One cluster is shared per test binary. Each test gets its own temporary
//! database with the crate's migrations applied through `run_migrations`, so
//! the schema under test is exactly what the server deploys.
//!
//! Set `SKIP_TEST_CLUSTER=1` to skip these suites where the cluster cannot
//! start (no network for the binary download, restricted sandboxes).

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use donation_backend::outbound::persistence::run_migrations;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const STABLE_PASSWORD: &str = "donation_embedded_test";
const BOOTSTRAP_RETRIES: u32 = 3;
const BOOTSTRAP_RETRY_DELAY: Duration = Duration::from_millis(500);

fn pg_embed_dir() -> PathBuf {
    std::env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../target"))
        .join("pg-embed")
}

fn env_or(name: &str, fallback: impl FnOnce() -> String) -> String {
    std::env::var(name).unwrap_or_else(|_| fallback())
}

/// Shared cluster for this test binary, bootstrapped on first use.
///
/// Runtime and data directories default to the cargo target directory and
/// the superuser password is pinned, so a data directory left by an earlier
/// run can be reused.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let _bootstrap = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let base = pg_embed_dir();
    let runtime_dir = env_or("PG_RUNTIME_DIR", || {
        base.join("install").to_string_lossy().into_owned()
    });
    let data_dir = env_or("PG_DATA_DIR", || base.join("data").to_string_lossy().into_owned());
    let password = env_or("PG_PASSWORD", || STABLE_PASSWORD.to_owned());
    std::fs::create_dir_all(&runtime_dir).map_err(|err| err.to_string())?;

    let _env = env_lock::lock_env([
        ("PG_RUNTIME_DIR", Some(runtime_dir)),
        ("PG_DATA_DIR", Some(data_dir)),
        ("PG_PASSWORD", Some(password)),
    ]);
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(err) if attempt >= BOOTSTRAP_RETRIES => {
                return Err(format!("bootstrap embedded cluster: {err:?}"));
            }
            Err(_) => {
                std::thread::sleep(BOOTSTRAP_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Create an empty database and apply the crate's migrations to it.
pub fn migrated_database(
    cluster: &ClusterHandle,
    runtime: &Runtime,
) -> Result<TemporaryDatabase, String> {
    let database = cluster
        .temporary_database(format!("donation_test_{}", uuid::Uuid::new_v4().simple()))
        .map_err(|err| format!("create temporary database: {err:?}"))?;
    let url = database.url().to_string();
    runtime
        .block_on(run_migrations(&url))
        .map_err(|err| format!("migrate {url}: {err}"))?;
    Ok(database)
}

/// Render a `postgres` error with its SQLSTATE and detail when present.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    match db_error.detail() {
        Some(detail) => format!(
            "postgres error {:?}: {}; detail: {detail}",
            db_error.code(),
            db_error.message()
        ),
        None => format!("postgres error {:?}: {}", db_error.code(), db_error.message()),
    }
}

/// Skip when `SKIP_TEST_CLUSTER` is truthy, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    let skip = std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    if skip {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
