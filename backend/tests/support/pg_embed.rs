//! Embedded PostgreSQL for the Diesel repository suites.
//!
//! Every [`Database`] owns a private cluster bootstrapped by
//! `pg-embed-setup-unpriv` with the embedded migrations applied, so suites
//! never observe each other's rows. Cluster directories live under the
//! target directory unless `PG_RUNTIME_DIR` and `PG_DATA_DIR` are both set.
//!
//! Set `SKIP_TEST_CLUSTER=1` to skip, rather than fail, where PostgreSQL
//! binaries cannot be fetched or started.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use gamenest::outbound::persistence::{
    DbPool, DieselGameRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use pg_embedded_setup_unpriv::TestCluster;
use tokio::runtime::Runtime;
use uuid::Uuid;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const BOOTSTRAP_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 500;

fn cluster_root() -> PathBuf {
    if let Some(target_dir) = std::env::var_os("CARGO_TARGET_DIR") {
        return PathBuf::from(target_dir).join("pg-embed");
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("target")
        .join("pg-embed")
}

/// Binary downloads fail now and then when several suites start at once.
fn is_transient(error: &str) -> bool {
    let error = error.to_lowercase();
    [
        "error decoding response body",
        "connection reset",
        "connection refused",
        "timed out",
        "timeout",
        "temporarily unavailable",
        "dns error",
    ]
    .iter()
    .any(|pattern| error.contains(pattern))
}

fn start_cluster() -> Result<TestCluster, String> {
    let _bootstrap = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let _env = if std::env::var_os("PG_RUNTIME_DIR").is_none()
        || std::env::var_os("PG_DATA_DIR").is_none()
    {
        let base = cluster_root().join(format!("gamenest-{}", Uuid::new_v4().simple()));
        let runtime_dir = base.join("install");
        let data_dir = base.join("data");
        std::fs::create_dir_all(&runtime_dir).map_err(|err| err.to_string())?;
        std::fs::create_dir_all(&data_dir).map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            (
                "PG_RUNTIME_DIR",
                Some(runtime_dir.to_string_lossy().into_owned()),
            ),
            ("PG_DATA_DIR", Some(data_dir.to_string_lossy().into_owned())),
        ]))
    } else {
        None
    };

    let mut last_error = String::new();
    for attempt in 0..=BOOTSTRAP_RETRIES {
        match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => {
                last_error = format!("{err:?}");
                if attempt == BOOTSTRAP_RETRIES || !is_transient(&last_error) {
                    break;
                }
                std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS << attempt));
            }
        }
    }
    Err(last_error)
}

/// A migrated database with a pool and a runtime to drive it.
///
/// Tests stay synchronous and `block_on` the repository futures; the
/// cluster bootstrap must not run inside a Tokio runtime.
pub struct Database {
    pool: DbPool,
    runtime: Runtime,
    _cluster: TestCluster,
}

impl Database {
    pub fn users(&self) -> DieselUserRepository {
        DieselUserRepository::new(self.pool.clone())
    }

    pub fn games(&self) -> DieselGameRepository {
        DieselGameRepository::new(self.pool.clone())
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

fn open_database() -> Result<Database, String> {
    let cluster = start_cluster()?;
    let url = cluster.connection().database_url("postgres").to_owned();
    run_pending_migrations(&url).map_err(|err| err.to_string())?;

    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let pool = runtime
        .block_on(DbPool::new(PoolConfig::new(url).with_max_size(2)))
        .map_err(|err| err.to_string())?;
    Ok(Database {
        pool,
        runtime,
        _cluster: cluster,
    })
}

fn skip_requested() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Fresh database, or `None` when setup failed and skipping was requested.
///
/// # Panics
/// When the cluster cannot start and `SKIP_TEST_CLUSTER` is not set, so a
/// broken environment fails loudly in CI.
pub fn database() -> Option<Database> {
    match open_database() {
        Ok(database) => Some(database),
        Err(reason) if skip_requested() => {
            eprintln!("SKIP-TEST-CLUSTER: {reason}");
            None
        }
        Err(reason) => {
            panic!("embedded PostgreSQL setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.")
        }
    }
}
