//! Test helpers for integration tests
//!
//! Builds service contexts over the in-memory store or, when `DATABASE_URL`
//! is set, over PostgreSQL, and provides assertions on service errors.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

use anyhow::Result;
use vidshare_common::{try_init_tracing, AppConfig};
use vidshare_core::entities::{Channel, Video};
use vidshare_core::Snowflake;
use vidshare_db::{MemoryStore, PgStore};
use vidshare_service::{bootstrap, ServiceContext, ServiceError, ServiceResult};

/// Counter for distinct snowflake workers, so contexts built by parallel
/// tests never mint the same id
static WORKER_COUNTER: AtomicU16 = AtomicU16::new(1);

/// Get a worker id not yet used by this test process
pub fn next_worker_id() -> u16 {
    WORKER_COUNTER.fetch_add(1, Ordering::SeqCst) % 1024
}

/// Engine instance over a fresh in-memory store
pub struct TestEngine {
    pub ctx: ServiceContext,
    pub store: Arc<MemoryStore>,
}

impl TestEngine {
    pub fn new() -> Self {
        // Only the first engine in a test binary installs the subscriber
        let _ = try_init_tracing();
        let store = Arc::new(MemoryStore::new());
        let ctx = ServiceContext::from_memory(store.clone(), next_worker_id());
        Self { ctx, store }
    }

    /// Current stored state of a video
    pub async fn video(&self, id: Snowflake) -> Result<Video> {
        self.ctx
            .video_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("video {id} missing"))
    }

    /// Current stored state of a channel
    pub async fn channel(&self, id: Snowflake) -> Result<Channel> {
        self.ctx
            .channel_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("channel {id} missing"))
    }
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Load test configuration from the environment
pub fn test_config() -> Result<AppConfig> {
    let mut config = AppConfig::from_env()?;
    config.database.run_migrations = true;
    config.database.max_connections = config.database.max_connections.min(10);
    config.snowflake.worker_id = next_worker_id();
    Ok(config)
}

/// Check if the PostgreSQL test environment is available
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    true
}

/// Connect, migrate and wire a context over PostgreSQL
pub async fn pg_engine() -> Result<(ServiceContext, PgStore)> {
    let _ = try_init_tracing();
    let config = test_config()?;
    Ok(bootstrap(&config).await?)
}

/// Assert a service call failed with `code` and return the error
pub fn assert_error_code<T: Debug>(result: ServiceResult<T>, code: &str) -> ServiceError {
    match result {
        Ok(value) => panic!("Expected error {code}, got Ok({value:?})"),
        Err(err) => {
            assert_eq!(err.error_code(), code, "unexpected error: {err}");
            err
        }
    }
}

/// Assert a service call failed with transport status `status`
pub fn assert_status<T: Debug>(result: ServiceResult<T>, status: u16) -> ServiceError {
    match result {
        Ok(value) => panic!("Expected status {status}, got Ok({value:?})"),
        Err(err) => {
            assert_eq!(err.status_code(), status, "unexpected error: {err}");
            err
        }
    }
}

/// Parse an id as returned in response DTOs
pub fn parse_id(id: &str) -> Result<Snowflake> {
    Ok(Snowflake::parse(id)?)
}
