//! PostgreSQL entity store lifecycle
//!
//! Opened once at start-up, shared by reference, closed at shutdown.

use std::path::Path;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

use crate::pool::{create_pool, PoolConfig};
use crate::repositories::{
    PgChannelRepository, PgCommentRepository, PgUserRepository, PgVideoRepository,
};

/// Directory holding the SQL migrations shipped with this crate
pub const MIGRATIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/migrations");

/// Store start-up errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database connection failed: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] MigrateError),
}

/// Handle to the PostgreSQL-backed entity store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open the pool and, when configured, apply pending migrations
    pub async fn connect(config: &vidshare_common::DatabaseConfig) -> Result<Self, StoreError> {
        let pool = create_pool(&PoolConfig::from(config)).await?;
        let store = Self { pool };
        info!(
            max_connections = config.max_connections,
            "Connected to PostgreSQL"
        );

        if config.run_migrations {
            store.migrate().await?;
        }
        Ok(store)
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply migrations from [`MIGRATIONS_DIR`]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let migrator = Migrator::new(Path::new(MIGRATIONS_DIR)).await?;
        migrator.run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Drain and close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn users(&self) -> PgUserRepository {
        PgUserRepository::new(self.pool.clone())
    }

    pub fn channels(&self) -> PgChannelRepository {
        PgChannelRepository::new(self.pool.clone())
    }

    pub fn videos(&self) -> PgVideoRepository {
        PgVideoRepository::new(self.pool.clone())
    }

    pub fn comments(&self) -> PgCommentRepository {
        PgCommentRepository::new(self.pool.clone())
    }
}
