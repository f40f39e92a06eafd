//! # vidshare-db
//!
//! Entity store implementations for the repository traits in `vidshare-core`.
//!
//! - [`PgStore`]: PostgreSQL via SQLx. Sets are `BIGINT[]` columns and every
//!   set or counter change is a single-row `UPDATE`; CHECK constraints hold the
//!   counter and reaction invariants.
//! - [`MemoryStore`]: `DashMap`-backed store with the same per-entity atomicity.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vidshare_common::AppConfig;
//! use vidshare_core::traits::VideoRepository;
//! use vidshare_db::PgStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let store = PgStore::connect(&config.database).await?;
//!     let videos = store.videos();
//!     // Use the repository...
//!     store.close().await;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod store;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, PgPool, PoolConfig};
pub use repositories::{
    PgChannelRepository, PgCommentRepository, PgUserRepository, PgVideoRepository,
};
pub use store::{PgStore, StoreError, MIGRATIONS_DIR};
