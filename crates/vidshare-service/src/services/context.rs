//! Service context - dependency container for services
//!
//! Holds the entity store ports, the id generator and listing defaults.

use std::sync::Arc;

use tracing::info;
use vidshare_common::{AppConfig, AppError, ListingConfig};
use vidshare_core::traits::{
    ChannelRepository, CommentRepository, UserRepository, VideoRepository,
};
use vidshare_core::{PageRequest, Snowflake, SnowflakeGenerator};
use vidshare_db::{MemoryStore, PgStore};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cheap to clone; every engine borrows it for the duration of one call.
#[derive(Clone)]
pub struct ServiceContext {
    user_repo: Arc<dyn UserRepository>,
    channel_repo: Arc<dyn ChannelRepository>,
    video_repo: Arc<dyn VideoRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    listing: ListingConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        channel_repo: Arc<dyn ChannelRepository>,
        video_repo: Arc<dyn VideoRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        listing: ListingConfig,
    ) -> Self {
        Self {
            user_repo,
            channel_repo,
            video_repo,
            comment_repo,
            snowflake_generator,
            listing,
        }
    }

    /// Context over a shared in-memory store
    pub fn from_memory(store: Arc<MemoryStore>, worker_id: u16) -> Self {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            Arc::new(SnowflakeGenerator::new(worker_id)),
            ListingConfig::default(),
        )
    }

    /// Context over the PostgreSQL store
    pub fn from_pg(store: &PgStore, worker_id: u16, listing: ListingConfig) -> Self {
        Self::new(
            Arc::new(store.users()),
            Arc::new(store.channels()),
            Arc::new(store.videos()),
            Arc::new(store.comments()),
            Arc::new(SnowflakeGenerator::new(worker_id)),
            listing,
        )
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the channel repository
    pub fn channel_repo(&self) -> &dyn ChannelRepository {
        self.channel_repo.as_ref()
    }

    /// Get the video repository
    pub fn video_repo(&self) -> &dyn VideoRepository {
        self.video_repo.as_ref()
    }

    /// Get the comment repository
    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    // === Ids and listings ===

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    pub fn listing(&self) -> &ListingConfig {
        &self.listing
    }

    /// Resolve optional paging parameters against a listing's default size
    pub(crate) fn page_request(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
        default_size: u32,
    ) -> PageRequest {
        PageRequest::new(page, page_size, default_size, self.listing.max_page_size)
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .field("listing", &self.listing)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    channel_repo: Option<Arc<dyn ChannelRepository>>,
    video_repo: Option<Arc<dyn VideoRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    listing: Option<ListingConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use one in-memory store for every repository
    pub fn memory_store(self, store: Arc<MemoryStore>) -> Self {
        self.user_repo(store.clone())
            .channel_repo(store.clone())
            .video_repo(store.clone())
            .comment_repo(store)
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn channel_repo(mut self, repo: Arc<dyn ChannelRepository>) -> Self {
        self.channel_repo = Some(repo);
        self
    }

    pub fn video_repo(mut self, repo: Arc<dyn VideoRepository>) -> Self {
        self.video_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn listing(mut self, listing: ListingConfig) -> Self {
        self.listing = Some(listing);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.channel_repo
                .ok_or_else(|| ServiceError::validation("channel_repo is required"))?,
            self.video_repo
                .ok_or_else(|| ServiceError::validation("video_repo is required"))?,
            self.comment_repo
                .ok_or_else(|| ServiceError::validation("comment_repo is required"))?,
            self.snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
            self.listing.unwrap_or_default(),
        ))
    }
}

/// Open the PostgreSQL store described by `config` and wire a context over it.
///
/// The returned store is the handle to close at shutdown.
pub async fn bootstrap(config: &AppConfig) -> ServiceResult<(ServiceContext, PgStore)> {
    let store = PgStore::connect(&config.database)
        .await
        .map_err(|e| ServiceError::App(AppError::Database(e.to_string())))?;
    let ctx = ServiceContext::from_pg(&store, config.snowflake.worker_id, config.listing);

    info!(
        app = %config.app.name,
        environment = ?config.app.env,
        worker_id = config.snowflake.worker_id,
        "Service context ready"
    );
    Ok((ctx, store))
}
