//! # vidshare-service
//!
//! Application layer: the social-interaction engines and their DTOs.
//!
//! - [`ReactionService`]: like/dislike toggles with mutual exclusion
//! - [`SubscriptionService`]: subscribe/unsubscribe with counter upkeep
//! - [`CommentService`]: two-level threads with cascading delete
//! - [`UserService`], [`ChannelService`], [`VideoService`]: the entities the
//!   engines act on, plus paginated listings
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vidshare_db::MemoryStore;
//! use vidshare_service::{ReactionService, ServiceContext};
//!
//! async fn like(video_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
//!     let ctx = ServiceContext::from_memory(Arc::new(MemoryStore::new()), 0);
//!     let state = ReactionService::new(&ctx).toggle_like(video_id, user_id).await?;
//!     println!("likes={} dislikes={}", state.likes, state.dislikes);
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod services;

pub use services::{
    bootstrap, ChannelService, CommentService, ReactionService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, SubscriptionService, UserService,
    VideoService,
};
