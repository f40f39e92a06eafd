//! Repository traits (ports) - the entity store interface
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every mutating method is atomic on a single
//! entity: a set and the counter derived from it change together or not at
//! all. Adding a member that is already present and removing one that is
//! absent are both no-ops, so concurrent toggles that read stale state stay
//! safe. Mutations against a missing entity fail with that entity's NotFound
//! error.

use async_trait::async_trait;
use serde::Deserialize;
use std::str::FromStr;

use crate::entities::{
    Category, Channel, ChannelDetails, Comment, ReactionKind, ReactionTally, User, Video,
    VideoDetails,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Outcome of a conditional set mutation that also maintains a counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterUpdate {
    /// Whether membership actually changed
    pub changed: bool,
    /// Counter value after the mutation
    pub count: i64,
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find several users; missing ids are skipped
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    /// Create a new user (Conflict on duplicate username or email)
    async fn create(&self, user: &User) -> RepoResult<()>;

    /// Record a channel in the user's owned set
    async fn add_owned_channel(&self, user_id: Snowflake, channel_id: Snowflake) -> RepoResult<()>;

    /// Add a channel to the user's subscribed-to set
    async fn add_subscription(&self, user_id: Snowflake, channel_id: Snowflake) -> RepoResult<()>;

    /// Remove a channel from the user's subscribed-to set
    async fn remove_subscription(&self, user_id: Snowflake, channel_id: Snowflake)
        -> RepoResult<()>;
}

// ============================================================================
// Channel Repository
// ============================================================================

#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Find channel by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>>;

    /// Find the first channel created by `owner_id`
    async fn find_by_owner(&self, owner_id: Snowflake) -> RepoResult<Option<Channel>>;

    /// Find several channels; missing ids are skipped
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Channel>>;

    /// Create a new channel (Conflict on a taken name)
    async fn create(&self, channel: &Channel) -> RepoResult<()>;

    /// Replace the owner-editable fields and return the updated channel
    async fn update_details(&self, id: Snowflake, details: &ChannelDetails) -> RepoResult<Channel>;

    /// Add a subscriber and bump `subscriber_count` in one mutation
    async fn add_subscriber(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<CounterUpdate>;

    /// Remove a subscriber and drop `subscriber_count` in one mutation
    async fn remove_subscriber(&self, id: Snowflake, user_id: Snowflake)
        -> RepoResult<CounterUpdate>;

    /// Add a video and bump `video_count` in one mutation
    async fn add_video(&self, id: Snowflake, video_id: Snowflake) -> RepoResult<CounterUpdate>;

    /// Remove a video and drop `video_count` in one mutation
    async fn remove_video(&self, id: Snowflake, video_id: Snowflake) -> RepoResult<CounterUpdate>;
}

// ============================================================================
// Video Repository
// ============================================================================

/// Filter for video listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoFilter {
    pub channel_id: Option<Snowflake>,
    pub category: Option<Category>,
    /// Case-insensitive substring over title and description
    pub search: Option<String>,
}

impl VideoFilter {
    pub fn for_channel(channel_id: Snowflake) -> Self {
        Self {
            channel_id: Some(channel_id),
            ..Self::default()
        }
    }

    /// Evaluate the filter against an in-memory video
    pub fn matches(&self, video: &Video) -> bool {
        if self.channel_id.is_some_and(|id| id != video.channel_id) {
            return false;
        }
        if self.category.is_some_and(|c| c != video.category) {
            return false;
        }
        match self.search.as_deref() {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                video.title.to_lowercase().contains(&term)
                    || video.description.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}

/// Sort order for video listings; ties break on id in the same direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoSort {
    #[default]
    Newest,
    Oldest,
    MostViewed,
}

impl FromStr for VideoSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "most_viewed" | "popular" => Ok(Self::MostViewed),
            other => Err(DomainError::ValidationError(format!("unknown sort: {other}"))),
        }
    }
}

#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Find video by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Video>>;

    /// Create a new video
    async fn create(&self, video: &Video) -> RepoResult<()>;

    /// Replace the owner-editable fields and return the updated video
    async fn update_details(&self, id: Snowflake, details: &VideoDetails) -> RepoResult<Video>;

    /// Delete a video
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Add one view and return the new total
    async fn increment_views(&self, id: Snowflake) -> RepoResult<i64>;

    /// Put `user_id` in the `kind` set and take it out of the opposite set,
    /// as one mutation
    async fn add_reaction(
        &self,
        id: Snowflake,
        user_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<ReactionTally>;

    /// Take `user_id` out of the `kind` set
    async fn remove_reaction(
        &self,
        id: Snowflake,
        user_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<ReactionTally>;

    /// One page of videos matching `filter`
    async fn find_page(
        &self,
        filter: &VideoFilter,
        sort: VideoSort,
        offset: u64,
        limit: u32,
    ) -> RepoResult<Vec<Video>>;

    /// Number of videos matching `filter`
    async fn count(&self, filter: &VideoFilter) -> RepoResult<u64>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find comment by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>>;

    /// Find several comments; missing ids are skipped
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Comment>>;

    /// Create a new comment
    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    /// Replace content in place and return the updated comment
    async fn update_content(&self, id: Snowflake, content: &str) -> RepoResult<Comment>;

    /// Delete one comment
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Delete every reply of `parent_id`; returns how many were removed
    async fn delete_by_parent(&self, parent_id: Snowflake) -> RepoResult<u64>;

    /// Delete every comment on a video; returns how many were removed
    async fn delete_by_video(&self, video_id: Snowflake) -> RepoResult<u64>;

    /// Record a reply id on its parent
    async fn add_reply(&self, parent_id: Snowflake, reply_id: Snowflake) -> RepoResult<()>;

    /// Remove a reply id from its parent
    async fn remove_reply(&self, parent_id: Snowflake, reply_id: Snowflake) -> RepoResult<()>;

    /// Add a liker; returns the resulting like count
    async fn add_like(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<i64>;

    /// Remove a liker; returns the resulting like count
    async fn remove_like(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<i64>;

    /// Top-level comments of a video, newest first
    async fn find_top_level(
        &self,
        video_id: Snowflake,
        offset: u64,
        limit: u32,
    ) -> RepoResult<Vec<Comment>>;

    /// Number of top-level comments on a video
    async fn count_top_level(&self, video_id: Snowflake) -> RepoResult<u64>;

    /// Number of comments on a video, replies included
    async fn count_by_video(&self, video_id: Snowflake) -> RepoResult<u64>;
}
