//! Response DTOs returned by the engines
//!
//! All response DTOs implement `Serialize`. Snowflake IDs are serialized as
//! strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;
use vidshare_core::entities::{Category, Visibility};

// ============================================================================
// User Responses
// ============================================================================

/// Full user record
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub channel_ids: Vec<String>,
    pub subscription_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Author or owner identity embedded in other responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummaryResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

// ============================================================================
// Channel Responses
// ============================================================================

/// Channel with its owner resolved
#[derive(Debug, Clone, Serialize)]
pub struct ChannelResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserSummaryResponse>,
    pub subscriber_count: i64,
    pub video_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelSummaryResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub subscriber_count: i64,
}

/// Result of a subscription toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubscriptionResponse {
    pub subscribed: bool,
    pub subscriber_count: i64,
}

// ============================================================================
// Video Responses
// ============================================================================

/// Video as shown in listings
#[derive(Debug, Clone, Serialize)]
pub struct VideoResponse {
    pub id: String,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail: String,
    pub duration_secs: i32,
    pub category: Category,
    pub visibility: Visibility,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Single video with its channel and comment count
#[derive(Debug, Clone, Serialize)]
pub struct VideoDetailResponse {
    #[serde(flatten)]
    pub video: VideoResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelSummaryResponse>,
    pub comment_count: u64,
}

/// Reaction state of the acting user after a toggle, with the new counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReactionResponse {
    pub liked: bool,
    pub disliked: bool,
    pub likes: i64,
    pub dislikes: i64,
}

// ============================================================================
// Comment Responses
// ============================================================================

/// Comment with its author and, for top-level comments, its replies
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub video_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<UserSummaryResponse>,
    pub content: String,
    pub likes: i64,
    pub edited: bool,
    pub reply_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<CommentResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommentLikeResponse {
    pub liked: bool,
    pub likes: i64,
}

/// Number of comments removed, including cascaded replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteCommentResponse {
    pub deleted: u64,
}
