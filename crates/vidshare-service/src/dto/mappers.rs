//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use std::collections::HashMap;

use vidshare_core::entities::{Channel, Comment, User, Video};
use vidshare_core::Snowflake;

use super::responses::{
    ChannelResponse, ChannelSummaryResponse, CommentResponse, UserResponse, UserSummaryResponse,
    VideoDetailResponse, VideoResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            channel_ids: user.channel_ids.iter().map(ToString::to_string).collect(),
            subscription_count: user.subscribed_channel_ids.len(),
            created_at: user.created_at,
        }
    }
}

impl From<&User> for UserSummaryResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

// ============================================================================
// Channel Mappers
// ============================================================================

impl From<&Channel> for ChannelSummaryResponse {
    fn from(channel: &Channel) -> Self {
        Self {
            id: channel.id.to_string(),
            name: channel.name.clone(),
            avatar: channel.avatar.clone(),
            subscriber_count: channel.subscriber_count,
        }
    }
}

/// Channel paired with its owner for [`ChannelResponse`]
pub struct ChannelWithOwner<'a> {
    pub channel: &'a Channel,
    pub owner: Option<&'a User>,
}

impl From<ChannelWithOwner<'_>> for ChannelResponse {
    fn from(data: ChannelWithOwner<'_>) -> Self {
        let channel = data.channel;
        Self {
            id: channel.id.to_string(),
            name: channel.name.clone(),
            description: channel.description.clone(),
            avatar: channel.avatar.clone(),
            banner: channel.banner.clone(),
            owner: data.owner.map(UserSummaryResponse::from),
            subscriber_count: channel.subscriber_count,
            video_count: channel.video_count,
            created_at: channel.created_at,
            updated_at: channel.updated_at,
        }
    }
}

// ============================================================================
// Video Mappers
// ============================================================================

impl From<&Video> for VideoResponse {
    fn from(video: &Video) -> Self {
        let tally = video.tally();
        Self {
            id: video.id.to_string(),
            channel_id: video.channel_id.to_string(),
            title: video.title.clone(),
            description: video.description.clone(),
            video_url: video.video_url.clone(),
            thumbnail: video.thumbnail.clone(),
            duration_secs: video.duration_secs,
            category: video.category,
            visibility: video.visibility,
            views: video.views,
            likes: tally.likes,
            dislikes: tally.dislikes,
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        Self::from(&video)
    }
}

/// Video with its channel and comment count for [`VideoDetailResponse`]
pub struct VideoWithDetails<'a> {
    pub video: &'a Video,
    pub channel: Option<&'a Channel>,
    pub comment_count: u64,
}

impl From<VideoWithDetails<'_>> for VideoDetailResponse {
    fn from(data: VideoWithDetails<'_>) -> Self {
        Self {
            video: VideoResponse::from(data.video),
            channel: data.channel.map(ChannelSummaryResponse::from),
            comment_count: data.comment_count,
        }
    }
}

// ============================================================================
// Comment Mappers
// ============================================================================

/// Comment with its resolved author and already-mapped replies
pub struct CommentWithAuthor<'a> {
    pub comment: &'a Comment,
    pub authors: &'a HashMap<Snowflake, User>,
    pub replies: Vec<CommentResponse>,
}

impl From<CommentWithAuthor<'_>> for CommentResponse {
    fn from(data: CommentWithAuthor<'_>) -> Self {
        let comment = data.comment;
        Self {
            id: comment.id.to_string(),
            video_id: comment.video_id.to_string(),
            parent_id: comment.parent_id.map(|id| id.to_string()),
            author: data
                .authors
                .get(&comment.author_id)
                .map(UserSummaryResponse::from),
            content: comment.content.clone(),
            likes: comment.likes(),
            edited: comment.is_edited(),
            reply_count: comment.reply_ids.len(),
            replies: data.replies,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

impl CommentResponse {
    /// Map a single comment with a known author and no embedded replies
    pub fn with_author(comment: &Comment, author: Option<&User>) -> Self {
        let authors: HashMap<Snowflake, User> = author
            .map(|user| (user.id, user.clone()))
            .into_iter()
            .collect();
        Self::from(CommentWithAuthor {
            comment,
            authors: &authors,
            replies: Vec::new(),
        })
    }
}
