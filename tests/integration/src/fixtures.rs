//! Test fixtures and data generators
//!
//! Provides reusable requests and seeding helpers for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use vidshare_core::entities::Category;
use vidshare_core::Snowflake;
use vidshare_service::dto::{CreateChannelRequest, CreateCommentRequest, CreateUserRequest, CreateVideoRequest};
use vidshare_service::{ChannelService, CommentService, ServiceContext, UserService, VideoService};

use crate::helpers::parse_id;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

pub fn user_request() -> CreateUserRequest {
    let suffix = unique_suffix();
    CreateUserRequest {
        username: format!("user{suffix}_{}", std::process::id()),
        email: format!("user{suffix}_{}@example.com", std::process::id()),
        avatar: None,
    }
}

pub fn channel_request() -> CreateChannelRequest {
    let suffix = unique_suffix();
    CreateChannelRequest {
        name: format!("channel {suffix}-{}", std::process::id()),
        description: "integration channel".to_string(),
        avatar: None,
        banner: None,
    }
}

pub fn video_request(title: &str, category: Category) -> CreateVideoRequest {
    CreateVideoRequest {
        title: title.to_string(),
        description: format!("{title} description"),
        video_url: "https://cdn.example.com/video.mp4".to_string(),
        thumbnail: "https://cdn.example.com/thumb.png".to_string(),
        duration_secs: 120,
        category: Some(category),
        visibility: None,
    }
}

/// A channel owner with one channel and one video
#[derive(Debug, Clone, Copy)]
pub struct Seeded {
    pub owner: Snowflake,
    pub channel: Snowflake,
    pub video: Snowflake,
}

pub async fn seed_user(ctx: &ServiceContext) -> Result<Snowflake> {
    let user = UserService::new(ctx).create_user(user_request()).await?;
    parse_id(&user.id)
}

/// Create `n` users
pub async fn seed_users(ctx: &ServiceContext, n: usize) -> Result<Vec<Snowflake>> {
    let mut ids = Vec::with_capacity(n);
    for _ in 0..n {
        ids.push(seed_user(ctx).await?);
    }
    Ok(ids)
}

pub async fn seed_channel(ctx: &ServiceContext, owner: Snowflake) -> Result<Snowflake> {
    let channel = ChannelService::new(ctx)
        .create_channel(owner, channel_request())
        .await?;
    parse_id(&channel.id)
}

pub async fn seed_video(ctx: &ServiceContext, owner: Snowflake, title: &str) -> Result<Snowflake> {
    let video = VideoService::new(ctx)
        .create_video(owner, video_request(title, Category::Programming))
        .await?;
    parse_id(&video.id)
}

/// Owner, channel and one video
pub async fn seed_world(ctx: &ServiceContext) -> Result<Seeded> {
    let owner = seed_user(ctx).await?;
    let channel = seed_channel(ctx, owner).await?;
    let video = seed_video(ctx, owner, "Seeded video").await?;
    Ok(Seeded { owner, channel, video })
}

/// Top-level comment by `author`
pub async fn seed_comment(
    ctx: &ServiceContext,
    video: Snowflake,
    author: Snowflake,
    content: &str,
) -> Result<Snowflake> {
    let comment = CommentService::new(ctx)
        .create_comment(video, author, CreateCommentRequest::top_level(content))
        .await?;
    parse_id(&comment.id)
}

/// Reply to `parent` by `author`
pub async fn seed_reply(
    ctx: &ServiceContext,
    video: Snowflake,
    author: Snowflake,
    parent: Snowflake,
    content: &str,
) -> Result<Snowflake> {
    let reply = CommentService::new(ctx)
        .create_comment(video, author, CreateCommentRequest::reply(parent, content))
        .await?;
    parse_id(&reply.id)
}
