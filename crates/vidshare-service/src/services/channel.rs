//! Channel service
//!
//! Channel creation, profile updates and the per-channel video listing.

use tracing::{error, info, instrument};
use validator::Validate;
use vidshare_core::entities::Channel;
use vidshare_core::traits::{VideoFilter, VideoSort};
use vidshare_core::{DomainError, Page, Snowflake};

use crate::dto::{
    ChannelResponse, ChannelWithOwner, CreateChannelRequest, PageQuery, UpdateChannelRequest,
    VideoResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Channel service
pub struct ChannelService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChannelService<'a> {
    /// Create a new ChannelService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a channel owned by `owner_id`
    #[instrument(skip(self, request))]
    pub async fn create_channel(
        &self,
        owner_id: Snowflake,
        request: CreateChannelRequest,
    ) -> ServiceResult<ChannelResponse> {
        request.validate()?;

        let owner = self
            .ctx
            .user_repo()
            .find_by_id(owner_id)
            .await?
            .ok_or(DomainError::UserNotFound(owner_id))?;

        let mut channel = Channel::new(
            self.ctx.generate_id(),
            owner_id,
            request.name.trim().to_string(),
            request.description,
        );
        channel.avatar = request.avatar;
        channel.banner = request.banner;

        self.ctx.channel_repo().create(&channel).await?;

        if let Err(e) = self
            .ctx
            .user_repo()
            .add_owned_channel(owner_id, channel.id)
            .await
        {
            error!(
                channel_id = %channel.id,
                owner_id = %owner_id,
                error = %e,
                "Channel created but not linked to its owner"
            );
            return Err(ServiceError::incomplete("link channel to owner", e));
        }

        info!(channel_id = %channel.id, owner_id = %owner_id, name = %channel.name, "Channel created");

        Ok(ChannelResponse::from(ChannelWithOwner {
            channel: &channel,
            owner: Some(&owner),
        }))
    }

    /// Get a channel with its owner
    #[instrument(skip(self))]
    pub async fn get_channel(&self, channel_id: Snowflake) -> ServiceResult<ChannelResponse> {
        let channel = self.get_channel_entity(channel_id).await?;
        let owner = self.ctx.user_repo().find_by_id(channel.owner_id).await?;

        Ok(ChannelResponse::from(ChannelWithOwner {
            channel: &channel,
            owner: owner.as_ref(),
        }))
    }

    /// Get channel entity by ID
    pub async fn get_channel_entity(&self, channel_id: Snowflake) -> ServiceResult<Channel> {
        self.ctx
            .channel_repo()
            .find_by_id(channel_id)
            .await?
            .ok_or_else(|| DomainError::ChannelNotFound(channel_id).into())
    }

    /// Update a channel's profile; owner only
    #[instrument(skip(self, request))]
    pub async fn update_channel(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
        request: UpdateChannelRequest,
    ) -> ServiceResult<ChannelResponse> {
        request.validate()?;

        let channel = self.get_channel_entity(channel_id).await?;
        if !channel.is_owner(user_id) {
            return Err(DomainError::NotChannelOwner.into());
        }

        let mut details = channel.details();
        if let Some(name) = request.name {
            details.name = name.trim().to_string();
        }
        if let Some(description) = request.description {
            details.description = description;
        }
        if let Some(avatar) = request.avatar {
            details.avatar = Some(avatar);
        }
        if let Some(banner) = request.banner {
            details.banner = Some(banner);
        }

        let updated = self
            .ctx
            .channel_repo()
            .update_details(channel_id, &details)
            .await?;
        let owner = self.ctx.user_repo().find_by_id(updated.owner_id).await?;

        info!(channel_id = %channel_id, user_id = %user_id, "Channel updated");

        Ok(ChannelResponse::from(ChannelWithOwner {
            channel: &updated,
            owner: owner.as_ref(),
        }))
    }

    /// Videos of one channel, newest first
    #[instrument(skip(self))]
    pub async fn list_channel_videos(
        &self,
        channel_id: Snowflake,
        query: PageQuery,
    ) -> ServiceResult<Page<VideoResponse>> {
        query.validate()?;
        self.get_channel_entity(channel_id).await?;

        let filter = VideoFilter::for_channel(channel_id);
        let request = self.ctx.page_request(
            query.page,
            query.page_size,
            self.ctx.listing().channel_video_page_size,
        );
        let total = self.ctx.video_repo().count(&filter).await?;
        let window = request.window(total);
        if window.is_past_end() {
            return Ok(Page::empty(total, window));
        }

        let videos = self
            .ctx
            .video_repo()
            .find_page(&filter, VideoSort::Newest, window.offset, window.limit)
            .await?;

        Ok(Page::new(videos, total, window).map(VideoResponse::from))
    }
}
