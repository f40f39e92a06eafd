//! Video service
//!
//! Upload metadata, viewing (which counts a view), owner edits and deletion,
//! and the filtered, sorted video listing.

use std::str::FromStr;

use tracing::{error, info, instrument};
use validator::Validate;
use vidshare_core::entities::{Category, Video};
use vidshare_core::traits::{VideoFilter, VideoSort};
use vidshare_core::{DomainError, Page, Snowflake};

use crate::dto::{
    CreateVideoRequest, ListVideosQuery, UpdateVideoRequest, VideoDetailResponse, VideoResponse,
    VideoWithDetails,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Category filter value meaning "no category filter"
const ALL_CATEGORIES: &str = "All";

/// Video service
pub struct VideoService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VideoService<'a> {
    /// Create a new VideoService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Publish a video on the acting user's channel
    #[instrument(skip(self, request))]
    pub async fn create_video(
        &self,
        user_id: Snowflake,
        request: CreateVideoRequest,
    ) -> ServiceResult<VideoResponse> {
        request.validate()?;

        let channel = self
            .ctx
            .channel_repo()
            .find_by_owner(user_id)
            .await?
            .ok_or(DomainError::NoChannelForUser(user_id))?;

        let mut video = Video::new(
            self.ctx.generate_id(),
            channel.id,
            request.title.trim().to_string(),
            request.video_url,
            request.thumbnail,
        );
        video.description = request.description;
        video.duration_secs = request.duration_secs;
        video.category = request.category.unwrap_or_default();
        video.visibility = request.visibility.unwrap_or_default();

        self.ctx.video_repo().create(&video).await?;

        if let Err(e) = self.ctx.channel_repo().add_video(channel.id, video.id).await {
            error!(
                video_id = %video.id,
                channel_id = %channel.id,
                error = %e,
                "Video stored but not added to its channel"
            );
            return Err(ServiceError::incomplete("add video to channel", e));
        }

        info!(video_id = %video.id, channel_id = %channel.id, user_id = %user_id, "Video created");

        Ok(VideoResponse::from(&video))
    }

    /// Fetch a video for viewing; counts one view
    #[instrument(skip(self))]
    pub async fn get_video(&self, video_id: Snowflake) -> ServiceResult<VideoDetailResponse> {
        let views = self.ctx.video_repo().increment_views(video_id).await?;

        let mut video = self.get_video_entity(video_id).await?;
        // Concurrent viewers may have moved past our increment
        video.views = video.views.max(views);

        let channel = self.ctx.channel_repo().find_by_id(video.channel_id).await?;
        let comment_count = self.ctx.comment_repo().count_by_video(video_id).await?;

        Ok(VideoDetailResponse::from(VideoWithDetails {
            video: &video,
            channel: channel.as_ref(),
            comment_count,
        }))
    }

    /// Get video entity by ID without counting a view
    pub async fn get_video_entity(&self, video_id: Snowflake) -> ServiceResult<Video> {
        self.ctx
            .video_repo()
            .find_by_id(video_id)
            .await?
            .ok_or_else(|| DomainError::VideoNotFound(video_id).into())
    }

    /// Edit a video's metadata; channel owner only
    #[instrument(skip(self, request))]
    pub async fn update_video(
        &self,
        video_id: Snowflake,
        user_id: Snowflake,
        request: UpdateVideoRequest,
    ) -> ServiceResult<VideoResponse> {
        request.validate()?;

        let video = self.get_video_entity(video_id).await?;
        self.require_channel_owner(&video, user_id).await?;

        let mut details = video.details();
        if let Some(title) = request.title {
            details.title = title.trim().to_string();
        }
        if let Some(description) = request.description {
            details.description = description;
        }
        if let Some(thumbnail) = request.thumbnail {
            details.thumbnail = thumbnail;
        }
        if let Some(category) = request.category {
            details.category = category;
        }
        if let Some(visibility) = request.visibility {
            details.visibility = visibility;
        }

        let updated = self
            .ctx
            .video_repo()
            .update_details(video_id, &details)
            .await?;

        info!(video_id = %video_id, user_id = %user_id, "Video updated");

        Ok(VideoResponse::from(updated))
    }

    /// Delete a video with all of its comments; channel owner only
    #[instrument(skip(self))]
    pub async fn delete_video(&self, video_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        let video = self.get_video_entity(video_id).await?;
        self.require_channel_owner(&video, user_id).await?;

        let comments = self.ctx.comment_repo().delete_by_video(video_id).await?;

        if let Err(e) = self.ctx.video_repo().delete(video_id).await {
            error!(video_id = %video_id, error = %e, "Comments removed but video delete failed");
            return Err(ServiceError::incomplete("delete video after its comments", e));
        }
        if let Err(e) = self
            .ctx
            .channel_repo()
            .remove_video(video.channel_id, video_id)
            .await
        {
            error!(
                video_id = %video_id,
                channel_id = %video.channel_id,
                error = %e,
                "Video deleted but still listed on its channel"
            );
            return Err(ServiceError::incomplete("remove video from channel", e));
        }

        info!(video_id = %video_id, user_id = %user_id, comments, "Video deleted");
        Ok(())
    }

    /// List videos across all channels
    #[instrument(skip(self))]
    pub async fn list_videos(&self, query: ListVideosQuery) -> ServiceResult<Page<VideoResponse>> {
        query.validate()?;

        let filter = VideoFilter {
            channel_id: None,
            category: parse_category(query.category.as_deref())?,
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        };
        let sort = query
            .sort
            .as_deref()
            .map(VideoSort::from_str)
            .transpose()?
            .unwrap_or_default();

        let request = self.ctx.page_request(
            query.paging.page,
            query.paging.page_size,
            self.ctx.listing().video_page_size,
        );
        let total = self.ctx.video_repo().count(&filter).await?;
        let window = request.window(total);
        if window.is_past_end() {
            return Ok(Page::empty(total, window));
        }

        let videos = self
            .ctx
            .video_repo()
            .find_page(&filter, sort, window.offset, window.limit)
            .await?;

        Ok(Page::new(videos, total, window).map(VideoResponse::from))
    }

    async fn require_channel_owner(&self, video: &Video, user_id: Snowflake) -> ServiceResult<()> {
        let channel = self
            .ctx
            .channel_repo()
            .find_by_id(video.channel_id)
            .await?
            .ok_or(DomainError::ChannelNotFound(video.channel_id))?;

        if !channel.is_owner(user_id) {
            return Err(DomainError::NotChannelOwner.into());
        }
        Ok(())
    }
}

/// `None` and `All` mean no category filter
fn parse_category(value: Option<&str>) -> ServiceResult<Option<Category>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case(ALL_CATEGORIES) => Ok(None),
        Some(v) => Ok(Some(Category::from_str(v)?)),
    }
}
