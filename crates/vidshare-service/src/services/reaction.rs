//! Reaction service
//!
//! Like/dislike toggling on videos. A user is never in both reaction sets:
//! adding one reaction removes the opposite one in the same store mutation.

use tracing::{info, instrument};
use vidshare_core::entities::{ReactionKind, ReactionTally};
use vidshare_core::{DomainError, Snowflake};

use crate::dto::ReactionResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Like the video, or remove the like if the user already liked it
    #[instrument(skip(self))]
    pub async fn toggle_like(
        &self,
        video_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<ReactionResponse> {
        self.toggle(video_id, user_id, ReactionKind::Like).await
    }

    /// Dislike the video, or remove the dislike if the user already disliked it
    #[instrument(skip(self))]
    pub async fn toggle_dislike(
        &self,
        video_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<ReactionResponse> {
        self.toggle(video_id, user_id, ReactionKind::Dislike).await
    }

    async fn toggle(
        &self,
        video_id: Snowflake,
        user_id: Snowflake,
        kind: ReactionKind,
    ) -> ServiceResult<ReactionResponse> {
        let video = self
            .ctx
            .video_repo()
            .find_by_id(video_id)
            .await?
            .ok_or(DomainError::VideoNotFound(video_id))?;

        // A stale read only repeats an idempotent add or remove
        let active = !video.has_reaction(user_id, kind);
        let tally = if active {
            self.ctx
                .video_repo()
                .add_reaction(video_id, user_id, kind)
                .await?
        } else {
            self.ctx
                .video_repo()
                .remove_reaction(video_id, user_id, kind)
                .await?
        };

        info!(
            video_id = %video_id,
            user_id = %user_id,
            reaction = ?kind,
            active,
            likes = tally.likes,
            dislikes = tally.dislikes,
            "Reaction toggled"
        );

        Ok(reaction_response(kind, active, tally))
    }
}

fn reaction_response(kind: ReactionKind, active: bool, tally: ReactionTally) -> ReactionResponse {
    ReactionResponse {
        liked: active && kind == ReactionKind::Like,
        disliked: active && kind == ReactionKind::Dislike,
        likes: tally.likes,
        dislikes: tally.dislikes,
    }
}
