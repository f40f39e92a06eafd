//! Comment service
//!
//! Threads are exactly two levels deep: top-level comments hold replies,
//! replies hold nothing. Deleting a top-level comment deletes its replies
//! first; deleting a reply unlinks it from its parent first.

use std::cmp::Reverse;
use std::collections::HashMap;

use tracing::{error, info, instrument, warn};
use validator::Validate;
use vidshare_core::entities::{Comment, User};
use vidshare_core::{DomainError, Page, Snowflake};

use crate::dto::{
    CommentLikeResponse, CommentResponse, CommentWithAuthor, CreateCommentRequest,
    DeleteCommentResponse, PageQuery, UpdateCommentRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    /// Create a new CommentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post a comment on a video, or a reply when `request.parent_id` is set
    #[instrument(skip(self, request))]
    pub async fn create_comment(
        &self,
        video_id: Snowflake,
        user_id: Snowflake,
        request: CreateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        request.validate()?;

        self.ctx
            .video_repo()
            .find_by_id(video_id)
            .await?
            .ok_or(DomainError::VideoNotFound(video_id))?;

        let author = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        let id = self.ctx.generate_id();
        let comment = match request.parent_id {
            Some(parent_id) => {
                let parent = self.get_comment(parent_id).await?;
                if parent.is_reply() {
                    return Err(DomainError::NestedReply.into());
                }
                if parent.video_id != video_id {
                    return Err(DomainError::ReplyVideoMismatch.into());
                }
                Comment::new_reply(id, user_id, video_id, parent_id, request.content)
            }
            None => Comment::new(id, user_id, video_id, request.content),
        };

        self.ctx.comment_repo().create(&comment).await?;

        if let Some(parent_id) = comment.parent_id {
            if let Err(e) = self.ctx.comment_repo().add_reply(parent_id, comment.id).await {
                if e.is_not_found() {
                    // Parent was deleted after it was read
                    return Err(self.discard_orphan_reply(&comment, parent_id).await);
                }
                error!(
                    comment_id = %comment.id,
                    parent_id = %parent_id,
                    error = %e,
                    "Reply stored but not linked to its parent"
                );
                return Err(ServiceError::incomplete("link reply to parent", e));
            }
        }

        info!(
            comment_id = %comment.id,
            video_id = %video_id,
            user_id = %user_id,
            parent_id = ?comment.parent_id,
            "Comment created"
        );

        Ok(CommentResponse::with_author(&comment, Some(&author)))
    }

    /// Replace the content of a comment; author only
    #[instrument(skip(self, request))]
    pub async fn edit_comment(
        &self,
        comment_id: Snowflake,
        user_id: Snowflake,
        request: UpdateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        request.validate()?;

        let comment = self.get_comment(comment_id).await?;
        if !comment.is_author(user_id) {
            return Err(DomainError::NotCommentAuthor.into());
        }

        let updated = self
            .ctx
            .comment_repo()
            .update_content(comment_id, &request.content)
            .await?;
        let author = self.ctx.user_repo().find_by_id(updated.author_id).await?;

        info!(comment_id = %comment_id, user_id = %user_id, "Comment edited");

        Ok(CommentResponse::with_author(&updated, author.as_ref()))
    }

    /// Delete a comment; author only.
    ///
    /// A top-level comment takes all of its replies with it. A reply is
    /// removed from its parent's reply list; the parent stays.
    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        comment_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<DeleteCommentResponse> {
        let comment = self.get_comment(comment_id).await?;
        if !comment.is_author(user_id) {
            return Err(DomainError::NotCommentAuthor.into());
        }

        let (first_step, cascaded) = match comment.parent_id {
            None => {
                let removed = self.ctx.comment_repo().delete_by_parent(comment_id).await?;
                ("delete comment after its replies", removed)
            }
            Some(parent_id) => {
                match self.ctx.comment_repo().remove_reply(parent_id, comment_id).await {
                    Ok(()) => {}
                    // A missing parent holds no link to remove
                    Err(e) if e.is_not_found() => {
                        warn!(comment_id = %comment_id, parent_id = %parent_id, "Parent comment missing");
                    }
                    Err(e) => return Err(e.into()),
                }
                ("delete reply after unlinking it", 0)
            }
        };

        if let Err(e) = self.ctx.comment_repo().delete(comment_id).await {
            error!(comment_id = %comment_id, error = %e, "Comment delete left partial state");
            return Err(ServiceError::incomplete(first_step, e));
        }

        // Replies stored between the cascade and the delete
        let late = if comment.is_top_level() {
            match self.ctx.comment_repo().delete_by_parent(comment_id).await {
                Ok(n) => n,
                Err(e) => {
                    error!(comment_id = %comment_id, error = %e, "Late replies not deleted");
                    return Err(ServiceError::incomplete("delete replies posted during delete", e));
                }
            }
        } else {
            0
        };

        let deleted = cascaded + late + 1;
        info!(
            comment_id = %comment_id,
            user_id = %user_id,
            deleted,
            "Comment deleted"
        );

        Ok(DeleteCommentResponse { deleted })
    }

    /// Like the comment, or remove the like if already liked
    #[instrument(skip(self))]
    pub async fn toggle_comment_like(
        &self,
        comment_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<CommentLikeResponse> {
        let comment = self.get_comment(comment_id).await?;

        let liked = !comment.is_liked_by(user_id);
        let likes = if liked {
            self.ctx.comment_repo().add_like(comment_id, user_id).await?
        } else {
            self.ctx.comment_repo().remove_like(comment_id, user_id).await?
        };

        info!(comment_id = %comment_id, user_id = %user_id, liked, likes, "Comment like toggled");

        Ok(CommentLikeResponse { liked, likes })
    }

    /// Remove a reply whose parent vanished before the reply was linked
    async fn discard_orphan_reply(&self, reply: &Comment, parent_id: Snowflake) -> ServiceError {
        if let Err(e) = self.ctx.comment_repo().delete(reply.id).await {
            error!(comment_id = %reply.id, parent_id = %parent_id, error = %e, "Orphan reply not removed");
            return ServiceError::incomplete("discard reply to deleted parent", e);
        }
        warn!(comment_id = %reply.id, parent_id = %parent_id, "Parent deleted while replying");
        DomainError::CommentNotFound(parent_id).into()
    }

    /// Top-level comments of a video, newest first, each with its replies
    #[instrument(skip(self))]
    pub async fn list_video_comments(
        &self,
        video_id: Snowflake,
        query: PageQuery,
    ) -> ServiceResult<Page<CommentResponse>> {
        query.validate()?;

        self.ctx
            .video_repo()
            .find_by_id(video_id)
            .await?
            .ok_or(DomainError::VideoNotFound(video_id))?;

        let request = self.ctx.page_request(
            query.page,
            query.page_size,
            self.ctx.listing().comment_page_size,
        );
        let total = self.ctx.comment_repo().count_top_level(video_id).await?;
        let window = request.window(total);
        if window.is_past_end() {
            return Ok(Page::empty(total, window));
        }

        let top_level = self
            .ctx
            .comment_repo()
            .find_top_level(video_id, window.offset, window.limit)
            .await?;

        let reply_ids: Vec<Snowflake> = top_level
            .iter()
            .flat_map(|c| c.reply_ids.iter().copied())
            .collect();
        let mut replies = self.ctx.comment_repo().find_by_ids(&reply_ids).await?;
        replies.sort_by_key(|c| Reverse((c.created_at, c.id)));

        let authors = self.load_authors(top_level.iter().chain(&replies)).await?;

        let mut replies_by_parent: HashMap<Snowflake, Vec<CommentResponse>> = HashMap::new();
        for reply in &replies {
            if let Some(parent_id) = reply.parent_id {
                replies_by_parent
                    .entry(parent_id)
                    .or_default()
                    .push(CommentResponse::from(CommentWithAuthor {
                        comment: reply,
                        authors: &authors,
                        replies: Vec::new(),
                    }));
            }
        }

        let items = top_level
            .iter()
            .map(|comment| {
                CommentResponse::from(CommentWithAuthor {
                    comment,
                    authors: &authors,
                    replies: replies_by_parent.remove(&comment.id).unwrap_or_default(),
                })
            })
            .collect();

        Ok(Page::new(items, total, window))
    }

    async fn get_comment(&self, comment_id: Snowflake) -> ServiceResult<Comment> {
        self.ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::CommentNotFound(comment_id).into())
    }

    async fn load_authors(
        &self,
        comments: impl Iterator<Item = &Comment>,
    ) -> ServiceResult<HashMap<Snowflake, User>> {
        let mut ids: Vec<Snowflake> = comments.map(|c| c.author_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let users = self.ctx.user_repo().find_by_ids(&ids).await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }
}
