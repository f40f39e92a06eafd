//! In-memory CommentRepository

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Reverse;
use tracing::instrument;

use vidshare_core::entities::Comment;
use vidshare_core::error::DomainError;
use vidshare_core::traits::{CommentRepository, RepoResult};
use vidshare_core::value_objects::Snowflake;

use super::{collect_ids, set_insert, set_remove, slice_page, MemoryStore};

impl MemoryStore {
    fn with_comment<F, T>(&self, id: Snowflake, f: F) -> RepoResult<T>
    where
        F: FnOnce(&mut Comment) -> T,
    {
        let mut entry = self
            .comments
            .get_mut(&id)
            .ok_or(DomainError::CommentNotFound(id))?;
        Ok(f(entry.value_mut()))
    }

    /// Remove every comment matching `pred`, one entry at a time
    fn delete_where<P>(&self, pred: P) -> u64
    where
        P: Fn(&Comment) -> bool,
    {
        let ids: Vec<Snowflake> = self
            .comments
            .iter()
            .filter(|c| pred(c.value()))
            .map(|c| c.id)
            .collect();
        ids.into_iter()
            .filter(|id| self.comments.remove(id).is_some())
            .count() as u64
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        Ok(self.comments.get(&id).map(|c| c.value().clone()))
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Comment>> {
        Ok(collect_ids(&self.comments, ids))
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        self.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn update_content(&self, id: Snowflake, content: &str) -> RepoResult<Comment> {
        self.with_comment(id, |c| {
            c.content = content.to_string();
            c.updated_at = Utc::now();
            c.clone()
        })
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        self.comments
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::CommentNotFound(id))
    }

    async fn delete_by_parent(&self, parent_id: Snowflake) -> RepoResult<u64> {
        Ok(self.delete_where(|c| c.parent_id == Some(parent_id)))
    }

    async fn delete_by_video(&self, video_id: Snowflake) -> RepoResult<u64> {
        Ok(self.delete_where(|c| c.video_id == video_id))
    }

    async fn add_reply(&self, parent_id: Snowflake, reply_id: Snowflake) -> RepoResult<()> {
        self.with_comment(parent_id, |c| {
            if !c.reply_ids.contains(&reply_id) {
                // Newest reply first
                c.reply_ids.insert(0, reply_id);
            }
        })
    }

    async fn remove_reply(&self, parent_id: Snowflake, reply_id: Snowflake) -> RepoResult<()> {
        self.with_comment(parent_id, |c| {
            set_remove(&mut c.reply_ids, reply_id);
        })
    }

    async fn add_like(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<i64> {
        self.with_comment(id, |c| {
            set_insert(&mut c.liker_ids, user_id);
            c.likes()
        })
    }

    async fn remove_like(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<i64> {
        self.with_comment(id, |c| {
            set_remove(&mut c.liker_ids, user_id);
            c.likes()
        })
    }

    async fn find_top_level(
        &self,
        video_id: Snowflake,
        offset: u64,
        limit: u32,
    ) -> RepoResult<Vec<Comment>> {
        let mut top: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.video_id == video_id && c.is_top_level())
            .map(|c| c.value().clone())
            .collect();
        top.sort_by_key(|c| Reverse((c.created_at, c.id)));
        Ok(slice_page(top, offset, limit))
    }

    async fn count_top_level(&self, video_id: Snowflake) -> RepoResult<u64> {
        Ok(self
            .comments
            .iter()
            .filter(|c| c.video_id == video_id && c.is_top_level())
            .count() as u64)
    }

    async fn count_by_video(&self, video_id: Snowflake) -> RepoResult<u64> {
        Ok(self
            .comments
            .iter()
            .filter(|c| c.video_id == video_id)
            .count() as u64)
    }
}
