//! Repositories that fail or interleave at chosen steps
//!
//! Each wraps a shared `MemoryStore` and delegates every call except the one
//! it is built to disturb, so multi-step service operations can be driven
//! down their partial-failure paths.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use vidshare_core::entities::{Comment, User};
use vidshare_core::traits::{CommentRepository, RepoResult, UserRepository};
use vidshare_core::value_objects::SnowflakeGenerator;
use vidshare_core::{DomainError, Snowflake};
use vidshare_db::MemoryStore;
use vidshare_service::{ServiceContext, ServiceContextBuilder, ServiceResult};

use crate::helpers::next_worker_id;

fn store_down() -> DomainError {
    DomainError::DatabaseError("connection reset".to_string())
}

/// Context over `store` with the given user and comment repositories
pub fn faulty_context(
    store: Arc<MemoryStore>,
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
) -> ServiceResult<ServiceContext> {
    ServiceContextBuilder::new()
        .memory_store(store)
        .user_repo(users)
        .comment_repo(comments)
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(next_worker_id())))
        .build()
}

/// User repository whose subscription writes always fail
pub struct FailingSubscriptions {
    inner: Arc<MemoryStore>,
}

impl FailingSubscriptions {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl UserRepository for FailingSubscriptions {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        UserRepository::find_by_id(&*self.inner, id).await
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        UserRepository::find_by_ids(&*self.inner, ids).await
    }

    async fn create(&self, user: &User) -> RepoResult<()> {
        UserRepository::create(&*self.inner, user).await
    }

    async fn add_owned_channel(&self, user_id: Snowflake, channel_id: Snowflake) -> RepoResult<()> {
        self.inner.add_owned_channel(user_id, channel_id).await
    }

    async fn add_subscription(&self, _user_id: Snowflake, _channel_id: Snowflake) -> RepoResult<()> {
        Err(store_down())
    }

    async fn remove_subscription(
        &self,
        _user_id: Snowflake,
        _channel_id: Snowflake,
    ) -> RepoResult<()> {
        Err(store_down())
    }
}

/// How a [`FaultyComments`] repository disturbs the comment operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentFault {
    /// Linking a reply into its parent fails
    LinkFails,
    /// The parent is deleted just before a reply is linked into it
    ParentVanishes,
    /// A reply to the parent lands right after the first cascade step
    ReplyDuringCascade,
}

/// Comment repository that injects one [`CommentFault`]
pub struct FaultyComments {
    inner: Arc<MemoryStore>,
    fault: CommentFault,
    fired: AtomicBool,
    ids: SnowflakeGenerator,
}

impl FaultyComments {
    pub fn new(inner: Arc<MemoryStore>, fault: CommentFault) -> Self {
        Self {
            inner,
            fault,
            fired: AtomicBool::new(false),
            ids: SnowflakeGenerator::new(next_worker_id()),
        }
    }

    /// True exactly once, on the first call that may fire `fault`
    fn fire(&self, fault: CommentFault) -> bool {
        self.fault == fault && !self.fired.swap(true, Ordering::SeqCst)
    }

    /// Store and link a reply to `parent_id`, as a concurrent writer would
    async fn inject_reply(&self, parent_id: Snowflake) -> RepoResult<()> {
        let Some(parent) = CommentRepository::find_by_id(&*self.inner, parent_id).await? else {
            return Ok(());
        };
        let reply = Comment::new_reply(
            self.ids.generate(),
            parent.author_id,
            parent.video_id,
            parent_id,
            "just in time".to_string(),
        );
        CommentRepository::create(&*self.inner, &reply).await?;
        self.inner.add_reply(parent_id, reply.id).await
    }
}

#[async_trait]
impl CommentRepository for FaultyComments {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        CommentRepository::find_by_id(&*self.inner, id).await
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Comment>> {
        CommentRepository::find_by_ids(&*self.inner, ids).await
    }

    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        CommentRepository::create(&*self.inner, comment).await
    }

    async fn update_content(&self, id: Snowflake, content: &str) -> RepoResult<Comment> {
        self.inner.update_content(id, content).await
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        CommentRepository::delete(&*self.inner, id).await
    }

    async fn delete_by_parent(&self, parent_id: Snowflake) -> RepoResult<u64> {
        let removed = self.inner.delete_by_parent(parent_id).await?;
        if self.fire(CommentFault::ReplyDuringCascade) {
            self.inject_reply(parent_id).await?;
        }
        Ok(removed)
    }

    async fn delete_by_video(&self, video_id: Snowflake) -> RepoResult<u64> {
        self.inner.delete_by_video(video_id).await
    }

    async fn add_reply(&self, parent_id: Snowflake, reply_id: Snowflake) -> RepoResult<()> {
        if self.fire(CommentFault::LinkFails) {
            return Err(store_down());
        }
        if self.fire(CommentFault::ParentVanishes) {
            self.inner.delete_by_parent(parent_id).await?;
            CommentRepository::delete(&*self.inner, parent_id).await?;
        }
        self.inner.add_reply(parent_id, reply_id).await
    }

    async fn remove_reply(&self, parent_id: Snowflake, reply_id: Snowflake) -> RepoResult<()> {
        self.inner.remove_reply(parent_id, reply_id).await
    }

    async fn add_like(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<i64> {
        self.inner.add_like(id, user_id).await
    }

    async fn remove_like(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<i64> {
        self.inner.remove_like(id, user_id).await
    }

    async fn find_top_level(
        &self,
        video_id: Snowflake,
        offset: u64,
        limit: u32,
    ) -> RepoResult<Vec<Comment>> {
        self.inner.find_top_level(video_id, offset, limit).await
    }

    async fn count_top_level(&self, video_id: Snowflake) -> RepoResult<u64> {
        self.inner.count_top_level(video_id).await
    }

    async fn count_by_video(&self, video_id: Snowflake) -> RepoResult<u64> {
        self.inner.count_by_video(video_id).await
    }
}
