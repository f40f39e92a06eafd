//! Multi-step operations that fail or race after their first mutation
//!
//! Run with: cargo test -p integration-tests --test partial_failure_tests

use std::sync::Arc;

use integration_tests::{
    assert_error_code, assert_status, faulty_context, seed_comment, seed_reply, seed_user,
    seed_world, CommentFault, FailingSubscriptions, FaultyComments,
};
use vidshare_db::MemoryStore;
use vidshare_service::dto::CreateCommentRequest;
use vidshare_service::{CommentService, ServiceContext, SubscriptionService};

fn comments_context(store: &Arc<MemoryStore>, fault: CommentFault) -> anyhow::Result<ServiceContext> {
    Ok(faulty_context(
        store.clone(),
        store.clone(),
        Arc::new(FaultyComments::new(store.clone(), fault)),
    )?)
}

#[tokio::test]
async fn test_subscription_left_under_linked_when_user_step_fails() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let ctx = faulty_context(
        store.clone(),
        Arc::new(FailingSubscriptions::new(store.clone())),
        store.clone(),
    )?;
    let world = seed_world(&ctx).await?;
    let viewer = seed_user(&ctx).await?;

    let err = assert_status(
        SubscriptionService::new(&ctx)
            .toggle_subscription(world.channel, viewer)
            .await,
        500,
    );
    assert_eq!(err.error_code(), "INCOMPLETE_OPERATION");

    // The channel step stays applied
    let channel = ctx
        .channel_repo()
        .find_by_id(world.channel)
        .await?
        .ok_or_else(|| anyhow::anyhow!("channel missing"))?;
    assert!(channel.has_subscriber(viewer));
    assert_eq!(channel.subscriber_count, 1);
    assert!(channel.counters_consistent());

    let user = ctx
        .user_repo()
        .find_by_id(viewer)
        .await?
        .ok_or_else(|| anyhow::anyhow!("user missing"))?;
    assert!(user.subscribed_channel_ids.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_reply_left_unlinked_when_link_step_fails() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let ctx = comments_context(&store, CommentFault::LinkFails)?;
    let world = seed_world(&ctx).await?;
    let parent = seed_comment(&ctx, world.video, world.owner, "parent").await?;

    let err = assert_status(
        CommentService::new(&ctx)
            .create_comment(world.video, world.owner, CreateCommentRequest::reply(parent, "re"))
            .await,
        500,
    );
    assert_eq!(err.error_code(), "INCOMPLETE_OPERATION");

    // Reply stored, parent never learned about it
    assert_eq!(store.comment_count(), 2);
    let parent = ctx
        .comment_repo()
        .find_by_id(parent)
        .await?
        .ok_or_else(|| anyhow::anyhow!("parent missing"))?;
    assert!(parent.reply_ids.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_reply_discarded_when_parent_deleted_before_link() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let ctx = comments_context(&store, CommentFault::ParentVanishes)?;
    let world = seed_world(&ctx).await?;
    let parent = seed_comment(&ctx, world.video, world.owner, "short lived").await?;

    let err = assert_error_code(
        CommentService::new(&ctx)
            .create_comment(world.video, world.owner, CreateCommentRequest::reply(parent, "late"))
            .await,
        "UNKNOWN_COMMENT",
    );
    assert_eq!(err.status_code(), 404);
    assert_eq!(store.comment_count(), 0);
    assert_eq!(ctx.comment_repo().count_by_video(world.video).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_reply_posted_during_cascade_is_deleted_too() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let ctx = comments_context(&store, CommentFault::ReplyDuringCascade)?;
    let world = seed_world(&ctx).await?;
    let parent = seed_comment(&ctx, world.video, world.owner, "parent").await?;
    seed_reply(&ctx, world.video, world.owner, parent, "one").await?;
    seed_reply(&ctx, world.video, world.owner, parent, "two").await?;

    let deleted = CommentService::new(&ctx)
        .delete_comment(parent, world.owner)
        .await?;
    assert_eq!(deleted.deleted, 4);

    assert_eq!(store.comment_count(), 0);
    assert_eq!(ctx.comment_repo().count_by_video(world.video).await?, 0);
    Ok(())
}
