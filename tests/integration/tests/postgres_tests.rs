//! The same consistency properties against PostgreSQL
//!
//! Skipped unless DATABASE_URL is set.
//! Run with: cargo test -p integration-tests --test postgres_tests

use futures::future::join_all;
use integration_tests::{
    assert_error_code, check_test_env, pg_engine, seed_comment, seed_reply, seed_user, seed_users,
    seed_world,
};
use vidshare_service::dto::PageQuery;
use vidshare_service::{CommentService, ReactionService, SubscriptionService};

#[tokio::test]
async fn test_pg_like_dislike_scenario() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let (ctx, _store) = pg_engine().await?;
    let world = seed_world(&ctx).await?;
    let viewer = seed_user(&ctx).await?;
    let reactions = ReactionService::new(&ctx);

    let r = reactions.toggle_like(world.video, viewer).await?;
    assert!(r.liked);
    assert_eq!((r.likes, r.dislikes), (1, 0));

    let r = reactions.toggle_dislike(world.video, viewer).await?;
    assert!(r.disliked && !r.liked);
    assert_eq!((r.likes, r.dislikes), (0, 1));

    let r = reactions.toggle_dislike(world.video, viewer).await?;
    assert_eq!((r.liked, r.disliked, r.likes, r.dislikes), (false, false, 0, 0));
    Ok(())
}

#[tokio::test]
async fn test_pg_self_subscription_rejected() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let (ctx, _store) = pg_engine().await?;
    let world = seed_world(&ctx).await?;

    assert_error_code(
        SubscriptionService::new(&ctx)
            .toggle_subscription(world.channel, world.owner)
            .await,
        "SELF_SUBSCRIPTION",
    );
    let channel = ctx
        .channel_repo()
        .find_by_id(world.channel)
        .await?
        .ok_or_else(|| anyhow::anyhow!("channel missing"))?;
    assert_eq!(channel.subscriber_count, 0);
    Ok(())
}

#[tokio::test]
async fn test_pg_cascade_and_pages() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let (ctx, _store) = pg_engine().await?;
    let world = seed_world(&ctx).await?;
    let comments = CommentService::new(&ctx);

    let parent = seed_comment(&ctx, world.video, world.owner, "parent").await?;
    for i in 0..3 {
        seed_reply(&ctx, world.video, world.owner, parent, &format!("reply {i}")).await?;
    }
    for i in 0..11 {
        seed_comment(&ctx, world.video, world.owner, &format!("filler {i}")).await?;
    }

    let last = comments
        .list_video_comments(world.video, PageQuery::with_size(2, 10))
        .await?;
    assert_eq!(last.total_count, 12);
    assert_eq!(last.total_pages, 2);
    assert_eq!(last.items.len(), 2);

    let deleted = comments.delete_comment(parent, world.owner).await?;
    assert_eq!(deleted.deleted, 4);
    assert_eq!(ctx.comment_repo().count_by_video(world.video).await?, 11);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pg_concurrent_subscriptions_and_likes() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let (ctx, _store) = pg_engine().await?;
    let world = seed_world(&ctx).await?;
    let users = seed_users(&ctx, 16).await?;

    let handles = users.iter().map(|user| {
        let ctx = ctx.clone();
        let (channel, video, user) = (world.channel, world.video, *user);
        tokio::spawn(async move {
            SubscriptionService::new(&ctx)
                .toggle_subscription(channel, user)
                .await?;
            ReactionService::new(&ctx).toggle_like(video, user).await?;
            anyhow::Ok(())
        })
    });
    for result in join_all(handles).await {
        result??;
    }

    let channel = ctx
        .channel_repo()
        .find_by_id(world.channel)
        .await?
        .ok_or_else(|| anyhow::anyhow!("channel missing"))?;
    assert_eq!(channel.subscriber_count, 16);
    assert!(channel.counters_consistent());

    let video = ctx
        .video_repo()
        .find_by_id(world.video)
        .await?
        .ok_or_else(|| anyhow::anyhow!("video missing"))?;
    assert_eq!(video.tally().likes, 16);
    assert!(video.disliker_ids.is_empty());
    Ok(())
}
