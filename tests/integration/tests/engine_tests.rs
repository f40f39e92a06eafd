//! Consistency properties of the interaction engines over the in-memory store
//!
//! Run with: cargo test -p integration-tests --test engine_tests

use futures::future::join_all;
use integration_tests::{
    assert_error_code, parse_id, seed_comment, seed_reply, seed_user, seed_users, seed_video,
    seed_world, TestEngine,
};
use vidshare_core::Snowflake;
use vidshare_service::dto::{CreateCommentRequest, PageQuery};
use vidshare_service::{
    ChannelService, CommentService, ReactionService, SubscriptionService, VideoService,
};

// ============================================================================
// Reaction Engine
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reaction {
    None,
    Like,
    Dislike,
}

impl Reaction {
    fn after_like(self) -> Self {
        if self == Reaction::Like {
            Reaction::None
        } else {
            Reaction::Like
        }
    }

    fn after_dislike(self) -> Self {
        if self == Reaction::Dislike {
            Reaction::None
        } else {
            Reaction::Dislike
        }
    }
}

/// Deterministic LCG so sequences are reproducible
fn next_rand(seed: &mut u64) -> u64 {
    *seed = seed
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407);
    *seed >> 33
}

async fn assert_reactions_exclusive(engine: &TestEngine, video: Snowflake) -> anyhow::Result<()> {
    let video = engine.video(video).await?;
    for liker in &video.liker_ids {
        assert!(
            !video.disliker_ids.contains(liker),
            "user {liker} both likes and dislikes"
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_like_dislike_scenario() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    let viewer = seed_user(&engine.ctx).await?;
    let reactions = ReactionService::new(&engine.ctx);

    let r = reactions.toggle_like(world.video, viewer).await?;
    assert!(r.liked && !r.disliked);
    assert_eq!((r.likes, r.dislikes), (1, 0));

    let r = reactions.toggle_dislike(world.video, viewer).await?;
    assert!(!r.liked && r.disliked);
    assert_eq!((r.likes, r.dislikes), (0, 1));

    let r = reactions.toggle_dislike(world.video, viewer).await?;
    assert!(!r.liked && !r.disliked);
    assert_eq!((r.likes, r.dislikes), (0, 0));

    let video = engine.video(world.video).await?;
    assert!(video.liker_ids.is_empty());
    assert!(video.disliker_ids.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_double_toggle_restores_state() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    let users = seed_users(&engine.ctx, 3).await?;
    let reactions = ReactionService::new(&engine.ctx);

    reactions.toggle_dislike(world.video, users[0]).await?;
    reactions.toggle_like(world.video, users[1]).await?;
    let before = engine.video(world.video).await?;

    reactions.toggle_like(world.video, users[2]).await?;
    reactions.toggle_like(world.video, users[2]).await?;
    reactions.toggle_dislike(world.video, users[2]).await?;
    reactions.toggle_dislike(world.video, users[2]).await?;

    let after = engine.video(world.video).await?;
    assert_eq!(before.liker_ids, after.liker_ids);
    assert_eq!(before.disliker_ids, after.disliker_ids);
    Ok(())
}

#[tokio::test]
async fn test_reaction_sequence_matches_model() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    let users = seed_users(&engine.ctx, 5).await?;
    let reactions = ReactionService::new(&engine.ctx);

    let mut model = vec![Reaction::None; users.len()];
    let mut seed = 42;
    for _ in 0..200 {
        let who = (next_rand(&mut seed) % users.len() as u64) as usize;
        let response = if next_rand(&mut seed) % 2 == 0 {
            model[who] = model[who].after_like();
            reactions.toggle_like(world.video, users[who]).await?
        } else {
            model[who] = model[who].after_dislike();
            reactions.toggle_dislike(world.video, users[who]).await?
        };

        assert_eq!(response.liked, model[who] == Reaction::Like);
        assert_eq!(response.disliked, model[who] == Reaction::Dislike);
        let likes = model.iter().filter(|r| **r == Reaction::Like).count() as i64;
        let dislikes = model.iter().filter(|r| **r == Reaction::Dislike).count() as i64;
        assert_eq!((response.likes, response.dislikes), (likes, dislikes));
    }

    assert_reactions_exclusive(&engine, world.video).await
}

#[tokio::test]
async fn test_reaction_on_missing_video() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let viewer = seed_user(&engine.ctx).await?;
    let reactions = ReactionService::new(&engine.ctx);

    let missing = engine.ctx.generate_id();
    assert_error_code(reactions.toggle_like(missing, viewer).await, "UNKNOWN_VIDEO");
    assert_error_code(reactions.toggle_dislike(missing, viewer).await, "UNKNOWN_VIDEO");
    Ok(())
}

// ============================================================================
// Subscription Engine
// ============================================================================

#[tokio::test]
async fn test_subscription_counter_tracks_members() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    let users = seed_users(&engine.ctx, 4).await?;
    let subscriptions = SubscriptionService::new(&engine.ctx);

    for (i, user) in users.iter().enumerate() {
        let r = subscriptions.toggle_subscription(world.channel, *user).await?;
        assert!(r.subscribed);
        assert_eq!(r.subscriber_count, i as i64 + 1);
    }

    let r = subscriptions.toggle_subscription(world.channel, users[1]).await?;
    assert!(!r.subscribed);
    assert_eq!(r.subscriber_count, 3);

    let channel = engine.channel(world.channel).await?;
    assert!(channel.counters_consistent());
    assert!(!channel.has_subscriber(users[1]));

    let listed = subscriptions.list_subscriptions(users[0]).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(parse_id(&listed[0].id)?, world.channel);
    assert!(subscriptions.list_subscriptions(users[1]).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_self_subscription_leaves_state_untouched() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    let subscriptions = SubscriptionService::new(&engine.ctx);

    let err = assert_error_code(
        subscriptions.toggle_subscription(world.channel, world.owner).await,
        "SELF_SUBSCRIPTION",
    );
    assert_eq!(err.status_code(), 400);

    let channel = engine.channel(world.channel).await?;
    assert_eq!(channel.subscriber_count, 0);
    assert!(channel.subscriber_ids.is_empty());
    assert!(subscriptions.list_subscriptions(world.owner).await?.is_empty());
    Ok(())
}

// ============================================================================
// Comment Thread Engine
// ============================================================================

#[tokio::test]
async fn test_cascade_removes_parent_and_replies() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    let author = seed_user(&engine.ctx).await?;
    let comments = CommentService::new(&engine.ctx);

    let other = seed_comment(&engine.ctx, world.video, author, "stays").await?;
    let parent = seed_comment(&engine.ctx, world.video, author, "goes").await?;
    for i in 0..5 {
        seed_reply(&engine.ctx, world.video, world.owner, parent, &format!("reply {i}")).await?;
    }
    let before = engine.ctx.comment_repo().count_by_video(world.video).await?;
    assert_eq!(before, 7);

    let deleted = comments.delete_comment(parent, author).await?;
    assert_eq!(deleted.deleted, 6);

    let after = engine.ctx.comment_repo().count_by_video(world.video).await?;
    assert_eq!(after, before - 6);
    assert!(engine.ctx.comment_repo().find_by_id(other).await?.is_some());
    assert!(engine.ctx.comment_repo().find_by_id(parent).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_reply_deletion_is_isolated() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    let comments = CommentService::new(&engine.ctx);

    let parent = seed_comment(&engine.ctx, world.video, world.owner, "parent").await?;
    let doomed = seed_reply(&engine.ctx, world.video, world.owner, parent, "one").await?;
    let sibling = seed_reply(&engine.ctx, world.video, world.owner, parent, "two").await?;

    let deleted = comments.delete_comment(doomed, world.owner).await?;
    assert_eq!(deleted.deleted, 1);

    let parent = engine
        .ctx
        .comment_repo()
        .find_by_id(parent)
        .await?
        .ok_or_else(|| anyhow::anyhow!("parent removed"))?;
    assert_eq!(parent.reply_ids, vec![sibling]);
    assert!(engine.ctx.comment_repo().find_by_id(sibling).await?.is_some());
    assert_eq!(engine.ctx.comment_repo().count_by_video(world.video).await?, 2);
    Ok(())
}

#[tokio::test]
async fn test_thread_depth_is_two() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    let comments = CommentService::new(&engine.ctx);

    let parent = seed_comment(&engine.ctx, world.video, world.owner, "parent").await?;
    let reply = seed_reply(&engine.ctx, world.video, world.owner, parent, "reply").await?;

    assert_error_code(
        comments
            .create_comment(world.video, world.owner, CreateCommentRequest::reply(reply, "deeper"))
            .await,
        "NESTED_REPLY",
    );
    assert_eq!(engine.ctx.comment_repo().count_by_video(world.video).await?, 2);
    Ok(())
}

#[tokio::test]
async fn test_only_author_edits_and_deletes() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    let stranger = seed_user(&engine.ctx).await?;
    let comments = CommentService::new(&engine.ctx);

    let comment = seed_comment(&engine.ctx, world.video, world.owner, "mine").await?;
    assert_error_code(comments.delete_comment(comment, stranger).await, "NOT_COMMENT_AUTHOR");
    assert!(engine.ctx.comment_repo().find_by_id(comment).await?.is_some());
    Ok(())
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_comment_pages_are_newest_first_and_disjoint() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    let comments = CommentService::new(&engine.ctx);

    let mut created = Vec::new();
    for i in 0..25 {
        created.push(seed_comment(&engine.ctx, world.video, world.owner, &format!("c{i}")).await?);
    }
    created.reverse();

    let mut seen = Vec::new();
    for page in 1..=3 {
        let listed = comments
            .list_video_comments(world.video, PageQuery::with_size(page, 10))
            .await?;
        assert_eq!(listed.total_count, 25);
        assert_eq!(listed.total_pages, 3);
        assert_eq!(listed.current_page, page);
        for item in listed.items {
            seen.push(parse_id(&item.id)?);
        }
    }
    assert_eq!(seen, created);

    let past = comments
        .list_video_comments(world.video, PageQuery::with_size(4, 10))
        .await?;
    assert!(past.items.is_empty());
    assert_eq!(past.current_page, 4);
    assert_eq!(past.total_pages, 3);
    Ok(())
}

#[tokio::test]
async fn test_empty_listing_has_zero_pages() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;

    let listed = CommentService::new(&engine.ctx)
        .list_video_comments(world.video, PageQuery::with_size(1, 10))
        .await?;
    assert!(listed.items.is_empty());
    assert_eq!(listed.total_count, 0);
    assert_eq!(listed.total_pages, 0);
    assert_eq!(listed.current_page, 1);
    Ok(())
}

#[tokio::test]
async fn test_channel_video_pages() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    for i in 0..24 {
        seed_video(&engine.ctx, world.owner, &format!("video {i}")).await?;
    }

    let page = ChannelService::new(&engine.ctx)
        .list_channel_videos(world.channel, PageQuery::with_size(3, 10))
        .await?;
    assert_eq!(page.total_count, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 5);
    // Oldest video lands last
    assert_eq!(parse_id(&page.items[4].id)?, world.video);
    Ok(())
}

// ============================================================================
// Video lifecycle
// ============================================================================

#[tokio::test]
async fn test_video_delete_removes_comments_and_channel_link() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    let parent = seed_comment(&engine.ctx, world.video, world.owner, "parent").await?;
    seed_reply(&engine.ctx, world.video, world.owner, parent, "reply").await?;

    VideoService::new(&engine.ctx)
        .delete_video(world.video, world.owner)
        .await?;

    assert!(engine.ctx.video_repo().find_by_id(world.video).await?.is_none());
    assert_eq!(engine.ctx.comment_repo().count_by_video(world.video).await?, 0);
    let channel = engine.channel(world.channel).await?;
    assert_eq!(channel.video_count, 0);
    assert!(channel.counters_consistent());
    Ok(())
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_likes_all_counted() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    let users = seed_users(&engine.ctx, 32).await?;

    let handles = users.iter().map(|user| {
        let ctx = engine.ctx.clone();
        let (video, user) = (world.video, *user);
        tokio::spawn(async move { ReactionService::new(&ctx).toggle_like(video, user).await })
    });
    for result in join_all(handles).await {
        result??;
    }
    assert_eq!(engine.video(world.video).await?.tally().likes, 32);

    // Everyone flips to dislike at once
    let handles = users.iter().map(|user| {
        let ctx = engine.ctx.clone();
        let (video, user) = (world.video, *user);
        tokio::spawn(async move { ReactionService::new(&ctx).toggle_dislike(video, user).await })
    });
    for result in join_all(handles).await {
        result??;
    }

    let tally = engine.video(world.video).await?.tally();
    assert_eq!((tally.likes, tally.dislikes), (0, 32));
    assert_reactions_exclusive(&engine, world.video).await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reaction_sequences_match_model() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    let users = seed_users(&engine.ctx, 16).await?;

    let handles = users.iter().enumerate().map(|(i, user)| {
        let ctx = engine.ctx.clone();
        let (video, user) = (world.video, *user);
        tokio::spawn(async move {
            let reactions = ReactionService::new(&ctx);
            let mut seed = i as u64 + 1;
            let mut state = Reaction::None;
            for _ in 0..25 {
                if next_rand(&mut seed) % 2 == 0 {
                    state = state.after_like();
                    reactions.toggle_like(video, user).await?;
                } else {
                    state = state.after_dislike();
                    reactions.toggle_dislike(video, user).await?;
                }
                tokio::task::yield_now().await;
            }
            anyhow::Ok((user, state))
        })
    });

    let video_after = {
        let mut expected = Vec::new();
        for result in join_all(handles).await {
            expected.push(result??);
        }
        let video = engine.video(world.video).await?;
        for (user, state) in &expected {
            assert_eq!(video.liker_ids.contains(user), *state == Reaction::Like);
            assert_eq!(video.disliker_ids.contains(user), *state == Reaction::Dislike);
        }
        video
    };

    let likes = video_after.liker_ids.len() as i64;
    assert_eq!(video_after.tally().likes, likes);
    assert_reactions_exclusive(&engine, world.video).await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_subscriptions_keep_counter_consistent() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    let users = seed_users(&engine.ctx, 40).await?;

    let toggle_all = |subset: Vec<Snowflake>| {
        let handles = subset.into_iter().map(|user| {
            let ctx = engine.ctx.clone();
            let channel = world.channel;
            tokio::spawn(async move {
                SubscriptionService::new(&ctx)
                    .toggle_subscription(channel, user)
                    .await
            })
        });
        join_all(handles)
    };

    for result in toggle_all(users.clone()).await {
        assert!(result??.subscribed);
    }
    let channel = engine.channel(world.channel).await?;
    assert_eq!(channel.subscriber_count, 40);
    assert!(channel.counters_consistent());

    let leaving: Vec<_> = users.iter().step_by(2).copied().collect();
    for result in toggle_all(leaving.clone()).await {
        assert!(!result??.subscribed);
    }
    let channel = engine.channel(world.channel).await?;
    assert_eq!(channel.subscriber_count, 20);
    assert!(channel.counters_consistent());

    let subscriptions = SubscriptionService::new(&engine.ctx);
    for user in &users {
        let listed = subscriptions.list_subscriptions(*user).await?;
        assert_eq!(listed.is_empty(), leaving.contains(user));
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_comment_likes_and_replies() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;
    let users = seed_users(&engine.ctx, 24).await?;
    let parent = seed_comment(&engine.ctx, world.video, world.owner, "busy thread").await?;

    let handles = users.iter().map(|user| {
        let ctx = engine.ctx.clone();
        let (video, user) = (world.video, *user);
        tokio::spawn(async move {
            let comments = CommentService::new(&ctx);
            comments.toggle_comment_like(parent, user).await?;
            comments
                .create_comment(video, user, CreateCommentRequest::reply(parent, "me too"))
                .await?;
            anyhow::Ok(())
        })
    });
    for result in join_all(handles).await {
        result??;
    }

    let stored = engine
        .ctx
        .comment_repo()
        .find_by_id(parent)
        .await?
        .ok_or_else(|| anyhow::anyhow!("parent missing"))?;
    assert_eq!(stored.likes(), 24);
    assert_eq!(stored.reply_ids.len(), 24);

    let deleted = CommentService::new(&engine.ctx)
        .delete_comment(parent, world.owner)
        .await?;
    assert_eq!(deleted.deleted, 25);
    assert_eq!(engine.ctx.comment_repo().count_by_video(world.video).await?, 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_views_are_not_lost() -> anyhow::Result<()> {
    let engine = TestEngine::new();
    let world = seed_world(&engine.ctx).await?;

    let handles = (0..20).map(|_| {
        let ctx = engine.ctx.clone();
        let video = world.video;
        tokio::spawn(async move { VideoService::new(&ctx).get_video(video).await })
    });
    for result in join_all(handles).await {
        assert!(result??.video.views >= 1);
    }

    assert_eq!(engine.video(world.video).await?.views, 20);
    Ok(())
}
