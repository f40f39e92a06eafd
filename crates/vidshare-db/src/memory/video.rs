//! In-memory VideoRepository

use async_trait::async_trait;
use std::cmp::Reverse;
use tracing::instrument;

use vidshare_core::entities::{ReactionKind, ReactionTally, Video, VideoDetails};
use vidshare_core::error::DomainError;
use vidshare_core::traits::{RepoResult, VideoFilter, VideoRepository, VideoSort};
use vidshare_core::value_objects::Snowflake;

use super::{set_insert, set_remove, slice_page, MemoryStore};

fn reaction_sets(video: &mut Video, kind: ReactionKind) -> (&mut Vec<Snowflake>, &mut Vec<Snowflake>) {
    match kind {
        ReactionKind::Like => (&mut video.liker_ids, &mut video.disliker_ids),
        ReactionKind::Dislike => (&mut video.disliker_ids, &mut video.liker_ids),
    }
}

fn sort_videos(videos: &mut [Video], sort: VideoSort) {
    match sort {
        VideoSort::Newest => videos.sort_by_key(|v| Reverse((v.created_at, v.id))),
        VideoSort::Oldest => videos.sort_by_key(|v| (v.created_at, v.id)),
        VideoSort::MostViewed => videos.sort_by_key(|v| Reverse((v.views, v.id))),
    }
}

impl MemoryStore {
    fn with_video<F, T>(&self, id: Snowflake, f: F) -> RepoResult<T>
    where
        F: FnOnce(&mut Video) -> T,
    {
        let mut entry = self
            .videos
            .get_mut(&id)
            .ok_or(DomainError::VideoNotFound(id))?;
        Ok(f(entry.value_mut()))
    }
}

#[async_trait]
impl VideoRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Video>> {
        Ok(self.videos.get(&id).map(|v| v.value().clone()))
    }

    #[instrument(skip(self, video), fields(video_id = %video.id))]
    async fn create(&self, video: &Video) -> RepoResult<()> {
        self.videos.insert(video.id, video.clone());
        Ok(())
    }

    async fn update_details(&self, id: Snowflake, details: &VideoDetails) -> RepoResult<Video> {
        self.with_video(id, |v| {
            v.apply_details(details.clone());
            v.clone()
        })
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        self.videos
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::VideoNotFound(id))
    }

    async fn increment_views(&self, id: Snowflake) -> RepoResult<i64> {
        self.with_video(id, |v| {
            v.views += 1;
            v.views
        })
    }

    async fn add_reaction(
        &self,
        id: Snowflake,
        user_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<ReactionTally> {
        self.with_video(id, |v| {
            let (set, opposite) = reaction_sets(v, kind);
            set_remove(opposite, user_id);
            set_insert(set, user_id);
            v.tally()
        })
    }

    async fn remove_reaction(
        &self,
        id: Snowflake,
        user_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<ReactionTally> {
        self.with_video(id, |v| {
            let (set, _) = reaction_sets(v, kind);
            set_remove(set, user_id);
            v.tally()
        })
    }

    async fn find_page(
        &self,
        filter: &VideoFilter,
        sort: VideoSort,
        offset: u64,
        limit: u32,
    ) -> RepoResult<Vec<Video>> {
        let mut matching: Vec<Video> = self
            .videos
            .iter()
            .filter(|v| filter.matches(v.value()))
            .map(|v| v.value().clone())
            .collect();
        sort_videos(&mut matching, sort);
        Ok(slice_page(matching, offset, limit))
    }

    async fn count(&self, filter: &VideoFilter) -> RepoResult<u64> {
        Ok(self.videos.iter().filter(|v| filter.matches(v.value())).count() as u64)
    }
}
