//! In-process entity store
//!
//! One `DashMap` per entity kind. Every mutation runs under the entity's shard
//! write lock (`get_mut`), so a set and its counter change together exactly as
//! they do in a single PostgreSQL row update. Used by the service tests and by
//! embedders that do not need persistence.

mod channel;
mod comment;
mod user;
mod video;

use dashmap::DashMap;

use vidshare_core::entities::{Channel, Comment, User, Video};
use vidshare_core::value_objects::Snowflake;

/// Entity store backed by concurrent hash maps
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<Snowflake, User>,
    usernames: DashMap<String, Snowflake>,
    emails: DashMap<String, Snowflake>,
    channels: DashMap<Snowflake, Channel>,
    channel_names: DashMap<String, Snowflake>,
    videos: DashMap<Snowflake, Video>,
    comments: DashMap<Snowflake, Comment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored comments across all videos
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Drop every entity
    pub fn clear(&self) {
        self.comments.clear();
        self.videos.clear();
        self.channels.clear();
        self.channel_names.clear();
        self.users.clear();
        self.usernames.clear();
        self.emails.clear();
    }
}

/// Insert `value` if absent; returns whether the set changed
pub(crate) fn set_insert(set: &mut Vec<Snowflake>, value: Snowflake) -> bool {
    if set.contains(&value) {
        false
    } else {
        set.push(value);
        true
    }
}

/// Remove `value` if present; returns whether the set changed
pub(crate) fn set_remove(set: &mut Vec<Snowflake>, value: Snowflake) -> bool {
    let before = set.len();
    set.retain(|v| *v != value);
    set.len() != before
}

/// Clone the entries for `ids` that exist, in the order given
pub(crate) fn collect_ids<T: Clone>(map: &DashMap<Snowflake, T>, ids: &[Snowflake]) -> Vec<T> {
    ids.iter()
        .filter_map(|id| map.get(id).map(|entry| entry.value().clone()))
        .collect()
}

/// Apply offset/limit to an already-sorted list
pub(crate) fn slice_page<T>(items: Vec<T>, offset: u64, limit: u32) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    items.into_iter().skip(offset).take(limit as usize).collect()
}
