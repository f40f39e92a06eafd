//! In-memory ChannelRepository

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use tracing::instrument;

use vidshare_core::entities::{Channel, ChannelDetails};
use vidshare_core::error::DomainError;
use vidshare_core::traits::{ChannelRepository, CounterUpdate, RepoResult};
use vidshare_core::value_objects::Snowflake;

use super::{collect_ids, set_insert, set_remove, MemoryStore};

/// Which set/counter pair a membership mutation targets
#[derive(Clone, Copy)]
enum Membership {
    Subscribers,
    Videos,
}

impl MemoryStore {
    /// Change one set and recompute its counter while holding the channel's lock
    fn update_membership(
        &self,
        id: Snowflake,
        which: Membership,
        member: Snowflake,
        insert: bool,
    ) -> RepoResult<CounterUpdate> {
        let mut entry = self
            .channels
            .get_mut(&id)
            .ok_or(DomainError::ChannelNotFound(id))?;
        let channel = entry.value_mut();

        let (set, counter) = match which {
            Membership::Subscribers => (&mut channel.subscriber_ids, &mut channel.subscriber_count),
            Membership::Videos => (&mut channel.video_ids, &mut channel.video_count),
        };
        let changed = if insert {
            set_insert(set, member)
        } else {
            set_remove(set, member)
        };
        *counter = set.len() as i64;

        Ok(CounterUpdate {
            changed,
            count: *counter,
        })
    }
}

#[async_trait]
impl ChannelRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>> {
        Ok(self.channels.get(&id).map(|c| c.value().clone()))
    }

    async fn find_by_owner(&self, owner_id: Snowflake) -> RepoResult<Option<Channel>> {
        Ok(self
            .channels
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .min_by_key(|c| (c.created_at, c.id))
            .map(|c| c.value().clone()))
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Channel>> {
        Ok(collect_ids(&self.channels, ids))
    }

    #[instrument(skip(self, channel), fields(channel_id = %channel.id))]
    async fn create(&self, channel: &Channel) -> RepoResult<()> {
        // Reserve the name first; the channel map is never locked while the
        // name index entry is held
        match self.channel_names.entry(channel.name.clone()) {
            Entry::Occupied(_) => return Err(DomainError::ChannelNameExists),
            Entry::Vacant(slot) => {
                slot.insert(channel.id);
            }
        }
        self.channels.insert(channel.id, channel.clone());
        Ok(())
    }

    #[instrument(skip(self, details))]
    async fn update_details(&self, id: Snowflake, details: &ChannelDetails) -> RepoResult<Channel> {
        let mut entry = self
            .channels
            .get_mut(&id)
            .ok_or(DomainError::ChannelNotFound(id))?;
        let channel = entry.value_mut();

        if details.name != channel.name {
            match self.channel_names.entry(details.name.clone()) {
                Entry::Occupied(_) => return Err(DomainError::ChannelNameExists),
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            self.channel_names.remove(&channel.name);
        }

        channel.apply_details(details.clone());
        Ok(channel.clone())
    }

    async fn add_subscriber(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<CounterUpdate> {
        self.update_membership(id, Membership::Subscribers, user_id, true)
    }

    async fn remove_subscriber(
        &self,
        id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<CounterUpdate> {
        self.update_membership(id, Membership::Subscribers, user_id, false)
    }

    async fn add_video(&self, id: Snowflake, video_id: Snowflake) -> RepoResult<CounterUpdate> {
        self.update_membership(id, Membership::Videos, video_id, true)
    }

    async fn remove_video(&self, id: Snowflake, video_id: Snowflake) -> RepoResult<CounterUpdate> {
        self.update_membership(id, Membership::Videos, video_id, false)
    }
}
