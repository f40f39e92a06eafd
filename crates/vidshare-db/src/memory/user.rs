//! In-memory UserRepository

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use tracing::instrument;

use vidshare_core::entities::User;
use vidshare_core::error::DomainError;
use vidshare_core::traits::{RepoResult, UserRepository};
use vidshare_core::value_objects::Snowflake;

use super::{collect_ids, set_insert, set_remove, MemoryStore};

impl MemoryStore {
    fn with_user<F>(&self, id: Snowflake, f: F) -> RepoResult<()>
    where
        F: FnOnce(&mut User),
    {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        f(user.value_mut());
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        Ok(collect_ids(&self.users, ids))
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &User) -> RepoResult<()> {
        match self.usernames.entry(user.username.clone()) {
            Entry::Occupied(_) => return Err(DomainError::UsernameExists),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => {
                self.usernames.remove(&user.username);
                return Err(DomainError::EmailAlreadyExists);
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn add_owned_channel(&self, user_id: Snowflake, channel_id: Snowflake) -> RepoResult<()> {
        self.with_user(user_id, |u| {
            set_insert(&mut u.channel_ids, channel_id);
        })
    }

    async fn add_subscription(&self, user_id: Snowflake, channel_id: Snowflake) -> RepoResult<()> {
        self.with_user(user_id, |u| {
            set_insert(&mut u.subscribed_channel_ids, channel_id);
        })
    }

    async fn remove_subscription(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
    ) -> RepoResult<()> {
        self.with_user(user_id, |u| {
            set_remove(&mut u.subscribed_channel_ids, channel_id);
        })
    }
}
