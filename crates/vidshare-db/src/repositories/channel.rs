//! PostgreSQL implementation of ChannelRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use vidshare_core::entities::{Channel, ChannelDetails};
use vidshare_core::error::DomainError;
use vidshare_core::traits::{ChannelRepository, CounterUpdate, RepoResult};
use vidshare_core::value_objects::Snowflake;

use crate::mappers::raw_ids;
use crate::models::{ChannelModel, CounterRow};

use super::error::{channel_not_found, map_db_error, map_unique_violation};

const CHANNEL_COLUMNS: &str = "id, name, description, owner_id, avatar, banner, subscriber_ids, \
                               subscriber_count, video_ids, video_count, created_at, updated_at";

/// Conditional append of `$2` to `set`, recomputing `counter` in the same row write.
/// Yields one row: `changed` is false when `$2` was already a member.
fn add_member_sql(set: &str, counter: &str) -> String {
    format!(
        r"
        WITH updated AS (
            UPDATE channels
            SET {set} = array_append({set}, $2),
                {counter} = cardinality({set}) + 1
            WHERE id = $1 AND NOT ($2 = ANY({set}))
            RETURNING {counter}
        )
        SELECT TRUE AS changed, {counter} AS count FROM updated
        UNION ALL
        SELECT FALSE AS changed, {counter} AS count FROM channels
        WHERE id = $1 AND NOT EXISTS (SELECT 1 FROM updated)
        "
    )
}

/// Conditional removal of `$2` from `set`, mirror of [`add_member_sql`]
fn remove_member_sql(set: &str, counter: &str) -> String {
    format!(
        r"
        WITH updated AS (
            UPDATE channels
            SET {set} = array_remove({set}, $2),
                {counter} = cardinality(array_remove({set}, $2))
            WHERE id = $1 AND $2 = ANY({set})
            RETURNING {counter}
        )
        SELECT TRUE AS changed, {counter} AS count FROM updated
        UNION ALL
        SELECT FALSE AS changed, {counter} AS count FROM channels
        WHERE id = $1 AND NOT EXISTS (SELECT 1 FROM updated)
        "
    )
}

/// PostgreSQL implementation of ChannelRepository
#[derive(Clone)]
pub struct PgChannelRepository {
    pool: PgPool,
}

impl PgChannelRepository {
    /// Create a new PgChannelRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn counter_update(
        &self,
        sql: &str,
        id: Snowflake,
        member: Snowflake,
    ) -> RepoResult<CounterUpdate> {
        let row = sqlx::query_as::<_, CounterRow>(sql)
            .bind(id.into_inner())
            .bind(member.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.map(CounterUpdate::from)
            .ok_or_else(|| channel_not_found(id))
    }
}

#[async_trait]
impl ChannelRepository for PgChannelRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>> {
        let result = sqlx::query_as::<_, ChannelModel>(&format!(
            "SELECT {CHANNEL_COLUMNS} FROM channels WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Channel::from))
    }

    #[instrument(skip(self))]
    async fn find_by_owner(&self, owner_id: Snowflake) -> RepoResult<Option<Channel>> {
        let result = sqlx::query_as::<_, ChannelModel>(&format!(
            r"
            SELECT {CHANNEL_COLUMNS} FROM channels
            WHERE owner_id = $1
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "
        ))
        .bind(owner_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Channel::from))
    }

    #[instrument(skip(self))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Channel>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ChannelModel>(&format!(
            "SELECT {CHANNEL_COLUMNS} FROM channels WHERE id = ANY($1)"
        ))
        .bind(raw_ids(ids))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Channel::from).collect())
    }

    #[instrument(skip(self, channel), fields(channel_id = %channel.id))]
    async fn create(&self, channel: &Channel) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO channels (id, name, description, owner_id, avatar, banner,
                                  subscriber_ids, subscriber_count, video_ids, video_count,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(channel.id.into_inner())
        .bind(&channel.name)
        .bind(&channel.description)
        .bind(channel.owner_id.into_inner())
        .bind(&channel.avatar)
        .bind(&channel.banner)
        .bind(raw_ids(&channel.subscriber_ids))
        .bind(channel.subscriber_count)
        .bind(raw_ids(&channel.video_ids))
        .bind(channel.video_count)
        .bind(channel.created_at)
        .bind(channel.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, |_| DomainError::ChannelNameExists))?;

        Ok(())
    }

    #[instrument(skip(self, details))]
    async fn update_details(&self, id: Snowflake, details: &ChannelDetails) -> RepoResult<Channel> {
        let result = sqlx::query_as::<_, ChannelModel>(&format!(
            r"
            UPDATE channels
            SET name = $2, description = $3, avatar = $4, banner = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {CHANNEL_COLUMNS}
            "
        ))
        .bind(id.into_inner())
        .bind(&details.name)
        .bind(&details.description)
        .bind(&details.avatar)
        .bind(&details.banner)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, |_| DomainError::ChannelNameExists))?;

        result.map(Channel::from).ok_or_else(|| channel_not_found(id))
    }

    #[instrument(skip(self))]
    async fn add_subscriber(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<CounterUpdate> {
        self.counter_update(
            &add_member_sql("subscriber_ids", "subscriber_count"),
            id,
            user_id,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn remove_subscriber(
        &self,
        id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<CounterUpdate> {
        self.counter_update(
            &remove_member_sql("subscriber_ids", "subscriber_count"),
            id,
            user_id,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn add_video(&self, id: Snowflake, video_id: Snowflake) -> RepoResult<CounterUpdate> {
        self.counter_update(&add_member_sql("video_ids", "video_count"), id, video_id)
            .await
    }

    #[instrument(skip(self))]
    async fn remove_video(&self, id: Snowflake, video_id: Snowflake) -> RepoResult<CounterUpdate> {
        self.counter_update(&remove_member_sql("video_ids", "video_count"), id, video_id)
            .await
    }
}
