//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use vidshare_core::entities::User;
use vidshare_core::traits::{RepoResult, UserRepository};
use vidshare_core::value_objects::Snowflake;

use crate::mappers::raw_ids;
use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation, user_conflict, user_not_found};

const USER_COLUMNS: &str = "id, username, email, avatar, channel_ids, subscribed_channel_ids, \
                            created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run a set mutation on one user row; zero affected rows means the user is missing
    async fn mutate_set(&self, sql: &str, user_id: Snowflake, value: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(sql)
            .bind(user_id.into_inner())
            .bind(value.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user_id));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(raw_ids(ids))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &User) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO users (id, username, email, avatar, channel_ids, subscribed_channel_ids,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.avatar)
        .bind(raw_ids(&user.channel_ids))
        .bind(raw_ids(&user.subscribed_channel_ids))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, user_conflict))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_owned_channel(&self, user_id: Snowflake, channel_id: Snowflake) -> RepoResult<()> {
        self.mutate_set(
            r"
            UPDATE users
            SET channel_ids = CASE WHEN $2 = ANY(channel_ids) THEN channel_ids
                                   ELSE array_append(channel_ids, $2) END
            WHERE id = $1
            ",
            user_id,
            channel_id,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn add_subscription(&self, user_id: Snowflake, channel_id: Snowflake) -> RepoResult<()> {
        self.mutate_set(
            r"
            UPDATE users
            SET subscribed_channel_ids = CASE WHEN $2 = ANY(subscribed_channel_ids)
                                              THEN subscribed_channel_ids
                                              ELSE array_append(subscribed_channel_ids, $2) END
            WHERE id = $1
            ",
            user_id,
            channel_id,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn remove_subscription(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
    ) -> RepoResult<()> {
        self.mutate_set(
            r"
            UPDATE users
            SET subscribed_channel_ids = array_remove(subscribed_channel_ids, $2)
            WHERE id = $1
            ",
            user_id,
            channel_id,
        )
        .await
    }
}
