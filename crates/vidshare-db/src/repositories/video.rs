//! PostgreSQL implementation of VideoRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use vidshare_core::entities::{ReactionKind, ReactionTally, Video, VideoDetails};
use vidshare_core::traits::{RepoResult, VideoFilter, VideoRepository, VideoSort};
use vidshare_core::value_objects::Snowflake;

use crate::mappers::raw_ids;
use crate::models::{ReactionTallyRow, VideoModel};

use super::error::{like_pattern, map_db_error, video_not_found};

const VIDEO_COLUMNS: &str = "id, channel_id, title, description, video_url, thumbnail, \
                             duration_secs, category, visibility, views, liker_ids, \
                             disliker_ids, created_at, updated_at";

const TALLY_RETURNING: &str = "RETURNING cardinality(liker_ids)::BIGINT AS likes, \
                               cardinality(disliker_ids)::BIGINT AS dislikes";

fn reaction_column(kind: ReactionKind) -> &'static str {
    match kind {
        ReactionKind::Like => "liker_ids",
        ReactionKind::Dislike => "disliker_ids",
    }
}

fn order_clause(sort: VideoSort) -> &'static str {
    match sort {
        VideoSort::Newest => " ORDER BY created_at DESC, id DESC",
        VideoSort::Oldest => " ORDER BY created_at ASC, id ASC",
        VideoSort::MostViewed => " ORDER BY views DESC, id DESC",
    }
}

/// Append `AND ...` conditions for `filter`; the builder must already hold a WHERE clause
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &VideoFilter) {
    if let Some(channel_id) = filter.channel_id {
        qb.push(" AND channel_id = ").push_bind(channel_id.into_inner());
    }
    if let Some(category) = filter.category {
        qb.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
        let pattern = like_pattern(term);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// PostgreSQL implementation of VideoRepository
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    /// Create a new PgVideoRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn reaction_update(
        &self,
        sql: &str,
        id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<ReactionTally> {
        let row = sqlx::query_as::<_, ReactionTallyRow>(sql)
            .bind(id.into_inner())
            .bind(user_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.map(ReactionTally::from)
            .ok_or_else(|| video_not_found(id))
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Video>> {
        let result = sqlx::query_as::<_, VideoModel>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Video::from))
    }

    #[instrument(skip(self, video), fields(video_id = %video.id))]
    async fn create(&self, video: &Video) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO videos (id, channel_id, title, description, video_url, thumbnail,
                                duration_secs, category, visibility, views, liker_ids,
                                disliker_ids, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ",
        )
        .bind(video.id.into_inner())
        .bind(video.channel_id.into_inner())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.video_url)
        .bind(&video.thumbnail)
        .bind(video.duration_secs)
        .bind(video.category.as_str())
        .bind(video.visibility.as_str())
        .bind(video.views)
        .bind(raw_ids(&video.liker_ids))
        .bind(raw_ids(&video.disliker_ids))
        .bind(video.created_at)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, details))]
    async fn update_details(&self, id: Snowflake, details: &VideoDetails) -> RepoResult<Video> {
        let result = sqlx::query_as::<_, VideoModel>(&format!(
            r"
            UPDATE videos
            SET title = $2, description = $3, thumbnail = $4, category = $5, visibility = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {VIDEO_COLUMNS}
            "
        ))
        .bind(id.into_inner())
        .bind(&details.title)
        .bind(&details.description)
        .bind(&details.thumbnail)
        .bind(details.category.as_str())
        .bind(details.visibility.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Video::from).ok_or_else(|| video_not_found(id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(video_not_found(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_views(&self, id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("UPDATE videos SET views = views + 1 WHERE id = $1 RETURNING views")
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| video_not_found(id))
    }

    #[instrument(skip(self))]
    async fn add_reaction(
        &self,
        id: Snowflake,
        user_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<ReactionTally> {
        let set = reaction_column(kind);
        let opposite = reaction_column(kind.opposite());
        let sql = format!(
            r"
            UPDATE videos
            SET {set} = CASE WHEN $2 = ANY({set}) THEN {set} ELSE array_append({set}, $2) END,
                {opposite} = array_remove({opposite}, $2)
            WHERE id = $1
            {TALLY_RETURNING}
            "
        );
        self.reaction_update(&sql, id, user_id).await
    }

    #[instrument(skip(self))]
    async fn remove_reaction(
        &self,
        id: Snowflake,
        user_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<ReactionTally> {
        let set = reaction_column(kind);
        let sql = format!(
            r"
            UPDATE videos
            SET {set} = array_remove({set}, $2)
            WHERE id = $1
            {TALLY_RETURNING}
            "
        );
        self.reaction_update(&sql, id, user_id).await
    }

    #[instrument(skip(self))]
    async fn find_page(
        &self,
        filter: &VideoFilter,
        sort: VideoSort,
        offset: u64,
        limit: u32,
    ) -> RepoResult<Vec<Video>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE TRUE"
        ));
        push_filter(&mut qb, filter);
        qb.push(order_clause(sort));
        qb.push(" LIMIT ").push_bind(i64::from(limit));
        qb.push(" OFFSET ").push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

        let rows = qb
            .build_query_as::<VideoModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Video::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: &VideoFilter) -> RepoResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM videos WHERE TRUE");
        push_filter(&mut qb, filter);

        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(count.max(0) as u64)
    }
}
