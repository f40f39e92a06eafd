//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use vidshare_core::entities::Comment;
use vidshare_core::traits::{CommentRepository, RepoResult};
use vidshare_core::value_objects::Snowflake;

use crate::mappers::raw_ids;
use crate::models::CommentModel;

use super::error::{comment_not_found, map_db_error};

const COMMENT_COLUMNS: &str = "id, author_id, video_id, parent_id, reply_ids, liker_ids, content, \
                               created_at, updated_at";

/// PostgreSQL implementation of CommentRepository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    /// Create a new PgCommentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Set mutation returning the resulting like count
    async fn like_update(&self, sql: &str, id: Snowflake, user_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(sql)
            .bind(id.into_inner())
            .bind(user_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| comment_not_found(id))
    }

    async fn reply_update(
        &self,
        sql: &str,
        parent_id: Snowflake,
        reply_id: Snowflake,
    ) -> RepoResult<()> {
        let result = sqlx::query(sql)
            .bind(parent_id.into_inner())
            .bind(reply_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found(parent_id));
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Comment::from))
    }

    #[instrument(skip(self))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Comment>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, CommentModel>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ANY($1)"
        ))
        .bind(raw_ids(ids))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO comments (id, author_id, video_id, parent_id, reply_ids, liker_ids,
                                  content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(comment.id.into_inner())
        .bind(comment.author_id.into_inner())
        .bind(comment.video_id.into_inner())
        .bind(comment.parent_id.map(Snowflake::into_inner))
        .bind(raw_ids(&comment.reply_ids))
        .bind(raw_ids(&comment.liker_ids))
        .bind(&comment.content)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, content))]
    async fn update_content(&self, id: Snowflake, content: &str) -> RepoResult<Comment> {
        let result = sqlx::query_as::<_, CommentModel>(&format!(
            r"
            UPDATE comments
            SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {COMMENT_COLUMNS}
            "
        ))
        .bind(id.into_inner())
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Comment::from).ok_or_else(|| comment_not_found(id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_parent(&self, parent_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE parent_id = $1")
            .bind(parent_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_by_video(&self, video_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE video_id = $1")
            .bind(video_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn add_reply(&self, parent_id: Snowflake, reply_id: Snowflake) -> RepoResult<()> {
        // Newest reply first
        self.reply_update(
            r"
            UPDATE comments
            SET reply_ids = CASE WHEN $2 = ANY(reply_ids) THEN reply_ids
                                 ELSE array_prepend($2, reply_ids) END
            WHERE id = $1
            ",
            parent_id,
            reply_id,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn remove_reply(&self, parent_id: Snowflake, reply_id: Snowflake) -> RepoResult<()> {
        self.reply_update(
            "UPDATE comments SET reply_ids = array_remove(reply_ids, $2) WHERE id = $1",
            parent_id,
            reply_id,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn add_like(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<i64> {
        self.like_update(
            r"
            UPDATE comments
            SET liker_ids = CASE WHEN $2 = ANY(liker_ids) THEN liker_ids
                                 ELSE array_append(liker_ids, $2) END
            WHERE id = $1
            RETURNING cardinality(liker_ids)::BIGINT
            ",
            id,
            user_id,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn remove_like(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<i64> {
        self.like_update(
            r"
            UPDATE comments
            SET liker_ids = array_remove(liker_ids, $2)
            WHERE id = $1
            RETURNING cardinality(liker_ids)::BIGINT
            ",
            id,
            user_id,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_top_level(
        &self,
        video_id: Snowflake,
        offset: u64,
        limit: u32,
    ) -> RepoResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentModel>(&format!(
            r"
            SELECT {COMMENT_COLUMNS} FROM comments
            WHERE video_id = $1 AND parent_id IS NULL
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(video_id.into_inner())
        .bind(i64::from(limit))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_top_level(&self, video_id: Snowflake) -> RepoResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comments WHERE video_id = $1 AND parent_id IS NULL",
        )
        .bind(video_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count.max(0) as u64)
    }

    #[instrument(skip(self))]
    async fn count_by_video(&self, video_id: Snowflake) -> RepoResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE video_id = $1")
            .bind(video_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(count.max(0) as u64)
    }
}
