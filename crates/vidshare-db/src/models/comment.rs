//! Comment database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for comments table
#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: i64,
    pub author_id: i64,
    pub video_id: i64,
    pub parent_id: Option<i64>,
    pub reply_ids: Vec<i64>,
    pub liker_ids: Vec<i64>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

