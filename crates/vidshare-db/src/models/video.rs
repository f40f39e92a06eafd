//! Video database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for videos table
#[derive(Debug, Clone, FromRow)]
pub struct VideoModel {
    pub id: i64,
    pub channel_id: i64,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail: String,
    pub duration_secs: i32,
    pub category: String,
    pub visibility: String,
    pub views: i64,
    pub liker_ids: Vec<i64>,
    pub disliker_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reaction set sizes returned by a reaction update
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ReactionTallyRow {
    pub likes: i64,
    pub dislikes: i64,
}
