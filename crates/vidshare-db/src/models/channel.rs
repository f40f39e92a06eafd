//! Channel database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for channels table
#[derive(Debug, Clone, FromRow)]
pub struct ChannelModel {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub owner_id: i64,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub subscriber_ids: Vec<i64>,
    pub subscriber_count: i64,
    pub video_ids: Vec<i64>,
    pub video_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result row of a conditional set + counter update
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CounterRow {
    pub changed: bool,
    pub count: i64,
}
