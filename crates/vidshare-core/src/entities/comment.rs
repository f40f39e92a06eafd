//! Comment entity - top-level comments and their single level of replies

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Maximum comment length in characters
pub const MAX_COMMENT_LENGTH: usize = 1000;

/// Comment entity
///
/// A comment with `parent_id == None` is top-level and may collect replies in
/// `reply_ids`. A reply always has a parent and never has replies of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub video_id: Snowflake,
    pub parent_id: Option<Snowflake>,
    pub reply_ids: Vec<Snowflake>,
    pub liker_ids: Vec<Snowflake>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new top-level comment
    #[must_use]
    pub fn new(id: Snowflake, author_id: Snowflake, video_id: Snowflake, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            author_id,
            video_id,
            parent_id: None,
            reply_ids: Vec::new(),
            liker_ids: Vec::new(),
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a reply under `parent_id`
    #[must_use]
    pub fn new_reply(
        id: Snowflake,
        author_id: Snowflake,
        video_id: Snowflake,
        parent_id: Snowflake,
        content: String,
    ) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(id, author_id, video_id, content)
        }
    }

    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    #[inline]
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    #[inline]
    pub fn is_liked_by(&self, user_id: Snowflake) -> bool {
        self.liker_ids.contains(&user_id)
    }

    pub fn likes(&self) -> i64 {
        self.liker_ids.len() as i64
    }

    /// Whether the content was changed after creation
    pub fn is_edited(&self) -> bool {
        self.updated_at > self.created_at
    }
}
