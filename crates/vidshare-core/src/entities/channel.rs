//! Channel entity - a user's publishing space with subscribers and videos

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Channel entity
///
/// `subscriber_count` and `video_count` are denormalized caches of the
/// cardinality of `subscriber_ids` and `video_ids`. Stores change a set and its
/// counter in the same mutation, so a reader never sees them disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub name: String,
    pub description: String,
    /// Immutable after creation
    pub owner_id: Snowflake,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub subscriber_ids: Vec<Snowflake>,
    pub subscriber_count: i64,
    pub video_ids: Vec<Snowflake>,
    pub video_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Channel {
    /// Create an empty channel owned by `owner_id`
    #[must_use]
    pub fn new(id: Snowflake, owner_id: Snowflake, name: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description,
            owner_id,
            avatar: None,
            banner: None,
            subscriber_ids: Vec::new(),
            subscriber_count: 0,
            video_ids: Vec::new(),
            video_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == user_id
    }

    #[inline]
    pub fn has_subscriber(&self, user_id: Snowflake) -> bool {
        self.subscriber_ids.contains(&user_id)
    }

    /// Whether both denormalized counters match their sets
    pub fn counters_consistent(&self) -> bool {
        self.subscriber_count == self.subscriber_ids.len() as i64
            && self.video_count == self.video_ids.len() as i64
    }

    /// Snapshot of the fields an owner may edit
    pub fn details(&self) -> ChannelDetails {
        ChannelDetails {
            name: self.name.clone(),
            description: self.description.clone(),
            avatar: self.avatar.clone(),
            banner: self.banner.clone(),
        }
    }

    /// Apply edited details, leaving sets, counters and owner untouched
    pub fn apply_details(&mut self, details: ChannelDetails) {
        self.name = details.name;
        self.description = details.description;
        self.avatar = details.avatar;
        self.banner = details.banner;
        self.updated_at = Utc::now();
    }
}

/// Owner-editable channel fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDetails {
    pub name: String,
    pub description: String,
    pub avatar: Option<String>,
    pub banner: Option<String>,
}
