//! User entity - an account that owns channels and subscribes to others

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// User account with its forward references to channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    /// Channels this user owns
    pub channel_ids: Vec<Snowflake>,
    /// Channels this user is subscribed to
    pub subscribed_channel_ids: Vec<Snowflake>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with no channels and no subscriptions
    pub fn new(id: Snowflake, username: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            avatar: None,
            channel_ids: Vec::new(),
            subscribed_channel_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn owns_channel(&self, channel_id: Snowflake) -> bool {
        self.channel_ids.contains(&channel_id)
    }

    #[inline]
    pub fn is_subscribed_to(&self, channel_id: Snowflake) -> bool {
        self.subscribed_channel_ids.contains(&channel_id)
    }
}
