//! Video entity - uploaded media with view count and reactions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Video category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    #[default]
    Programming,
    Music,
    Gaming,
    Cooking,
    Travel,
    Sports,
    Education,
    Entertainment,
    News,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::Programming,
        Self::Music,
        Self::Gaming,
        Self::Cooking,
        Self::Travel,
        Self::Sports,
        Self::Education,
        Self::Entertainment,
        Self::News,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Programming => "Programming",
            Self::Music => "Music",
            Self::Gaming => "Gaming",
            Self::Cooking => "Cooking",
            Self::Travel => "Travel",
            Self::Sports => "Sports",
            Self::Education => "Education",
            Self::Entertainment => "Entertainment",
            Self::News => "News",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::ValidationError(format!("unknown category: {s}")))
    }
}

/// Who can see a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Unlisted,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Unlisted => "unlisted",
        }
    }
}

impl FromStr for Visibility {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            "unlisted" => Ok(Self::Unlisted),
            other => Err(DomainError::ValidationError(format!(
                "unknown visibility: {other}"
            ))),
        }
    }
}

/// The two mutually exclusive reactions a user can hold on a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Self::Like => Self::Dislike,
            Self::Dislike => Self::Like,
        }
    }
}

/// Reaction counts after a reaction mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReactionTally {
    pub likes: i64,
    pub dislikes: i64,
}

/// Video entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub id: Snowflake,
    /// Owning channel, immutable after creation
    pub channel_id: Snowflake,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail: String,
    pub duration_secs: i32,
    pub category: Category,
    pub visibility: Visibility,
    /// Never decreases
    pub views: i64,
    pub liker_ids: Vec<Snowflake>,
    pub disliker_ids: Vec<Snowflake>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    #[must_use]
    pub fn new(
        id: Snowflake,
        channel_id: Snowflake,
        title: String,
        video_url: String,
        thumbnail: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            channel_id,
            title,
            description: String::new(),
            video_url,
            thumbnail,
            duration_secs: 0,
            category: Category::default(),
            visibility: Visibility::default(),
            views: 0,
            liker_ids: Vec::new(),
            disliker_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Members of the set for `kind`
    pub fn reactors(&self, kind: ReactionKind) -> &[Snowflake] {
        match kind {
            ReactionKind::Like => &self.liker_ids,
            ReactionKind::Dislike => &self.disliker_ids,
        }
    }

    #[inline]
    pub fn has_reaction(&self, user_id: Snowflake, kind: ReactionKind) -> bool {
        self.reactors(kind).contains(&user_id)
    }

    pub fn tally(&self) -> ReactionTally {
        ReactionTally {
            likes: self.liker_ids.len() as i64,
            dislikes: self.disliker_ids.len() as i64,
        }
    }

    pub fn details(&self) -> VideoDetails {
        VideoDetails {
            title: self.title.clone(),
            description: self.description.clone(),
            thumbnail: self.thumbnail.clone(),
            category: self.category,
            visibility: self.visibility,
        }
    }

    pub fn apply_details(&mut self, details: VideoDetails) {
        self.title = details.title;
        self.description = details.description;
        self.thumbnail = details.thumbnail;
        self.category = details.category;
        self.visibility = details.visibility;
        self.updated_at = Utc::now();
    }
}

/// Owner-editable video fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetails {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub category: Category,
    pub visibility: Visibility,
}
