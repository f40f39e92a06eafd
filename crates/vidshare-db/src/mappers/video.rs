//! Video entity <-> model mapper

use vidshare_core::entities::{ReactionTally, Video};
use vidshare_core::value_objects::Snowflake;

use super::snowflakes;
use crate::models::{ReactionTallyRow, VideoModel};

/// Convert VideoModel to Video entity
///
/// Unknown category or visibility strings fall back to the defaults.
impl From<VideoModel> for Video {
    fn from(model: VideoModel) -> Self {
        Video {
            id: Snowflake::new(model.id),
            channel_id: Snowflake::new(model.channel_id),
            title: model.title,
            description: model.description,
            video_url: model.video_url,
            thumbnail: model.thumbnail,
            duration_secs: model.duration_secs,
            category: model.category.parse().unwrap_or_default(),
            visibility: model.visibility.parse().unwrap_or_default(),
            views: model.views,
            liker_ids: snowflakes(model.liker_ids),
            disliker_ids: snowflakes(model.disliker_ids),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ReactionTallyRow> for ReactionTally {
    fn from(row: ReactionTallyRow) -> Self {
        ReactionTally {
            likes: row.likes,
            dislikes: row.dislikes,
        }
    }
}
