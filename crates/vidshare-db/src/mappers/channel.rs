//! Channel entity <-> model mapper

use vidshare_core::entities::Channel;
use vidshare_core::traits::CounterUpdate;
use vidshare_core::value_objects::Snowflake;

use super::snowflakes;
use crate::models::{ChannelModel, CounterRow};

impl From<ChannelModel> for Channel {
    fn from(model: ChannelModel) -> Self {
        Channel {
            id: Snowflake::new(model.id),
            name: model.name,
            description: model.description,
            owner_id: Snowflake::new(model.owner_id),
            avatar: model.avatar,
            banner: model.banner,
            subscriber_ids: snowflakes(model.subscriber_ids),
            subscriber_count: model.subscriber_count,
            video_ids: snowflakes(model.video_ids),
            video_count: model.video_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<CounterRow> for CounterUpdate {
    fn from(row: CounterRow) -> Self {
        CounterUpdate {
            changed: row.changed,
            count: row.count,
        }
    }
}
