//! User entity <-> model mapper

use vidshare_core::entities::User;
use vidshare_core::value_objects::Snowflake;

use super::snowflakes;
use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            email: model.email,
            avatar: model.avatar,
            channel_ids: snowflakes(model.channel_ids),
            subscribed_channel_ids: snowflakes(model.subscribed_channel_ids),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
