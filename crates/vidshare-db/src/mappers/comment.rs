//! Comment entity <-> model mapper

use vidshare_core::entities::Comment;
use vidshare_core::value_objects::Snowflake;

use super::snowflakes;
use crate::models::CommentModel;

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Snowflake::new(model.id),
            author_id: Snowflake::new(model.author_id),
            video_id: Snowflake::new(model.video_id),
            parent_id: model.parent_id.map(Snowflake::new),
            reply_ids: snowflakes(model.reply_ids),
            liker_ids: snowflakes(model.liker_ids),
            content: model.content,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
