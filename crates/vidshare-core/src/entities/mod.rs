//! Domain entities - core business objects

mod channel;
mod comment;
mod user;
mod video;

pub use channel::{Channel, ChannelDetails};
pub use comment::{Comment, MAX_COMMENT_LENGTH};
pub use user::User;
pub use video::{Category, ReactionKind, ReactionTally, Video, VideoDetails, Visibility};
