//! Database models - SQLx-compatible structs for PostgreSQL tables

mod channel;
mod comment;
mod user;
mod video;

pub use channel::{ChannelModel, CounterRow};
pub use comment::CommentModel;
pub use user::UserModel;
pub use video::{ReactionTallyRow, VideoModel};
