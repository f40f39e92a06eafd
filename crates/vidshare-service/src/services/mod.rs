//! Business logic services
//!
//! The reaction, subscription and comment engines, plus the user, channel and
//! video services that create the entities they act on. Each service borrows
//! a [`ServiceContext`] for one call.

pub mod channel;
pub mod comment;
pub mod context;
pub mod error;
pub mod reaction;
pub mod subscription;
pub mod user;
pub mod video;

// Re-export all services for convenience
pub use channel::ChannelService;
pub use comment::CommentService;
pub use context::{bootstrap, ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use reaction::ReactionService;
pub use subscription::SubscriptionService;
pub use user::UserService;
pub use video::VideoService;
