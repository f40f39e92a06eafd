//! # vidshare-core
//!
//! Domain layer containing entities, value objects, repository traits (the entity
//! store ports) and the pagination helper.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod pagination;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Category, Channel, ChannelDetails, Comment, ReactionKind, ReactionTally, User, Video,
    VideoDetails, Visibility,
};
pub use error::{DomainError, ErrorKind};
pub use pagination::{paginate, Page, PageRequest, PageWindow};
pub use traits::{
    ChannelRepository, CommentRepository, CounterUpdate, RepoResult, UserRepository,
    VideoFilter, VideoRepository, VideoSort,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
