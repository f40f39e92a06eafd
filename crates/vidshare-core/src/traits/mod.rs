mod repositories;

pub use repositories::{
    ChannelRepository, CommentRepository, CounterUpdate, RepoResult, UserRepository,
    VideoFilter, VideoRepository, VideoSort,
};
