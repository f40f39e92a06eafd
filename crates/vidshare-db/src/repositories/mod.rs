//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in vidshare-core.
//! Set fields are `BIGINT[]` columns; every mutation is a single `UPDATE` that
//! changes a set, and any counter derived from it, in one row write.

mod channel;
mod comment;
mod error;
mod user;
mod video;

pub use channel::PgChannelRepository;
pub use comment::PgCommentRepository;
pub use user::PgUserRepository;
pub use video::PgVideoRepository;
