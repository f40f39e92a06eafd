//! Data transfer objects for engine requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for operation inputs
//! - Response DTOs for serializing operation results
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    CreateChannelRequest, CreateCommentRequest, CreateUserRequest, CreateVideoRequest,
    ListVideosQuery, PageQuery, UpdateChannelRequest, UpdateCommentRequest, UpdateVideoRequest,
};

// Re-export commonly used response types
pub use responses::{
    ChannelResponse, ChannelSummaryResponse, CommentLikeResponse, CommentResponse,
    DeleteCommentResponse, ReactionResponse, SubscriptionResponse, UserResponse,
    UserSummaryResponse, VideoDetailResponse, VideoResponse,
};

// Re-export mappers and helper structs
pub use mappers::{ChannelWithOwner, CommentWithAuthor, VideoWithDetails};
