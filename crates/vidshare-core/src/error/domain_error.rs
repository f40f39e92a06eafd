//! Domain errors - error types for the domain layer

use serde::Serialize;
use thiserror::Error;

use crate::value_objects::Snowflake;

/// Coarse failure class every domain error falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Referenced entity is absent
    NotFound,
    /// Actor lacks ownership or authorship
    Forbidden,
    /// Request is well-formed but breaks a business rule
    InvalidOperation,
    /// Uniqueness violation
    Conflict,
    /// Malformed input
    Validation,
    Internal,
}

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    #[error("Video not found: {0}")]
    VideoNotFound(Snowflake),

    #[error("Comment not found: {0}")]
    CommentNotFound(Snowflake),

    #[error("User {0} has no channel")]
    NoChannelForUser(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not channel owner")]
    NotChannelOwner,

    #[error("Not comment author")]
    NotCommentAuthor,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Channel name already taken")]
    ChannelNameExists,

    #[error("Username already taken")]
    UsernameExists,

    #[error("Email already in use")]
    EmailAlreadyExists,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Cannot subscribe to your own channel")]
    SelfSubscription,

    #[error("Cannot reply to a reply")]
    NestedReply,

    #[error("Parent comment belongs to a different video")]
    ReplyVideoMismatch,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::VideoNotFound(_) => "UNKNOWN_VIDEO",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::NoChannelForUser(_) => "NO_CHANNEL",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",

            // Authorization
            Self::NotChannelOwner => "NOT_CHANNEL_OWNER",
            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",

            // Conflict
            Self::ChannelNameExists => "CHANNEL_NAME_EXISTS",
            Self::UsernameExists => "USERNAME_EXISTS",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",

            // Business Rules
            Self::SelfSubscription => "SELF_SUBSCRIPTION",
            Self::NestedReply => "NESTED_REPLY",
            Self::ReplyVideoMismatch => "REPLY_VIDEO_MISMATCH",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// Failure class used for transport mapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound(_)
            | Self::ChannelNotFound(_)
            | Self::VideoNotFound(_)
            | Self::CommentNotFound(_)
            | Self::NoChannelForUser(_) => ErrorKind::NotFound,

            Self::ValidationError(_) => ErrorKind::Validation,

            Self::NotChannelOwner | Self::NotCommentAuthor => ErrorKind::Forbidden,

            Self::ChannelNameExists | Self::UsernameExists | Self::EmailAlreadyExists => {
                ErrorKind::Conflict
            }

            Self::SelfSubscription | Self::NestedReply | Self::ReplyVideoMismatch => {
                ErrorKind::InvalidOperation
            }

            Self::DatabaseError(_) => ErrorKind::Internal,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        self.kind() == ErrorKind::Forbidden
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// Check if this is a business rule violation
    pub fn is_invalid_operation(&self) -> bool {
        self.kind() == ErrorKind::InvalidOperation
    }
}
