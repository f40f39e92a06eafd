//! Request DTOs for the engine operations
//!
//! All request DTOs implement `Deserialize` and `Validate`. Services validate
//! before touching the store.

use serde::Deserialize;
use validator::{Validate, ValidationError};
use vidshare_core::entities::{Category, Visibility};
use vidshare_core::Snowflake;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Must not be blank".into());
        return Err(err);
    }
    Ok(())
}

// ============================================================================
// User Requests
// ============================================================================

/// Account creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub avatar: Option<String>,
}

// ============================================================================
// Channel Requests
// ============================================================================

/// Create channel request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChannelRequest {
    #[validate(
        length(min = 1, max = 100, message = "Channel name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: String,

    pub avatar: Option<String>,
    pub banner: Option<String>,
}

/// Update channel request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateChannelRequest {
    #[validate(
        length(min = 1, max = 100, message = "Channel name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub avatar: Option<String>,
    pub banner: Option<String>,
}

// ============================================================================
// Video Requests
// ============================================================================

/// Upload metadata for a new video
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVideoRequest {
    #[validate(
        length(min = 1, max = 100, message = "Title must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,

    #[validate(length(min = 1, message = "Video URL is required"))]
    pub video_url: String,

    #[validate(length(min = 1, message = "Thumbnail is required"))]
    pub thumbnail: String,

    #[serde(default)]
    #[validate(range(min = 0, message = "Duration must not be negative"))]
    pub duration_secs: i32,

    pub category: Option<Category>,
    pub visibility: Option<Visibility>,
}

/// Update video request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVideoRequest {
    #[validate(
        length(min = 1, max = 100, message = "Title must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "Thumbnail must not be empty"))]
    pub thumbnail: Option<String>,

    pub category: Option<Category>,
    pub visibility: Option<Visibility>,
}

/// Video listing query
///
/// `category` accepts any category name case-insensitively, or `All`.
/// `sort` is `newest` (default), `oldest` or `most_viewed`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListVideosQuery {
    pub category: Option<String>,

    #[validate(length(max = 100, message = "Search must be at most 100 characters"))]
    pub search: Option<String>,

    pub sort: Option<String>,

    #[serde(flatten)]
    #[validate(nested)]
    pub paging: PageQuery,
}

/// 1-based paging parameters shared by every listing
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, message = "Page size must be at least 1"))]
    #[serde(alias = "limit")]
    pub page_size: Option<u32>,
}

impl PageQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            page_size: None,
        }
    }

    pub fn with_size(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }
}

// ============================================================================
// Comment Requests
// ============================================================================

/// Create a top-level comment, or a reply when `parent_id` is set
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(
        length(min = 1, max = 1000, message = "Comment must be 1-1000 characters"),
        custom(function = "not_blank")
    )]
    pub content: String,

    #[serde(default)]
    pub parent_id: Option<Snowflake>,
}

impl CreateCommentRequest {
    pub fn top_level(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            parent_id: None,
        }
    }

    pub fn reply(parent_id: Snowflake, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            parent_id: Some(parent_id),
        }
    }
}

/// Edit comment request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(
        length(min = 1, max = 1000, message = "Comment must be 1-1000 characters"),
        custom(function = "not_blank")
    )]
    pub content: String,
}
