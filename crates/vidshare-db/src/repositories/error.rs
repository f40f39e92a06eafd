//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use vidshare_core::error::DomainError;
use vidshare_core::value_objects::Snowflake;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce(Option<&str>) -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique(db_err.constraint());
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Map a unique violation on `users` to the field that collided
pub fn user_conflict(constraint: Option<&str>) -> DomainError {
    match constraint {
        Some("users_email_key") => DomainError::EmailAlreadyExists,
        _ => DomainError::UsernameExists,
    }
}

/// Escape `%`, `_` and `\` so a search term matches literally inside ILIKE
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

pub fn user_not_found(id: Snowflake) -> DomainError {
    DomainError::UserNotFound(id)
}

pub fn channel_not_found(id: Snowflake) -> DomainError {
    DomainError::ChannelNotFound(id)
}

pub fn video_not_found(id: Snowflake) -> DomainError {
    DomainError::VideoNotFound(id)
}

pub fn comment_not_found(id: Snowflake) -> DomainError {
    DomainError::CommentNotFound(id)
}
