//! Integration test utilities for the vidshare engines
//!
//! Helpers for building engines over the in-memory or PostgreSQL store and
//! fixtures for seeding users, channels, videos and comments, and repositories
//! that fail at chosen steps.

pub mod faults;
pub mod fixtures;
pub mod helpers;

pub use faults::*;
pub use fixtures::*;
pub use helpers::*;
