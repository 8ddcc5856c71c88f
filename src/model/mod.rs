//! Core data model types for parchment

mod blog;
mod comment;

pub use blog::{Blog, BlogKey};
pub use comment::Comment;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as unix milliseconds
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}
