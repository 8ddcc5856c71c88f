//! Comment type - a child record embedded in a blog's metadata

use super::now_millis;
use serde::{Deserialize, Serialize};

/// A reader comment on a blog
///
/// Comments have no lifecycle of their own here; they travel as opaque payload
/// inside the parent blog's metadata record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author_name: String,
    pub body: String,
    pub created_at: u64,
    pub updated_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<u64>,
}

impl Comment {
    /// Create a comment stamped with the current time
    pub fn new(
        id: impl Into<String>,
        author_name: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let now = now_millis();

        Comment {
            id: id.into(),
            author_name: author_name.into(),
            body: body.into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}
