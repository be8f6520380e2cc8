use serde::{Deserialize, Serialize};

use super::*;

/// A comment as returned by the create, edit and paginate endpoints.
///
/// Every field falls back to its default, so a record with missing fields
/// still renders, just with blanks where the data should be.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentRecord {
    /// Stable across edits.
    pub id: CommentId,

    /// Plain text. Newlines are shown as line breaks.
    pub text: String,

    /// Display name of the author.
    pub author: String,

    /// Whether the viewer wrote this comment and may edit or delete it.
    pub is_author: bool,

    pub is_edited: bool,

    /// Already formatted for display by the server.
    pub created_at: String,

    /// The comment this one replies to, or `None` for a root comment.
    #[serde(deserialize_with = "optional_id")]
    pub parent_id: Option<CommentId>,

    /// Depth in the reply tree, as computed by the server.
    pub level: u32,

    /// Only filled on the initial and paginated loads.
    pub replies: Vec<CommentRecord>,
}

impl CommentRecord {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// One page of older root comments.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CommentPage {
    /// Oldest first, in the order they should appear on the page.
    pub comments: Vec<CommentRecord>,

    /// The cursor to send with the next request.
    pub next_offset: usize,

    pub has_more: bool,

    /// How many root comments are still older than everything shown.
    pub older_comments_count: usize,
}
