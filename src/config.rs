use serde::Deserialize;

use crate::data::CommentId;

/// Endpoint layout and limits for one comment widget.
///
/// Pages embed this as JSON; anything left out keeps the blog's defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Root comments shown at once before the oldest start to be hidden.
    pub max_visible_roots: usize,

    /// `{id}` is replaced by the comment id.
    pub edit_path: String,

    /// `{id}` is replaced by the comment id.
    pub delete_path: String,

    /// `{slug}` is replaced by the post slug.
    pub more_comments_path: String,

    /// `{id}` is replaced by the post id.
    pub favorite_path: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            max_visible_roots: 5,
            edit_path: "/comments/{id}/edit/".to_owned(),
            delete_path: "/comments/{id}/delete/".to_owned(),
            more_comments_path: "/posts/{slug}/more_comments/".to_owned(),
            favorite_path: "/posts/{id}/favorite/".to_owned(),
        }
    }
}

impl WidgetConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn edit_url(&self, id: &CommentId) -> String {
        self.edit_path.replace("{id}", id.as_str())
    }

    pub fn delete_url(&self, id: &CommentId) -> String {
        self.delete_path.replace("{id}", id.as_str())
    }

    pub fn more_comments_url(&self, slug: &str) -> String {
        self.more_comments_path.replace("{slug}", slug)
    }

    pub fn favorite_url(&self, post_id: &str) -> String {
        self.favorite_path.replace("{id}", post_id)
    }
}
