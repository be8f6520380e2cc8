use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};

pub use comment::{CommentPage, CommentRecord};
pub use reaction::{FavoriteAction, VoteAction, VoteOutcome, VoteResult};

/// Comment records as the server sends them.
pub mod comment;

/// Favorite and like/dislike payloads.
pub mod reaction;

/// Identifies one comment, and therefore one node in the document.
///
/// The server sends numeric ids, but the page stores them in `data-*`
/// attributes, so the id is kept in its attribute form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CommentId(String);

impl CommentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is blank, which is what a malformed record degrades to.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for CommentId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl From<RawId> for CommentId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => n.into(),
            RawId::Text(s) => Self(s),
        }
    }
}

impl<'de> Deserialize<'de> for CommentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawId::deserialize(deserializer).map(Into::into)
    }
}

/// Reads an optional id where `null`, a missing field and `""` all mean "none".
pub(crate) fn optional_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<CommentId>, D::Error> {
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(CommentId::from).filter(|id| !id.is_empty()))
}
