use serde::{Deserialize, Serialize};

/// What the favorite endpoint did to the post.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteAction {
    Added,
    Removed,
}

/// The action a vote button sends when clicked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteAction {
    Like,
    Unlike,
    Dislike,
    Undislike,
}

impl VoteAction {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteAction::Like => "like",
            VoteAction::Unlike => "unlike",
            VoteAction::Dislike => "dislike",
            VoteAction::Undislike => "undislike",
        }
    }
}

/// What the vote endpoint recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteResult {
    Liked,
    Unliked,
    Disliked,
    Undisliked,
}

impl VoteResult {
    /// The next actions of the like and dislike buttons, in that order.
    pub fn next_actions(self) -> (VoteAction, VoteAction) {
        match self {
            VoteResult::Liked => (VoteAction::Unlike, VoteAction::Dislike),
            VoteResult::Unliked => (VoteAction::Like, VoteAction::Dislike),
            VoteResult::Disliked => (VoteAction::Like, VoteAction::Undislike),
            VoteResult::Undisliked => (VoteAction::Like, VoteAction::Dislike),
        }
    }
}

/// The counters and outcome returned after a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct VoteOutcome {
    pub like_count: u64,
    pub dislike_count: u64,
    pub action: VoteResult,
}
