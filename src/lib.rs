//! Client-side comment threads for a server-rendered blog.
//!
//! Comments arrive from the blog as [`CommentRecord`]s, are rendered to
//! nested HTML by [`html::comments`], and live in a [`Document`] that the
//! [`CommentWidget`] patches as readers post, reply, edit, delete and page
//! back through older comments.

pub use api::{CommentApi, HttpClient, ReactionApi};
pub use config::WidgetConfig;
pub use data::{CommentId, CommentPage, CommentRecord};
pub use document::{Document, Insertion, LoadOlder, Node};
pub use error::{ApiError, WidgetError};
pub use reactions::{PostReactions, ReactionBar, VoteButton};
pub use widget::{CommentWidget, Page};

/// The blog's endpoints and the HTTP client that calls them.
pub mod api;

/// Endpoint paths and limits.
pub mod config;

/// Records returned by the blog.
pub mod data;

/// The live comment tree.
pub mod document;

pub mod error;

/// Pure renderers.
pub mod html;

/// Favorite and vote buttons.
pub mod reactions;

/// The per-page comment widget.
pub mod widget;
