use async_trait::async_trait;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;

use crate::data::*;
use crate::error::{ApiError, ApiResult};

pub use http::HttpClient;

/// The reqwest implementation of both APIs.
pub mod http;

/// Header every mutating request carries the CSRF token in.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// The server's comment endpoints.
///
/// Urls are paths relative to the blog; the widget builds them.
#[async_trait]
pub trait CommentApi {
    async fn create_comment(
        &self,
        url: &str,
        token: &str,
        text: &str,
        parent_id: Option<&CommentId>,
    ) -> ApiResult<CommentRecord>;

    async fn edit_comment(&self, url: &str, token: &str, text: &str) -> ApiResult<CommentRecord>;

    async fn delete_comment(&self, url: &str, token: &str) -> ApiResult<()>;

    async fn older_comments(&self, url: &str, offset: usize) -> ApiResult<CommentPage>;
}

/// The server's favorite and vote endpoints.
#[async_trait]
pub trait ReactionApi {
    async fn toggle_favorite(&self, url: &str, token: &str) -> ApiResult<FavoriteAction>;

    async fn vote(&self, url: &str, token: &str, action: VoteAction) -> ApiResult<VoteOutcome>;
}

#[derive(Deserialize)]
struct Status {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Body of a create or edit response.
#[derive(Debug, Deserialize)]
pub(crate) struct CommentBody {
    pub(crate) comment: CommentRecord,
}

/// Body of a favorite response.
#[derive(Debug, Deserialize)]
pub(crate) struct FavoriteBody {
    pub(crate) action: FavoriteAction,
}

/// Body of a delete response, which carries nothing but its status.
pub(crate) type EmptyBody = IgnoredAny;

/// Checks the `status` field of a response and reads the rest of it as `T`.
pub(crate) fn open_envelope<T: DeserializeOwned>(body: serde_json::Value) -> ApiResult<T> {
    let Status { status, message } = Status::deserialize(&body)?;
    if status != "success" {
        return Err(ApiError::Rejected(message.filter(|m| !m.trim().is_empty())));
    }
    Ok(T::deserialize(body)?)
}
