use thiserror::Error;

use crate::data::CommentId;

/// Why a request to the blog failed.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed, or the body could not be read.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("server responded with status {0}")]
    Status(u16),

    /// The response parsed but its `status` was not `"success"`.
    #[error("{}", .0.as_deref().unwrap_or("the server rejected the request"))]
    Rejected(Option<String>),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ApiError::Status(status.as_u16()),
            None => ApiError::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Transport(format!("malformed response: {err}"))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Why a widget action did not happen.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// The page carries no CSRF token, so nothing can be posted.
    #[error("CSRF token not found, reload the page")]
    MissingToken,

    #[error("invalid target URL: {0:?}")]
    InvalidUrl(String),

    #[error("comment cannot be empty")]
    EmptyText,

    #[error("comment {0} is not on the page")]
    UnknownComment(CommentId),

    /// The comment sits at the deepest level that takes no replies.
    #[error("comment {0} is too deep to reply to")]
    TooDeep(CommentId),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl WidgetError {
    /// Whether the server was reached and refused, as opposed to the request
    /// not getting through.
    pub fn is_rejection(&self) -> bool {
        matches!(self, WidgetError::Api(ApiError::Rejected(_)))
    }
}

pub type WidgetResult<T> = Result<T, WidgetError>;
