use log::debug;
use reqwest::{Client, RequestBuilder, Url};

use super::*;

/// Talks to the blog over HTTP.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base: Url,
}

impl HttpClient {
    /// A client resolving every path against `base`, such as
    /// `https://blog.example/`.
    pub fn new(base: &str) -> ApiResult<Self> {
        let base = Url::parse(base).map_err(|e| ApiError::Transport(format!("{base}: {e}")))?;
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    /// Reuses a configured `reqwest` client, for timeouts or a shared pool.
    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.base
            .join(path)
            .map_err(|e| ApiError::Transport(format!("{path}: {e}")))
    }

    fn post(&self, path: &str, token: &str) -> ApiResult<RequestBuilder> {
        let url = self.url(path)?;
        debug!("POST {url}");
        Ok(self.client.post(url).header(CSRF_HEADER, token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let body: serde_json::Value = response.json().await?;
        open_envelope(body)
    }
}

#[async_trait]
impl CommentApi for HttpClient {
    async fn create_comment(
        &self,
        url: &str,
        token: &str,
        text: &str,
        parent_id: Option<&CommentId>,
    ) -> ApiResult<CommentRecord> {
        let mut form = vec![("text", text)];
        if let Some(parent_id) = parent_id {
            form.push(("parent_id", parent_id.as_str()));
        }
        let request = self.post(url, token)?.form(&form);
        let CommentBody { comment } = self.send(request).await?;
        Ok(comment)
    }

    async fn edit_comment(&self, url: &str, token: &str, text: &str) -> ApiResult<CommentRecord> {
        let request = self.post(url, token)?.form(&[("text", text)]);
        let CommentBody { comment } = self.send(request).await?;
        Ok(comment)
    }

    async fn delete_comment(&self, url: &str, token: &str) -> ApiResult<()> {
        let request = self.post(url, token)?;
        let _: EmptyBody = self.send(request).await?;
        Ok(())
    }

    async fn older_comments(&self, url: &str, offset: usize) -> ApiResult<CommentPage> {
        let url = self.url(url)?;
        debug!("GET {url}?offset={offset}");
        let request = self.client.get(url).query(&[("offset", offset)]);
        self.send(request).await
    }
}

#[async_trait]
impl ReactionApi for HttpClient {
    async fn toggle_favorite(&self, url: &str, token: &str) -> ApiResult<FavoriteAction> {
        let request = self.post(url, token)?.json(&serde_json::json!({}));
        let FavoriteBody { action } = self.send(request).await?;
        Ok(action)
    }

    async fn vote(&self, url: &str, token: &str, action: VoteAction) -> ApiResult<VoteOutcome> {
        let request = self.post(url, token)?.form(&[("action", action.as_str())]);
        self.send(request).await
    }
}
