use log::{error, info, warn};
use serde::Deserialize;

use crate::api::CommentApi;
use crate::config::WidgetConfig;
use crate::data::{CommentId, CommentRecord};
use crate::document::{Document, Insertion, LoadOlder};
use crate::error::{ApiError, WidgetError, WidgetResult};
use crate::html::comments::MAX_REPLY_DEPTH;

/// What a page hands the widget when it mounts.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Page {
    /// Read from the form's hidden CSRF field.
    pub csrf_token: Option<String>,

    /// Where new comments are posted.
    pub form_url: String,

    pub post_slug: String,

    /// Root comments already on the page, oldest first.
    pub comments: Vec<CommentRecord>,

    /// The total shown in the header. Counted from `comments` when absent.
    pub comment_count: Option<usize>,

    pub older_comments_count: usize,

    pub has_more: bool,
}

/// The comment widget of one page.
///
/// Holds everything the handlers share: the CSRF token, the pending reply
/// target, the pagination cursor, and the document they patch.
pub struct CommentWidget<A> {
    api: A,
    config: WidgetConfig,
    token: String,
    form_url: String,
    post_slug: String,
    document: Document,
    reply_target: Option<CommentId>,
    cursor: usize,
    alerts: Vec<String>,
}

/// Rejects target urls that could only come from a broken page.
fn check_url(url: &str) -> WidgetResult<()> {
    if url.trim().is_empty() || url.contains("undefined") {
        return Err(WidgetError::InvalidUrl(url.to_owned()));
    }
    Ok(())
}

fn comment_url(id: &CommentId, url: String) -> WidgetResult<String> {
    if id.is_empty() {
        return Err(WidgetError::InvalidUrl(url));
    }
    check_url(&url)?;
    Ok(url)
}

fn non_empty(text: &str) -> WidgetResult<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(WidgetError::EmptyText);
    }
    Ok(text)
}

impl<A: CommentApi> CommentWidget<A> {
    /// Builds the widget for `page`. Without a CSRF token nothing can be
    /// posted, so mounting fails outright.
    pub fn mount(page: Page, config: WidgetConfig, api: A) -> WidgetResult<Self> {
        let Some(token) = page.csrf_token.filter(|t| !t.trim().is_empty()) else {
            error!("CSRF token not found, comment widget not mounted");
            return Err(WidgetError::MissingToken);
        };

        let mut document = Document::new(&page.comments, config.max_visible_roots)
            .with_older_comments(page.older_comments_count, page.has_more);
        if let Some(count) = page.comment_count {
            document = document.with_comment_count(count);
        }

        Ok(Self {
            api,
            config,
            token,
            form_url: page.form_url,
            post_slug: page.post_slug,
            document,
            reply_target: None,
            cursor: 0,
            alerts: Vec::new(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The comment the next submission replies to, if any.
    pub fn reply_target(&self) -> Option<&CommentId> {
        self.reply_target.as_ref()
    }

    /// How far back older comments have been fetched.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Messages shown to the reader, oldest first.
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    fn report<T>(&mut self, action: &str, result: WidgetResult<T>) -> WidgetResult<T> {
        if let Err(err) = &result {
            warn!("could not {action}: {err}");
            let message = match err {
                WidgetError::Api(ApiError::Rejected(Some(message))) => message.clone(),
                WidgetError::Api(ApiError::Rejected(None)) => format!("Could not {action}"),
                err => format!("Could not {action}: {err}"),
            };
            self.alerts.push(message);
        }
        result
    }

    /// Types into the comment box.
    pub fn write(&mut self, text: &str) {
        self.document.set_input(text);
    }

    /// Targets the next submission at `id`.
    pub fn begin_reply(&mut self, id: &CommentId) -> WidgetResult<()> {
        let Some(node) = self.document.find(id) else {
            return self.report("reply", Err(WidgetError::UnknownComment(id.clone())));
        };
        if node.level() >= MAX_REPLY_DEPTH {
            return self.report("reply", Err(WidgetError::TooDeep(id.clone())));
        }
        let author = node.author().to_owned();
        self.reply_target = Some(id.clone());
        self.document.show_reply_preview(&author);
        Ok(())
    }

    pub fn cancel_reply(&mut self) {
        self.reply_target = None;
        self.document.hide_reply_preview();
    }

    /// Posts the comment box, as a reply when a target is set.
    ///
    /// A reply whose parent has left the page is accepted by the server but
    /// not shown; that is not reported.
    pub async fn submit(&mut self) -> WidgetResult<Insertion> {
        let result = self.create().await;
        let insertion = self.report("add comment", result)?;
        self.document.clear_input();
        self.cancel_reply();
        Ok(insertion)
    }

    async fn create(&mut self) -> WidgetResult<Insertion> {
        let text = non_empty(self.document.input())?.to_owned();
        check_url(&self.form_url)?;

        let parent = self.reply_target.clone();
        let mut record = self
            .api
            .create_comment(&self.form_url, &self.token, &text, parent.as_ref())
            .await?;
        if record.parent_id.is_none() {
            record.parent_id = parent;
        }

        let insertion = self.document.insert(&record);
        info!("comment {} added ({insertion:?})", record.id);
        Ok(insertion)
    }

    /// Replaces a comment's content with an edit form holding its raw text.
    pub fn begin_edit(&mut self, id: &CommentId) -> WidgetResult<()> {
        let result = comment_url(id, self.config.edit_url(id)).and_then(|_| {
            if self.document.open_edit_form(id) {
                Ok(())
            } else {
                Err(WidgetError::UnknownComment(id.clone()))
            }
        });
        self.report("edit comment", result)
    }

    /// Abandons an edit by reloading the page.
    pub fn cancel_edit(&mut self) {
        self.document.request_reload();
    }

    pub async fn submit_edit(&mut self, id: &CommentId, text: &str) -> WidgetResult<()> {
        let result = self.edit(id, text).await;
        self.report("edit comment", result)
    }

    async fn edit(&mut self, id: &CommentId, text: &str) -> WidgetResult<()> {
        let url = comment_url(id, self.config.edit_url(id))?;
        let text = non_empty(text)?;
        if !self.document.contains(id) {
            return Err(WidgetError::UnknownComment(id.clone()));
        }

        let mut record = self.api.edit_comment(&url, &self.token, text).await?;
        record.id = id.clone();
        self.document.replace_content(&record);
        info!("comment {id} edited");
        Ok(())
    }

    /// Deletes a comment and everything under it. Confirming with the reader
    /// is up to the caller.
    pub async fn delete(&mut self, id: &CommentId) -> WidgetResult<()> {
        let result = self.remove(id).await;
        self.report("delete comment", result)
    }

    async fn remove(&mut self, id: &CommentId) -> WidgetResult<()> {
        let url = comment_url(id, self.config.delete_url(id))?;
        if !self.document.contains(id) {
            return Err(WidgetError::UnknownComment(id.clone()));
        }

        self.api.delete_comment(&url, &self.token).await?;
        self.document.remove(id);
        if self.reply_target.as_ref().is_some_and(|t| !self.document.contains(t)) {
            self.cancel_reply();
        }
        info!("comment {id} deleted");
        Ok(())
    }

    /// Fetches the next page of older root comments and puts them at the top.
    /// Returns how many came back.
    pub async fn load_older(&mut self) -> WidgetResult<usize> {
        if !matches!(self.document.load_older(), LoadOlder::Ready { .. }) {
            return Ok(0);
        }

        let url = self.config.more_comments_url(&self.post_slug);
        if let Err(err) = check_url(&url) {
            return self.report("load comments", Err(err));
        }

        self.document.start_loading_older();
        match self.api.older_comments(&url, self.cursor).await {
            Ok(page) => {
                self.document.prepend_roots(&page.comments);
                self.cursor = page.next_offset;
                self.document
                    .finish_loading_older(page.older_comments_count, page.has_more);
                info!(
                    "loaded {} older comments, next offset {}",
                    page.comments.len(),
                    page.next_offset
                );
                Ok(page.comments.len())
            }
            Err(err) => {
                self.document.abort_loading_older();
                self.report("load comments", Err(err.into()))
            }
        }
    }
}
