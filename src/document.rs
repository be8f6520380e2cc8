use log::debug;
use maud::{html, Markup};

use crate::data::{CommentId, CommentRecord};
use crate::html::comments::{self, Shell};

/// Label the load-older control shows while idle.
pub const LOAD_OLDER_LABEL: &str = "Show older comments";

/// State of the "load older comments" control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOlder {
    /// Enabled, showing `label`.
    Ready { label: String },

    /// Disabled while a page is fetched. `label` is what to go back to.
    Loading { label: String },

    /// There is nothing older left to fetch.
    Hidden,
}

/// A comment node in the document.
#[derive(Clone, Debug)]
pub struct Node {
    id: CommentId,
    author: String,
    raw_text: String,
    level: u32,
    hidden: bool,
    editing: bool,
    content: Markup,

    /// `None` until the first reply arrives.
    replies: Option<Vec<Node>>,
}

impl Node {
    fn from_record(record: &CommentRecord) -> Self {
        let replies = (!record.replies.is_empty())
            .then(|| record.replies.iter().map(Node::from_record).collect());
        Node {
            id: record.id.clone(),
            author: record.author.clone(),
            raw_text: record.text.clone(),
            level: record.level,
            hidden: false,
            editing: false,
            content: comments::content(record),
            replies,
        }
    }

    pub fn id(&self) -> &CommentId {
        &self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// The text the edit form is prefilled with.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether the inline edit form currently replaces the content.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Direct replies, in display order.
    pub fn replies(&self) -> &[Node] {
        self.replies.as_deref().unwrap_or_default()
    }

    pub fn has_replies_container(&self) -> bool {
        self.replies.is_some()
    }

    pub fn render(&self) -> Markup {
        let replies = self.replies.as_ref().map(|replies| {
            html! {
                @for reply in replies {
                    (reply.render())
                }
            }
        });
        let shell = Shell {
            id: &self.id,
            raw_text: &self.raw_text,
            level: self.level,
            hidden: self.hidden,
        };
        comments::shell(shell, self.content.clone(), replies)
    }

    fn contains(&self, id: &CommentId) -> bool {
        &self.id == id || self.replies().iter().any(|r| r.contains(id))
    }

    /// Drops every reply, at any depth, whose id is `taken`.
    fn drop_replies(&mut self, taken: &dyn Fn(&CommentId) -> bool) {
        let Some(replies) = self.replies.as_mut() else {
            return;
        };
        replies.retain(|reply| {
            if taken(&reply.id) {
                debug!("comment {} is already on the page", reply.id);
                return false;
            }
            true
        });
        for reply in replies.iter_mut() {
            reply.drop_replies(taken);
        }
        if replies.is_empty() {
            self.replies = None;
        }
    }
}

fn find_in<'doc>(nodes: &'doc [Node], id: &CommentId) -> Option<&'doc Node> {
    for node in nodes {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in(node.replies(), id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'doc>(nodes: &'doc mut [Node], id: &CommentId) -> Option<&'doc mut Node> {
    for node in nodes.iter_mut() {
        if &node.id == id {
            return Some(node);
        }
        if let Some(replies) = node.replies.as_mut() {
            if let Some(found) = find_in_mut(replies, id) {
                return Some(found);
            }
        }
    }
    None
}

fn remove_from(nodes: &mut Vec<Node>, id: &CommentId) -> Option<Node> {
    if let Some(position) = nodes.iter().position(|n| &n.id == id) {
        return Some(nodes.remove(position));
    }
    nodes
        .iter_mut()
        .find_map(|n| n.replies.as_mut().and_then(|r| remove_from(r, id)))
}

/// Where a created comment ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Insertion {
    /// Appended to the root list.
    Root,

    /// Appended under its parent.
    Reply,

    /// The parent is not on the page, so nothing was inserted.
    Orphan,

    /// A node with this id already exists, so nothing was inserted.
    Duplicate,
}

/// The live comment section of a page.
///
/// Every change to what the reader sees goes through a method here.
#[derive(Clone, Debug)]
pub struct Document {
    roots: Vec<Node>,
    max_visible_roots: usize,
    comment_count: usize,
    older_count: usize,
    load_older: LoadOlder,
    reply_preview: Option<String>,
    input: String,
    input_focused: bool,
    scroll_target: Option<CommentId>,
    reload_requested: bool,
}

impl Document {
    /// A section showing `comments` as its root list, oldest first.
    pub fn new(comments: &[CommentRecord], max_visible_roots: usize) -> Self {
        let roots: Vec<Node> = comments.iter().map(Node::from_record).collect();
        let comment_count = roots.iter().map(|r| 1 + count_replies(r)).sum();
        Document {
            roots,
            max_visible_roots,
            comment_count,
            older_count: 0,
            load_older: LoadOlder::Hidden,
            reply_preview: None,
            input: String::new(),
            input_focused: false,
            scroll_target: None,
            reload_requested: false,
        }
    }

    /// Overrides the comment counter with the server's total.
    pub fn with_comment_count(mut self, count: usize) -> Self {
        self.comment_count = count;
        self
    }

    /// Shows the load-older control when older comments exist.
    pub fn with_older_comments(mut self, older_count: usize, has_more: bool) -> Self {
        self.older_count = older_count;
        self.load_older = if has_more {
            LoadOlder::Ready {
                label: LOAD_OLDER_LABEL.to_owned(),
            }
        } else {
            LoadOlder::Hidden
        };
        self
    }

    pub fn find(&self, id: &CommentId) -> Option<&Node> {
        find_in(&self.roots, id)
    }

    pub fn contains(&self, id: &CommentId) -> bool {
        self.roots.iter().any(|r| r.contains(id))
    }

    /// The root list in display order, hidden roots included.
    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    pub fn visible_roots(&self) -> usize {
        self.roots.iter().filter(|r| !r.hidden).count()
    }

    pub fn comment_count(&self) -> usize {
        self.comment_count
    }

    pub fn older_count(&self) -> usize {
        self.older_count
    }

    pub fn load_older(&self) -> &LoadOlder {
        &self.load_older
    }

    pub fn reply_preview(&self) -> Option<&str> {
        self.reply_preview.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    /// The node most recently scrolled into view.
    pub fn scroll_target(&self) -> Option<&CommentId> {
        self.scroll_target.as_ref()
    }

    pub fn reload_requested(&self) -> bool {
        self.reload_requested
    }

    /// Inserts a newly created comment where its `parent_id` says it goes.
    pub fn insert(&mut self, record: &CommentRecord) -> Insertion {
        if self.contains(&record.id) {
            debug!("comment {} is already on the page", record.id);
            return Insertion::Duplicate;
        }

        let Some(parent_id) = &record.parent_id else {
            self.append_root(record);
            return Insertion::Root;
        };

        let Some(parent) = find_in_mut(&mut self.roots, parent_id) else {
            debug!(
                "dropping reply {} to comment {parent_id}, which is not on the page",
                record.id
            );
            return Insertion::Orphan;
        };
        parent
            .replies
            .get_or_insert_with(Vec::new)
            .push(Node::from_record(record));
        self.comment_count += 1;
        Insertion::Reply
    }

    fn append_root(&mut self, record: &CommentRecord) {
        self.roots.push(Node::from_record(record));
        self.comment_count += 1;
        self.scroll_target = Some(record.id.clone());

        if self.visible_roots() > self.max_visible_roots {
            if let Some(oldest) = self.roots.iter_mut().find(|r| !r.hidden) {
                oldest.hidden = true;
                self.older_count += 1;
            }
        }
    }

    /// Puts a page of older roots at the head of the list, keeping their
    /// order. Roots already on the page are revealed instead of repeated.
    pub fn prepend_roots(&mut self, records: &[CommentRecord]) {
        let mut fresh = Vec::with_capacity(records.len());
        for record in records {
            if let Some(existing) = find_in_mut(&mut self.roots, &record.id) {
                existing.hidden = false;
                continue;
            }
            if fresh.iter().any(|n: &Node| n.contains(&record.id)) {
                continue;
            }
            let mut node = Node::from_record(record);
            node.drop_replies(&|id| self.contains(id) || fresh.iter().any(|n| n.contains(id)));
            fresh.push(node);
        }
        self.roots.splice(0..0, fresh);
    }

    /// Re-renders a node's content from an edited record. Its replies stay
    /// where they are, and it keeps its own depth.
    pub fn replace_content(&mut self, record: &CommentRecord) -> bool {
        let Some(node) = find_in_mut(&mut self.roots, &record.id) else {
            return false;
        };
        let record = CommentRecord {
            level: node.level,
            ..record.clone()
        };
        node.content = comments::content(&record);
        node.raw_text = record.text.clone();
        node.author = record.author.clone();
        node.editing = false;
        true
    }

    /// Swaps a node's content for the inline edit form.
    pub fn open_edit_form(&mut self, id: &CommentId) -> bool {
        let Some(node) = find_in_mut(&mut self.roots, id) else {
            return false;
        };
        node.content = comments::edit_form(&node.id, &node.raw_text);
        node.editing = true;
        true
    }

    /// Removes a node together with all of its replies.
    pub fn remove(&mut self, id: &CommentId) -> Option<Node> {
        let removed = remove_from(&mut self.roots, id)?;
        self.comment_count = self.comment_count.saturating_sub(1);
        if self.scroll_target.as_ref().is_some_and(|t| removed.contains(t)) {
            self.scroll_target = None;
        }
        Some(removed)
    }

    pub fn show_reply_preview(&mut self, author: &str) {
        self.reply_preview = Some(author.to_owned());
        self.input_focused = true;
    }

    pub fn hide_reply_preview(&mut self) {
        self.reply_preview = None;
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_owned();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Disables the load-older control for the duration of a fetch.
    pub fn start_loading_older(&mut self) {
        if let LoadOlder::Ready { label } = &self.load_older {
            self.load_older = LoadOlder::Loading {
                label: label.clone(),
            };
        }
    }

    /// Ends a successful fetch.
    pub fn finish_loading_older(&mut self, older_count: usize, has_more: bool) {
        self.older_count = older_count;
        self.load_older = match std::mem::replace(&mut self.load_older, LoadOlder::Hidden) {
            _ if !has_more => LoadOlder::Hidden,
            LoadOlder::Loading { label } | LoadOlder::Ready { label } => LoadOlder::Ready { label },
            LoadOlder::Hidden => LoadOlder::Ready {
                label: LOAD_OLDER_LABEL.to_owned(),
            },
        };
    }

    /// Re-enables the control with its previous label after a failed fetch.
    pub fn abort_loading_older(&mut self) {
        if let LoadOlder::Loading { label } = &self.load_older {
            self.load_older = LoadOlder::Ready {
                label: label.clone(),
            };
        }
    }

    pub fn request_reload(&mut self) {
        self.reload_requested = true;
    }

    /// The root list alone.
    pub fn render_list(&self) -> Markup {
        html! {
            #comment-list {
                @for root in &self.roots {
                    (root.render())
                }
            }
        }
    }

    /// The whole comment section.
    pub fn render(&self) -> Markup {
        html! {
            section #comments {
                (comments::count_header(self.comment_count))
                (comments::load_older(&self.load_older, self.older_count))
                (self.render_list())
                (comments::reply_preview(self.reply_preview.as_deref()))
                form #comment-form {
                    textarea.form-control name="text" rows="3" autofocus[self.input_focused] { (self.input) }
                    button.btn.btn-primary type="submit" { "Send" }
                }
            }
        }
    }
}

fn count_replies(node: &Node) -> usize {
    node.replies()
        .iter()
        .map(|r| 1 + count_replies(r))
        .sum()
}
