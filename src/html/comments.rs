use maud::{html, Markup, PreEscaped};

use super::*;
use crate::document::LoadOlder;

/// Replies at this depth no longer get a reply button.
pub const MAX_REPLY_DEPTH: u32 = 5;

/// Horizontal offset, in pixels, of one level of nesting.
pub const INDENT_STEP: u32 = 20;

/// The left margin of a comment at `level`.
///
/// Indentation grows over the first five levels and then walks back toward
/// zero over the next five, so very deep threads zig-zag instead of
/// drifting off the right edge.
pub fn indentation(level: u32) -> u32 {
    let cycle = MAX_REPLY_DEPTH * 2;
    let position = level % cycle;
    if position >= MAX_REPLY_DEPTH {
        (cycle - position) * INDENT_STEP
    } else {
        position * INDENT_STEP
    }
}

/// The attributes kept on a comment's wrapper element.
pub struct Shell<'a> {
    pub id: &'a CommentId,
    /// Raw text used to prefill the edit form.
    pub raw_text: &'a str,
    pub level: u32,
    pub hidden: bool,
}

impl<'a> From<&'a CommentRecord> for Shell<'a> {
    fn from(record: &'a CommentRecord) -> Self {
        Shell {
            id: &record.id,
            raw_text: &record.text,
            level: record.level,
            hidden: false,
        }
    }
}

/// Wraps a comment's content and, if it has any, its replies.
///
/// The content and the replies sit in separate containers so that an edit
/// can swap the first without touching the second.
pub fn shell(shell: Shell, content: Markup, replies: Option<Markup>) -> Markup {
    html! {
        .comment
            data-comment-id=(shell.id.as_str())
            data-text=(shell.raw_text)
            data-level=(shell.level)
            style={ "margin-left: " (indentation(shell.level)) "px" }
            hidden[shell.hidden]
        {
            .comment-content { (content) }
            @if let Some(replies) = replies {
                .replies { (replies) }
            }
        }
    }
}

/// A comment and all its replies.
pub fn comment(record: &CommentRecord) -> Markup {
    let replies = (!record.replies.is_empty()).then(|| {
        html! {
            @for reply in &record.replies {
                (comment(reply))
            }
        }
    });
    shell(record.into(), content(record), replies)
}

/// Everything inside a comment node except its replies.
pub fn content(record: &CommentRecord) -> Markup {
    html! {
        .comment-header {
            strong.comment-author { (record.author) }
            " "
            small.text-muted {
                (record.created_at)
                @if record.is_edited {
                    " "
                    span.edited { "(edited)" }
                }
            }
        }
        p.comment-text { (text_with_breaks(&record.text)) }
        .comment-actions {
            @if record.level < MAX_REPLY_DEPTH {
                button.reply-comment
                    type="button"
                    data-comment-id=(record.id.as_str())
                    data-author=(record.author)
                { "Reply" }
            }
            @if record.is_author {
                .dropdown {
                    button.btn.btn-sm.btn-light.dropdown-toggle type="button" data-bs-toggle="dropdown" {
                        i.bi.bi-three-dots-vertical {}
                    }
                    ul.dropdown-menu {
                        li {
                            a.dropdown-item.edit-comment href="#" data-comment-id=(record.id.as_str()) { "Edit" }
                        }
                        li {
                            a.dropdown-item.text-danger.delete-comment href="#" data-comment-id=(record.id.as_str()) { "Delete" }
                        }
                    }
                }
            }
        }
    }
}

/// The inline form that replaces a comment's content while it is edited.
pub fn edit_form(id: &CommentId, raw_text: &str) -> Markup {
    html! {
        form.edit-comment-form data-comment-id=(id.as_str()) {
            .mb-3 {
                textarea.form-control name="text" rows="3" required { (raw_text) }
            }
            button.btn.btn-primary.btn-sm.me-2 type="submit" { "Save" }
            button.btn.btn-secondary.btn-sm.cancel-edit type="button" { "Cancel" }
        }
    }
}

pub fn count_header(count: usize) -> Markup {
    html! {
        h2.comment-count {
            i.bi.bi-chat-square-text.me-2 {}
            "Comments (" (count) ")"
        }
    }
}

pub fn load_older(control: &LoadOlder, older_count: usize) -> Markup {
    match control {
        LoadOlder::Hidden => html! {},
        LoadOlder::Ready { label } => html! {
            button #load-older-comments type="button" {
                (label)
                @if older_count > 0 {
                    " (" (older_count) ")"
                }
            }
        },
        LoadOlder::Loading { .. } => html! {
            button #load-older-comments type="button" disabled {
                span.spinner-border.spinner-border-sm {}
                " Loading…"
            }
        },
    }
}

/// The "replying to" line above the comment input.
pub fn reply_preview(author: Option<&str>) -> Markup {
    html! {
        @if let Some(author) = author {
            #reply-preview {
                "Replying to " strong { (author) }
                button.cancel-reply type="button" { (PreEscaped("&times;")) }
            }
        }
    }
}
