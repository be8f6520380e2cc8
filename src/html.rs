use maud::{html, Markup};

use crate::data::*;

/// Comment nodes, the inline edit form and the section chrome.
pub mod comments;

/// Favorite and vote buttons.
pub mod reactions;

/// Plain text with its newlines turned into line breaks. The text itself is
/// escaped.
pub fn text_with_breaks(text: &str) -> Markup {
    html! {
        @for (i, line) in text.split('\n').enumerate() {
            @if i > 0 {
                br;
            }
            (line)
        }
    }
}
