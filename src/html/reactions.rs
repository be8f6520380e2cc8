use maud::{html, Markup};

use super::*;

pub fn favorite_button(post_id: &str, favorite: bool) -> Markup {
    html! {
        button.btn.btn-link.favorite-toggle type="button" data-post-id=(post_id) {
            i.bi
                .bi-star-fill[favorite]
                .text-warning[favorite]
                .bi-star[!favorite]
                .text-muted[!favorite]
            {}
        }
    }
}

/// The like and dislike buttons of one post, each carrying the action it
/// sends next.
pub fn vote_buttons(
    url: &str,
    likes: u64,
    dislikes: u64,
    like_action: VoteAction,
    dislike_action: VoteAction,
) -> Markup {
    html! {
        .card-footer {
            button.btn.btn-sm.like-btn type="button" data-url=(url) data-action=(like_action.as_str()) {
                i.bi.bi-hand-thumbs-up {}
                " "
                span.like-count { (likes) }
            }
            button.btn.btn-sm.dislike-btn type="button" data-url=(url) data-action=(dislike_action.as_str()) {
                i.bi.bi-hand-thumbs-down {}
                " "
                span.dislike-count { (dislikes) }
            }
        }
    }
}
