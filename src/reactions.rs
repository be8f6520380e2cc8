use log::{info, warn};
use maud::{html, Markup};
use serde::Deserialize;

use crate::api::ReactionApi;
use crate::config::WidgetConfig;
use crate::data::{FavoriteAction, VoteAction};
use crate::error::{ApiError, WidgetError, WidgetResult};
use crate::html::reactions as markup;

/// Which vote button was pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteButton {
    Like,
    Dislike,
}

/// The reaction state of a post as the page renders it.
#[derive(Clone, Debug, Deserialize)]
pub struct PostReactions {
    pub post_id: String,
    pub vote_url: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub dislike_count: u64,
    #[serde(default = "like")]
    pub like_action: VoteAction,
    #[serde(default = "dislike")]
    pub dislike_action: VoteAction,
}

fn like() -> VoteAction {
    VoteAction::Like
}

fn dislike() -> VoteAction {
    VoteAction::Dislike
}

/// Favorite and vote buttons for one post.
pub struct ReactionBar<A> {
    api: A,
    token: String,
    favorite_url: String,
    state: PostReactions,
    alerts: Vec<String>,
}

impl<A: ReactionApi> ReactionBar<A> {
    pub fn mount(
        state: PostReactions,
        csrf_token: Option<String>,
        config: &WidgetConfig,
        api: A,
    ) -> WidgetResult<Self> {
        let token = csrf_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(WidgetError::MissingToken)?;
        Ok(Self {
            api,
            token,
            favorite_url: config.favorite_url(&state.post_id),
            state,
            alerts: Vec::new(),
        })
    }

    pub fn state(&self) -> &PostReactions {
        &self.state
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    fn report<T>(&mut self, action: &str, result: WidgetResult<T>) -> WidgetResult<T> {
        if let Err(err) = &result {
            warn!("could not {action}: {err}");
            self.alerts.push(match err {
                WidgetError::Api(ApiError::Rejected(Some(message))) => message.clone(),
                err => format!("Could not {action}: {err}"),
            });
        }
        result
    }

    pub async fn toggle_favorite(&mut self) -> WidgetResult<bool> {
        let result = self.favorite().await;
        self.report("update favorites", result)
    }

    async fn favorite(&mut self) -> WidgetResult<bool> {
        if self.state.post_id.trim().is_empty() || self.favorite_url.contains("undefined") {
            return Err(WidgetError::InvalidUrl(self.favorite_url.clone()));
        }
        let action = self.api.toggle_favorite(&self.favorite_url, &self.token).await?;
        self.state.favorite = action == FavoriteAction::Added;
        info!("post {} favorite: {}", self.state.post_id, self.state.favorite);
        Ok(self.state.favorite)
    }

    pub async fn vote(&mut self, button: VoteButton) -> WidgetResult<()> {
        let result = self.send_vote(button).await;
        self.report("vote", result)
    }

    async fn send_vote(&mut self, button: VoteButton) -> WidgetResult<()> {
        let url = &self.state.vote_url;
        if url.trim().is_empty() || url.contains("undefined") {
            return Err(WidgetError::InvalidUrl(url.clone()));
        }
        let action = match button {
            VoteButton::Like => self.state.like_action,
            VoteButton::Dislike => self.state.dislike_action,
        };

        let outcome = self.api.vote(url, &self.token, action).await?;
        let (like_action, dislike_action) = outcome.action.next_actions();
        self.state.like_count = outcome.like_count;
        self.state.dislike_count = outcome.dislike_count;
        self.state.like_action = like_action;
        self.state.dislike_action = dislike_action;
        info!("post {} vote recorded: {:?}", self.state.post_id, outcome.action);
        Ok(())
    }

    pub fn render(&self) -> Markup {
        let state = &self.state;
        html! {
            (markup::favorite_button(&state.post_id, state.favorite))
            (markup::vote_buttons(
                &state.vote_url,
                state.like_count,
                state.dislike_count,
                state.like_action,
                state.dislike_action,
            ))
        }
    }
}
