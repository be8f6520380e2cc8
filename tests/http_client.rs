use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use comment_thread::{
    api::CSRF_HEADER, data::VoteAction, data::VoteResult, ApiError, CommentApi, CommentId,
    CommentWidget, HttpClient, Insertion, Page, ReactionApi, WidgetConfig,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Seen {
    requests: Arc<Mutex<Vec<String>>>,
}

#[derive(Deserialize)]
struct CommentForm {
    text: String,
    parent_id: Option<String>,
}

#[derive(Deserialize)]
struct Offset {
    offset: usize,
}

#[derive(Deserialize)]
struct VoteForm {
    action: String,
}

fn token(headers: &HeaderMap) -> &str {
    headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

async fn create(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Form(form): Form<CommentForm>,
) -> impl IntoResponse {
    if token(&headers) != "secret" {
        return (StatusCode::FORBIDDEN, Json(json!({"status": "error"})));
    }
    seen.requests
        .lock()
        .unwrap()
        .push(format!("create {} {:?}", form.text, form.parent_id));
    if form.text == "spam" {
        return (
            StatusCode::OK,
            Json(json!({"status": "error", "message": "Looks like spam"})),
        );
    }
    let level = if form.parent_id.is_some() { 1 } else { 0 };
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "comment": {
                "id": 10,
                "text": form.text,
                "author": "ann",
                "is_author": true,
                "is_edited": false,
                "created_at": "just now",
                "parent_id": form.parent_id,
                "level": level
            }
        })),
    )
}

async fn edit(Path(id): Path<u64>, Form(form): Form<CommentForm>) -> Json<Value> {
    Json(json!({
        "status": "success",
        "comment": {"id": id, "text": form.text, "author": "ann", "is_edited": true, "level": 0}
    }))
}

async fn delete(Path(id): Path<u64>) -> impl IntoResponse {
    if id == 500 {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})));
    }
    (StatusCode::OK, Json(json!({"status": "success"})))
}

async fn more(Path(slug): Path<String>, Query(query): Query<Offset>) -> Json<Value> {
    Json(json!({
        "status": "success",
        "comments": [
            {"id": 1, "text": format!("{slug} older"), "level": 0},
            {"id": 2, "text": "old", "level": 0, "replies": [{"id": 3, "parent_id": 2, "level": 1}]}
        ],
        "next_offset": query.offset + 2,
        "has_more": false,
        "older_comments_count": 0
    }))
}

async fn favorite(headers: HeaderMap) -> Json<Value> {
    assert_eq!(token(&headers), "secret");
    Json(json!({"status": "success", "action": "added"}))
}

async fn vote(Form(form): Form<VoteForm>) -> Json<Value> {
    let action = match form.action.as_str() {
        "like" => "liked",
        "unlike" => "unliked",
        "dislike" => "disliked",
        _ => "undisliked",
    };
    Json(json!({"status": "success", "like_count": 1, "dislike_count": 0, "action": action}))
}

async fn serve() -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/posts/hello/comment/", post(create))
        .route("/comments/:id/edit/", post(edit))
        .route("/comments/:id/delete/", post(delete))
        .route("/posts/:slug/more_comments/", get(more))
        .route("/posts/:id/favorite/", post(favorite))
        .route("/posts/:id/vote/", post(vote))
        .with_state(seen.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (format!("http://{addr}/"), seen)
}

#[tokio::test]
async fn create_sends_text_parent_and_token() {
    let (base, seen) = serve().await;
    let client = HttpClient::new(&base).unwrap();

    let parent = CommentId::from(4u64);
    let record = client
        .create_comment("/posts/hello/comment/", "secret", "hi\nthere", Some(&parent))
        .await
        .unwrap();

    assert_eq!(record.id, CommentId::from(10u64));
    assert_eq!(record.text, "hi\nthere");
    assert_eq!(record.parent_id, Some(parent));
    assert_eq!(
        *seen.requests.lock().unwrap(),
        ["create hi\nthere Some(\"4\")"]
    );
}

#[tokio::test]
async fn wrong_token_is_a_status_error() {
    let (base, _) = serve().await;
    let client = HttpClient::new(&base).unwrap();
    let err = client
        .create_comment("/posts/hello/comment/", "nope", "hi", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status(403)));
}

#[tokio::test]
async fn application_failure_carries_message() {
    let (base, _) = serve().await;
    let client = HttpClient::new(&base).unwrap();
    let err = client
        .create_comment("/posts/hello/comment/", "secret", "spam", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Rejected(Some(m)) if m == "Looks like spam"));
}

#[tokio::test]
async fn edit_delete_and_page() {
    let (base, _) = serve().await;
    let client = HttpClient::new(&base).unwrap();

    let edited = client
        .edit_comment("/comments/7/edit/", "secret", "fixed")
        .await
        .unwrap();
    assert_eq!(edited.id, CommentId::from(7u64));
    assert!(edited.is_edited);

    client
        .delete_comment("/comments/7/delete/", "secret")
        .await
        .unwrap();
    let err = client
        .delete_comment("/comments/500/delete/", "secret")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status(500)));

    let page = client
        .older_comments("/posts/hello/more_comments/", 4)
        .await
        .unwrap();
    assert_eq!(page.next_offset, 6);
    assert_eq!(page.comments[0].text, "hello older");
    assert_eq!(page.comments[1].replies.len(), 1);
}

#[tokio::test]
async fn shared_client_reaches_the_server() {
    let (base, seen) = serve().await;
    let shared = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap();
    let client = HttpClient::with_client(shared, reqwest::Url::parse(&base).unwrap());

    let record = client
        .create_comment("/posts/hello/comment/", "secret", "hello", None)
        .await
        .unwrap();
    assert_eq!(record.parent_id, None);
    assert_eq!(*seen.requests.lock().unwrap(), ["create hello None"]);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::new(&format!("http://{addr}/")).unwrap();
    let err = client
        .older_comments("/posts/hello/more_comments/", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn reactions_round_trip() {
    let (base, _) = serve().await;
    let client = HttpClient::new(&base).unwrap();

    let action = client
        .toggle_favorite("/posts/3/favorite/", "secret")
        .await
        .unwrap();
    assert_eq!(action, comment_thread::data::FavoriteAction::Added);

    let outcome = client
        .vote("/posts/3/vote/", "secret", VoteAction::Unlike)
        .await
        .unwrap();
    assert_eq!(outcome.action, VoteResult::Unliked);
}

#[tokio::test]
async fn widget_against_server() {
    let (base, _) = serve().await;
    let page = Page {
        csrf_token: Some("secret".to_owned()),
        form_url: "/posts/hello/comment/".to_owned(),
        post_slug: "hello".to_owned(),
        has_more: true,
        ..Default::default()
    };
    let client = HttpClient::new(&base).unwrap();
    let mut widget = CommentWidget::mount(page, WidgetConfig::default(), client).unwrap();

    widget.write("first!");
    assert_eq!(widget.submit().await.unwrap(), Insertion::Root);
    assert!(widget.document().contains(&CommentId::from(10u64)));

    assert_eq!(widget.load_older().await.unwrap(), 2);
    let order: Vec<_> = widget
        .document()
        .roots()
        .iter()
        .map(|n| n.id().as_str())
        .collect();
    assert_eq!(order, ["1", "2", "10"]);
    assert_eq!(widget.cursor(), 2);

    widget.delete(&CommentId::from(2u64)).await.unwrap();
    assert!(!widget.document().contains(&CommentId::from(3u64)));
    assert!(widget.alerts().is_empty());
}
