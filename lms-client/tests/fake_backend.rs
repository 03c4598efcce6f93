use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use lms_client::models::{CreateCommunityRequest, Sender};
use lms_client::{LmsClient, LmsClientError};

const TOKEN: &str = "test-token";

type Reply = (StatusCode, Json<Value>);

fn authorized(headers: &HeaderMap) -> Result<(), Reply> {
    let expected = format!("Bearer {TOKEN}");
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Not authenticated"})),
        )),
    }
}

fn session_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "user_id": 1,
        "title": title,
        "created_at": "2026-01-05T10:00:00",
        "updated_at": "2026-01-05T10:05:00",
        "messages": []
    })
}

fn community_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "about",
        "slug": name.to_lowercase(),
        "member_count": 4,
        "post_count": 1,
        "is_private": false,
        "created_by": 1,
        "created_at": "2026-01-01T00:00:00"
    })
}

async fn list_sessions(headers: HeaderMap) -> Reply {
    if let Err(reply) = authorized(&headers) {
        return reply;
    }
    (
        StatusCode::OK,
        Json(json!([session_json(2, "Algebra"), session_json(1, "New Chat")])),
    )
}

async fn send_message(headers: HeaderMap, Path(id): Path<i64>, Json(body): Json<Value>) -> Reply {
    if let Err(reply) = authorized(&headers) {
        return reply;
    }
    let content = body["content"].as_str().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({
            "id": 77,
            "session_id": id,
            "content": format!("echo: {content}"),
            "sender": "ai",
            "created_at": "2026-01-05T10:06:00"
        })),
    )
}

async fn rename_session(
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    if let Err(reply) = authorized(&headers) {
        return reply;
    }
    let title = query.get("title").cloned().unwrap_or_default();
    (StatusCode::OK, Json(session_json(id, &title)))
}

async fn list_communities(Query(query): Query<HashMap<String, String>>) -> Reply {
    let all = ["Rustaceans", "Algebra", "Physics"];
    let search = query.get("search").map(|s| s.to_lowercase());
    let found: Vec<Value> = all
        .iter()
        .enumerate()
        .filter(|(_, name)| match &search {
            Some(search) => name.to_lowercase().contains(search),
            None => true,
        })
        .map(|(idx, name)| community_json(idx as i64 + 1, name))
        .collect();
    (StatusCode::OK, Json(Value::Array(found)))
}

async fn create_community(headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    if let Err(reply) = authorized(&headers) {
        return reply;
    }
    let name = body["name"].as_str().unwrap_or_default();
    (StatusCode::OK, Json(community_json(10, name)))
}

async fn get_community(Path(id): Path<i64>) -> Reply {
    if id == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Community not found"})),
        );
    }
    (StatusCode::OK, Json(community_json(id, "Rustaceans")))
}

async fn join_community(headers: HeaderMap) -> Reply {
    if let Err(reply) = authorized(&headers) {
        return reply;
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"detail": "Already a member"})),
    )
}

async fn community_posts(
    Path(id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let skip: i64 = query.get("skip").and_then(|v| v.parse().ok()).unwrap_or(-1);
    let limit: i64 = query.get("limit").and_then(|v| v.parse().ok()).unwrap_or(-1);
    (
        StatusCode::OK,
        Json(json!([{
            "id": skip * 100 + limit,
            "community_id": id,
            "user_id": 1,
            "title": "Welcome",
            "content": "Hello",
            "attachments": null,
            "like_count": 2,
            "comment_count": 0,
            "created_at": "2026-01-02T08:00:00",
            "user": {"id": 1, "full_name": "ada lovelace"}
        }])),
    )
}

async fn like_post(headers: HeaderMap) -> Reply {
    if let Err(reply) = authorized(&headers) {
        return reply;
    }
    (
        StatusCode::OK,
        Json(json!({"message": "Liked", "like_count": 3})),
    )
}

async fn performance(headers: HeaderMap) -> Reply {
    if let Err(reply) = authorized(&headers) {
        return reply;
    }
    (
        StatusCode::OK,
        Json(json!({"error": "No courses found for this instructor"})),
    )
}

fn router() -> Router {
    Router::new()
        .route("/chatbot/sessions", get(list_sessions))
        .route("/chatbot/sessions/{id}", axum::routing::put(rename_session))
        .route("/chatbot/sessions/{id}/messages", post(send_message))
        .route("/communities/", get(list_communities).post(create_community))
        .route("/communities/{id}", get(get_community))
        .route("/communities/{id}/join", post(join_community))
        .route("/communities/{id}/posts", get(community_posts))
        .route("/posts/{id}/like", post(like_post))
        .route("/dashboard/instructor/performance", get(performance))
}

async fn spawn_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router())
            .await
            .expect("fake backend must run");
    });
    format!("http://{addr}")
}

async fn authed_client() -> LmsClient {
    let mut client = LmsClient::new(spawn_backend().await).expect("client builds");
    client.set_token(TOKEN);
    client
}

#[tokio::test]
async fn protected_calls_without_token_fail_locally() {
    let client = LmsClient::new("http://127.0.0.1:9").expect("client builds");
    let result = client.list_sessions().await;
    assert!(matches!(result, Err(LmsClientError::Unauthorized)));
}

#[tokio::test]
async fn wrong_token_maps_to_unauthorized() {
    let mut client = LmsClient::new(spawn_backend().await).expect("client builds");
    client.set_token("stale");
    let result = client.list_sessions().await;
    assert!(matches!(result, Err(LmsClientError::Unauthorized)));
}

#[tokio::test]
async fn lists_sessions_in_server_order() {
    let client = authed_client().await;
    let sessions = client.list_sessions().await.expect("sessions");
    let ids: Vec<i64> = sessions.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn send_message_returns_assistant_reply() {
    let client = authed_client().await;
    let reply = client.send_message(5, "hi").await.expect("reply");
    assert_eq!(reply.session_id, 5);
    assert_eq!(reply.content, "echo: hi");
    assert_eq!(reply.sender, Sender::Ai);
}

#[tokio::test]
async fn rename_sends_title_as_query() {
    let client = authed_client().await;
    let session = client
        .rename_session(5, "Algebra help")
        .await
        .expect("renamed");
    assert_eq!(session.id, 5);
    assert_eq!(session.title.as_deref(), Some("Algebra help"));
}

#[tokio::test]
async fn community_search_is_forwarded() {
    let client = LmsClient::new(spawn_backend().await).expect("client builds");
    let all = client.list_communities(None).await.expect("list");
    assert_eq!(all.len(), 3);

    let found = client.list_communities(Some("rust")).await.expect("search");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Rustaceans");
    assert_eq!(found[0].is_member, None);
}

#[tokio::test]
async fn create_community_returns_created() {
    let client = authed_client().await;
    let created = client
        .create_community(&CreateCommunityRequest {
            name: "Chemistry".to_string(),
            description: "labs".to_string(),
            is_private: Some(false),
        })
        .await
        .expect("created");
    assert_eq!(created.id, 10);
    assert_eq!(created.name, "Chemistry");
}

#[tokio::test]
async fn missing_community_is_not_found() {
    let client = LmsClient::new(spawn_backend().await).expect("client builds");
    let result = client.get_community(404).await;
    assert!(matches!(result, Err(LmsClientError::NotFound)));
}

#[tokio::test]
async fn join_rejection_keeps_server_detail() {
    let client = authed_client().await;
    let err = client.join_community(1).await.expect_err("already a member");
    assert_eq!(err.server_message(), Some("Already a member"));
}

#[tokio::test]
async fn posts_page_passes_skip_and_limit() {
    let client = LmsClient::new(spawn_backend().await).expect("client builds");
    let posts = client
        .list_community_posts(3, 40, 20)
        .await
        .expect("posts");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, 4020);
    assert_eq!(posts[0].community_id, 3);
    assert_eq!(posts[0].author_name(), "ada lovelace");
    assert_eq!(posts[0].author_initial(), "A");
}

#[tokio::test]
async fn like_returns_verdict_and_count() {
    let client = authed_client().await;
    let response = client.like_post(8).await.expect("liked");
    assert_eq!(response.like_count, 3);
    assert_eq!(response.liked(), Some(true));
}

#[tokio::test]
async fn performance_without_courses_is_not_an_error() {
    let client = authed_client().await;
    let performance = client.instructor_performance().await.expect("payload");
    assert!(performance.error.is_some());
    assert!(performance.course_stats.is_empty());
}
