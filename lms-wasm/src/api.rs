use gloo_net::http::{Request, RequestBuilder, Response};
use lms_core::models::{
    ChatMessage, ChatSession, Comment, Community, CourseOverview, CreateCommentRequest,
    CreateCommunityRequest, CreateMessageRequest, CreatePostRequest, CurrentUser,
    InstructorDashboard, InstructorPerformance, LikeResponse, Post, UpdateCommunityRequest,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::text::{error_detail, status_fallback};

const API_BASE_URL: &str = match option_env!("WASM_API_BASE_URL") {
    Some(value) => value,
    None => "http://127.0.0.1:8000",
};

/// Размер страницы постов.
pub(crate) const POSTS_PAGE: u32 = 20;

#[derive(Debug, Clone)]
pub(crate) enum ApiError {
    Network(String),
    Http { status: u16, detail: Option<String> },
    Decode(String),
}

impl ApiError {
    /// Сообщение, присланное сервером.
    pub(crate) fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http {
                detail: Some(detail),
                ..
            } => Some(detail),
            _ => None,
        }
    }
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Http { status, detail } => match detail {
                Some(detail) => write!(f, "http error {status}: {detail}"),
                None => write!(f, "http error {status}: {}", status_fallback(*status)),
            },
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

fn endpoint(path: &str) -> String {
    format!(
        "{}/{}",
        API_BASE_URL.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn authorized(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
        None => builder,
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

async fn parse_error_body(response: Response) -> ApiError {
    let status = response.status();
    let detail = match response.text().await {
        Ok(text) => error_detail(&text),
        Err(_) => None,
    };
    ApiError::Http { status, detail }
}

async fn checked(response: Response) -> Result<Response, ApiError> {
    if !response.ok() {
        return Err(parse_error_body(response).await);
    }
    Ok(response)
}

async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
    let response = builder
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;
    checked(response).await
}

async fn send_body<B: Serialize>(builder: RequestBuilder, body: &B) -> Result<Response, ApiError> {
    let response = builder
        .json(body)
        .map_err(|err| ApiError::Network(err.to_string()))?
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;
    checked(response).await
}

async fn get<T: DeserializeOwned>(path: &str, token: Option<&str>) -> Result<T, ApiError> {
    let response = send(authorized(Request::get(&endpoint(path)), token)).await?;
    parse_json(response).await
}

pub(crate) async fn current_user(token: &str) -> Result<CurrentUser, ApiError> {
    get("/users/me", Some(token)).await
}

pub(crate) async fn list_sessions(token: &str) -> Result<Vec<ChatSession>, ApiError> {
    get("/chatbot/sessions", Some(token)).await
}

pub(crate) async fn create_session(token: &str) -> Result<ChatSession, ApiError> {
    let builder = authorized(Request::post(&endpoint("/chatbot/sessions")), Some(token));
    parse_json(send(builder).await?).await
}

pub(crate) async fn get_session(token: &str, id: i64) -> Result<ChatSession, ApiError> {
    get(&format!("/chatbot/sessions/{id}"), Some(token)).await
}

pub(crate) async fn send_message(
    token: &str,
    session_id: i64,
    content: &str,
) -> Result<ChatMessage, ApiError> {
    let payload = CreateMessageRequest {
        content: content.to_string(),
    };
    let builder = authorized(
        Request::post(&endpoint(&format!("/chatbot/sessions/{session_id}/messages"))),
        Some(token),
    );
    parse_json(send_body(builder, &payload).await?).await
}

pub(crate) async fn rename_session(
    token: &str,
    id: i64,
    title: &str,
) -> Result<ChatSession, ApiError> {
    let builder = authorized(
        Request::put(&endpoint(&format!("/chatbot/sessions/{id}"))),
        Some(token),
    )
    .query([("title", title)]);
    parse_json(send(builder).await?).await
}

pub(crate) async fn delete_session(token: &str, id: i64) -> Result<(), ApiError> {
    let builder = authorized(
        Request::delete(&endpoint(&format!("/chatbot/sessions/{id}"))),
        Some(token),
    );
    send(builder).await?;
    Ok(())
}

pub(crate) async fn list_communities(
    token: Option<&str>,
    search: Option<&str>,
) -> Result<Vec<Community>, ApiError> {
    let mut builder = authorized(Request::get(&endpoint("/communities/")), token);
    if let Some(search) = search {
        builder = builder.query([("search", search)]);
    }
    parse_json(send(builder).await?).await
}

pub(crate) async fn create_community(
    token: &str,
    payload: &CreateCommunityRequest,
) -> Result<Community, ApiError> {
    let builder = authorized(Request::post(&endpoint("/communities/")), Some(token));
    parse_json(send_body(builder, payload).await?).await
}

pub(crate) async fn get_community(token: Option<&str>, id: i64) -> Result<Community, ApiError> {
    get(&format!("/communities/{id}"), token).await
}

pub(crate) async fn join_community(token: &str, id: i64) -> Result<(), ApiError> {
    let builder = authorized(
        Request::post(&endpoint(&format!("/communities/{id}/join"))),
        Some(token),
    );
    send(builder).await?;
    Ok(())
}

pub(crate) async fn leave_community(token: &str, id: i64) -> Result<(), ApiError> {
    let builder = authorized(
        Request::post(&endpoint(&format!("/communities/{id}/leave"))),
        Some(token),
    );
    send(builder).await?;
    Ok(())
}

pub(crate) async fn update_community(
    token: &str,
    id: i64,
    payload: &UpdateCommunityRequest,
) -> Result<Community, ApiError> {
    let builder = authorized(
        Request::put(&endpoint(&format!("/communities/{id}"))),
        Some(token),
    );
    parse_json(send_body(builder, payload).await?).await
}

pub(crate) async fn delete_community(token: &str, id: i64) -> Result<(), ApiError> {
    let builder = authorized(
        Request::delete(&endpoint(&format!("/communities/{id}"))),
        Some(token),
    );
    send(builder).await?;
    Ok(())
}

pub(crate) async fn list_community_posts(
    token: Option<&str>,
    id: i64,
    skip: u32,
    limit: u32,
) -> Result<Vec<Post>, ApiError> {
    let skip = skip.to_string();
    let limit = limit.to_string();
    let builder = authorized(
        Request::get(&endpoint(&format!("/communities/{id}/posts"))),
        token,
    )
    .query([("skip", skip.as_str()), ("limit", limit.as_str())]);
    parse_json(send(builder).await?).await
}

pub(crate) async fn create_post(token: &str, payload: &CreatePostRequest) -> Result<Post, ApiError> {
    let builder = authorized(Request::post(&endpoint("/posts/")), Some(token));
    parse_json(send_body(builder, payload).await?).await
}

pub(crate) async fn like_post(token: &str, id: i64) -> Result<LikeResponse, ApiError> {
    let builder = authorized(
        Request::post(&endpoint(&format!("/posts/{id}/like"))),
        Some(token),
    );
    parse_json(send(builder).await?).await
}

pub(crate) async fn list_comments(token: Option<&str>, post_id: i64) -> Result<Vec<Comment>, ApiError> {
    get(&format!("/posts/{post_id}/comments"), token).await
}

pub(crate) async fn create_comment(
    token: &str,
    post_id: i64,
    content: &str,
) -> Result<Comment, ApiError> {
    let payload = CreateCommentRequest {
        content: content.to_string(),
    };
    let builder = authorized(
        Request::post(&endpoint(&format!("/posts/{post_id}/comments"))),
        Some(token),
    );
    parse_json(send_body(builder, &payload).await?).await
}

pub(crate) async fn instructor_dashboard(token: &str) -> Result<InstructorDashboard, ApiError> {
    get("/dashboard/instructor/overview", Some(token)).await
}

pub(crate) async fn instructor_performance(token: &str) -> Result<InstructorPerformance, ApiError> {
    get("/dashboard/instructor/performance", Some(token)).await
}

pub(crate) async fn course_overview(token: &str, course_id: i64) -> Result<CourseOverview, ApiError> {
    get(
        &format!("/dashboard/instructor/course/{course_id}/overview"),
        Some(token),
    )
    .await
}
