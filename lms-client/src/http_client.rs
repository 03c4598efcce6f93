use std::time::Duration;

use lms_core::models::{
    ChatMessage, ChatSession, Comment, Community, CourseOverview, CreateCommentRequest,
    CreateCommunityRequest, CreateMessageRequest, CreatePostRequest, CurrentUser,
    InstructorDashboard, InstructorPerformance, LikeResponse, Post, UpdateCommunityRequest,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::{LmsClientError, LmsClientResult};

/// Таймаут запроса по умолчанию.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    detail: Option<serde_json::Value>,
    error: Option<String>,
}

impl ErrorResponseDto {
    /// `detail` бывает строкой или списком ошибок валидации с полем `msg`.
    fn into_message(self) -> Option<String> {
        match self.detail {
            Some(serde_json::Value::String(text)) => return Some(text),
            Some(serde_json::Value::Array(items)) => {
                let first = items
                    .iter()
                    .find_map(|item| item.get("msg").and_then(|msg| msg.as_str()));
                if let Some(msg) = first {
                    return Some(msg.to_string());
                }
            }
            _ => {}
        }
        self.error
    }
}

#[derive(Serialize)]
struct PostsPageQuery {
    skip: u32,
    limit: u32,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для работы с REST API LMS.
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера.
    pub(crate) fn new(base_url: impl Into<String>, timeout: Duration) -> LmsClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = self.endpoint(path);
        debug!(%method, %url, "sending request");

        let mut request = self.client.request(method, url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn decode_error(response: Response) -> LmsClientError {
        let status = response.status();
        let url = response.url().to_string();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body.into_message(),
            Err(_) => None,
        };
        warn!(%status, %url, message = message.as_deref(), "request failed");
        LmsClientError::from_http_status(status, message)
    }

    async fn execute(request: RequestBuilder) -> LmsClientResult<Response> {
        let response = request.send().await.map_err(LmsClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    async fn read_json<TRes: DeserializeOwned>(request: RequestBuilder) -> LmsClientResult<TRes> {
        Self::execute(request)
            .await?
            .json::<TRes>()
            .await
            .map_err(LmsClientError::from_reqwest)
    }

    /// универсальный helper для отправки запросов с json-payload
    async fn send_json<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
        token: Option<&str>,
    ) -> LmsClientResult<TRes>
    where
        TReq: Serialize,
        TRes: DeserializeOwned,
    {
        Self::read_json(self.request(method, path, token).json(body)).await
    }

    async fn get_json<TRes: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> LmsClientResult<TRes> {
        Self::read_json(self.request(Method::GET, path, token)).await
    }

    /// Запрос без тела; ответ (`{"message": ...}`) не нужен.
    async fn send_empty(&self, method: Method, path: &str, token: &str) -> LmsClientResult<()> {
        Self::execute(self.request(method, path, Some(token))).await?;
        Ok(())
    }

    pub(crate) async fn current_user(&self, token: &str) -> LmsClientResult<CurrentUser> {
        self.get_json("/users/me", Some(token)).await
    }

    pub(crate) async fn list_sessions(&self, token: &str) -> LmsClientResult<Vec<ChatSession>> {
        self.get_json("/chatbot/sessions", Some(token)).await
    }

    pub(crate) async fn create_session(&self, token: &str) -> LmsClientResult<ChatSession> {
        Self::read_json(self.request(Method::POST, "/chatbot/sessions", Some(token))).await
    }

    pub(crate) async fn get_session(&self, token: &str, id: i64) -> LmsClientResult<ChatSession> {
        self.get_json(&format!("/chatbot/sessions/{id}"), Some(token))
            .await
    }

    pub(crate) async fn send_message(
        &self,
        token: &str,
        session_id: i64,
        content: &str,
    ) -> LmsClientResult<ChatMessage> {
        let payload = CreateMessageRequest {
            content: content.to_string(),
        };
        self.send_json(
            Method::POST,
            &format!("/chatbot/sessions/{session_id}/messages"),
            &payload,
            Some(token),
        )
        .await
    }

    pub(crate) async fn rename_session(
        &self,
        token: &str,
        id: i64,
        title: &str,
    ) -> LmsClientResult<ChatSession> {
        let request = self
            .request(Method::PUT, &format!("/chatbot/sessions/{id}"), Some(token))
            .query(&[("title", title)]);
        Self::read_json(request).await
    }

    pub(crate) async fn delete_session(&self, token: &str, id: i64) -> LmsClientResult<()> {
        self.send_empty(Method::DELETE, &format!("/chatbot/sessions/{id}"), token)
            .await
    }

    pub(crate) async fn list_communities(
        &self,
        token: Option<&str>,
        search: Option<&str>,
    ) -> LmsClientResult<Vec<Community>> {
        let mut request = self.request(Method::GET, "/communities/", token);
        if let Some(search) = search {
            request = request.query(&[("search", search)]);
        }
        Self::read_json(request).await
    }

    pub(crate) async fn create_community(
        &self,
        token: &str,
        payload: &CreateCommunityRequest,
    ) -> LmsClientResult<Community> {
        self.send_json(Method::POST, "/communities/", payload, Some(token))
            .await
    }

    pub(crate) async fn get_community(
        &self,
        token: Option<&str>,
        id: i64,
    ) -> LmsClientResult<Community> {
        self.get_json(&format!("/communities/{id}"), token).await
    }

    pub(crate) async fn join_community(&self, token: &str, id: i64) -> LmsClientResult<()> {
        self.send_empty(Method::POST, &format!("/communities/{id}/join"), token)
            .await
    }

    pub(crate) async fn leave_community(&self, token: &str, id: i64) -> LmsClientResult<()> {
        self.send_empty(Method::POST, &format!("/communities/{id}/leave"), token)
            .await
    }

    pub(crate) async fn update_community(
        &self,
        token: &str,
        id: i64,
        payload: &UpdateCommunityRequest,
    ) -> LmsClientResult<Community> {
        self.send_json(
            Method::PUT,
            &format!("/communities/{id}"),
            payload,
            Some(token),
        )
        .await
    }

    pub(crate) async fn delete_community(&self, token: &str, id: i64) -> LmsClientResult<()> {
        self.send_empty(Method::DELETE, &format!("/communities/{id}"), token)
            .await
    }

    pub(crate) async fn list_community_posts(
        &self,
        token: Option<&str>,
        id: i64,
        skip: u32,
        limit: u32,
    ) -> LmsClientResult<Vec<Post>> {
        let request = self
            .request(Method::GET, &format!("/communities/{id}/posts"), token)
            .query(&PostsPageQuery { skip, limit });
        Self::read_json(request).await
    }

    pub(crate) async fn create_post(
        &self,
        token: &str,
        payload: &CreatePostRequest,
    ) -> LmsClientResult<Post> {
        self.send_json(Method::POST, "/posts/", payload, Some(token))
            .await
    }

    pub(crate) async fn get_post(&self, token: Option<&str>, id: i64) -> LmsClientResult<Post> {
        self.get_json(&format!("/posts/{id}"), token).await
    }

    pub(crate) async fn like_post(&self, token: &str, id: i64) -> LmsClientResult<LikeResponse> {
        Self::read_json(self.request(Method::POST, &format!("/posts/{id}/like"), Some(token)))
            .await
    }

    pub(crate) async fn list_comments(
        &self,
        token: Option<&str>,
        post_id: i64,
    ) -> LmsClientResult<Vec<Comment>> {
        self.get_json(&format!("/posts/{post_id}/comments"), token)
            .await
    }

    pub(crate) async fn create_comment(
        &self,
        token: &str,
        post_id: i64,
        content: &str,
    ) -> LmsClientResult<Comment> {
        let payload = CreateCommentRequest {
            content: content.to_string(),
        };
        self.send_json(
            Method::POST,
            &format!("/posts/{post_id}/comments"),
            &payload,
            Some(token),
        )
        .await
    }

    pub(crate) async fn instructor_dashboard(
        &self,
        token: &str,
    ) -> LmsClientResult<InstructorDashboard> {
        self.get_json("/dashboard/instructor/overview", Some(token))
            .await
    }

    pub(crate) async fn instructor_performance(
        &self,
        token: &str,
    ) -> LmsClientResult<InstructorPerformance> {
        self.get_json("/dashboard/instructor/performance", Some(token))
            .await
    }

    pub(crate) async fn course_overview(
        &self,
        token: &str,
        course_id: i64,
    ) -> LmsClientResult<CourseOverview> {
        self.get_json(
            &format!("/dashboard/instructor/course/{course_id}/overview"),
            Some(token),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalizes_slashes() {
        let client = HttpClient::new("http://localhost:8000/", DEFAULT_TIMEOUT)
            .expect("client builds");
        assert_eq!(
            client.endpoint("/communities/"),
            "http://localhost:8000/communities/"
        );
        assert_eq!(
            client.endpoint("chatbot/sessions"),
            "http://localhost:8000/chatbot/sessions"
        );
    }

    #[test]
    fn error_body_prefers_string_detail() {
        let body: ErrorResponseDto =
            serde_json::from_str(r#"{"detail":"Already a member"}"#).expect("valid json");
        assert_eq!(body.into_message().as_deref(), Some("Already a member"));
    }

    #[test]
    fn error_body_reads_validation_list() {
        let body: ErrorResponseDto = serde_json::from_str(
            r#"{"detail":[{"loc":["body","title"],"msg":"field required","type":"missing"}]}"#,
        )
        .expect("valid json");
        assert_eq!(body.into_message().as_deref(), Some("field required"));
    }

    #[test]
    fn error_body_falls_back_to_error_field() {
        let body: ErrorResponseDto =
            serde_json::from_str(r#"{"error":"No courses found"}"#).expect("valid json");
        assert_eq!(body.into_message().as_deref(), Some("No courses found"));
    }
}
