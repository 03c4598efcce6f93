//! Клиентская библиотека для работы с REST API LMS.
//!
//! Предоставляет единый API (`LmsClient`) поверх HTTP (`reqwest`): чат с
//! ассистентом, сообщества, посты с комментариями и аналитику преподавателя.
//!
//! Клиент хранит bearer-токен и автоматически использует его в защищённых
//! операциях. Без токена такие операции сразу возвращают
//! [`LmsClientError::Unauthorized`], не обращаясь к сети. Повторов и кэша нет.
#![warn(missing_docs)]

mod error;
mod http_client;

use std::time::Duration;

pub use error::{LmsClientError, LmsClientResult};
pub use lms_core::models;

use http_client::HttpClient;
use lms_core::models::{
    ChatMessage, ChatSession, Comment, Community, CourseOverview, CreateCommunityRequest,
    CreatePostRequest, CurrentUser, InstructorDashboard, InstructorPerformance, LikeResponse,
    Post, UpdateCommunityRequest,
};

/// Размер страницы постов по умолчанию.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

#[derive(Debug, Clone)]
/// Клиент REST API LMS.
pub struct LmsClient {
    http_client: HttpClient,
    token: Option<String>,
}

impl LmsClient {
    /// Создаёт клиент с базовым URL API, например `http://127.0.0.1:8000`.
    pub fn new(base_url: impl Into<String>) -> LmsClientResult<Self> {
        Self::with_timeout(base_url, http_client::DEFAULT_TIMEOUT)
    }

    /// Создаёт клиент с собственным таймаутом запроса.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> LmsClientResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(base_url, timeout)?,
            token: None,
        })
    }

    /// Устанавливает bearer-токен.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Возвращает текущий токен, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Очищает сохранённый токен.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Текущий пользователь по токену.
    pub async fn current_user(&self) -> LmsClientResult<CurrentUser> {
        self.http_client.current_user(self.require_token()?).await
    }

    /// Сессии чата пользователя, последние изменённые первыми.
    pub async fn list_sessions(&self) -> LmsClientResult<Vec<ChatSession>> {
        self.http_client.list_sessions(self.require_token()?).await
    }

    /// Создаёт пустую сессию чата.
    pub async fn create_session(&self) -> LmsClientResult<ChatSession> {
        self.http_client.create_session(self.require_token()?).await
    }

    /// Сессия вместе с сообщениями.
    pub async fn get_session(&self, id: i64) -> LmsClientResult<ChatSession> {
        self.http_client.get_session(self.require_token()?, id).await
    }

    /// Отправляет сообщение и возвращает ответ ассистента.
    ///
    /// Сервер сохраняет и сообщение пользователя, но возвращает только ответ.
    /// После первого сообщения сервер сам выставляет заголовок сессии.
    pub async fn send_message(&self, session_id: i64, content: &str) -> LmsClientResult<ChatMessage> {
        self.http_client
            .send_message(self.require_token()?, session_id, content)
            .await
    }

    /// Переименовывает сессию.
    pub async fn rename_session(&self, id: i64, title: &str) -> LmsClientResult<ChatSession> {
        self.http_client
            .rename_session(self.require_token()?, id, title)
            .await
    }

    /// Удаляет сессию вместе с сообщениями.
    pub async fn delete_session(&self, id: i64) -> LmsClientResult<()> {
        self.http_client
            .delete_session(self.require_token()?, id)
            .await
    }

    /// Список сообществ, опционально с поиском по названию.
    pub async fn list_communities(&self, search: Option<&str>) -> LmsClientResult<Vec<Community>> {
        self.http_client
            .list_communities(self.get_token(), search)
            .await
    }

    /// Создаёт сообщество; создатель становится его участником.
    pub async fn create_community(
        &self,
        payload: &CreateCommunityRequest,
    ) -> LmsClientResult<Community> {
        self.http_client
            .create_community(self.require_token()?, payload)
            .await
    }

    /// Сообщество по идентификатору.
    pub async fn get_community(&self, id: i64) -> LmsClientResult<Community> {
        self.http_client.get_community(self.get_token(), id).await
    }

    /// Вступает в сообщество.
    pub async fn join_community(&self, id: i64) -> LmsClientResult<()> {
        self.http_client
            .join_community(self.require_token()?, id)
            .await
    }

    /// Выходит из сообщества.
    pub async fn leave_community(&self, id: i64) -> LmsClientResult<()> {
        self.http_client
            .leave_community(self.require_token()?, id)
            .await
    }

    /// Частично обновляет сообщество (администратор или создатель).
    pub async fn update_community(
        &self,
        id: i64,
        payload: &UpdateCommunityRequest,
    ) -> LmsClientResult<Community> {
        self.http_client
            .update_community(self.require_token()?, id, payload)
            .await
    }

    /// Удаляет сообщество (администратор или создатель).
    pub async fn delete_community(&self, id: i64) -> LmsClientResult<()> {
        self.http_client
            .delete_community(self.require_token()?, id)
            .await
    }

    /// Посты сообщества страницей `skip/limit`.
    ///
    /// Для закрытого сообщества без членства сервер отвечает ошибкой прав.
    pub async fn list_community_posts(
        &self,
        id: i64,
        skip: u32,
        limit: u32,
    ) -> LmsClientResult<Vec<Post>> {
        self.http_client
            .list_community_posts(self.get_token(), id, skip, limit)
            .await
    }

    /// Создаёт пост в сообществе.
    pub async fn create_post(&self, payload: &CreatePostRequest) -> LmsClientResult<Post> {
        self.http_client
            .create_post(self.require_token()?, payload)
            .await
    }

    /// Пост по идентификатору.
    pub async fn get_post(&self, id: i64) -> LmsClientResult<Post> {
        self.http_client.get_post(self.get_token(), id).await
    }

    /// Переключает лайк. Ответ содержит вердикт и новый счётчик.
    pub async fn like_post(&self, id: i64) -> LmsClientResult<LikeResponse> {
        self.http_client.like_post(self.require_token()?, id).await
    }

    /// Комментарии поста.
    pub async fn list_comments(&self, post_id: i64) -> LmsClientResult<Vec<Comment>> {
        self.http_client
            .list_comments(self.get_token(), post_id)
            .await
    }

    /// Добавляет комментарий.
    pub async fn create_comment(&self, post_id: i64, content: &str) -> LmsClientResult<Comment> {
        self.http_client
            .create_comment(self.require_token()?, post_id, content)
            .await
    }

    /// Сводка преподавателя.
    pub async fn instructor_dashboard(&self) -> LmsClientResult<InstructorDashboard> {
        self.http_client
            .instructor_dashboard(self.require_token()?)
            .await
    }

    /// Успеваемость по курсам преподавателя.
    pub async fn instructor_performance(&self) -> LmsClientResult<InstructorPerformance> {
        self.http_client
            .instructor_performance(self.require_token()?)
            .await
    }

    /// Обзор одного курса.
    pub async fn course_overview(&self, course_id: i64) -> LmsClientResult<CourseOverview> {
        self.http_client
            .course_overview(self.require_token()?, course_id)
            .await
    }

    fn require_token(&self) -> LmsClientResult<&str> {
        self.token.as_deref().ok_or(LmsClientError::Unauthorized)
    }
}
