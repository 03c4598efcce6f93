use serde::{Deserialize, Serialize};

use crate::collection::Identified;

/// Заголовок сессии, пока сервер не сгенерировал свой.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Автор сообщения в чате.
pub enum Sender {
    /// Сообщение пользователя.
    #[default]
    User,
    /// Ответ ассистента.
    Ai,
    /// Ответ ассистента в терминах модели.
    Model,
}

impl Sender {
    /// `ai` и `model` отображаются одинаково, как сторона ассистента.
    pub fn is_assistant(self) -> bool {
        matches!(self, Self::Ai | Self::Model)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Сообщение в сессии чата.
pub struct ChatMessage {
    /// Идентификатор. Отрицательный у временных сообщений до ответа сервера.
    pub id: i64,
    /// Сессия, которой принадлежит сообщение.
    pub session_id: i64,
    /// Текст (markdown).
    pub content: String,
    /// Автор.
    #[serde(default)]
    pub sender: Sender,
    /// Время создания в формате сервера.
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Сессия чата с ассистентом.
pub struct ChatSession {
    /// Идентификатор сессии.
    pub id: i64,
    /// Владелец сессии.
    pub user_id: i64,
    /// Заголовок; может отсутствовать у новой сессии.
    #[serde(default)]
    pub title: Option<String>,
    /// Время создания.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Время последнего изменения.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Сообщения в порядке поступления. Список сессий приходит без них.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Заголовок для отображения с подстановкой `New Chat`.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title,
            _ => DEFAULT_SESSION_TITLE,
        }
    }

    /// Время последней активности: `updated_at`, иначе `created_at`.
    pub fn last_activity(&self) -> Option<&str> {
        self.updated_at.as_deref().or(self.created_at.as_deref())
    }
}

impl Identified for ChatSession {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for ChatMessage {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
/// Тело запроса отправки сообщения.
pub struct CreateMessageRequest {
    /// Текст сообщения.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_decodes_without_messages_and_timestamps() {
        let raw = r#"{"id":3,"user_id":9,"title":null}"#;
        let session: ChatSession = serde_json::from_str(raw).expect("session should parse");
        assert_eq!(session.id, 3);
        assert!(session.messages.is_empty());
        assert_eq!(session.display_title(), DEFAULT_SESSION_TITLE);
        assert!(session.last_activity().is_none());
    }

    #[test]
    fn last_activity_prefers_updated_at() {
        let raw = r#"{"id":1,"user_id":1,"title":"Algebra","created_at":"2026-01-01T10:00:00","updated_at":"2026-01-02T10:00:00"}"#;
        let session: ChatSession = serde_json::from_str(raw).expect("session should parse");
        assert_eq!(session.last_activity(), Some("2026-01-02T10:00:00"));
        assert_eq!(session.display_title(), "Algebra");
    }

    #[test]
    fn sender_parses_lowercase_and_defaults_to_user() {
        let raw = r#"{"id":1,"session_id":2,"content":"hi"}"#;
        let message: ChatMessage = serde_json::from_str(raw).expect("message should parse");
        assert_eq!(message.sender, Sender::User);

        let raw = r#"{"id":2,"session_id":2,"content":"hello","sender":"model"}"#;
        let message: ChatMessage = serde_json::from_str(raw).expect("message should parse");
        assert!(message.sender.is_assistant());
    }
}
