use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collection::Identified;
use crate::membership::Membership;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Сообщество: именованная группа с постами и участниками.
pub struct Community {
    /// Идентификатор.
    pub id: i64,
    /// Название.
    pub name: String,
    /// Описание.
    #[serde(default)]
    pub description: Option<String>,
    /// Slug для ссылок.
    #[serde(default)]
    pub slug: Option<String>,
    /// Иконка.
    #[serde(default)]
    pub icon: Option<String>,
    /// Обложка.
    #[serde(default)]
    pub cover_image: Option<String>,
    /// Количество участников.
    #[serde(default)]
    pub member_count: u32,
    /// Количество постов.
    #[serde(default)]
    pub post_count: u32,
    /// Закрытое сообщество.
    #[serde(default)]
    pub is_private: bool,
    /// Создатель.
    #[serde(default)]
    pub created_by: Option<i64>,
    /// Время создания.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Членство текущего пользователя, если сервер его вернул.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_member: Option<bool>,
}

impl Community {
    /// Членство в виде трёх состояний: сервер может не знать или не вернуть флаг.
    pub fn membership(&self) -> Membership {
        Membership::from_flag(self.is_member)
    }

    /// Описание без `None`.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Локальный учёт только что созданного поста.
    pub fn record_post(&mut self) {
        self.post_count = self.post_count.saturating_add(1);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Краткие данные автора поста или комментария.
pub struct Author {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Полное имя.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Аватар.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Author {
    /// Имя для отображения, `Unknown User` если имени нет.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => "Unknown User",
        }
    }

    /// Первая буква имени в верхнем регистре для аватара-заглушки.
    pub fn initial(&self) -> String {
        self.full_name
            .as_deref()
            .and_then(|name| name.trim().chars().next())
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "U".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Пост в сообществе.
pub struct Post {
    /// Идентификатор.
    pub id: i64,
    /// Сообщество.
    pub community_id: i64,
    /// Автор.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Заголовок.
    pub title: String,
    /// Текст (markdown).
    pub content: String,
    /// Вложение.
    #[serde(default, alias = "attachments")]
    pub media_url: Option<String>,
    /// Просмотры.
    #[serde(default)]
    pub view_count: u32,
    /// Лайки.
    #[serde(default)]
    pub like_count: u32,
    /// Комментарии.
    #[serde(default)]
    pub comment_count: u32,
    /// Закреплён.
    #[serde(default)]
    pub is_pinned: bool,
    /// Время создания.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Автор.
    #[serde(default)]
    pub user: Option<Author>,
    /// Лайк текущего пользователя. Локальная догадка, не подтверждённая сервером.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
}

impl Post {
    /// Лайкнут ли пост с точки зрения интерфейса.
    pub fn liked(&self) -> bool {
        self.is_liked.unwrap_or(false)
    }

    /// Имя автора для отображения.
    pub fn author_name(&self) -> &str {
        self.user
            .as_ref()
            .map(Author::display_name)
            .unwrap_or("Unknown User")
    }

    /// Буква для аватара автора.
    pub fn author_initial(&self) -> String {
        self.user
            .as_ref()
            .map(Author::initial)
            .unwrap_or_else(|| "U".to_string())
    }

    /// Сверка после `POST /posts/{id}/like`.
    ///
    /// `like_count` всегда берётся с сервера. `is_liked` берётся из вердикта
    /// сервера (`Liked`/`Unliked`), если его удалось распознать, иначе
    /// переключается локально.
    pub fn apply_like(&mut self, response: &LikeResponse) {
        self.like_count = response.like_count;
        let liked = response.liked().unwrap_or(!self.liked());
        debug!(post_id = self.id, liked, like_count = self.like_count, "like reconciled");
        self.is_liked = Some(liked);
    }

    /// Локальный учёт только что добавленного комментария.
    pub fn record_comment(&mut self) {
        self.comment_count = self.comment_count.saturating_add(1);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Комментарий к посту.
pub struct Comment {
    /// Идентификатор.
    pub id: i64,
    /// Пост.
    pub post_id: i64,
    /// Автор.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Текст.
    pub content: String,
    /// Время создания.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Автор.
    #[serde(default)]
    pub user: Option<Author>,
}

impl Comment {
    /// Имя автора для отображения.
    pub fn author_name(&self) -> &str {
        self.user
            .as_ref()
            .map(Author::display_name)
            .unwrap_or("Unknown User")
    }
}

impl Identified for Community {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Post {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Comment {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
/// Ответ на переключение лайка.
pub struct LikeResponse {
    /// `Liked` или `Unliked`.
    #[serde(default)]
    pub message: String,
    /// Актуальное количество лайков.
    pub like_count: u32,
}

impl LikeResponse {
    /// Вердикт сервера, если сообщение распознано.
    pub fn liked(&self) -> Option<bool> {
        match self.message.trim().to_ascii_lowercase().as_str() {
            "liked" => Some(true),
            "unliked" => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Тело создания сообщества.
pub struct CreateCommunityRequest {
    /// Название.
    pub name: String,
    /// Описание.
    pub description: String,
    /// Закрытое сообщество.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
/// Частичное обновление сообщества: отсутствующие поля не отправляются.
pub struct UpdateCommunityRequest {
    /// Новое название.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Новое описание.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Новый флаг приватности.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Тело создания поста.
pub struct CreatePostRequest {
    /// Сообщество.
    pub community_id: i64,
    /// Заголовок.
    pub title: String,
    /// Текст.
    pub content: String,
    /// Вложение.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Тело создания комментария.
pub struct CreateCommentRequest {
    /// Текст.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(is_liked: Option<bool>) -> Post {
        Post {
            id: 1,
            community_id: 1,
            user_id: Some(2),
            title: "t".to_string(),
            content: "c".to_string(),
            media_url: None,
            view_count: 0,
            like_count: 4,
            comment_count: 0,
            is_pinned: false,
            created_at: None,
            user: None,
            is_liked,
        }
    }

    #[test]
    fn apply_like_adopts_server_verdict() {
        let mut post = post(Some(true));
        post.apply_like(&LikeResponse {
            message: "Liked".to_string(),
            like_count: 5,
        });
        assert_eq!(post.like_count, 5);
        assert_eq!(post.is_liked, Some(true));
    }

    #[test]
    fn apply_like_flips_locally_on_unknown_message() {
        let mut post = post(None);
        post.apply_like(&LikeResponse {
            message: String::new(),
            like_count: 5,
        });
        assert_eq!(post.is_liked, Some(true));

        post.apply_like(&LikeResponse {
            message: "ok".to_string(),
            like_count: 4,
        });
        assert_eq!(post.is_liked, Some(false));
        assert_eq!(post.like_count, 4);
    }

    #[test]
    fn update_request_skips_absent_fields() {
        let body = UpdateCommunityRequest {
            name: Some("Rustaceans".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&body).expect("serializable");
        assert_eq!(json, serde_json::json!({ "name": "Rustaceans" }));
    }

    #[test]
    fn post_accepts_attachments_alias_and_missing_user() {
        let raw = r#"{"id":7,"community_id":1,"title":"t","content":"c","attachments":"a.png","like_count":2}"#;
        let post: Post = serde_json::from_str(raw).expect("post should parse");
        assert_eq!(post.media_url.as_deref(), Some("a.png"));
        assert_eq!(post.author_name(), "Unknown User");
        assert_eq!(post.author_initial(), "U");
        assert!(!post.liked());
    }

    #[test]
    fn author_initial_is_uppercased() {
        let author = Author {
            id: 1,
            full_name: Some("ada lovelace".to_string()),
            avatar_url: None,
        };
        assert_eq!(author.initial(), "A");
        assert_eq!(author.display_name(), "ada lovelace");
    }

    #[test]
    fn community_membership_follows_flag() {
        let raw = r#"{"id":1,"name":"Rust","member_count":3,"post_count":1,"is_private":false}"#;
        let mut community: Community = serde_json::from_str(raw).expect("community should parse");
        assert_eq!(community.membership(), Membership::Unknown);
        community.is_member = Some(true);
        assert_eq!(community.membership(), Membership::Member);
        community.record_post();
        assert_eq!(community.post_count, 2);
    }
}
