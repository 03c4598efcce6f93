//! Состояние карточки поста: лайк, раскрывающиеся комментарии, новый комментарий.
//!
//! Сам пост принадлежит странице; карточка сообщает ей только то, что
//! вернул сервер ([`PostChange`]), а здесь хранит только своё.

use crate::collection::{self, InsertAt};
use crate::error::{StateError, StateResult};
use crate::models::{Comment, LikeResponse, Post};
use crate::selection::Busy;

#[derive(Debug, Clone, PartialEq)]
/// Изменение поста по ответу сервера.
///
/// Применяется к актуальной копии поста у страницы, поэтому два
/// завершившихся вперемешку запроса не затирают друг друга.
pub enum PostChange {
    /// Ответ на переключение лайка.
    Liked(LikeResponse),
    /// Добавлен комментарий.
    Commented,
}

impl PostChange {
    /// Меняет только поля, которые затрагивает ответ.
    pub fn apply(&self, post: &mut Post) {
        match self {
            Self::Liked(response) => post.apply_like(response),
            Self::Commented => post.record_comment(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Локальное состояние одной карточки.
pub struct PostCardState {
    comments_open: bool,
    comments: Vec<Comment>,
    comments_loaded: bool,
    loading_comments: bool,
    liking: Busy,
    commenting: Busy,
    draft: String,
}

impl PostCardState {
    /// Комментарии раскрыты.
    pub fn comments_open(&self) -> bool {
        self.comments_open
    }

    /// Комментарии, новые первыми.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Комментарии загружаются.
    pub fn is_loading_comments(&self) -> bool {
        self.loading_comments
    }

    /// Лайк в полёте.
    pub fn is_liking(&self) -> bool {
        self.liking.is_busy()
    }

    /// Комментарий отправляется.
    pub fn is_commenting(&self) -> bool {
        self.commenting.is_busy()
    }

    /// Черновик комментария.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Обновляет черновик.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Раскрывает или скрывает комментарии.
    ///
    /// `true`, если комментарии нужно загрузить: первое раскрытие
    /// или прошлая загрузка не удалась.
    pub fn toggle_comments(&mut self) -> bool {
        if self.comments_open {
            self.comments_open = false;
            return false;
        }
        self.comments_open = true;
        if self.comments_loaded || self.loading_comments {
            return false;
        }
        self.loading_comments = true;
        true
    }

    /// Комментарии загружены.
    pub fn comments_loaded(&mut self, comments: Vec<Comment>) {
        self.comments = comments;
        self.comments_loaded = true;
        self.loading_comments = false;
    }

    /// Загрузка комментариев не удалась; при следующем раскрытии повторим.
    pub fn comments_failed(&mut self) {
        self.loading_comments = false;
    }

    /// Начинает лайк. `false`, если предыдущий ещё в полёте.
    pub fn begin_like(&mut self) -> bool {
        self.liking.try_begin()
    }

    /// Лайк завершён (успешно или нет).
    pub fn like_settled(&mut self) {
        self.liking.finish();
    }

    /// Проверяет черновик и начинает отправку комментария.
    pub fn begin_comment(&mut self) -> StateResult<String> {
        let content = self.draft.trim();
        if content.is_empty() {
            return Err(StateError::Blank("comment"));
        }
        let content = content.to_string();
        if !self.commenting.try_begin() {
            return Err(StateError::Busy);
        }
        Ok(content)
    }

    /// Комментарий создан: он первый в списке, черновик очищен.
    pub fn comment_added(&mut self, comment: Comment) -> StateResult<()> {
        self.commenting.finish();
        self.draft.clear();
        collection::insert_new(&mut self.comments, comment, InsertAt::Head)
    }

    /// Отправка не удалась; черновик остаётся.
    pub fn comment_failed(&mut self) {
        self.commenting.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: i64) -> Comment {
        Comment {
            id,
            post_id: 1,
            user_id: Some(2),
            content: format!("c{id}"),
            created_at: None,
            user: None,
        }
    }

    #[test]
    fn first_open_requests_comments_once() {
        let mut card = PostCardState::default();
        assert!(card.toggle_comments());
        assert!(card.is_loading_comments());
        card.comments_loaded(vec![comment(1)]);

        assert!(!card.toggle_comments());
        assert!(!card.comments_open());
        assert!(!card.toggle_comments());
        assert_eq!(card.comments().len(), 1);
    }

    #[test]
    fn failed_comment_load_retries_on_next_open() {
        let mut card = PostCardState::default();
        assert!(card.toggle_comments());
        card.comments_failed();
        card.toggle_comments();
        assert!(card.toggle_comments());
    }

    #[test]
    fn rapid_likes_fire_once() {
        let mut card = PostCardState::default();
        assert!(card.begin_like());
        assert!(!card.begin_like());
        card.like_settled();
        assert!(card.begin_like());
    }

    #[test]
    fn new_comment_is_prepended_and_draft_cleared() {
        let mut card = PostCardState::default();
        card.comments_loaded(vec![comment(1), comment(2)]);
        card.set_draft("  nice post ");

        let content = card.begin_comment().expect("valid draft");
        assert_eq!(content, "nice post");
        assert_eq!(card.begin_comment(), Err(StateError::Busy));

        card.comment_added(comment(3)).expect("inserted");
        let ids: Vec<i64> = card.comments().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(card.draft(), "");
        assert!(!card.is_commenting());
    }

    #[test]
    fn blank_comment_is_rejected() {
        let mut card = PostCardState::default();
        card.set_draft("   ");
        assert_eq!(card.begin_comment(), Err(StateError::Blank("comment")));
        assert!(!card.is_commenting());
    }

    #[test]
    fn failed_comment_keeps_draft() {
        let mut card = PostCardState::default();
        card.set_draft("hello");
        card.begin_comment().expect("valid draft");
        card.comment_failed();
        assert_eq!(card.draft(), "hello");
        assert!(!card.is_commenting());
    }
}
