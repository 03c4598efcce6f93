//! Состояние страниц сообществ: список с поиском и страница одного сообщества.

use tracing::debug;

use crate::collection::InsertAt;
use crate::error::{StateError, StateResult};
use crate::membership::Membership;
use crate::models::{
    Community, CreateCommunityRequest, CreatePostRequest, CurrentUser, Post,
    UpdateCommunityRequest,
};
use crate::post_card::PostChange;
use crate::remote::Remote;
use crate::selection::{Busy, EmptyPolicy, ListState, LoadOutcome};

fn required(value: &str, field: &'static str) -> StateResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StateError::Blank(field));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq)]
/// Список сообществ с поиском и формой создания.
pub struct CommunityListState {
    list: ListState<Community>,
    search: String,
    form_open: bool,
    creating: Busy,
}

impl Default for CommunityListState {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityListState {
    /// Начальное состояние: идёт загрузка, пустой список показывает приглашение.
    pub fn new() -> Self {
        Self {
            list: ListState::new(EmptyPolicy::Prompt),
            search: String::new(),
            form_open: false,
            creating: Busy::default(),
        }
    }

    /// Список сообществ.
    pub fn list(&self) -> &ListState<Community> {
        &self.list
    }

    /// Строка поиска как введена.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Обновляет строку поиска.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Параметр `search` для запроса: `None`, если строка пустая.
    pub fn search_query(&self) -> Option<&str> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Начало загрузки.
    pub fn begin_load(&mut self) {
        self.list.begin_load();
    }

    /// Список загружен; пустой список не ошибка.
    pub fn finish_load(&mut self, communities: Vec<Community>) -> LoadOutcome {
        self.list.finish_load(communities, None)
    }

    /// Загрузка не удалась.
    pub fn fail_load(&mut self) {
        self.list.fail_load();
    }

    /// Форма создания открыта.
    pub fn form_open(&self) -> bool {
        self.form_open
    }

    /// Открывает форму создания.
    pub fn open_form(&mut self) {
        self.form_open = true;
    }

    /// Закрывает форму создания.
    pub fn close_form(&mut self) {
        self.form_open = false;
    }

    /// Создание в полёте.
    pub fn is_creating(&self) -> bool {
        self.creating.is_busy()
    }

    /// Создавать можно, когда список не загружается и создание не идёт.
    pub fn controls_enabled(&self) -> bool {
        self.list.controls_enabled() && !self.creating.is_busy()
    }

    /// Проверяет форму и начинает создание.
    pub fn begin_create(
        &mut self,
        name: &str,
        description: &str,
        is_private: bool,
    ) -> StateResult<CreateCommunityRequest> {
        let name = required(name, "name")?;
        let description = required(description, "description")?;
        if self.list.is_loading() || !self.creating.try_begin() {
            return Err(StateError::Busy);
        }
        Ok(CreateCommunityRequest {
            name,
            description,
            is_private: Some(is_private),
        })
    }

    /// Сообщество создано: форма закрывается, список нужно перезагрузить.
    pub fn community_created(&mut self) {
        self.creating.finish();
        self.form_open = false;
    }

    /// Создание не удалось; форма остаётся открытой.
    pub fn create_failed(&mut self) {
        self.creating.finish();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Открытый диалог страницы сообщества. Одновременно не более одного.
pub enum Dialog {
    /// Диалогов нет.
    #[default]
    None,
    /// Форма нового поста.
    CreatePost {
        /// Заголовок.
        title: String,
        /// Текст.
        content: String,
    },
    /// Редактирование сообщества.
    Edit {
        /// Название.
        name: String,
        /// Описание.
        description: String,
    },
    /// Подтверждение удаления сообщества.
    ConfirmDelete,
    /// Подтверждение выхода из сообщества.
    ConfirmLeave,
}

#[derive(Debug, Clone, PartialEq)]
/// Страница одного сообщества.
pub struct CommunityDetailState {
    community_id: i64,
    community: Remote<Community>,
    membership: Membership,
    posts: ListState<Post>,
    posts_hidden: bool,
    dialog: Dialog,
    joining: Busy,
    posting: Busy,
    saving: Busy,
}

impl CommunityDetailState {
    /// Страница сообщества `community_id` до загрузки.
    pub fn new(community_id: i64) -> Self {
        Self {
            community_id,
            community: Remote::Loading,
            membership: Membership::Unknown,
            posts: ListState::new(EmptyPolicy::Prompt),
            posts_hidden: false,
            dialog: Dialog::None,
            joining: Busy::default(),
            posting: Busy::default(),
            saving: Busy::default(),
        }
    }

    /// id сообщества страницы.
    pub fn community_id(&self) -> i64 {
        self.community_id
    }

    /// Сообщество.
    pub fn community(&self) -> &Remote<Community> {
        &self.community
    }

    /// Членство текущего пользователя.
    pub fn membership(&self) -> Membership {
        self.membership
    }

    /// Посты.
    pub fn posts(&self) -> &ListState<Post> {
        &self.posts
    }

    /// Посты недоступны (обычно закрытое сообщество без членства).
    pub fn posts_hidden(&self) -> bool {
        self.posts_hidden
    }

    /// Открытый диалог.
    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    /// Присоединение или выход в полёте.
    pub fn is_joining(&self) -> bool {
        self.joining.is_busy()
    }

    /// Создание поста в полёте.
    pub fn is_posting(&self) -> bool {
        self.posting.is_busy()
    }

    /// Сохранение сообщества в полёте.
    pub fn is_saving(&self) -> bool {
        self.saving.is_busy()
    }

    /// Может ли пользователь редактировать и удалять сообщество.
    pub fn can_manage(&self, user: Option<&CurrentUser>) -> bool {
        match (user, self.community.ready()) {
            (Some(user), Some(community)) => user.can_manage(community.created_by),
            _ => false,
        }
    }

    /// Действия страницы доступны, пока посты не перезагружаются.
    pub fn controls_enabled(&self) -> bool {
        self.posts.controls_enabled()
    }

    /// Начало (повторной) загрузки страницы.
    pub fn begin_load(&mut self) {
        self.posts.begin_load();
    }

    /// Сообщество загружено.
    pub fn community_loaded(&mut self, community: Community) {
        self.membership = self.membership.refine(community.is_member);
        self.community = Remote::Ready(community);
    }

    /// Сообщество не загрузилось; страница показывает ошибку и ссылку назад.
    pub fn community_failed(&mut self) {
        if self.community.is_loading() {
            self.community = Remote::Unavailable;
        }
        self.posts.fail_load();
    }

    /// Посты загружены.
    pub fn posts_loaded(&mut self, posts: Vec<Post>) {
        self.posts_hidden = false;
        self.posts.finish_load(posts, None);
    }

    /// Посты не загрузились. Это не ошибка для пользователя.
    pub fn posts_unavailable(&mut self) {
        debug!(community_id = self.community_id, "posts unavailable");
        self.posts_hidden = true;
        self.posts.fail_load();
    }

    /// Начинает присоединение. `false`, если запрос уже идёт или страница
    /// перезагружается.
    pub fn begin_join(&mut self) -> bool {
        self.controls_enabled() && self.joining.try_begin()
    }

    /// Просит подтверждение выхода.
    pub fn request_leave(&mut self) {
        self.dialog = Dialog::ConfirmLeave;
    }

    /// Выход подтверждён. `false`, если диалога не было или запрос уже идёт.
    pub fn confirm_leave(&mut self) -> bool {
        if self.dialog != Dialog::ConfirmLeave || !self.controls_enabled() {
            return false;
        }
        self.dialog = Dialog::None;
        self.joining.try_begin()
    }

    /// Присоединение прошло; страницу стоит перезагрузить.
    pub fn joined(&mut self) {
        self.joining.finish();
        self.membership = Membership::Member;
    }

    /// Выход прошёл; страницу стоит перезагрузить.
    pub fn left(&mut self) {
        self.joining.finish();
        self.membership = Membership::NonMember;
    }

    /// Присоединение отклонено сервером.
    pub fn join_failed(&mut self, server_message: &str) {
        self.joining.finish();
        self.membership = self.membership.after_join_failure(server_message);
    }

    /// Выход отклонён сервером.
    pub fn leave_failed(&mut self, server_message: &str) {
        self.joining.finish();
        self.membership = self.membership.after_leave_failure(server_message);
    }

    /// Открывает форму нового поста.
    pub fn open_create_post(&mut self) {
        self.dialog = Dialog::CreatePost {
            title: String::new(),
            content: String::new(),
        };
    }

    /// Открывает редактирование с текущими значениями.
    pub fn open_edit(&mut self) {
        if let Some(community) = self.community.ready() {
            self.dialog = Dialog::Edit {
                name: community.name.clone(),
                description: community.description_text().to_string(),
            };
        }
    }

    /// Просит подтверждение удаления.
    pub fn request_delete(&mut self) {
        self.dialog = Dialog::ConfirmDelete;
    }

    /// Закрывает диалог.
    pub fn close_dialog(&mut self) {
        self.dialog = Dialog::None;
    }

    /// Обновляет первое поле формы (заголовок поста или название).
    pub fn set_primary(&mut self, text: impl Into<String>) {
        match &mut self.dialog {
            Dialog::CreatePost { title, .. } => *title = text.into(),
            Dialog::Edit { name, .. } => *name = text.into(),
            _ => {}
        }
    }

    /// Обновляет второе поле формы (текст поста или описание).
    pub fn set_secondary(&mut self, text: impl Into<String>) {
        match &mut self.dialog {
            Dialog::CreatePost { content, .. } => *content = text.into(),
            Dialog::Edit { description, .. } => *description = text.into(),
            _ => {}
        }
    }

    /// Проверяет форму поста и начинает создание.
    pub fn begin_post(&mut self) -> StateResult<CreatePostRequest> {
        let Dialog::CreatePost { title, content } = &self.dialog else {
            return Err(StateError::NoSelection);
        };
        let title = required(title, "title")?;
        let content = required(content, "content")?;
        if !self.controls_enabled() || !self.posting.try_begin() {
            return Err(StateError::Busy);
        }
        Ok(CreatePostRequest {
            community_id: self.community_id,
            title,
            content,
            media_url: None,
        })
    }

    /// Пост создан: он первый в ленте, счётчик постов растёт.
    pub fn post_created(&mut self, post: Post) -> StateResult<()> {
        self.posting.finish();
        self.posts.insert_new(post, InsertAt::Head)?;
        self.posts_hidden = false;
        if let Remote::Ready(community) = &mut self.community {
            community.record_post();
        }
        self.dialog = Dialog::None;
        Ok(())
    }

    /// Создание поста не удалось; форма остаётся.
    pub fn post_failed(&mut self) {
        self.posting.finish();
    }

    /// Карточка поста сообщила об изменении. `false`, если поста уже нет.
    pub fn post_changed(&mut self, id: i64, change: &PostChange) -> bool {
        self.posts.update(id, |post| change.apply(post))
    }

    /// Проверяет форму редактирования и начинает сохранение.
    pub fn begin_update(&mut self) -> StateResult<UpdateCommunityRequest> {
        let Dialog::Edit { name, description } = &self.dialog else {
            return Err(StateError::NoSelection);
        };
        let name = required(name, "name")?;
        let description = description.trim().to_string();
        if !self.controls_enabled() || !self.saving.try_begin() {
            return Err(StateError::Busy);
        }
        Ok(UpdateCommunityRequest {
            name: Some(name),
            description: Some(description),
            is_private: None,
        })
    }

    /// Сервер вернул обновлённое сообщество.
    pub fn community_updated(&mut self, community: Community) {
        self.saving.finish();
        self.community_loaded(community);
        self.dialog = Dialog::None;
    }

    /// Сохранение не удалось; диалог остаётся.
    pub fn update_failed(&mut self) {
        self.saving.finish();
    }

    /// Начинает удаление после подтверждения.
    pub fn begin_delete(&mut self) -> bool {
        if self.dialog != Dialog::ConfirmDelete || !self.controls_enabled() {
            return false;
        }
        self.saving.try_begin()
    }

    /// Удаление не удалось.
    pub fn delete_failed(&mut self) {
        self.saving.finish();
        self.dialog = Dialog::None;
    }
}
