//! Состояние страницы чата: список сессий, открытая сессия, отправка.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::collection::{Identified, InsertAt};
use crate::error::{StateError, StateResult};
use crate::menu::ItemMenu;
use crate::models::{ChatMessage, ChatSession};
use crate::selection::{Busy, EmptyPolicy, ListState, LoadOutcome, Selection, Ticket};
use crate::transcript::Transcript;

#[derive(Debug, Clone, PartialEq)]
/// Открытая сессия: заголовок отдельно, сообщения в ленте.
pub struct OpenChat {
    /// Сессия без сообщений.
    pub session: ChatSession,
    /// Лента сообщений.
    pub transcript: Transcript,
}

impl OpenChat {
    /// Разбирает загруженную сессию на заголовок и ленту.
    pub fn from_session(mut session: ChatSession) -> Self {
        let messages = std::mem::take(&mut session.messages);
        let transcript = Transcript::from_messages(session.id, messages);
        Self {
            session,
            transcript,
        }
    }
}

impl Identified for OpenChat {
    fn id(&self) -> i64 {
        self.session.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Отправка в полёте.
pub struct PendingSend {
    /// Сессия, в которую ушло сообщение.
    pub session_id: i64,
    /// Временный id сообщения пользователя.
    pub provisional_id: i64,
    /// Текст после обрезки пробелов.
    pub content: String,
    /// Первое сообщение сессии: сервер сгенерирует заголовок, список стоит перезагрузить.
    pub first_message: bool,
}

#[derive(Debug, Clone, PartialEq)]
/// Состояние страницы чата.
pub struct ChatState {
    sessions: ListState<ChatSession>,
    selection: Selection<OpenChat>,
    menu: ItemMenu,
    sending: Busy,
    creating: Busy,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    /// Начальное состояние: список загружается, пустой список создаёт сессию сам.
    pub fn new() -> Self {
        Self {
            sessions: ListState::new(EmptyPolicy::AutoCreate),
            selection: Selection::default(),
            menu: ItemMenu::default(),
            sending: Busy::default(),
            creating: Busy::default(),
        }
    }

    /// Список сессий.
    pub fn sessions(&self) -> &ListState<ChatSession> {
        &self.sessions
    }

    /// Открытая сессия.
    pub fn current(&self) -> Option<&OpenChat> {
        self.selection.current()
    }

    /// id открытой сессии.
    pub fn current_id(&self) -> Option<i64> {
        self.selection.current_id()
    }

    /// Меню элементов боковой панели.
    pub fn menu(&self) -> &ItemMenu {
        &self.menu
    }

    /// Меню элементов боковой панели для переходов.
    pub fn menu_mut(&mut self) -> &mut ItemMenu {
        &mut self.menu
    }

    /// Отправка в полёте: поле ввода и кнопка выключены.
    pub fn is_sending(&self) -> bool {
        self.sending.is_busy()
    }

    /// Кнопка «New Chat» и список доступны.
    pub fn controls_enabled(&self) -> bool {
        self.sessions.controls_enabled() && !self.creating.is_busy()
    }

    /// Начало загрузки списка.
    pub fn begin_load(&mut self) {
        self.sessions.begin_load();
    }

    /// Список загружен. Возвращает следующий шаг страницы.
    pub fn finish_load(&mut self, sessions: Vec<ChatSession>) -> LoadOutcome {
        let current = self.selection.current_id().or(self.selection.requested());
        let outcome = self.sessions.finish_load(sessions, current);
        debug!(?outcome, "chat sessions loaded");
        outcome
    }

    /// Загрузка списка не удалась.
    pub fn fail_load(&mut self) {
        self.sessions.fail_load();
    }

    /// Выбор сессии: детали всегда загружаются заново.
    pub fn select(&mut self, id: i64) -> Ticket {
        self.selection.request(id)
    }

    /// Детали сессии загружены. `false`, если ответ устарел.
    pub fn session_loaded(&mut self, ticket: Ticket, session: ChatSession) -> bool {
        self.selection
            .resolve(ticket, OpenChat::from_session(session))
    }

    /// Начало создания сессии. `false`, если создание уже идёт.
    pub fn begin_create(&mut self) -> bool {
        self.creating.try_begin()
    }

    /// Сессия создана: она первая в списке и сразу открыта.
    pub fn session_created(&mut self, session: ChatSession) -> StateResult<()> {
        self.creating.finish();
        let mut summary = session.clone();
        summary.messages.clear();
        self.sessions.insert_new(summary, InsertAt::Head)?;
        self.selection.install(OpenChat::from_session(session));
        Ok(())
    }

    /// Создание не удалось.
    pub fn create_failed(&mut self) {
        self.creating.finish();
    }

    /// Сессия переименована сервером. Открытая сессия получает новый заголовок.
    pub fn session_renamed(&mut self, mut updated: ChatSession) -> bool {
        updated.messages.clear();
        if let Some(current) = self.selection.current_mut()
            && current.session.id == updated.id
        {
            current.session.title = updated.title.clone();
        }
        self.sessions.replace(updated)
    }

    /// Сессия удалена. Если она была открыта, выбор снимается; если она
    /// только загружалась, запрос отменяется, а открытая сессия остаётся.
    pub fn session_deleted(&mut self, id: i64) -> bool {
        let removed = self.sessions.remove(id);
        self.menu.forget(id);
        if self.selection.current_id() == Some(id) {
            self.selection.clear();
        } else if self.selection.requested() == Some(id) {
            self.selection.cancel_request();
        }
        removed
    }

    /// Что открыть после удаления: выбор остаётся, если он есть, иначе первая
    /// сессия списка; пустой список создаёт новую.
    pub fn next_after_delete(&self) -> LoadOutcome {
        if self.selection.current_id().is_some() || self.selection.requested().is_some() {
            return LoadOutcome::Keep;
        }
        match self.sessions.items().first() {
            Some(first) => LoadOutcome::Select(first.id),
            None => LoadOutcome::AutoCreate,
        }
    }

    /// Начинает отправку: сообщение пользователя сразу появляется в ленте.
    ///
    /// `None`, если текст пустой, сессия не открыта или отправка уже идёт.
    pub fn begin_send(&mut self, input: &str, now: DateTime<Utc>) -> Option<PendingSend> {
        let content = input.trim();
        if content.is_empty() {
            return None;
        }
        let current = self.selection.current_mut()?;
        if !self.sending.try_begin() {
            return None;
        }

        let first_message = current.transcript.is_empty();
        let provisional_id = current.transcript.push_provisional(content, now);
        Some(PendingSend {
            session_id: current.session.id,
            provisional_id,
            content: content.to_string(),
            first_message,
        })
    }

    /// Ответ ассистента получен.
    ///
    /// Если за время запроса открыта другая сессия, ответ не попадает в её ленту.
    pub fn reply_received(&mut self, pending: &PendingSend, reply: ChatMessage) -> StateResult<()> {
        self.sending.finish();
        let current = self.open_for(pending)?;
        current.transcript.confirm(pending.provisional_id, reply)
    }

    /// Отправка не удалась; сообщение остаётся в ленте помеченным.
    pub fn send_failed(&mut self, pending: &PendingSend) -> StateResult<()> {
        self.sending.finish();
        let current = self.open_for(pending)?;
        current.transcript.fail(pending.provisional_id)
    }

    fn open_for(&mut self, pending: &PendingSend) -> StateResult<&mut OpenChat> {
        let current = self
            .selection
            .current_mut()
            .ok_or(StateError::NoSelection)?;
        if current.session.id != pending.session_id {
            return Err(StateError::SessionMismatch {
                expected: current.session.id,
                got: pending.session_id,
            });
        }
        Ok(current)
    }
}
