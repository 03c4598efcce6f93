use std::time::Duration;

use leptos::prelude::*;
use lms_core::models::CurrentUser;
use lms_core::notice::Notice;

use crate::api::ApiError;
use crate::storage;

const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Пользователь, токен и уведомление. Создаётся в корне и передаётся
/// страницам явно.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AppState {
    pub(crate) token: RwSignal<Option<String>>,
    pub(crate) user: RwSignal<Option<CurrentUser>>,
    pub(crate) notice: RwSignal<Option<Notice>>,
}

impl AppState {
    /// Восстанавливает вход из localStorage.
    pub(crate) fn restore() -> Self {
        Self {
            token: RwSignal::new(storage::load_token()),
            user: RwSignal::new(storage::load_user()),
            notice: RwSignal::new(None),
        }
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.token.with(Option::is_some)
    }

    /// Токен для запроса; без него показывается уведомление.
    pub(crate) fn require_token(&self) -> Option<String> {
        let token = self.token.get_untracked();
        if token.is_none() {
            self.notify(Notice::error("Please sign in first"));
        }
        token
    }

    pub(crate) fn sign_in(&self, token: String, user: CurrentUser) {
        if let Err(err) = storage::save_session(&token, &user) {
            log(&format!("session is not persisted: {err}"));
        }
        self.token.set(Some(token));
        self.user.set(Some(user));
    }

    pub(crate) fn sign_out(&self) {
        if let Err(err) = storage::clear_session() {
            log(&format!("session is not cleared: {err}"));
        }
        self.token.set(None);
        self.user.set(None);
    }

    /// Показывает уведомление и скрывает его через несколько секунд.
    pub(crate) fn notify(&self, notice: Notice) {
        let shown = notice.clone();
        let _ = self.notice.try_set(Some(notice));

        let signal = self.notice;
        set_timeout(
            move || {
                signal.try_update(|current| {
                    if current.as_ref() == Some(&shown) {
                        *current = None;
                    }
                });
            },
            NOTICE_TTL,
        );
    }

    pub(crate) fn success(&self, text: &str) {
        self.notify(Notice::success(text));
    }

    /// Ошибка удалённого вызова: в консоль и в уведомление.
    pub(crate) fn failure(&self, generic: &str, err: &ApiError) {
        log_error(generic, err);
        self.notify(Notice::from_failure(generic, err.server_message()));
    }

    pub(crate) fn dismiss(&self) {
        self.notice.set(None);
    }
}

pub(crate) fn log(message: &str) {
    web_sys::console::log_1(&message.into());
}

pub(crate) fn log_error(context: &str, err: &ApiError) {
    web_sys::console::error_1(&format!("{context}: {err}").into());
}
