use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use lms_core::remote::Remote;

use crate::api::ApiError;
use crate::state::AppState;

pub(crate) mod chatbot;
pub(crate) mod community;
pub(crate) mod community_detail;
pub(crate) mod course_analytics;
pub(crate) mod instructor_analytics;
pub(crate) mod instructor_dashboard;

/// Загружает данные страницы «только для чтения» с токеном.
///
/// Ошибка показывается уведомлением, страница переходит в `Unavailable`.
pub(crate) fn load_remote<T, F, Fut>(
    state: AppState,
    target: RwSignal<Remote<T>>,
    context: &'static str,
    fetch: F,
) where
    T: Send + Sync + 'static,
    F: FnOnce(String) -> Fut + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    let Some(token) = state.require_token() else {
        target.set(Remote::Unavailable);
        return;
    };
    target.set(Remote::Loading);
    spawn_local(async move {
        let result = fetch(token).await;
        if let Err(err) = &result {
            state.failure(context, err);
        }
        let _ = target.try_set(Remote::from_result(result));
    });
}
