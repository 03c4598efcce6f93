use chrono::Utc;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use lms_core::chat::ChatState;
use lms_core::selection::LoadOutcome;
use lms_core::transcript::TranscriptEntry;

use crate::api;
use crate::components::chat_sidebar::ChatSidebar;
use crate::components::message_bubble::MessageBubble;
use crate::state::{AppState, log};

fn load_sessions(state: AppState, chat: RwSignal<ChatState>) {
    let Some(token) = state.require_token() else {
        return;
    };
    if chat.try_update(ChatState::begin_load).is_none() {
        return;
    }
    spawn_local(async move {
        match api::list_sessions(&token).await {
            Ok(sessions) => match chat.try_update(|c| c.finish_load(sessions)) {
                Some(LoadOutcome::AutoCreate) => create_session(state, chat),
                Some(LoadOutcome::Select(id)) => select_session(state, chat, id),
                _ => {}
            },
            Err(err) => {
                chat.try_update(ChatState::fail_load);
                state.failure("Failed to load chat sessions", &err);
            }
        }
    });
}

fn select_session(state: AppState, chat: RwSignal<ChatState>, id: i64) {
    let Some(token) = state.require_token() else {
        return;
    };
    let Some(ticket) = chat.try_update(|c| c.select(id)) else {
        return;
    };
    spawn_local(async move {
        match api::get_session(&token, id).await {
            Ok(session) => {
                chat.try_update(|c| c.session_loaded(ticket, session));
            }
            Err(err) => state.failure("Failed to load chat", &err),
        }
    });
}

fn create_session(state: AppState, chat: RwSignal<ChatState>) {
    let Some(token) = state.require_token() else {
        return;
    };
    if !chat.try_update(ChatState::begin_create).unwrap_or(false) {
        return;
    }
    spawn_local(async move {
        match api::create_session(&token).await {
            Ok(session) => {
                if let Some(Err(err)) = chat.try_update(|c| c.session_created(session)) {
                    log(&format!("session is not inserted: {err}"));
                }
            }
            Err(err) => {
                chat.try_update(ChatState::create_failed);
                state.failure("Failed to create chat", &err);
            }
        }
    });
}

#[component]
pub(crate) fn ChatbotPage(state: AppState) -> impl IntoView {
    let chat = RwSignal::new(ChatState::new());
    let input = RwSignal::new(String::new());

    load_sessions(state, chat);

    let outside_click = window_event_listener(leptos::ev::click, move |_| {
        chat.try_update(|c| c.menu_mut().dismiss_outside());
    });
    on_cleanup(move || outside_click.remove());

    let on_select = Callback::new(move |id: i64| {
        if chat.with_untracked(|c| c.current_id() == Some(id)) {
            return;
        }
        select_session(state, chat, id);
    });

    let on_new = Callback::new(move |()| create_session(state, chat));

    let on_rename = Callback::new(move |()| {
        let Some(token) = state.require_token() else {
            return;
        };
        let Some(Some((id, title))) = chat.try_update(|c| c.menu_mut().commit_edit()) else {
            return;
        };
        spawn_local(async move {
            match api::rename_session(&token, id, &title).await {
                Ok(session) => {
                    chat.try_update(|c| c.session_renamed(session));
                }
                Err(err) => state.failure("Failed to rename chat", &err),
            }
        });
    });

    let on_delete = Callback::new(move |()| {
        let Some(token) = state.require_token() else {
            return;
        };
        let Some(Some(id)) = chat.try_update(|c| c.menu_mut().confirm_delete()) else {
            return;
        };
        spawn_local(async move {
            match api::delete_session(&token, id).await {
                Ok(()) => {
                    let next = chat.try_update(|c| {
                        c.session_deleted(id);
                        c.next_after_delete()
                    });
                    match next {
                        Some(LoadOutcome::Select(first)) => select_session(state, chat, first),
                        Some(LoadOutcome::AutoCreate) => create_session(state, chat),
                        _ => {}
                    }
                }
                Err(err) => state.failure("Failed to delete chat", &err),
            }
        });
    });

    let on_send = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(token) = state.require_token() else {
            return;
        };
        let text = input.get_untracked();
        let Some(Some(pending)) = chat.try_update(|c| c.begin_send(&text, Utc::now())) else {
            return;
        };
        input.set(String::new());

        spawn_local(async move {
            match api::send_message(&token, pending.session_id, &pending.content).await {
                Ok(reply) => {
                    if let Some(Err(err)) = chat.try_update(|c| c.reply_received(&pending, reply)) {
                        log(&format!("reply is not shown: {err}"));
                    }
                    // Первое сообщение: сервер придумал заголовок сессии.
                    if pending.first_message {
                        load_sessions(state, chat);
                    }
                }
                Err(err) => {
                    if let Some(Err(mark_err)) = chat.try_update(|c| c.send_failed(&pending)) {
                        log(&format!("failed message is not marked: {mark_err}"));
                    }
                    state.failure("Failed to send message", &err);
                }
            }
        });
    };

    let has_chat = Memo::new(move |_| chat.with(|c| c.current_id()));
    let title = move || {
        chat.with(|c| {
            c.current()
                .map(|open| open.session.display_title().to_string())
                .unwrap_or_default()
        })
    };
    let entries = move || {
        chat.with(|c| {
            c.current()
                .map(|open| open.transcript.entries().to_vec())
                .unwrap_or_default()
        })
    };
    let is_empty = move || chat.with(|c| c.current().is_some_and(|open| open.transcript.is_empty()));
    let sending = move || chat.with(ChatState::is_sending);

    view! {
        <section class="chatbot">
            <ChatSidebar
                chat=chat
                on_select=on_select
                on_new=on_new
                on_rename=on_rename
                on_delete=on_delete
            />

            <div class="chat-window">
                {move || match has_chat.get() {
                    None => view! {
                        <div class="chat-placeholder">
                            <p>"Select a chat or start a new one"</p>
                        </div>
                    }
                    .into_any(),
                    Some(_) => view! {
                        <header class="chat-header">
                            <h2>{title}</h2>
                        </header>

                        <div class="messages">
                            <Show when=is_empty>
                                <div class="chat-welcome">
                                    <h3>"How can I help you today?"</h3>
                                    <p class="muted">"Ask anything about your courses."</p>
                                </div>
                            </Show>
                            <For
                                each=entries
                                key=|entry: &TranscriptEntry| (entry.message.id, entry.delivery)
                                children=|entry: TranscriptEntry| view! { <MessageBubble entry=entry /> }
                            />
                            <Show when=sending>
                                <p class="muted typing">"Assistant is typing..."</p>
                            </Show>
                        </div>

                        <form class="chat-input" on:submit=on_send>
                            <input
                                placeholder="Type your message..."
                                prop:value=move || input.get()
                                on:input=move |ev| input.set(event_target_value(&ev))
                                disabled=sending
                            />
                            <button
                                type="submit"
                                disabled=move || sending() || input.with(|text| text.trim().is_empty())
                            >
                                "Send"
                            </button>
                        </form>
                    }
                    .into_any(),
                }}
            </div>
        </section>
    }
}
