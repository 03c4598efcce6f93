use leptos::ev::{MouseEvent, SubmitEvent};
use leptos::prelude::*;
use lms_core::chat::ChatState;
use lms_core::menu::ItemMenu;
use lms_core::models::ChatSession;
use lms_core::timestamp::display_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowMode {
    Idle,
    Options,
    Editing,
    ConfirmDelete,
}

fn row_mode(menu: &ItemMenu, id: i64) -> RowMode {
    if menu.draft_for(id).is_some() {
        RowMode::Editing
    } else if menu.confirming_delete(id) {
        RowMode::ConfirmDelete
    } else if menu.options_open_for(id) {
        RowMode::Options
    } else {
        RowMode::Idle
    }
}

/// Боковая панель сессий. Переименование и удаление выполняет страница:
/// панель только переводит меню и сообщает о подтверждении.
#[component]
pub(crate) fn ChatSidebar(
    chat: RwSignal<ChatState>,
    on_select: Callback<i64>,
    on_new: Callback<()>,
    on_rename: Callback<()>,
    on_delete: Callback<()>,
) -> impl IntoView {
    let sessions = move || chat.with(|c| c.sessions().items().to_vec());
    let first_load = move || chat.with(|c| c.sessions().is_loading() && c.sessions().items().is_empty());

    view! {
        <aside class="chat-sidebar">
            <button
                class="new-chat"
                on:click=move |_| on_new.run(())
                disabled=move || !chat.with(ChatState::controls_enabled)
            >
                "+ New Chat"
            </button>

            <Show when=first_load>
                <p class="muted">"Loading chats..."</p>
            </Show>

            <ul class="session-list">
                <For
                    each=sessions
                    key=|session: &ChatSession| (session.id, session.title.clone(), session.updated_at.clone())
                    children=move |session: ChatSession| {
                        view! {
                            <SessionRow
                                chat=chat
                                session=session
                                on_select=on_select
                                on_rename=on_rename
                                on_delete=on_delete
                            />
                        }
                    }
                />
            </ul>
        </aside>
    }
}

#[component]
fn SessionRow(
    chat: RwSignal<ChatState>,
    session: ChatSession,
    on_select: Callback<i64>,
    on_rename: Callback<()>,
    on_delete: Callback<()>,
) -> impl IntoView {
    let id = session.id;
    let title = session.display_title().to_string();
    let date = display_date(session.last_activity());
    let stored_title = StoredValue::new(session.title.clone());

    let mode = Memo::new(move |_| chat.with(|c| row_mode(c.menu(), id)));
    let is_current = move || chat.with(|c| c.current_id() == Some(id));
    let any_editing = move || chat.with(|c| c.menu().is_editing());

    let on_toggle = move |ev: MouseEvent| {
        ev.stop_propagation();
        chat.update(|c| c.menu_mut().toggle_options(id));
    };
    let on_start_edit = move |ev: MouseEvent| {
        ev.stop_propagation();
        let current = stored_title.get_value();
        chat.update(|c| c.menu_mut().start_edit(id, current.as_deref()));
    };
    let on_request_delete = move |ev: MouseEvent| {
        ev.stop_propagation();
        chat.update(|c| c.menu_mut().request_delete(id));
    };
    let on_cancel = move |ev: MouseEvent| {
        ev.stop_propagation();
        chat.update(|c| c.menu_mut().cancel());
    };
    let on_commit = move |ev: SubmitEvent| {
        ev.prevent_default();
        on_rename.run(());
    };

    let body = move || match mode.get() {
        RowMode::Editing => view! {
            <form class="rename-form" on:submit=on_commit>
                <input
                    class="rename-input"
                    prop:value=move || {
                        chat.with(|c| c.menu().draft_for(id).unwrap_or_default().to_string())
                    }
                    on:input=move |ev| chat.update(|c| c.menu_mut().set_draft(event_target_value(&ev)))
                    on:click=|ev: MouseEvent| ev.stop_propagation()
                />
                <button type="submit" on:click=|ev: MouseEvent| ev.stop_propagation()>
                    "Save"
                </button>
                <button type="button" on:click=on_cancel>
                    "Cancel"
                </button>
            </form>
        }
        .into_any(),
        RowMode::ConfirmDelete => view! {
            <div class="confirm-row" on:click=|ev: MouseEvent| ev.stop_propagation()>
                <span>"Delete this chat?"</span>
                <button class="danger" on:click=move |_| on_delete.run(())>
                    "Delete"
                </button>
                <button on:click=on_cancel>"Cancel"</button>
            </div>
        }
        .into_any(),
        RowMode::Idle | RowMode::Options => {
            let title = title.clone();
            let date = date.clone();
            view! {
                <div class="session-row" on:click=move |_| on_select.run(id)>
                    <div class="session-text">
                        <span class="session-title">{title}</span>
                        <span class="session-date">{date}</span>
                    </div>
                    <Show when=move || !any_editing()>
                        <button class="options-toggle" on:click=on_toggle>
                            "⋯"
                        </button>
                    </Show>
                </div>
                <Show when=move || mode.get() == RowMode::Options>
                    <div class="options-menu">
                        <button on:click=on_start_edit>"Rename"</button>
                        <button class="danger" on:click=on_request_delete>
                            "Delete"
                        </button>
                    </div>
                </Show>
            }
            .into_any()
        }
    };

    view! {
        <li class=move || if is_current() { "session-item active" } else { "session-item" }>
            {body}
        </li>
    }
}
