use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use lms_core::notice::Notice;

use crate::api;
use crate::state::AppState;
use crate::storage::parse_token;

/// Вход по токену доступа: токен проверяется запросом текущего пользователя.
#[component]
pub(crate) fn SignInPanel(state: AppState) -> impl IntoView {
    let token_input = RwSignal::new(String::new());
    let checking = RwSignal::new(false);

    let on_sign_in = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(token) = parse_token(&token_input.get_untracked()) else {
            state.notify(Notice::error("Paste an access token first"));
            return;
        };

        checking.set(true);
        spawn_local(async move {
            match api::current_user(&token).await {
                Ok(user) => {
                    state.sign_in(token, user);
                    token_input.try_set(String::new());
                    state.success("Signed in");
                }
                Err(err) => state.failure("Failed to sign in", &err),
            }
            checking.try_set(false);
        });
    };

    let on_sign_out = move |_| {
        state.sign_out();
        state.success("Signed out");
    };

    let user_label = move || {
        state.user.with(|user| {
            user.as_ref()
                .map(|user| {
                    let name = user
                        .full_name
                        .clone()
                        .or_else(|| user.email.clone())
                        .unwrap_or_else(|| format!("user #{}", user.id));
                    format!("{name} ({})", user.role)
                })
                .unwrap_or_default()
        })
    };

    view! {
        <Show
            when=move || state.is_authenticated()
            fallback=move || view! {
                <form class="sign-in" on:submit=on_sign_in>
                    <input
                        type="password"
                        placeholder="Access token"
                        prop:value=move || token_input.get()
                        on:input=move |ev| token_input.set(event_target_value(&ev))
                    />
                    <button type="submit" disabled=move || checking.get()>
                        "Sign in"
                    </button>
                </form>
            }
        >
            <div class="signed-in">
                <span>{user_label}</span>
                <button on:click=on_sign_out>"Sign out"</button>
            </div>
        </Show>
    }
}
