use leptos::prelude::*;

use crate::state::AppState;

#[component]
pub(crate) fn NoticeBanner(state: AppState) -> impl IntoView {
    move || {
        state.notice.get().map(|notice| {
            let class = if notice.is_error() {
                "notice notice-error"
            } else {
                "notice notice-success"
            };
            view! {
                <div class=class role="status">
                    <span>{notice.text}</span>
                    <button class="notice-close" on:click=move |_| state.dismiss()>
                        "×"
                    </button>
                </div>
            }
        })
    }
}
