use leptos::prelude::*;

/// Карточка с одним показателем.
#[component]
pub(crate) fn StatsCard(
    title: &'static str,
    #[prop(into)] value: String,
    #[prop(optional, into)] hint: Option<String>,
) -> impl IntoView {
    view! {
        <div class="stats-card">
            <p class="stats-title">{title}</p>
            <p class="stats-value">{value}</p>
            {hint.map(|hint| view! { <p class="stats-hint">{hint}</p> })}
        </div>
    }
}
