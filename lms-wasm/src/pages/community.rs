use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use lms_core::StateError;
use lms_core::community::CommunityListState;
use lms_core::models::Community;
use lms_core::notice::Notice;
use lms_core::selection::ListPhase;

use crate::api;
use crate::state::AppState;
use crate::text::counted;

fn load_communities(state: AppState, list: RwSignal<CommunityListState>) {
    let Some(search) = list.try_update(|l| {
        l.begin_load();
        l.search_query().map(str::to_string)
    }) else {
        return;
    };
    let token = state.token.get_untracked();

    spawn_local(async move {
        match api::list_communities(token.as_deref(), search.as_deref()).await {
            Ok(communities) => {
                list.try_update(|l| l.finish_load(communities));
            }
            Err(err) => {
                list.try_update(CommunityListState::fail_load);
                state.failure("Failed to load communities", &err);
            }
        }
    });
}

#[component]
pub(crate) fn CommunityPage(state: AppState, on_open: Callback<i64>) -> impl IntoView {
    let list = RwSignal::new(CommunityListState::new());
    let name = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let is_private = RwSignal::new(false);

    load_communities(state, list);

    let shape = Memo::new(move |_| list.with(|l| (l.list().phase(), l.list().items().is_empty())));

    let on_search = move |ev: SubmitEvent| {
        ev.prevent_default();
        load_communities(state, list);
    };

    let on_create = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(token) = state.require_token() else {
            return;
        };
        let payload = match list.try_update(|l| {
            l.begin_create(&name.get_untracked(), &description.get_untracked(), is_private.get_untracked())
        }) {
            Some(Ok(payload)) => payload,
            Some(Err(StateError::Blank(_))) => {
                state.notify(Notice::error("Name and description are required"));
                return;
            }
            _ => return,
        };

        spawn_local(async move {
            match api::create_community(&token, &payload).await {
                Ok(_) => {
                    list.try_update(CommunityListState::community_created);
                    name.try_set(String::new());
                    description.try_set(String::new());
                    is_private.try_set(false);
                    state.success("Community created successfully");
                    load_communities(state, list);
                }
                Err(err) => {
                    list.try_update(CommunityListState::create_failed);
                    state.failure("Failed to create community", &err);
                }
            }
        });
    };

    view! {
        <section class="communities">
            <div class="page-header">
                <h2>"Communities"</h2>
                <button
                    on:click=move |_| list.update(CommunityListState::open_form)
                    disabled=move || list.with(|l| l.form_open() || !l.controls_enabled())
                >
                    "+ Create Community"
                </button>
            </div>

            <form class="search-form" on:submit=on_search>
                <input
                    placeholder="Search communities..."
                    prop:value=move || list.with(|l| l.search().to_string())
                    on:input=move |ev| list.update(|l| l.set_search(event_target_value(&ev)))
                />
                <button type="submit" disabled=move || list.with(|l| l.list().is_loading())>
                    "Search"
                </button>
            </form>

            <Show when=move || list.with(CommunityListState::form_open)>
                <form class="panel create-form" on:submit=on_create>
                    <h3>"New Community"</h3>
                    <input
                        placeholder="Name"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                    <textarea
                        placeholder="Description"
                        prop:value=move || description.get()
                        on:input=move |ev| description.set(event_target_value(&ev))
                    ></textarea>
                    <label>
                        <input
                            type="checkbox"
                            prop:checked=move || is_private.get()
                            on:change=move |ev| is_private.set(event_target_checked(&ev))
                        />
                        " Private community"
                    </label>
                    <div class="form-actions">
                        <button type="submit" disabled=move || !list.with(CommunityListState::controls_enabled)>
                            {move || {
                                if list.with(CommunityListState::is_creating) {
                                    "Creating..."
                                } else {
                                    "Create"
                                }
                            }}
                        </button>
                        <button type="button" on:click=move |_| list.update(CommunityListState::close_form)>
                            "Cancel"
                        </button>
                    </div>
                </form>
            </Show>

            {move || match shape.get() {
                (ListPhase::Loading, true) => {
                    view! { <p class="muted">"Loading communities..."</p> }.into_any()
                }
                (ListPhase::Empty, _) => view! {
                    <div class="empty-state">
                        <p>"No communities found"</p>
                        <button
                            on:click=move |_| list.update(CommunityListState::open_form)
                            disabled=move || !list.with(CommunityListState::controls_enabled)
                        >
                            "Create the first one"
                        </button>
                    </div>
                }
                .into_any(),
                _ => view! {
                    <div class="community-grid">
                        <For
                            each=move || list.with(|l| l.list().items().to_vec())
                            key=|community: &Community| {
                                (community.id, community.member_count, community.post_count)
                            }
                            children=move |community: Community| {
                                view! { <CommunityCard community=community on_open=on_open /> }
                            }
                        />
                    </div>
                }
                .into_any(),
            }}
        </section>
    }
}

#[component]
fn CommunityCard(community: Community, on_open: Callback<i64>) -> impl IntoView {
    let id = community.id;
    let description = community.description_text().to_string();
    view! {
        <article class="community-card" on:click=move |_| on_open.run(id)>
            <div class="community-card-header">
                <h3>{community.name}</h3>
                {community.is_private.then(|| view! { <span class="badge">"Private"</span> })}
            </div>
            <p class="muted">{description}</p>
            <p class="community-counts">
                <span>{counted(community.member_count, "member")}</span>
                <span>{counted(community.post_count, "post")}</span>
            </p>
        </article>
    }
}
