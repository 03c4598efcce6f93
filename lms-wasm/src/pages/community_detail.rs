use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use lms_core::StateError;
use lms_core::community::{CommunityDetailState, Dialog};
use lms_core::membership::Membership;
use lms_core::models::{Community, Post};
use lms_core::notice::Notice;
use lms_core::post_card::PostChange;
use lms_core::remote::Remote;

use crate::api;
use crate::components::post_card::PostCard;
use crate::state::{AppState, log, log_error};
use crate::text::counted;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogKind {
    None,
    CreatePost,
    Edit,
    ConfirmDelete,
    ConfirmLeave,
}

impl From<&Dialog> for DialogKind {
    fn from(dialog: &Dialog) -> Self {
        match dialog {
            Dialog::None => Self::None,
            Dialog::CreatePost { .. } => Self::CreatePost,
            Dialog::Edit { .. } => Self::Edit,
            Dialog::ConfirmDelete => Self::ConfirmDelete,
            Dialog::ConfirmLeave => Self::ConfirmLeave,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PostsMode {
    Hidden,
    Empty,
    List,
}

fn dialog_fields(dialog: &Dialog) -> (String, String) {
    match dialog {
        Dialog::CreatePost { title, content } => (title.clone(), content.clone()),
        Dialog::Edit { name, description } => (name.clone(), description.clone()),
        _ => (String::new(), String::new()),
    }
}

/// Сообщество, затем его посты. Ошибка постов не показывается пользователю:
/// у закрытого сообщества они просто скрыты.
fn load_detail(state: AppState, detail: RwSignal<CommunityDetailState>) {
    let Some(id) = detail.try_update(|d| {
        d.begin_load();
        d.community_id()
    }) else {
        return;
    };
    let token = state.token.get_untracked();

    spawn_local(async move {
        match api::get_community(token.as_deref(), id).await {
            Ok(community) => {
                detail.try_update(|d| d.community_loaded(community));
            }
            Err(err) => {
                detail.try_update(CommunityDetailState::community_failed);
                state.failure("Failed to load community", &err);
                return;
            }
        }

        match api::list_community_posts(token.as_deref(), id, 0, api::POSTS_PAGE).await {
            Ok(posts) => {
                detail.try_update(|d| d.posts_loaded(posts));
            }
            Err(err) => {
                log_error("Posts are not available", &err);
                detail.try_update(CommunityDetailState::posts_unavailable);
            }
        }
    });
}

#[component]
pub(crate) fn CommunityDetailPage(
    state: AppState,
    community_id: i64,
    on_back: Callback<()>,
) -> impl IntoView {
    let detail = RwSignal::new(CommunityDetailState::new(community_id));
    load_detail(state, detail);

    let phase = Memo::new(move |_| {
        detail.with(|d| match d.community() {
            Remote::Loading => Remote::Loading,
            Remote::Ready(_) => Remote::Ready(()),
            Remote::Unavailable => Remote::Unavailable,
        })
    });
    let community = Memo::new(move |_| detail.with(|d| d.community().ready().cloned()));
    let field = move |read: fn(&Community) -> String| {
        community.with(|c| c.as_ref().map(read).unwrap_or_default())
    };

    let on_join = move |_| {
        let Some(token) = state.require_token() else {
            return;
        };
        if !detail.try_update(CommunityDetailState::begin_join).unwrap_or(false) {
            return;
        }
        spawn_local(async move {
            match api::join_community(&token, community_id).await {
                Ok(()) => {
                    detail.try_update(CommunityDetailState::joined);
                    state.success("Joined community successfully");
                    load_detail(state, detail);
                }
                Err(err) => {
                    let message = err.server_message().unwrap_or_default().to_string();
                    detail.try_update(|d| d.join_failed(&message));
                    state.failure("Failed to join community", &err);
                }
            }
        });
    };

    let on_confirm_leave = move |_| {
        let Some(token) = state.require_token() else {
            return;
        };
        if !detail.try_update(CommunityDetailState::confirm_leave).unwrap_or(false) {
            return;
        }
        spawn_local(async move {
            match api::leave_community(&token, community_id).await {
                Ok(()) => {
                    detail.try_update(CommunityDetailState::left);
                    state.success("Left community successfully");
                    load_detail(state, detail);
                }
                Err(err) => {
                    let message = err.server_message().unwrap_or_default().to_string();
                    detail.try_update(|d| d.leave_failed(&message));
                    state.failure("Failed to leave community", &err);
                }
            }
        });
    };

    let on_submit_post = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(token) = state.require_token() else {
            return;
        };
        let payload = match detail.try_update(CommunityDetailState::begin_post) {
            Some(Ok(payload)) => payload,
            Some(Err(StateError::Blank(_))) => {
                state.notify(Notice::error("Title and content are required"));
                return;
            }
            _ => return,
        };
        spawn_local(async move {
            match api::create_post(&token, &payload).await {
                Ok(post) => {
                    if let Some(Err(err)) = detail.try_update(|d| d.post_created(post)) {
                        log(&format!("post is not inserted: {err}"));
                    }
                    state.success("Post created successfully");
                }
                Err(err) => {
                    detail.try_update(CommunityDetailState::post_failed);
                    state.failure("Failed to create post", &err);
                }
            }
        });
    };

    let on_submit_edit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(token) = state.require_token() else {
            return;
        };
        let payload = match detail.try_update(CommunityDetailState::begin_update) {
            Some(Ok(payload)) => payload,
            Some(Err(StateError::Blank(_))) => {
                state.notify(Notice::error("Community name is required"));
                return;
            }
            _ => return,
        };
        spawn_local(async move {
            match api::update_community(&token, community_id, &payload).await {
                Ok(updated) => {
                    detail.try_update(|d| d.community_updated(updated));
                    state.success("Community updated successfully");
                }
                Err(err) => {
                    detail.try_update(CommunityDetailState::update_failed);
                    state.failure("Failed to update community", &err);
                }
            }
        });
    };

    let on_confirm_delete = move |_| {
        let Some(token) = state.require_token() else {
            return;
        };
        if !detail.try_update(CommunityDetailState::begin_delete).unwrap_or(false) {
            return;
        }
        spawn_local(async move {
            match api::delete_community(&token, community_id).await {
                Ok(()) => {
                    state.success("Community deleted successfully");
                    on_back.run(());
                }
                Err(err) => {
                    detail.try_update(CommunityDetailState::delete_failed);
                    state.failure("Failed to delete community", &err);
                }
            }
        });
    };

    let on_post_change = Callback::new(move |(id, change): (i64, PostChange)| {
        detail.try_update(|d| d.post_changed(id, &change));
    });

    let dialog_kind = Memo::new(move |_| detail.with(|d| DialogKind::from(d.dialog())));
    let membership = Memo::new(move |_| detail.with(CommunityDetailState::membership));
    let can_manage = move || state.user.with(|user| detail.with(|d| d.can_manage(user.as_ref())));
    let locked = Memo::new(move |_| !detail.with(CommunityDetailState::controls_enabled));
    let joining = move || locked.get() || detail.with(CommunityDetailState::is_joining);
    let close_dialog = move |_| detail.update(CommunityDetailState::close_dialog);

    let dialog = move || match dialog_kind.get() {
        DialogKind::None => ().into_any(),
        DialogKind::CreatePost | DialogKind::Edit => {
            let editing = dialog_kind.get() == DialogKind::Edit;
            let (heading, primary_hint, secondary_hint, submit) = if editing {
                ("Edit Community", "Name", "Description", "Save")
            } else {
                ("New Post", "Title", "What's on your mind?", "Publish")
            };
            let busy = move || {
                locked.get() || detail.with(|d| if editing { d.is_saving() } else { d.is_posting() })
            };
            view! {
                <div class="dialog-backdrop">
                    <form
                        class="dialog"
                        on:submit=move |ev| if editing { on_submit_edit(ev) } else { on_submit_post(ev) }
                    >
                        <h3>{heading}</h3>
                        <input
                            placeholder=primary_hint
                            prop:value=move || detail.with(|d| dialog_fields(d.dialog()).0)
                            on:input=move |ev| detail.update(|d| d.set_primary(event_target_value(&ev)))
                        />
                        <textarea
                            placeholder=secondary_hint
                            prop:value=move || detail.with(|d| dialog_fields(d.dialog()).1)
                            on:input=move |ev| detail.update(|d| d.set_secondary(event_target_value(&ev)))
                        ></textarea>
                        <div class="form-actions">
                            <button type="submit" disabled=busy>{submit}</button>
                            <button type="button" on:click=close_dialog>"Cancel"</button>
                        </div>
                    </form>
                </div>
            }
            .into_any()
        }
        DialogKind::ConfirmDelete => view! {
            <div class="dialog-backdrop">
                <div class="dialog">
                    <h3>"Delete community?"</h3>
                    <p>"All posts and comments will be removed. This cannot be undone."</p>
                    <div class="form-actions">
                        <button
                            class="danger"
                            on:click=on_confirm_delete
                            disabled=move || locked.get() || detail.with(CommunityDetailState::is_saving)
                        >
                            "Delete"
                        </button>
                        <button on:click=close_dialog>"Cancel"</button>
                    </div>
                </div>
            </div>
        }
        .into_any(),
        DialogKind::ConfirmLeave => view! {
            <div class="dialog-backdrop">
                <div class="dialog">
                    <h3>"Leave community?"</h3>
                    <div class="form-actions">
                        <button class="danger" on:click=on_confirm_leave disabled=joining>
                            "Leave"
                        </button>
                        <button on:click=close_dialog>"Cancel"</button>
                    </div>
                </div>
            </div>
        }
        .into_any(),
    };

    let header = move || {
        let actions = membership.get().actions();
        view! {
            <header class="community-header">
                <div>
                    <h2>{move || field(|c| c.name.clone())}</h2>
                    <p class="muted">{move || field(|c| c.description_text().to_string())}</p>
                    <p class="community-counts">
                        <span>{move || field(|c| counted(c.member_count, "member"))}</span>
                        <span>{move || field(|c| counted(c.post_count, "post"))}</span>
                        <Show when=move || community.with(|c| c.as_ref().is_some_and(|c| c.is_private))>
                            <span class="badge">"Private"</span>
                        </Show>
                    </p>
                </div>
                <div class="community-actions">
                    <Show when=move || membership.get() == Membership::Unknown>
                        <span class="muted">{Membership::Unknown.label()}</span>
                    </Show>
                    {actions.join.then(|| view! {
                        <button on:click=on_join disabled=joining>"Join"</button>
                    })}
                    {actions.leave.then(|| view! {
                        <button
                            on:click=move |_| detail.update(CommunityDetailState::request_leave)
                            disabled=joining
                        >
                            "Leave"
                        </button>
                    })}
                    <Show when=move || membership.get() != Membership::NonMember>
                        <button
                            on:click=move |_| detail.update(CommunityDetailState::open_create_post)
                            disabled=move || locked.get()
                        >
                            "+ Create Post"
                        </button>
                    </Show>
                    <Show when=can_manage>
                        <button
                            on:click=move |_| detail.update(CommunityDetailState::open_edit)
                            disabled=move || locked.get()
                        >
                            "Edit"
                        </button>
                        <button
                            class="danger"
                            on:click=move |_| detail.update(CommunityDetailState::request_delete)
                            disabled=move || locked.get()
                        >
                            "Delete"
                        </button>
                    </Show>
                </div>
            </header>
        }
    };

    let posts_mode = Memo::new(move |_| {
        detail.with(|d| {
            let empty = d.posts().items().is_empty();
            if d.posts_hidden() && empty {
                PostsMode::Hidden
            } else if d.posts().controls_enabled() && empty {
                PostsMode::Empty
            } else {
                PostsMode::List
            }
        })
    });

    let posts = move || match posts_mode.get() {
        PostsMode::Hidden => {
            view! { <p class="empty-state">"Join this community to see its posts"</p> }.into_any()
        }
        PostsMode::Empty => view! { <p class="empty-state">"No posts yet"</p> }.into_any(),
        PostsMode::List => view! {
            <div class="post-list">
                <For
                    each=move || detail.with(|d| d.posts().items().to_vec())
                    key=|post: &Post| post.id
                    children=move |post: Post| {
                        let id = post.id;
                        let current = Signal::derive(move || {
                            detail
                                .with(|d| d.posts().get(id).cloned())
                                .unwrap_or_else(|| post.clone())
                        });
                        view! { <PostCard state=state post=current on_change=on_post_change /> }
                    }
                />
            </div>
        }
        .into_any(),
    };

    view! {
        <section class="community-detail">
            <button class="link" on:click=move |_| on_back.run(())>"← Back to communities"</button>
            {move || match phase.get() {
                Remote::Loading => view! { <p class="muted">"Loading community..."</p> }.into_any(),
                Remote::Unavailable => view! {
                    <div class="empty-state">
                        <p>"Community not available"</p>
                        <button on:click=move |_| on_back.run(())>"Back to communities"</button>
                    </div>
                }
                .into_any(),
                Remote::Ready(()) => view! {
                    {header}
                    {posts}
                    {dialog}
                }
                .into_any(),
            }}
        </section>
    }
}
