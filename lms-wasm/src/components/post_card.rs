use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use lms_core::models::{Comment, Post};
use lms_core::post_card::{PostCardState, PostChange};
use lms_core::timestamp::display_date;

use crate::api;
use crate::state::{AppState, log, log_error};
use crate::text::counted;

/// Карточка поста с лайком и комментариями.
///
/// Ответы сервера уходят родителю через `on_change` вместе с id поста;
/// своих копий поста карточка не держит.
#[component]
pub(crate) fn PostCard(
    state: AppState,
    #[prop(into)] post: Signal<Post>,
    on_change: Callback<(i64, PostChange)>,
) -> impl IntoView {
    let card = RwSignal::new(PostCardState::default());

    let on_like = move |_| {
        let Some(token) = state.require_token() else {
            return;
        };
        if !card.try_update(|c| c.begin_like()).unwrap_or(false) {
            return;
        }
        let post_id = post.with_untracked(|p| p.id);
        spawn_local(async move {
            match api::like_post(&token, post_id).await {
                Ok(response) => on_change.run((post_id, PostChange::Liked(response))),
                Err(err) => state.failure("Failed to update like", &err),
            }
            card.try_update(|c| c.like_settled());
        });
    };

    let on_toggle_comments = move |_| {
        if !card.try_update(|c| c.toggle_comments()).unwrap_or(false) {
            return;
        }
        let token = state.token.get_untracked();
        let post_id = post.with_untracked(|p| p.id);
        spawn_local(async move {
            match api::list_comments(token.as_deref(), post_id).await {
                Ok(comments) => {
                    card.try_update(|c| c.comments_loaded(comments));
                }
                Err(err) => {
                    log_error("Failed to load comments", &err);
                    card.try_update(|c| c.comments_failed());
                }
            }
        });
    };

    let on_comment = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(token) = state.require_token() else {
            return;
        };
        let Some(Ok(content)) = card.try_update(|c| c.begin_comment()) else {
            return;
        };
        let post_id = post.with_untracked(|p| p.id);
        spawn_local(async move {
            match api::create_comment(&token, post_id, &content).await {
                Ok(comment) => {
                    if let Some(Err(err)) = card.try_update(|c| c.comment_added(comment)) {
                        log(&format!("comment is not inserted: {err}"));
                    }
                    on_change.run((post_id, PostChange::Commented));
                }
                Err(err) => {
                    card.try_update(|c| c.comment_failed());
                    state.failure("Failed to add comment", &err);
                }
            }
        });
    };

    let like_class = move || {
        if post.with(Post::liked) {
            "like-button liked"
        } else {
            "like-button"
        }
    };

    view! {
        <article class="post-card">
            <header class="post-header">
                <div class="avatar">{move || post.with(Post::author_initial)}</div>
                <div>
                    <p class="post-author">{move || post.with(|p| p.author_name().to_string())}</p>
                    <p class="post-date">
                        {move || post.with(|p| display_date(p.created_at.as_deref()))}
                    </p>
                </div>
                <Show when=move || post.with(|p| p.is_pinned)>
                    <span class="badge">"Pinned"</span>
                </Show>
            </header>

            <h3 class="post-title">{move || post.with(|p| p.title.clone())}</h3>
            <p class="post-content">{move || post.with(|p| p.content.clone())}</p>
            {move || {
                post.with(|p| p.media_url.clone())
                    .map(|url| view! { <img class="post-media" src=url alt="attachment" /> })
            }}

            <footer class="post-actions">
                <button
                    class=like_class
                    on:click=on_like
                    disabled=move || card.with(PostCardState::is_liking)
                >
                    {move || post.with(|p| counted(p.like_count, "like"))}
                </button>
                <button on:click=on_toggle_comments>
                    {move || post.with(|p| counted(p.comment_count, "comment"))}
                </button>
                <span class="muted">{move || post.with(|p| counted(p.view_count, "view"))}</span>
            </footer>

            <Show when=move || card.with(PostCardState::comments_open)>
                <section class="comments">
                    <form class="comment-form" on:submit=on_comment>
                        <input
                            placeholder="Write a comment..."
                            prop:value=move || card.with(|c| c.draft().to_string())
                            on:input=move |ev| card.update(|c| c.set_draft(event_target_value(&ev)))
                        />
                        <button
                            type="submit"
                            disabled=move || {
                                card.with(|c| c.is_commenting() || c.draft().trim().is_empty())
                            }
                        >
                            "Post"
                        </button>
                    </form>

                    <Show
                        when=move || !card.with(PostCardState::is_loading_comments)
                        fallback=|| view! { <p class="muted">"Loading comments..."</p> }
                    >
                        <Show
                            when=move || card.with(|c| !c.comments().is_empty())
                            fallback=|| view! { <p class="muted">"No comments yet"</p> }
                        >
                            <ul class="comment-list">
                                <For
                                    each=move || card.with(|c| c.comments().to_vec())
                                    key=|comment: &Comment| comment.id
                                    children=|comment: Comment| {
                                        let date = display_date(comment.created_at.as_deref());
                                        view! {
                                            <li class="comment">
                                                <span class="comment-author">
                                                    {comment.author_name().to_string()}
                                                </span>
                                                <span class="comment-date">{date}</span>
                                                <p>{comment.content}</p>
                                            </li>
                                        }
                                    }
                                />
                            </ul>
                        </Show>
                    </Show>
                </section>
            </Show>
        </article>
    }
}
