use leptos::prelude::*;

use crate::components::notice_banner::NoticeBanner;
use crate::components::sign_in::SignInPanel;
use crate::pages::chatbot::ChatbotPage;
use crate::pages::community::CommunityPage;
use crate::pages::community_detail::CommunityDetailPage;
use crate::pages::course_analytics::CourseAnalyticsPage;
use crate::pages::instructor_analytics::InstructorAnalyticsPage;
use crate::pages::instructor_dashboard::InstructorDashboardPage;
use crate::state::AppState;

/// Открытая страница. Маршрутизации нет, только переключение видов.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Page {
    Chat,
    Communities,
    Community(i64),
    InstructorDashboard,
    InstructorAnalytics,
    CourseAnalytics(i64),
}

impl Page {
    /// Страницы, которые без входа не имеют смысла.
    fn requires_sign_in(self) -> bool {
        !matches!(self, Self::Communities | Self::Community(_))
    }

    fn section(self) -> Self {
        match self {
            Self::Community(_) => Self::Communities,
            Self::InstructorAnalytics | Self::CourseAnalytics(_) => Self::InstructorDashboard,
            other => other,
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::restore();
    let page = RwSignal::new(Page::Chat);
    let navigate = move |next: Page| page.set(next);

    let nav_button = move |target: Page, label: &'static str| {
        view! {
            <button
                class=move || if page.get().section() == target { "nav-link active" } else { "nav-link" }
                on:click=move |_| navigate(target)
            >
                {label}
            </button>
        }
    };

    let current = move || {
        let page = page.get();
        if page.requires_sign_in() && !state.is_authenticated() {
            return view! {
                <div class="empty-state">
                    <p>"Sign in with your access token to continue"</p>
                </div>
            }
            .into_any();
        }
        match page {
            Page::Chat => view! { <ChatbotPage state=state /> }.into_any(),
            Page::Communities => view! {
                <CommunityPage
                    state=state
                    on_open=Callback::new(move |id| navigate(Page::Community(id)))
                />
            }
            .into_any(),
            Page::Community(id) => view! {
                <CommunityDetailPage
                    state=state
                    community_id=id
                    on_back=Callback::new(move |()| navigate(Page::Communities))
                />
            }
            .into_any(),
            Page::InstructorDashboard => view! {
                <InstructorDashboardPage
                    state=state
                    on_open_course=Callback::new(move |id| navigate(Page::CourseAnalytics(id)))
                    on_open_analytics=Callback::new(move |()| navigate(Page::InstructorAnalytics))
                />
            }
            .into_any(),
            Page::InstructorAnalytics => view! {
                <InstructorAnalyticsPage
                    state=state
                    on_back=Callback::new(move |()| navigate(Page::InstructorDashboard))
                />
            }
            .into_any(),
            Page::CourseAnalytics(id) => view! {
                <CourseAnalyticsPage
                    state=state
                    course_id=id
                    on_back=Callback::new(move |()| navigate(Page::InstructorDashboard))
                />
            }
            .into_any(),
        }
    };

    view! {
        <main class="page">
            <header class="navbar">
                <h1>"LMS"</h1>
                <nav>
                    {nav_button(Page::Chat, "AI Tutor")}
                    {nav_button(Page::Communities, "Communities")}
                    {nav_button(Page::InstructorDashboard, "Instructor")}
                </nav>
                <SignInPanel state=state />
            </header>

            <NoticeBanner state=state />

            <section class="container">{current}</section>
        </main>
    }
}
