use leptos::prelude::*;
use lms_core::charts::{engagement_split, format_percent, shares, subject_bars};
use lms_core::models::CourseOverview;
use lms_core::remote::Remote;
use lms_core::timestamp::display_date;

use crate::api;
use crate::components::stats_card::StatsCard;
use crate::pages::instructor_analytics::bar_chart;
use crate::pages::load_remote;
use crate::state::AppState;

#[component]
pub(crate) fn CourseAnalyticsPage(
    state: AppState,
    course_id: i64,
    on_back: Callback<()>,
) -> impl IntoView {
    let data = RwSignal::new(Remote::<CourseOverview>::Loading);
    load_remote(state, data, "Failed to load course analytics", move |token| async move {
        api::course_overview(&token, course_id).await
    });

    view! {
        <section class="course-analytics">
            <button class="link" on:click=move |_| on_back.run(())>"← Back to dashboard"</button>
            {move || match data.get() {
                Remote::Loading => view! { <p class="muted">"Loading course..."</p> }.into_any(),
                Remote::Unavailable => {
                    view! { <p class="empty-state">"Course analytics are not available"</p> }
                        .into_any()
                }
                Remote::Ready(overview) => overview_view(overview),
            }}
        </section>
    }
}

fn overview_view(overview: CourseOverview) -> AnyView {
    let CourseOverview {
        course,
        statistics,
        subjects,
        engagement,
    } = overview;

    let split = engagement_split(&statistics);
    let split_shares = shares(&split);
    let bars = subject_bars(&subjects);
    let published = if course.is_published { "Published" } else { "Draft" };
    let created = display_date(course.created_at.as_deref());

    view! {
        <div class="page-header">
            <h2>{course.title}</h2>
            <span class="badge">{published}</span>
        </div>
        <p class="muted">{course.description.unwrap_or_default()}</p>

        <div class="stats-grid">
            <StatsCard
                title="Enrollments"
                value=statistics.total_enrollments.to_string()
                hint=format!("+{} this week", statistics.recent_enrollments_7d)
            />
            <StatsCard title="Active Students" value=statistics.active_students.to_string() />
            <StatsCard title="Completion Rate" value=format_percent(statistics.completion_rate) />
            <StatsCard
                title="Average Rating"
                value=format!("{:.1}", statistics.average_rating)
                hint=format!("{} reviews", statistics.total_feedback)
            />
        </div>

        <div class="two-columns">
            <section class="panel">
                <h3>"Classes by Subject"</h3>
                {bar_chart(bars)}
            </section>
            <section class="panel">
                <h3>"Student Engagement"</h3>
                <ul class="plain-list">
                    {split
                        .into_iter()
                        .zip(split_shares)
                        .map(|(point, share)| {
                            view! {
                                <li>
                                    <span>{point.label}</span>
                                    <span class="muted">{format!("{} ({share:.0}%)", point.value)}</span>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
                <p class="muted">
                    {format!("Active rate: {}", format_percent(engagement.active_student_rate))}
                </p>
            </section>
        </div>

        <section class="panel">
            <h3>"Course Info"</h3>
            <dl class="info-list">
                <dt>"Level"</dt>
                <dd>{course.level}</dd>
                <dt>"Category"</dt>
                <dd>{course.category}</dd>
                <dt>"Created"</dt>
                <dd>{created}</dd>
                <dt>"Subjects"</dt>
                <dd>{statistics.total_subjects}</dd>
                <dt>"Classes"</dt>
                <dd>{statistics.total_classes}</dd>
                <dt>"Tests"</dt>
                <dd>{statistics.total_tests}</dd>
            </dl>
        </section>

        <section class="panel">
            <h3>"Subjects"</h3>
            {if subjects.is_empty() {
                view! { <p class="muted">"No subjects yet"</p> }.into_any()
            } else {
                view! {
                    <ul class="plain-list">
                        {subjects
                            .into_iter()
                            .map(|subject| {
                                view! {
                                    <li>
                                        <span>{subject.title}</span>
                                        <span class="muted">
                                            {format!("{} classes", subject.total_classes)}
                                        </span>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                }
                .into_any()
            }}
        </section>
    }
    .into_any()
}
