use leptos::prelude::*;
use lms_core::charts::{format_percent, format_revenue};
use lms_core::models::{CourseStats, InstructorDashboard, RecentEnrollment, UpcomingClass};
use lms_core::remote::Remote;
use lms_core::timestamp::{display_date, display_schedule};

use crate::api;
use crate::components::stats_card::StatsCard;
use crate::pages::load_remote;
use crate::state::AppState;

#[component]
pub(crate) fn InstructorDashboardPage(
    state: AppState,
    on_open_course: Callback<i64>,
    on_open_analytics: Callback<()>,
) -> impl IntoView {
    let data = RwSignal::new(Remote::<InstructorDashboard>::Loading);
    load_remote(state, data, "Failed to load dashboard", |token| async move {
        api::instructor_dashboard(&token).await
    });

    move || match data.get() {
        Remote::Loading => view! { <p class="muted">"Loading dashboard..."</p> }.into_any(),
        Remote::Unavailable => {
            view! { <p class="empty-state">"Dashboard is not available"</p> }.into_any()
        }
        Remote::Ready(dashboard) => view! {
            <section class="instructor-dashboard">
                <div class="page-header">
                    <h2>"Instructor Dashboard"</h2>
                    <button on:click=move |_| on_open_analytics.run(())>"View Analytics"</button>
                </div>

                <div class="stats-grid">
                    <StatsCard title="Total Courses" value=dashboard.total_courses.to_string() />
                    <StatsCard title="Total Students" value=dashboard.total_students.to_string() />
                    <StatsCard title="Total Revenue" value=format_revenue(dashboard.total_revenue) />
                    <StatsCard title="Active Courses" value=dashboard.active_courses.to_string() />
                </div>

                <div class="two-columns">
                    <section class="panel">
                        <h3>"Recent Enrollments"</h3>
                        {enrollments(dashboard.recent_enrollments)}
                    </section>
                    <section class="panel">
                        <h3>"Upcoming Classes"</h3>
                        {classes(dashboard.upcoming_classes)}
                    </section>
                </div>

                <section class="panel">
                    <h3>"Course Performance"</h3>
                    {course_table(dashboard.course_stats, on_open_course)}
                </section>
            </section>
        }
        .into_any(),
    }
}

fn enrollments(items: Vec<RecentEnrollment>) -> AnyView {
    if items.is_empty() {
        return view! { <p class="muted">"No recent enrollments"</p> }.into_any();
    }
    view! {
        <ul class="plain-list">
            {items
                .into_iter()
                .map(|item| {
                    let date = display_date(item.enrolled_at.as_deref());
                    view! {
                        <li>
                            <strong>{item.user_name}</strong>
                            " enrolled in "
                            {item.course_title}
                            <span class="muted">{date}</span>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}

fn classes(items: Vec<UpcomingClass>) -> AnyView {
    if items.is_empty() {
        return view! { <p class="muted">"No upcoming classes"</p> }.into_any();
    }
    view! {
        <ul class="plain-list">
            {items
                .into_iter()
                .map(|class| {
                    let when = display_schedule(class.scheduled_at.as_deref());
                    view! {
                        <li>
                            <strong>{class.title}</strong>
                            <span class="muted">{class.subject_title}</span>
                            <span>{when}</span>
                            <span class="badge">{class.kind}</span>
                            <span class="muted">{format!("{} min", class.duration_minutes)}</span>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}

fn course_table(stats: Vec<CourseStats>, on_open_course: Callback<i64>) -> AnyView {
    if stats.is_empty() {
        return view! { <p class="muted">"No courses yet"</p> }.into_any();
    }
    view! {
        <table class="data-table">
            <thead>
                <tr>
                    <th>"Course"</th>
                    <th>"Enrollments"</th>
                    <th>"Active"</th>
                    <th>"Completion"</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                {stats
                    .into_iter()
                    .map(|course| {
                        let id = course.course_id;
                        view! {
                            <tr>
                                <td>{course.course_title}</td>
                                <td>{course.total_enrollments}</td>
                                <td>{course.active_students}</td>
                                <td>{format_percent(course.completion_rate)}</td>
                                <td>
                                    <button on:click=move |_| on_open_course.run(id)>
                                        "Analytics"
                                    </button>
                                </td>
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
    .into_any()
}
