use leptos::prelude::*;
use lms_core::charts::{ChartPoint, bar_heights, enrollment_bars, truncate_label, LABEL_LIMIT};
use lms_core::models::InstructorPerformance;
use lms_core::remote::Remote;

use crate::api;
use crate::components::stats_card::StatsCard;
use crate::pages::load_remote;
use crate::state::AppState;

#[component]
pub(crate) fn InstructorAnalyticsPage(
    state: AppState,
    on_back: Callback<()>,
) -> impl IntoView {
    let data = RwSignal::new(Remote::<InstructorPerformance>::Loading);
    load_remote(state, data, "Failed to load analytics", |token| async move {
        api::instructor_performance(&token).await
    });

    view! {
        <section class="instructor-analytics">
            <div class="page-header">
                <button class="link" on:click=move |_| on_back.run(())>"← Back to dashboard"</button>
                <h2>"Performance Analytics"</h2>
            </div>
            {move || match data.get() {
                Remote::Loading => view! { <p class="muted">"Loading analytics..."</p> }.into_any(),
                Remote::Unavailable => {
                    view! { <p class="empty-state">"Analytics are not available"</p> }.into_any()
                }
                Remote::Ready(performance) => performance_view(performance),
            }}
        </section>
    }
}

fn performance_view(performance: InstructorPerformance) -> AnyView {
    if let Some(message) = performance.error.clone() {
        return view! { <p class="empty-state">{message}</p> }.into_any();
    }

    let sentiment = performance.sentiment().map(str::to_string);
    let analyzed = performance
        .ai_insights
        .as_ref()
        .map(|insights| insights.total_feedback_analyzed)
        .unwrap_or_default();
    let bars = enrollment_bars(&performance.course_stats);

    view! {
        <div class="stats-grid">
            <StatsCard title="Total Courses" value=performance.total_courses.to_string() />
            <StatsCard title="Total Students" value=performance.total_students.to_string() />
            <StatsCard title="Total Classes" value=performance.total_classes.to_string() />
            <StatsCard title="Average Rating" value=format!("{:.1}", performance.average_rating) />
        </div>

        <section class="panel">
            <h3>"Enrollments by Course"</h3>
            {bar_chart(bars)}
        </section>

        <section class="panel">
            <h3>"AI Feedback Insights"</h3>
            {match sentiment {
                Some(text) => view! {
                    <p class="insight">{text}</p>
                    <p class="muted">{format!("Based on {analyzed} feedback entries")}</p>
                }
                .into_any(),
                None => view! { <p class="muted">"No feedback analyzed yet"</p> }.into_any(),
            }}
        </section>
    }
    .into_any()
}

/// Столбчатая диаграмма на CSS: высота столбца в процентах от максимума.
pub(crate) fn bar_chart(points: Vec<ChartPoint>) -> AnyView {
    if points.is_empty() {
        return view! { <p class="muted">"No data yet"</p> }.into_any();
    }
    let heights = bar_heights(&points);
    view! {
        <div class="bar-chart">
            {points
                .into_iter()
                .zip(heights)
                .map(|(point, height)| {
                    let label = truncate_label(&point.label, LABEL_LIMIT);
                    view! {
                        <div class="bar" title=point.label.clone()>
                            <div class="bar-fill" style=format!("height: {height:.0}%")></div>
                            <span class="bar-value">{point.value}</span>
                            <span class="bar-label">{label}</span>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
    .into_any()
}
