use lms_core::charts::{self, ChartPoint};
use lms_core::models::{
    ChatSession, Comment, Community, CourseOverview, CurrentUser, InstructorDashboard,
    InstructorPerformance, Post,
};
use lms_core::timestamp::{display_date, display_schedule, display_short_date, display_time};
use lms_core::transcript::{Delivery, TranscriptEntry};

pub fn print_user(user: &CurrentUser) {
    println!("id: {}", user.id);
    println!("name: {}", user.full_name.as_deref().unwrap_or("-"));
    println!("email: {}", user.email.as_deref().unwrap_or("-"));
    println!("role: {}", user.role);
}

pub fn print_sessions(sessions: &[ChatSession]) {
    println!("Сессий: {}", sessions.len());
    for session in sessions {
        println!(
            "- [{}] {} ({})",
            session.id,
            session.display_title(),
            display_date(session.last_activity())
        );
    }
}

pub fn print_session(title: &str, session: &ChatSession) {
    println!("{title}");
    println!("id: {}", session.id);
    println!("title: {}", session.display_title());
    println!("updated: {}", display_date(session.last_activity()));
    for message in &session.messages {
        let who = if message.sender.is_assistant() { "AI" } else { "You" };
        println!(
            "[{}] {who}: {}",
            display_time(message.created_at.as_deref()),
            message.content
        );
    }
}

pub fn print_entry(entry: &TranscriptEntry) {
    let who = if entry.message.sender.is_assistant() { "AI" } else { "You" };
    let mark = match entry.delivery {
        Delivery::Pending => " (sending)",
        Delivery::Failed => " (failed)",
        Delivery::Sent => "",
    };
    println!(
        "[{}] {who}{mark}: {}",
        display_time(entry.message.created_at.as_deref()),
        entry.message.content
    );
}

pub fn print_communities(communities: &[Community]) {
    if communities.is_empty() {
        println!("Сообществ не найдено");
        return;
    }
    for community in communities {
        let lock = if community.is_private { " [private]" } else { "" };
        println!(
            "- [{}] {}{lock}: {} members, {} posts",
            community.id, community.name, community.member_count, community.post_count
        );
    }
}

pub fn print_community(title: &str, community: &Community) {
    println!("{title}");
    println!("id: {}", community.id);
    println!("name: {}", community.name);
    println!("description: {}", community.description_text());
    println!("members: {}", community.member_count);
    println!("posts: {}", community.post_count);
    println!("private: {}", community.is_private);
    println!("membership: {}", community.membership().label());
    println!("created: {}", display_date(community.created_at.as_deref()));
}

pub fn print_post(post: &Post) {
    let heart = if post.liked() { "♥" } else { "♡" };
    println!(
        "[{}] {} by {} ({} {})",
        post.id,
        post.title,
        post.author_name(),
        display_date(post.created_at.as_deref()),
        display_time(post.created_at.as_deref())
    );
    println!("  {}", post.content);
    println!(
        "  {heart} {}  comments: {}",
        post.like_count, post.comment_count
    );
}

pub fn print_comments(comments: &[Comment]) {
    if comments.is_empty() {
        println!("No comments yet. Be the first to share your thoughts!");
        return;
    }
    for comment in comments {
        println!(
            "- [{}] {} ({}): {}",
            comment.id,
            comment.author_name(),
            display_short_date(comment.created_at.as_deref()),
            comment.content
        );
    }
}

fn print_bars(points: &[ChartPoint]) {
    for (point, height) in points.iter().zip(charts::bar_heights(points)) {
        let width = (height / 5.0).round() as usize;
        println!("  {:<23} {:>6} {}", point.label, point.value, "#".repeat(width));
    }
}

pub fn print_dashboard(dashboard: &InstructorDashboard) {
    println!("Total courses: {}", dashboard.total_courses);
    println!("Total students: {}", dashboard.total_students);
    println!("Active courses: {}", dashboard.active_courses);
    println!("Total revenue: {}", charts::format_revenue(dashboard.total_revenue));

    println!("Recent enrollments:");
    for enrollment in &dashboard.recent_enrollments {
        println!(
            "  {} -> {} ({})",
            enrollment.user_name,
            enrollment.course_title,
            display_date(enrollment.enrolled_at.as_deref())
        );
    }

    println!("Upcoming classes:");
    for class in &dashboard.upcoming_classes {
        println!(
            "  {} / {} at {} ({} min)",
            class.title,
            class.subject_title,
            display_schedule(class.scheduled_at.as_deref()),
            class.duration_minutes
        );
    }

    println!("Course stats:");
    for stat in &dashboard.course_stats {
        println!(
            "  [{}] {}: {} enrolled, {} active, {} completed",
            stat.course_id,
            stat.course_title,
            stat.total_enrollments,
            stat.active_students,
            charts::format_percent(stat.completion_rate)
        );
    }
}

pub fn print_performance(performance: &InstructorPerformance) {
    if let Some(error) = &performance.error {
        println!("{error}");
        return;
    }
    println!("Courses: {}", performance.total_courses);
    println!("Students: {}", performance.total_students);
    println!("Classes: {}", performance.total_classes);
    println!("Average rating: {:.1}", performance.average_rating);
    println!("Enrollments by course:");
    print_bars(&charts::enrollment_bars(&performance.course_stats));
    match performance.sentiment() {
        Some(text) => println!("Feedback analysis: {text}"),
        None => println!("Feedback analysis: not enough feedback yet"),
    }
}

pub fn print_course_overview(overview: &CourseOverview) {
    let stats = &overview.statistics;
    println!("{} ({} / {})", overview.course.title, overview.course.level, overview.course.category);
    println!("Enrollments: {}", stats.total_enrollments);
    println!("Active students: {}", stats.active_students);
    println!("Subjects: {}", stats.total_subjects);
    println!("Classes: {}", stats.total_classes);
    println!("Tests: {}", stats.total_tests);
    println!("Average rating: {:.1}", stats.average_rating);
    println!("Completion: {}", charts::format_percent(stats.completion_rate));
    println!(
        "Engagement: {}",
        charts::format_percent(overview.engagement.active_student_rate)
    );

    let split = charts::engagement_split(stats);
    for (point, share) in split.iter().zip(charts::shares(&split)) {
        println!("  {}: {} ({})", point.label, point.value, charts::format_percent(share));
    }

    println!("Classes by subject:");
    print_bars(&charts::subject_bars(&overview.subjects));
}
