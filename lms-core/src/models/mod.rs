//! Модели ответов и запросов REST API.

mod chat;
mod community;
mod instructor;
mod user;

pub use chat::{ChatMessage, ChatSession, CreateMessageRequest, DEFAULT_SESSION_TITLE, Sender};
pub use community::{
    Author, Comment, Community, CreateCommentRequest, CreateCommunityRequest, CreatePostRequest,
    LikeResponse, Post, UpdateCommunityRequest,
};
pub use instructor::{
    AiInsights, CourseOverview, CourseStatistics, CourseStats, CourseSummary, Engagement,
    InstructorDashboard, InstructorPerformance, PerformanceCourseStat, RecentEnrollment,
    SubjectSummary, UpcomingClass,
};
pub use user::CurrentUser;
