//! Агрегаты аналитики преподавателя. Только чтение.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Сводка `GET /dashboard/instructor/overview`.
pub struct InstructorDashboard {
    /// Всего курсов.
    pub total_courses: u32,
    /// Всего студентов.
    pub total_students: u32,
    /// Выручка.
    pub total_revenue: f64,
    /// Активные курсы.
    pub active_courses: u32,
    /// Последние записи на курсы.
    pub recent_enrollments: Vec<RecentEnrollment>,
    /// Ближайшие занятия.
    pub upcoming_classes: Vec<UpcomingClass>,
    /// Статистика по курсам.
    pub course_stats: Vec<CourseStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Запись студента на курс.
pub struct RecentEnrollment {
    /// Идентификатор записи.
    pub id: i64,
    /// Имя студента.
    pub user_name: String,
    /// Курс.
    pub course_title: String,
    /// Время записи.
    pub enrolled_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Запланированное занятие.
pub struct UpcomingClass {
    /// Идентификатор занятия.
    pub id: i64,
    /// Название.
    pub title: String,
    /// Предмет.
    pub subject_title: String,
    /// Время начала.
    pub scheduled_at: Option<String>,
    /// Длительность в минутах.
    pub duration_minutes: u32,
    /// Тип занятия (`live`, `recorded`, ...).
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Показатели одного курса на дашборде.
pub struct CourseStats {
    /// Курс.
    pub course_id: i64,
    /// Название курса.
    pub course_title: String,
    /// Всего записей.
    pub total_enrollments: u32,
    /// Активные студенты.
    pub active_students: u32,
    /// Доля завершения, проценты.
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Ответ `GET /dashboard/instructor/performance`.
pub struct InstructorPerformance {
    /// Преподаватель.
    pub instructor_id: Option<i64>,
    /// Всего курсов.
    pub total_courses: u32,
    /// Всего студентов.
    pub total_students: u32,
    /// Проведено занятий.
    pub total_classes: u32,
    /// Средняя оценка.
    pub average_rating: f64,
    /// Записи по курсам.
    pub course_stats: Vec<PerformanceCourseStat>,
    /// Анализ отзывов.
    pub ai_insights: Option<AiInsights>,
    /// Сервер возвращает `error` вместо данных, когда у преподавателя нет курсов.
    pub error: Option<String>,
}

impl InstructorPerformance {
    /// Текст анализа отзывов, если он есть и не пустой.
    pub fn sentiment(&self) -> Option<&str> {
        self.ai_insights
            .as_ref()
            .and_then(|insights| insights.sentiment_analysis.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Количество записей на курс.
pub struct PerformanceCourseStat {
    /// Курс.
    pub course_id: i64,
    /// Название курса.
    pub title: String,
    /// Записи.
    pub enrollments: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Результат анализа отзывов.
pub struct AiInsights {
    /// Текст анализа.
    pub sentiment_analysis: Option<String>,
    /// Сколько отзывов проанализировано.
    pub total_feedback_analyzed: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Ответ `GET /dashboard/instructor/course/{id}/overview`.
pub struct CourseOverview {
    /// Курс.
    pub course: CourseSummary,
    /// Статистика.
    pub statistics: CourseStatistics,
    /// Предметы курса.
    pub subjects: Vec<SubjectSummary>,
    /// Вовлечённость.
    pub engagement: Engagement,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Краткие данные курса.
pub struct CourseSummary {
    /// Идентификатор курса.
    pub id: i64,
    /// Название.
    pub title: String,
    /// Описание.
    pub description: Option<String>,
    /// Уровень.
    pub level: String,
    /// Категория.
    pub category: String,
    /// Опубликован.
    pub is_published: bool,
    /// Время создания.
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Статистика курса.
pub struct CourseStatistics {
    /// Всего записей.
    pub total_enrollments: u32,
    /// Активные студенты.
    pub active_students: u32,
    /// Предметы.
    pub total_subjects: u32,
    /// Занятия.
    pub total_classes: u32,
    /// Тесты.
    pub total_tests: u32,
    /// Средняя оценка.
    pub average_rating: f64,
    /// Отзывы.
    pub total_feedback: u32,
    /// Записи за последние 7 дней.
    pub recent_enrollments_7d: u32,
    /// Доля завершения, проценты.
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Предмет курса.
pub struct SubjectSummary {
    /// Предмет.
    pub subject_id: i64,
    /// Название.
    pub title: String,
    /// Занятия по предмету.
    pub total_classes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Вовлечённость студентов.
pub struct Engagement {
    /// Доля активных студентов, проценты.
    pub active_student_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn performance_without_courses_decodes_to_error() {
        let raw = r#"{"error":"No courses found for this instructor"}"#;
        let perf: InstructorPerformance = serde_json::from_str(raw).expect("should parse");
        assert!(perf.error.is_some());
        assert!(perf.course_stats.is_empty());
        assert!(perf.sentiment().is_none());
    }

    #[test]
    fn dashboard_accepts_integer_revenue_and_class_type() {
        let raw = r#"{
            "total_courses": 2,
            "total_students": 40,
            "total_revenue": 1200,
            "active_courses": 1,
            "upcoming_classes": [
                {"id": 1, "title": "Intro", "subject_title": "Math", "scheduled_at": null, "duration_minutes": 60, "type": "live"}
            ]
        }"#;
        let dashboard: InstructorDashboard = serde_json::from_str(raw).expect("should parse");
        assert_eq!(dashboard.total_revenue, 1200.0);
        assert_eq!(dashboard.upcoming_classes[0].kind, "live");
        assert!(dashboard.recent_enrollments.is_empty());
    }

    #[test]
    fn blank_sentiment_is_treated_as_missing() {
        let perf = InstructorPerformance {
            ai_insights: Some(AiInsights {
                sentiment_analysis: Some("  ".to_string()),
                total_feedback_analyzed: 3,
            }),
            ..Default::default()
        };
        assert!(perf.sentiment().is_none());
    }
}
