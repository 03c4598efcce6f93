//! Подготовка данных для графиков аналитики преподавателя.

use crate::models::{CourseStatistics, PerformanceCourseStat, SubjectSummary};

/// Максимальная длина подписи столбца.
pub const LABEL_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq)]
/// Точка графика.
pub struct ChartPoint {
    /// Подпись.
    pub label: String,
    /// Значение.
    pub value: f64,
}

impl ChartPoint {
    fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Обрезает подпись до `max` символов с многоточием.
pub fn truncate_label(title: &str, max: usize) -> String {
    if title.chars().count() <= max {
        return title.to_string();
    }
    let mut label: String = title.chars().take(max).collect();
    label.push_str("...");
    label
}

/// Занятия по предметам курса.
pub fn subject_bars(subjects: &[SubjectSummary]) -> Vec<ChartPoint> {
    subjects
        .iter()
        .map(|subject| {
            ChartPoint::new(
                truncate_label(&subject.title, LABEL_LIMIT),
                f64::from(subject.total_classes),
            )
        })
        .collect()
}

/// Активные и неактивные студенты. Неактивные не уходят ниже нуля.
pub fn engagement_split(statistics: &CourseStatistics) -> [ChartPoint; 2] {
    let inactive = statistics
        .total_enrollments
        .saturating_sub(statistics.active_students);
    [
        ChartPoint::new("Active", f64::from(statistics.active_students)),
        ChartPoint::new("Inactive", f64::from(inactive)),
    ]
}

/// Записи по курсам.
pub fn enrollment_bars(stats: &[PerformanceCourseStat]) -> Vec<ChartPoint> {
    stats
        .iter()
        .map(|course| ChartPoint::new(course.title.clone(), f64::from(course.enrollments)))
        .collect()
}

/// Высоты столбцов в процентах от максимального значения.
pub fn bar_heights(points: &[ChartPoint]) -> Vec<f64> {
    let max = points
        .iter()
        .map(|point| point.value)
        .fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return vec![0.0; points.len()];
    }
    points
        .iter()
        .map(|point| (point.value / max * 100.0).max(0.0))
        .collect()
}

/// Доли в процентах от суммы (для кольцевой диаграммы).
pub fn shares(points: &[ChartPoint]) -> Vec<f64> {
    let total: f64 = points.iter().map(|point| point.value.max(0.0)).sum();
    if total <= 0.0 {
        return vec![0.0; points.len()];
    }
    points
        .iter()
        .map(|point| point.value.max(0.0) / total * 100.0)
        .collect()
}

/// Сумма в долларах с разделителями тысяч: `$12,345` или `$1,234.50`.
pub fn format_revenue(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{frac:02}")
    }
}

/// Процент с одним знаком после запятой.
pub fn format_percent(rate: f64) -> String {
    format!("{rate:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_longer_than_limit_are_truncated() {
        assert_eq!(truncate_label("Short", LABEL_LIMIT), "Short");
        assert_eq!(
            truncate_label("Introduction to Linear Algebra", LABEL_LIMIT),
            "Introduction to Line..."
        );
    }

    #[test]
    fn subject_bars_keep_order() {
        let subjects = vec![
            SubjectSummary {
                subject_id: 1,
                title: "Algebra".to_string(),
                total_classes: 4,
            },
            SubjectSummary {
                subject_id: 2,
                title: "Geometry".to_string(),
                total_classes: 2,
            },
        ];
        let bars = subject_bars(&subjects);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].label, "Algebra");
        assert_eq!(bars[1].value, 2.0);
        assert_eq!(bar_heights(&bars), vec![100.0, 50.0]);
    }

    #[test]
    fn engagement_inactive_never_negative() {
        let statistics = CourseStatistics {
            total_enrollments: 3,
            active_students: 5,
            ..Default::default()
        };
        let [active, inactive] = engagement_split(&statistics);
        assert_eq!(active.value, 5.0);
        assert_eq!(inactive.value, 0.0);
    }

    #[test]
    fn shares_and_heights_handle_zero_totals() {
        let points = vec![ChartPoint::new("a", 0.0), ChartPoint::new("b", 0.0)];
        assert_eq!(shares(&points), vec![0.0, 0.0]);
        assert_eq!(bar_heights(&points), vec![0.0, 0.0]);
        let points = vec![ChartPoint::new("a", 1.0), ChartPoint::new("b", 3.0)];
        assert_eq!(shares(&points), vec![25.0, 75.0]);
    }

    #[test]
    fn revenue_and_percent_formatting() {
        assert_eq!(format_revenue(0.0), "$0");
        assert_eq!(format_revenue(1234567.0), "$1,234,567");
        assert_eq!(format_revenue(1234.5), "$1,234.50");
        assert_eq!(format_revenue(999.0), "$999");
        assert_eq!(format_revenue(f64::NAN), "$0");
        assert_eq!(format_percent(66.666), "66.7%");
    }
}
