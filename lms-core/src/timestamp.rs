//! Разбор серверных времён и форматы отображения.
//!
//! Сервер отдаёт как RFC 3339, так и «наивные» ISO-8601 строки без зоны;
//! последние считаются UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Разбирает RFC 3339, наивный ISO-8601 или голую дату.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

fn format_with(raw: Option<&str>, pattern: &str) -> Option<String> {
    raw.and_then(parse_timestamp)
        .map(|ts| ts.format(pattern).to_string())
}

/// Дата вида `Jan 5, 2026`; пустая строка, если времени нет.
pub fn display_date(raw: Option<&str>) -> String {
    format_with(raw, "%b %-d, %Y").unwrap_or_default()
}

/// Время вида `14:05`.
pub fn display_time(raw: Option<&str>) -> String {
    format_with(raw, "%H:%M").unwrap_or_default()
}

/// Короткая дата вида `Jan 5`.
pub fn display_short_date(raw: Option<&str>) -> String {
    format_with(raw, "%b %-d").unwrap_or_default()
}

/// Время занятия вида `Jan 5, 2:30 PM`, `N/A` для пустого или битого значения.
pub fn display_schedule(raw: Option<&str>) -> String {
    format_with(raw, "%b %-d, %-I:%M %p").unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_and_naive_forms() {
        let a = parse_timestamp("2026-01-05T14:05:00Z").expect("rfc3339");
        let b = parse_timestamp("2026-01-05T14:05:00").expect("naive");
        let c = parse_timestamp("2026-01-05T14:05:00.123456").expect("naive with fraction");
        assert_eq!(a, b);
        assert_eq!(a.timestamp(), c.timestamp());
        assert!(parse_timestamp("2026-01-05").is_some());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("  ").is_none());
    }

    #[test]
    fn display_formats() {
        let raw = Some("2026-01-05T14:05:00");
        assert_eq!(display_date(raw), "Jan 5, 2026");
        assert_eq!(display_time(raw), "14:05");
        assert_eq!(display_short_date(raw), "Jan 5");
        assert_eq!(display_schedule(raw), "Jan 5, 2:05 PM");
    }

    #[test]
    fn missing_or_invalid_values() {
        assert_eq!(display_date(None), "");
        assert_eq!(display_schedule(None), "N/A");
        assert_eq!(display_schedule(Some("not a date")), "N/A");
    }
}
