//! Тексты интерфейса, которые не зависят от браузера.

use serde_json::Value;

/// Текст ошибки по HTTP-статусу, когда сервер не прислал своего.
pub(crate) fn status_fallback(status: u16) -> String {
    match status {
        400 => "Bad request".to_string(),
        401 => "Authorization required".to_string(),
        403 => "Not enough permissions".to_string(),
        404 => "Not found".to_string(),
        500..=599 => "Server error".to_string(),
        _ => format!("HTTP error {status}"),
    }
}

/// Сообщение из тела ошибки: `{"detail": "..."}`, список ошибок валидации
/// с полем `msg` или `{"error": "..."}`.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail") {
        Some(Value::String(text)) if !text.trim().is_empty() => return Some(text.clone()),
        Some(Value::Array(items)) => {
            if let Some(msg) = items
                .iter()
                .find_map(|item| item.get("msg").and_then(Value::as_str))
            {
                return Some(msg.to_string());
            }
        }
        _ => {}
    }
    value
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// «1 member», «3 members».
pub(crate) fn counted(count: u32, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_is_used() {
        assert_eq!(
            error_detail(r#"{"detail":"Not a member"}"#).as_deref(),
            Some("Not a member")
        );
    }

    #[test]
    fn validation_list_uses_first_msg() {
        let body = r#"{"detail":[{"loc":["query","title"],"msg":"field required"}]}"#;
        assert_eq!(error_detail(body).as_deref(), Some("field required"));
    }

    #[test]
    fn error_field_is_a_fallback() {
        assert_eq!(
            error_detail(r#"{"error":"No courses found"}"#).as_deref(),
            Some("No courses found")
        );
    }

    #[test]
    fn non_json_body_has_no_detail() {
        assert!(error_detail("<html>502</html>").is_none());
        assert!(error_detail(r#"{"detail":"  "}"#).is_none());
    }

    #[test]
    fn fallback_covers_common_statuses() {
        assert_eq!(status_fallback(403), "Not enough permissions");
        assert_eq!(status_fallback(503), "Server error");
        assert_eq!(status_fallback(418), "HTTP error 418");
    }

    #[test]
    fn counted_pluralizes() {
        assert_eq!(counted(1, "member"), "1 member");
        assert_eq!(counted(0, "post"), "0 posts");
        assert_eq!(counted(12, "post"), "12 posts");
    }
}
