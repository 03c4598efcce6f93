//! Временное уведомление пользователю.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Уровень уведомления.
pub enum NoticeLevel {
    /// Успешная операция.
    Success,
    /// Ошибка удалённого вызова.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Уведомление.
pub struct Notice {
    /// Уровень.
    pub level: NoticeLevel,
    /// Текст.
    pub text: String,
}

impl Notice {
    /// Уведомление об успехе.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    /// Уведомление об ошибке.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    /// Ошибка с сообщением сервера, если оно есть, иначе общий текст.
    pub fn from_failure(generic: &str, server_message: Option<&str>) -> Self {
        match server_message.map(str::trim) {
            Some(message) if !message.is_empty() => Self::error(message),
            _ => Self::error(generic),
        }
    }

    /// Уведомление об ошибке.
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_prefers_server_message() {
        let notice = Notice::from_failure("Failed to join community", Some("Already a member"));
        assert_eq!(notice.text, "Already a member");
        assert!(notice.is_error());

        let notice = Notice::from_failure("Failed to join community", Some("  "));
        assert_eq!(notice.text, "Failed to join community");
    }
}
