use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `lms-client`.
pub enum LmsClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Требуется авторизация (отсутствует/некорректен токен или нет прав).
    #[error("unauthorized")]
    Unauthorized,

    /// Запрошенный ресурс не найден.
    #[error("not found")]
    NotFound,

    /// Некорректный запрос или бизнес-ошибка (например, «Already a member»).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Результат операций `lms-client`.
pub type LmsClientResult<T> = Result<T, LmsClientError>;

impl LmsClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Self::Unauthorized
            }
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::InvalidRequest(message)
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }

    /// Сообщение сервера, если оно пришло в теле ошибки.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::InvalidRequest(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn forbidden_maps_to_unauthorized() {
        let err = LmsClientError::from_http_status(StatusCode::FORBIDDEN, Some("nope".into()));
        assert!(matches!(err, LmsClientError::Unauthorized));
    }

    #[test]
    fn bad_request_keeps_server_message() {
        let err = LmsClientError::from_http_status(
            StatusCode::BAD_REQUEST,
            Some("Already a member".into()),
        );
        assert_eq!(err.server_message(), Some("Already a member"));
    }

    #[test]
    fn missing_message_falls_back_to_status() {
        let err = LmsClientError::from_http_status(StatusCode::INTERNAL_SERVER_ERROR, None);
        assert_eq!(
            err.server_message(),
            Some("http status 500 Internal Server Error")
        );
    }
}
