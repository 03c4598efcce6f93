//! Данные страницы «только для чтения»: загрузка, готово, недоступно.

#[derive(Debug, Clone, Default, PartialEq)]
/// Состояние удалённого ресурса.
pub enum Remote<T> {
    /// Запрос в полёте.
    #[default]
    Loading,
    /// Данные получены.
    Ready(T),
    /// Запрос не удался или данных нет; это отдельная ветка отображения.
    Unavailable,
}

impl<T> Remote<T> {
    /// Из результата запроса; ошибка превращается в `Unavailable`.
    pub fn from_result<E>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(_) => Self::Unavailable,
        }
    }

    /// Идёт загрузка.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Данные, если есть.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}
