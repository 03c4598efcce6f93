use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Ошибки переходов локального состояния.
pub enum StateError {
    /// В коллекции уже есть сущность с таким идентификатором.
    #[error("duplicate id {0} in collection")]
    DuplicateId(i64),

    /// Сущность с идентификатором не найдена в локальной коллекции.
    #[error("entity {0} not found")]
    NotFound(i64),

    /// Обязательное поле пустое после обрезки пробелов.
    #[error("{0} must not be blank")]
    Blank(&'static str),

    /// Ответ сервера относится к другой сессии чата.
    #[error("reply for session {got} does not belong to session {expected}")]
    SessionMismatch {
        /// Сессия, открытая сейчас.
        expected: i64,
        /// Сессия, к которой относится ответ.
        got: i64,
    },

    /// Такой же запрос ещё не завершён.
    #[error("request already in flight")]
    Busy,

    /// Операция требует выбранной сущности.
    #[error("nothing is selected")]
    NoSelection,
}

/// Результат переходов локального состояния.
pub type StateResult<T> = Result<T, StateError>;
