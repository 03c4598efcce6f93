//! Лента сообщений открытой сессии чата с временными сообщениями.
//!
//! Временное сообщение пользователя получает отрицательный id и остаётся с ним:
//! сервер в ответ на отправку возвращает только ответ ассистента, поэтому
//! переименовывать временный id не во что. Лента целиком заменяется при
//! следующей загрузке сессии.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, warn};

use crate::collection::{InsertAt, insert_new};
use crate::error::{StateError, StateResult};
use crate::models::{ChatMessage, ChatSession, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Статус доставки сообщения.
pub enum Delivery {
    /// Отправлено, ответа ещё нет.
    Pending,
    /// Подтверждено сервером.
    Sent,
    /// Отправка не удалась; сообщение остаётся в ленте.
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
/// Сообщение в ленте со статусом доставки.
pub struct TranscriptEntry {
    /// Сообщение.
    pub message: ChatMessage,
    /// Статус доставки.
    pub delivery: Delivery,
}

impl TranscriptEntry {
    /// Сообщение создано клиентом и не имеет серверного id.
    pub fn is_provisional(&self) -> bool {
        self.message.id < 0
    }
}

impl crate::collection::Identified for TranscriptEntry {
    fn id(&self) -> i64 {
        self.message.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Генератор временных id на основе часов.
///
/// Значения строго монотонны и отрицательны, поэтому не пересекаются с
/// серверными id (положительные последовательности).
pub struct ProvisionalIds {
    last: i64,
}

impl ProvisionalIds {
    /// Следующий временный id для момента `now_millis`.
    pub fn next(&mut self, now_millis: i64) -> i64 {
        let candidate = now_millis.max(1);
        let next = if candidate > self.last {
            candidate
        } else {
            self.last.saturating_add(1)
        };
        self.last = next;
        -next
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Лента сообщений одной сессии.
pub struct Transcript {
    session_id: i64,
    entries: Vec<TranscriptEntry>,
    ids: ProvisionalIds,
}

impl Transcript {
    /// Пустая лента сессии.
    pub fn new(session_id: i64) -> Self {
        Self {
            session_id,
            entries: Vec::new(),
            ids: ProvisionalIds::default(),
        }
    }

    /// Лента из загруженной сессии; все сообщения считаются доставленными.
    pub fn from_messages(session_id: i64, messages: Vec<ChatMessage>) -> Self {
        let entries = messages
            .into_iter()
            .map(|message| TranscriptEntry {
                message,
                delivery: Delivery::Sent,
            })
            .collect();
        Self {
            session_id,
            entries,
            ids: ProvisionalIds::default(),
        }
    }

    /// Лента из сессии с сообщениями.
    pub fn from_session(session: &ChatSession) -> Self {
        Self::from_messages(session.id, session.messages.clone())
    }

    /// Сессия ленты.
    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    /// Сообщения в порядке поступления.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Количество сообщений.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Лента пуста.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Есть ли сообщение, ожидающее ответа.
    pub fn has_pending(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.delivery == Delivery::Pending)
    }

    /// Добавляет временное сообщение пользователя в конец ленты и возвращает его id.
    pub fn push_provisional(&mut self, content: &str, now: DateTime<Utc>) -> i64 {
        let id = self.ids.next(now.timestamp_millis());
        let message = ChatMessage {
            id,
            session_id: self.session_id,
            content: content.to_string(),
            sender: Sender::User,
            created_at: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        };
        self.entries.push(TranscriptEntry {
            message,
            delivery: Delivery::Pending,
        });
        debug!(session_id = self.session_id, id, "provisional message appended");
        id
    }

    /// Ответ сервера пришёл: временное сообщение доставлено, ответ добавляется в конец.
    pub fn confirm(&mut self, provisional_id: i64, reply: ChatMessage) -> StateResult<()> {
        if reply.session_id != self.session_id {
            warn!(
                expected = self.session_id,
                got = reply.session_id,
                "reply for another session dropped"
            );
            return Err(StateError::SessionMismatch {
                expected: self.session_id,
                got: reply.session_id,
            });
        }

        self.set_delivery(provisional_id, Delivery::Sent)?;
        insert_new(
            &mut self.entries,
            TranscriptEntry {
                message: reply,
                delivery: Delivery::Sent,
            },
            InsertAt::Tail,
        )
    }

    /// Отправка не удалась: сообщение остаётся в ленте со статусом `Failed`.
    pub fn fail(&mut self, provisional_id: i64) -> StateResult<()> {
        self.set_delivery(provisional_id, Delivery::Failed)
    }

    fn set_delivery(&mut self, id: i64, delivery: Delivery) -> StateResult<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.message.id == id)
            .ok_or(StateError::NotFound(id))?;
        entry.delivery = delivery;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).single().expect("valid ts")
    }

    fn reply(id: i64, session_id: i64) -> ChatMessage {
        ChatMessage {
            id,
            session_id,
            content: "answer".to_string(),
            sender: Sender::Ai,
            created_at: None,
        }
    }

    #[test]
    fn provisional_ids_are_negative_and_monotonic_within_same_millisecond() {
        let mut ids = ProvisionalIds::default();
        let a = ids.next(1_000);
        let b = ids.next(1_000);
        let c = ids.next(999);
        assert!(a < 0 && b < 0 && c < 0);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert!(b < a && c < b);
    }

    #[test]
    fn confirm_marks_sent_and_appends_reply() {
        let mut transcript = Transcript::from_messages(4, vec![reply(1, 4)]);
        let temp = transcript.push_provisional("hello", at(5_000));
        assert!(transcript.has_pending());

        transcript.confirm(temp, reply(10, 4)).expect("confirm");

        let ids: Vec<i64> = transcript.entries().iter().map(|e| e.message.id).collect();
        assert_eq!(ids, vec![1, temp, 10]);
        assert!(transcript.entries()[1].is_provisional());
        assert_eq!(transcript.entries()[1].delivery, Delivery::Sent);
        assert!(!transcript.has_pending());
    }

    #[test]
    fn failure_keeps_message_in_place() {
        let mut transcript = Transcript::new(4);
        let temp = transcript.push_provisional("hello", at(5_000));
        transcript.fail(temp).expect("fail");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.entries()[0].delivery, Delivery::Failed);
    }

    #[test]
    fn reply_for_other_session_is_rejected() {
        let mut transcript = Transcript::new(7);
        let temp = transcript.push_provisional("hi", at(1));
        let result = transcript.confirm(temp, reply(11, 3));
        assert_eq!(
            result,
            Err(StateError::SessionMismatch {
                expected: 7,
                got: 3
            })
        );
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.entries()[0].delivery, Delivery::Pending);
    }
}
