//! Членство текущего пользователя в сообществе.
//!
//! Клиент не всегда знает статус: сервер может не вернуть `is_member`.
//! `Unknown` — отдельное отображаемое состояние с обоими действиями.

use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Членство в сообществе.
pub enum Membership {
    /// Статус неизвестен.
    #[default]
    Unknown,
    /// Пользователь участник.
    Member,
    /// Пользователь не участник.
    NonMember,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Какие кнопки членства показывать.
pub struct MembershipActions {
    /// Кнопка «Join».
    pub join: bool,
    /// Кнопка «Leave».
    pub leave: bool,
}

impl Membership {
    /// Из необязательного флага `is_member`.
    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Self::Member,
            Some(false) => Self::NonMember,
            None => Self::Unknown,
        }
    }

    /// Доступные действия.
    pub fn actions(self) -> MembershipActions {
        match self {
            Self::Unknown => MembershipActions {
                join: true,
                leave: true,
            },
            Self::Member => MembershipActions {
                join: false,
                leave: true,
            },
            Self::NonMember => MembershipActions {
                join: true,
                leave: false,
            },
        }
    }

    /// Подпись статуса.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Membership unknown",
            Self::Member => "Member",
            Self::NonMember => "Not a member",
        }
    }

    /// Сверка после неудачного вступления: `Already a member` означает,
    /// что пользователь уже участник.
    pub fn after_join_failure(self, server_message: &str) -> Self {
        let next = if server_message.to_ascii_lowercase().contains("already a member") {
            Self::Member
        } else {
            self
        };
        debug!(from = ?self, to = ?next, "membership after failed join");
        next
    }

    /// Сверка после неудачного выхода: `Not a member` означает, что
    /// пользователь не участник.
    pub fn after_leave_failure(self, server_message: &str) -> Self {
        let next = if server_message.to_ascii_lowercase().contains("not a member") {
            Self::NonMember
        } else {
            self
        };
        debug!(from = ?self, to = ?next, "membership after failed leave");
        next
    }

    /// Новый флаг с сервера уточняет статус; отсутствие флага ничего не стирает.
    pub fn refine(self, flag: Option<bool>) -> Self {
        match flag {
            Some(_) => Self::from_flag(flag),
            None => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_shows_both_actions() {
        let actions = Membership::Unknown.actions();
        assert!(actions.join && actions.leave);
        assert!(!Membership::Member.actions().join);
        assert!(!Membership::NonMember.actions().leave);
    }

    #[test]
    fn server_errors_resolve_unknown_state() {
        assert_eq!(
            Membership::Unknown.after_join_failure("Already a member"),
            Membership::Member
        );
        assert_eq!(
            Membership::Unknown.after_leave_failure("Not a member"),
            Membership::NonMember
        );
        assert_eq!(
            Membership::Unknown.after_join_failure("Community not found"),
            Membership::Unknown
        );
    }

    #[test]
    fn refine_keeps_known_state_when_flag_missing() {
        assert_eq!(Membership::Member.refine(None), Membership::Member);
        assert_eq!(Membership::Member.refine(Some(false)), Membership::NonMember);
    }
}
