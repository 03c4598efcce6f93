use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Текущий пользователь. Передаётся страницам явно, а не через глобальное хранилище.
pub struct CurrentUser {
    /// Идентификатор.
    pub id: i64,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
    /// Полное имя.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Роль: `admin`, `instructor`, `student`.
    #[serde(default)]
    pub role: String,
}

impl CurrentUser {
    /// Администратор.
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }

    /// Может ли пользователь редактировать и удалять сообщество.
    pub fn can_manage(&self, created_by: Option<i64>) -> bool {
        self.is_admin() || created_by == Some(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: &str) -> CurrentUser {
        CurrentUser {
            id,
            email: None,
            full_name: None,
            role: role.to_string(),
        }
    }

    #[test]
    fn creator_and_admin_can_manage() {
        assert!(user(5, "student").can_manage(Some(5)));
        assert!(user(1, "admin").can_manage(Some(5)));
        assert!(!user(2, "student").can_manage(Some(5)));
        assert!(!user(2, "student").can_manage(None));
    }
}
