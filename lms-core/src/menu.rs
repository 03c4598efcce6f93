//! Временное состояние элементов списка: меню действий, переименование,
//! подтверждение удаления.
//!
//! В каждый момент открыт не более чем один режим и только для одного
//! элемента; это гарантирует сам тип, а не набор флагов.

use tracing::debug;

use crate::models::DEFAULT_SESSION_TITLE;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Состояние меню для списка.
pub enum ItemMenu {
    /// Ничего не открыто.
    #[default]
    Idle,
    /// Открыто меню действий элемента.
    Options(i64),
    /// Элемент переименовывается.
    Editing {
        /// Элемент.
        id: i64,
        /// Черновик названия.
        draft: String,
    },
    /// Ожидается подтверждение удаления.
    ConfirmDelete(i64),
}

impl ItemMenu {
    /// Открывает или закрывает меню действий элемента.
    ///
    /// Во время переименования кнопка меню скрыта, переход игнорируется.
    pub fn toggle_options(&mut self, id: i64) {
        if self.is_editing() {
            return;
        }
        *self = match self {
            Self::Options(open) if *open == id => Self::Idle,
            _ => Self::Options(id),
        };
        debug!(id, state = ?self, "options toggled");
    }

    /// Начинает переименование с текущим названием в черновике.
    pub fn start_edit(&mut self, id: i64, current_title: Option<&str>) {
        let draft = match current_title.map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => DEFAULT_SESSION_TITLE.to_string(),
        };
        *self = Self::Editing { id, draft };
    }

    /// Обновляет черновик; вне переименования ничего не делает.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let Self::Editing { draft, .. } = self {
            *draft = text.into();
        }
    }

    /// Сохраняет переименование.
    ///
    /// Возвращает `(id, название)` и закрывает режим. Пустой черновик не
    /// принимается, режим остаётся открытым.
    pub fn commit_edit(&mut self) -> Option<(i64, String)> {
        let Self::Editing { id, draft } = self else {
            return None;
        };
        let title = draft.trim();
        if title.is_empty() {
            return None;
        }
        let result = (*id, title.to_string());
        *self = Self::Idle;
        Some(result)
    }

    /// Просит подтверждение удаления элемента.
    pub fn request_delete(&mut self, id: i64) {
        *self = Self::ConfirmDelete(id);
    }

    /// Подтверждает удаление. Возвращает id элемента.
    pub fn confirm_delete(&mut self) -> Option<i64> {
        let Self::ConfirmDelete(id) = *self else {
            return None;
        };
        *self = Self::Idle;
        Some(id)
    }

    /// Явная отмена любого режима.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    /// Клик вне меню закрывает только меню действий.
    pub fn dismiss_outside(&mut self) {
        if matches!(self, Self::Options(_)) {
            *self = Self::Idle;
        }
    }

    /// Элемент удалён из списка: связанный с ним режим закрывается.
    pub fn forget(&mut self, removed: i64) {
        if self.target() == Some(removed) {
            *self = Self::Idle;
        }
    }

    /// Элемент, к которому относится открытый режим.
    pub fn target(&self) -> Option<i64> {
        match self {
            Self::Idle => None,
            Self::Options(id) | Self::ConfirmDelete(id) | Self::Editing { id, .. } => Some(*id),
        }
    }

    /// Открыто ли меню действий элемента.
    pub fn options_open_for(&self, id: i64) -> bool {
        *self == Self::Options(id)
    }

    /// Черновик, если переименовывается именно этот элемент.
    pub fn draft_for(&self, id: i64) -> Option<&str> {
        match self {
            Self::Editing { id: editing, draft } if *editing == id => Some(draft.as_str()),
            _ => None,
        }
    }

    /// Идёт переименование какого-либо элемента.
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    /// Ожидается подтверждение удаления этого элемента.
    pub fn confirming_delete(&self, id: i64) -> bool {
        *self == Self::ConfirmDelete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_toggle_and_switch_between_items() {
        let mut menu = ItemMenu::default();
        menu.toggle_options(1);
        assert!(menu.options_open_for(1));
        menu.toggle_options(2);
        assert!(menu.options_open_for(2));
        assert!(!menu.options_open_for(1));
        menu.toggle_options(2);
        assert_eq!(menu, ItemMenu::Idle);
    }

    #[test]
    fn edit_closes_options_and_commits_trimmed_title() {
        let mut menu = ItemMenu::Options(5);
        menu.start_edit(5, Some("Old"));
        assert!(!menu.options_open_for(5));
        assert_eq!(menu.draft_for(5), Some("Old"));

        menu.set_draft("  Algebra help ");
        assert_eq!(menu.commit_edit(), Some((5, "Algebra help".to_string())));
        assert_eq!(menu, ItemMenu::Idle);
    }

    #[test]
    fn blank_draft_is_not_committed() {
        let mut menu = ItemMenu::default();
        menu.start_edit(5, None);
        assert_eq!(menu.draft_for(5), Some(DEFAULT_SESSION_TITLE));
        menu.set_draft("   ");
        assert_eq!(menu.commit_edit(), None);
        assert!(menu.is_editing());
    }

    #[test]
    fn options_are_ignored_while_editing() {
        let mut menu = ItemMenu::default();
        menu.start_edit(1, Some("a"));
        menu.toggle_options(2);
        assert_eq!(menu.draft_for(1), Some("a"));
    }

    #[test]
    fn delete_confirmation_flow() {
        let mut menu = ItemMenu::Options(3);
        menu.request_delete(3);
        assert!(menu.confirming_delete(3));
        menu.dismiss_outside();
        assert!(menu.confirming_delete(3));
        assert_eq!(menu.confirm_delete(), Some(3));
        assert_eq!(menu.confirm_delete(), None);
    }

    #[test]
    fn outside_click_closes_only_options() {
        let mut menu = ItemMenu::Options(3);
        menu.dismiss_outside();
        assert_eq!(menu, ItemMenu::Idle);
    }

    #[test]
    fn forget_resets_state_for_removed_item() {
        let mut menu = ItemMenu::ConfirmDelete(4);
        menu.forget(5);
        assert!(menu.confirming_delete(4));
        menu.forget(4);
        assert_eq!(menu, ItemMenu::Idle);
    }
}
