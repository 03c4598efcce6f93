//! Оптимистичные изменения упорядоченных коллекций, уникальных по `id`.
//!
//! Порядок нетронутых элементов сохраняется всегда; новые элементы попадают
//! в фиксированный конец списка независимо от серверных полей сортировки.

use tracing::{debug, warn};

use crate::error::{StateError, StateResult};

/// Сущность с идентификатором, уникальным внутри своей коллекции.
pub trait Identified {
    /// Идентификатор сущности.
    fn id(&self) -> i64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Куда вставлять новую сущность.
pub enum InsertAt {
    /// В начало: посты, комментарии, сессии.
    Head,
    /// В конец: сообщения чата.
    Tail,
}

/// Есть ли в коллекции сущность с `id`.
pub fn contains_id<T: Identified>(items: &[T], id: i64) -> bool {
    items.iter().any(|item| item.id() == id)
}

/// Возвращает сущность по `id`.
pub fn find_by_id<T: Identified>(items: &[T], id: i64) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

/// Вставляет ровно одну новую сущность.
///
/// Если `id` уже есть, список не меняется и возвращается `DuplicateId`.
pub fn insert_new<T: Identified>(items: &mut Vec<T>, item: T, at: InsertAt) -> StateResult<()> {
    let id = item.id();
    if contains_id(items, id) {
        warn!(id, "refusing to insert duplicate id");
        return Err(StateError::DuplicateId(id));
    }

    match at {
        InsertAt::Head => items.insert(0, item),
        InsertAt::Tail => items.push(item),
    }
    debug!(id, ?at, len = items.len(), "inserted");
    Ok(())
}

/// Заменяет сущность с тем же `id` на месте. Возвращает `false`, если её нет.
pub fn replace_by_id<T: Identified>(items: &mut [T], item: T) -> bool {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(slot) => {
            *slot = item;
            true
        }
        None => false,
    }
}

/// Применяет `f` к сущности с `id`. Возвращает `false`, если её нет.
pub fn update_by_id<T, F>(items: &mut [T], id: i64, f: F) -> bool
where
    T: Identified,
    F: FnOnce(&mut T),
{
    match items.iter_mut().find(|item| item.id() == id) {
        Some(item) => {
            f(item);
            true
        }
        None => false,
    }
}

/// Удаляет ровно сущность с `id`. Возвращает `true`, если что-то удалено.
pub fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: i64) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    let removed = items.len() != before;
    debug!(id, removed, "remove by id");
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: i64,
        title: &'static str,
    }

    impl Identified for Item {
        fn id(&self) -> i64 {
            self.id
        }
    }

    fn items(ids: &[i64]) -> Vec<Item> {
        ids.iter().map(|&id| Item { id, title: "x" }).collect()
    }

    fn ids(items: &[Item]) -> Vec<i64> {
        items.iter().map(|item| item.id).collect()
    }

    #[test]
    fn insert_head_prepends_exactly_one() {
        let mut list = items(&[1, 2, 3]);
        insert_new(&mut list, Item { id: 9, title: "new" }, InsertAt::Head).expect("insert");
        assert_eq!(ids(&list), vec![9, 1, 2, 3]);
    }

    #[test]
    fn insert_tail_appends_exactly_one() {
        let mut list = items(&[1, 2]);
        insert_new(&mut list, Item { id: 3, title: "new" }, InsertAt::Tail).expect("insert");
        assert_eq!(ids(&list), vec![1, 2, 3]);
    }

    #[test]
    fn insert_refuses_duplicates() {
        let mut list = items(&[1, 2]);
        let result = insert_new(&mut list, Item { id: 2, title: "dup" }, InsertAt::Head);
        assert_eq!(result, Err(StateError::DuplicateId(2)));
        assert_eq!(ids(&list), vec![1, 2]);
    }

    #[test]
    fn remove_keeps_other_ids_and_order() {
        let mut list = items(&[4, 8, 15, 16, 23]);
        assert!(remove_by_id(&mut list, 15));
        assert_eq!(ids(&list), vec![4, 8, 16, 23]);
        assert!(!remove_by_id(&mut list, 42));
        assert_eq!(ids(&list), vec![4, 8, 16, 23]);
    }

    #[test]
    fn replace_updates_in_place() {
        let mut list = items(&[1, 5, 7]);
        assert!(replace_by_id(&mut list, Item { id: 5, title: "Algebra help" }));
        assert_eq!(ids(&list), vec![1, 5, 7]);
        assert_eq!(list[1].title, "Algebra help");
        assert_eq!(list[0].title, "x");
        assert_eq!(list[2].title, "x");
        assert!(!replace_by_id(&mut list, Item { id: 99, title: "nope" }));
    }

    #[test]
    fn update_touches_only_matching_item() {
        let mut list = items(&[1, 2]);
        assert!(update_by_id(&mut list, 2, |item| item.title = "changed"));
        assert_eq!(list[0].title, "x");
        assert_eq!(list[1].title, "changed");
        assert_eq!(find_by_id(&list, 2).map(|item| item.title), Some("changed"));
    }
}
