//! Машина состояний списка страницы: `Loading -> {Empty, Populated}` и выбор
//! одной текущей сущности.

use tracing::debug;

use crate::collection::{self, Identified, InsertAt};
use crate::error::StateResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Фаза списка.
pub enum ListPhase {
    /// Первичная загрузка; изменяющие элементы управления выключены.
    Loading,
    /// Загрузка прошла, элементов нет.
    Empty,
    /// Есть хотя бы один элемент.
    Populated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Что делать с пустым списком.
pub enum EmptyPolicy {
    /// Сразу создать сущность без участия пользователя (чат).
    AutoCreate,
    /// Показать приглашение (сообщества).
    Prompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Следующий шаг страницы после загрузки списка.
pub enum LoadOutcome {
    /// Создать сущность автоматически.
    AutoCreate,
    /// Показать пустое состояние.
    ShowEmpty,
    /// Выбрать сущность с этим id.
    Select(i64),
    /// Текущий выбор остаётся.
    Keep,
}

#[derive(Debug, Clone, PartialEq)]
/// Список сущностей страницы вместе с его фазой.
pub struct ListState<T> {
    items: Vec<T>,
    phase: ListPhase,
    policy: EmptyPolicy,
}

impl<T: Identified> ListState<T> {
    /// Новый список в фазе загрузки.
    pub fn new(policy: EmptyPolicy) -> Self {
        Self {
            items: Vec::new(),
            phase: ListPhase::Loading,
            policy,
        }
    }

    /// Элементы в порядке отображения.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Текущая фаза.
    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    /// Идёт загрузка.
    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    /// Изменяющие элементы управления доступны только вне загрузки.
    pub fn controls_enabled(&self) -> bool {
        !self.is_loading()
    }

    /// Начало (повторной) загрузки.
    pub fn begin_load(&mut self) {
        self.phase = ListPhase::Loading;
    }

    /// Загрузка завершилась успешно.
    ///
    /// `current` — id выбранной сейчас сущности. Если она всё ещё в списке,
    /// выбор сохраняется, иначе выбирается первая.
    pub fn finish_load(&mut self, items: Vec<T>, current: Option<i64>) -> LoadOutcome {
        self.items = items;
        if self.items.is_empty() {
            self.phase = ListPhase::Empty;
            let outcome = match self.policy {
                EmptyPolicy::AutoCreate => LoadOutcome::AutoCreate,
                EmptyPolicy::Prompt => LoadOutcome::ShowEmpty,
            };
            debug!(?outcome, "list loaded empty");
            return outcome;
        }

        self.phase = ListPhase::Populated;
        match current {
            Some(id) if collection::contains_id(&self.items, id) => LoadOutcome::Keep,
            _ => LoadOutcome::Select(self.items[0].id()),
        }
    }

    /// Загрузка не удалась: старые данные остаются, страница интерактивна.
    pub fn fail_load(&mut self) {
        self.phase = self.settled_phase();
    }

    /// Вставка созданной сущности.
    pub fn insert_new(&mut self, item: T, at: InsertAt) -> StateResult<()> {
        collection::insert_new(&mut self.items, item, at)?;
        if self.phase == ListPhase::Empty {
            self.phase = ListPhase::Populated;
        }
        Ok(())
    }

    /// Замена сущности с тем же id.
    pub fn replace(&mut self, item: T) -> bool {
        collection::replace_by_id(&mut self.items, item)
    }

    /// Изменение полей сущности на месте.
    pub fn update<F: FnOnce(&mut T)>(&mut self, id: i64, f: F) -> bool {
        collection::update_by_id(&mut self.items, id, f)
    }

    /// Удаление сущности по id.
    pub fn remove(&mut self, id: i64) -> bool {
        let removed = collection::remove_by_id(&mut self.items, id);
        if removed && !self.is_loading() {
            self.phase = self.settled_phase();
        }
        removed
    }

    /// Сущность по id.
    pub fn get(&self, id: i64) -> Option<&T> {
        collection::find_by_id(&self.items, id)
    }

    fn settled_phase(&self) -> ListPhase {
        if self.items.is_empty() {
            ListPhase::Empty
        } else {
            ListPhase::Populated
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Метка запроса деталей. Принимается только ответ на последний запрос.
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
/// Текущая выбранная сущность с детальной загрузкой.
///
/// Выбор заменяет текущую сущность целиком. Ответы на устаревшие запросы
/// отбрасываются, поэтому быстрый выбор 3, затем 7 показывает только 7.
pub struct Selection<T> {
    current: Option<T>,
    requested: Option<i64>,
    latest: u64,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self {
            current: None,
            requested: None,
            latest: 0,
        }
    }
}

impl<T: Identified> Selection<T> {
    /// Выбранная сущность.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Выбранная сущность для изменения.
    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.current.as_mut()
    }

    /// id выбранной сущности.
    pub fn current_id(&self) -> Option<i64> {
        self.current.as_ref().map(Identified::id)
    }

    /// id последней запрошенной сущности.
    pub fn requested(&self) -> Option<i64> {
        self.requested
    }

    /// Выбор сущности; детали загружаются отдельно.
    pub fn request(&mut self, id: i64) -> Ticket {
        self.latest += 1;
        self.requested = Some(id);
        debug!(id, ticket = self.latest, "selection requested");
        Ticket(self.latest)
    }

    /// Детали загружены. Возвращает `false`, если ответ устарел.
    pub fn resolve(&mut self, ticket: Ticket, detail: T) -> bool {
        if ticket.0 != self.latest || self.requested != Some(detail.id()) {
            debug!(ticket = ticket.0, latest = self.latest, "stale selection dropped");
            return false;
        }
        self.current = Some(detail);
        true
    }

    /// Сразу делает сущность текущей (например, только что созданную).
    pub fn install(&mut self, detail: T) {
        self.latest += 1;
        self.requested = Some(detail.id());
        self.current = Some(detail);
    }

    /// Отменяет запрос в полёте, текущая сущность остаётся выбранной.
    pub fn cancel_request(&mut self) {
        self.latest += 1;
        self.requested = self.current_id();
    }

    /// Снимает выбор; ответы на запросы в полёте будут отброшены.
    pub fn clear(&mut self) {
        self.latest += 1;
        self.requested = None;
        self.current = None;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Флаг запроса в полёте для одного элемента управления.
///
/// Пока запрос не завершён, повторный `try_begin` отказывает: кнопка выключена.
pub struct Busy(bool);

impl Busy {
    /// Начинает запрос. `false`, если предыдущий ещё не завершён.
    pub fn try_begin(&mut self) -> bool {
        if self.0 {
            return false;
        }
        self.0 = true;
        true
    }

    /// Запрос завершён (успешно или нет).
    pub fn finish(&mut self) {
        self.0 = false;
    }

    /// Запрос в полёте.
    pub fn is_busy(self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(i64);

    impl Identified for Row {
        fn id(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn empty_load_follows_policy() {
        let mut chat = ListState::<Row>::new(EmptyPolicy::AutoCreate);
        assert!(!chat.controls_enabled());
        assert_eq!(chat.finish_load(Vec::new(), None), LoadOutcome::AutoCreate);
        assert_eq!(chat.phase(), ListPhase::Empty);
        assert!(chat.controls_enabled());

        let mut communities = ListState::<Row>::new(EmptyPolicy::Prompt);
        assert_eq!(communities.finish_load(Vec::new(), None), LoadOutcome::ShowEmpty);
    }

    #[test]
    fn populated_load_keeps_or_selects_first() {
        let mut list = ListState::new(EmptyPolicy::AutoCreate);
        assert_eq!(
            list.finish_load(vec![Row(3), Row(7)], None),
            LoadOutcome::Select(3)
        );
        list.begin_load();
        assert_eq!(list.finish_load(vec![Row(3), Row(7)], Some(7)), LoadOutcome::Keep);
        list.begin_load();
        assert_eq!(list.finish_load(vec![Row(3)], Some(7)), LoadOutcome::Select(3));
        assert_eq!(list.phase(), ListPhase::Populated);
    }

    #[test]
    fn failed_load_keeps_stale_items_and_reenables_controls() {
        let mut list = ListState::new(EmptyPolicy::Prompt);
        list.finish_load(vec![Row(1)], None);
        list.begin_load();
        assert!(!list.controls_enabled());
        list.fail_load();
        assert!(list.controls_enabled());
        assert_eq!(list.items(), &[Row(1)]);
    }

    #[test]
    fn insert_and_remove_move_between_phases() {
        let mut list = ListState::new(EmptyPolicy::Prompt);
        list.finish_load(Vec::new(), None);
        list.insert_new(Row(1), InsertAt::Head).expect("insert");
        assert_eq!(list.phase(), ListPhase::Populated);
        assert!(list.remove(1));
        assert_eq!(list.phase(), ListPhase::Empty);
    }

    #[test]
    fn stale_selection_is_dropped() {
        let mut selection = Selection::<Row>::default();
        let first = selection.request(3);
        let second = selection.request(7);

        assert!(selection.resolve(second, Row(7)));
        assert!(!selection.resolve(first, Row(3)));
        assert_eq!(selection.current_id(), Some(7));
    }

    #[test]
    fn cancelled_request_keeps_current() {
        let mut selection = Selection::<Row>::default();
        selection.install(Row(1));
        let ticket = selection.request(4);
        selection.cancel_request();
        assert!(!selection.resolve(ticket, Row(4)));
        assert_eq!(selection.current_id(), Some(1));
        assert_eq!(selection.requested(), Some(1));
    }

    #[test]
    fn clear_invalidates_in_flight_request() {
        let mut selection = Selection::<Row>::default();
        let ticket = selection.request(3);
        selection.clear();
        assert!(!selection.resolve(ticket, Row(3)));
        assert!(selection.current().is_none());
    }

    #[test]
    fn busy_rejects_second_begin_until_finished() {
        let mut busy = Busy::default();
        assert!(busy.try_begin());
        assert!(!busy.try_begin());
        busy.finish();
        assert!(busy.try_begin());
    }
}
