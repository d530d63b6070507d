//! Snapshot-based state store for lists and tasks.
//!
//! `TaskStore` owns the complete application state as a single immutable
//! `Snapshot` value. Every operation builds the next snapshot from the
//! current one and swaps it in whole, so no caller ever observes a
//! half-applied mutation. Invalid input (empty text, unknown id) silently
//! declines the mutation: the prior snapshot stays current and subscribers
//! are not notified.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::list::TaskList;
use crate::task::Task;

/// Id of the list every store starts with.
pub const DEFAULT_LIST_ID: u64 = 1;

/// One immutable value of the whole application state.
///
/// Lists keep insertion order. `active_list_id`, when set, always
/// references an existing list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub lists: Vec<TaskList>,
    pub active_list_id: Option<u64>,
}

impl Snapshot {
    /// The starting state: one empty "Default List", selected.
    pub fn initial() -> Self {
        Snapshot {
            lists: vec![TaskList::new(DEFAULT_LIST_ID, "Default List")],
            active_list_id: Some(DEFAULT_LIST_ID),
        }
    }

    /// Get a list by id.
    pub fn list(&self, list_id: u64) -> Option<&TaskList> {
        self.lists.iter().find(|l| l.id == list_id)
    }

    fn list_mut(&mut self, list_id: u64) -> Option<&mut TaskList> {
        self.lists.iter_mut().find(|l| l.id == list_id)
    }

    /// The currently selected list, if any.
    pub fn active_list(&self) -> Option<&TaskList> {
        self.active_list_id.and_then(|id| self.list(id))
    }

    /// Find a task by id across all lists. Ids come from one counter, so
    /// at most one list owns a match.
    pub fn task(&self, task_id: u64) -> Option<&Task> {
        self.lists.iter().find_map(|l| l.get(task_id))
    }

    fn task_mut(&mut self, task_id: u64) -> Option<&mut Task> {
        self.lists.iter_mut().find_map(|l| l.get_mut(task_id))
    }
}

/// Callback invoked with each newly installed snapshot.
pub type Observer = Box<dyn FnMut(&Snapshot)>;

/// The state container: current snapshot, id source, and subscribers.
///
/// Ids for lists and tasks are drawn from a single monotonic counter
/// scoped to the store's lifetime, so they are unique across both entity
/// kinds and never collide however quickly entities are created.
pub struct TaskStore {
    snapshot: Snapshot,
    next_id: u64,
    observers: Vec<Observer>,
}

impl TaskStore {
    /// Create a store holding the initial snapshot.
    pub fn new() -> Self {
        TaskStore {
            snapshot: Snapshot::initial(),
            next_id: DEFAULT_LIST_ID + 1,
            observers: Vec::new(),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// The currently selected list, if any.
    pub fn active_list(&self) -> Option<&TaskList> {
        self.snapshot.active_list()
    }

    /// Register an observer called with every snapshot the store installs.
    /// Declined mutations install nothing and trigger no call.
    pub fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Swap in the next snapshot and notify subscribers.
    fn install(&mut self, next: Snapshot) {
        self.snapshot = next;
        for observer in self.observers.iter_mut() {
            observer(&self.snapshot);
        }
    }

    /// Append a new empty list. A name that is empty after trimming is
    /// declined; otherwise the name is stored as typed. The active list
    /// does not change.
    pub fn add_list(&mut self, name: &str) {
        if name.trim().is_empty() {
            return;
        }
        let id = self.fresh_id();
        let mut next = self.snapshot.clone();
        next.lists.push(TaskList::new(id, name));
        self.install(next);
    }

    /// Select the list with the given id. Unknown ids are declined, which
    /// keeps the active list always pointing at an existing one.
    pub fn select_list(&mut self, list_id: u64) {
        if self.snapshot.list(list_id).is_none() {
            return;
        }
        let mut next = self.snapshot.clone();
        next.active_list_id = Some(list_id);
        self.install(next);
    }

    /// Append a task to the given list. Declined when the text is empty
    /// after trimming or the list does not exist; the text is stored as
    /// typed.
    pub fn add_task(&mut self, list_id: u64, text: &str) {
        if text.trim().is_empty() || self.snapshot.list(list_id).is_none() {
            return;
        }
        let id = self.fresh_id();
        let mut next = self.snapshot.clone();
        if let Some(list) = next.list_mut(list_id) {
            list.tasks.push(Task::new(id, text));
        }
        self.install(next);
    }

    /// Flip the completion flag of the matching task, wherever it lives.
    /// No match: declined.
    pub fn toggle_task_completion(&mut self, task_id: u64) {
        let mut next = self.snapshot.clone();
        match next.task_mut(task_id) {
            Some(task) => task.completed = !task.completed,
            None => return,
        }
        self.install(next);
    }

    /// Replace the matching task's text verbatim. Unlike creation, a blank
    /// edit is permitted. No match: declined.
    pub fn edit_task(&mut self, task_id: u64, new_text: &str) {
        let mut next = self.snapshot.clone();
        match next.task_mut(task_id) {
            Some(task) => task.text = new_text.to_string(),
            None => return,
        }
        self.install(next);
    }

    /// Remove the matching task from its owning list, preserving the
    /// relative order of the rest. No match: declined, so a repeated
    /// delete is a no-op.
    pub fn delete_task(&mut self, task_id: u64) {
        let mut next = self.snapshot.clone();
        let mut removed = false;
        for list in next.lists.iter_mut() {
            if let Some(pos) = list.tasks.iter().position(|t| t.id == task_id) {
                list.tasks.remove(pos);
                removed = true;
                break;
            }
        }
        if !removed {
            return;
        }
        self.install(next);
    }

    /// Set or clear (`None`) the matching task's due date. No match:
    /// declined.
    pub fn set_task_due_date(&mut self, task_id: u64, due: Option<NaiveDate>) {
        let mut next = self.snapshot.clone();
        match next.task_mut(task_id) {
            Some(task) => task.due = due,
            None => return,
        }
        self.install(next);
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        TaskStore::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn first_task_id(store: &TaskStore, list_id: u64) -> u64 {
        store.snapshot().list(list_id).unwrap().tasks[0].id
    }

    #[test]
    fn starts_with_empty_default_list_selected() {
        let store = TaskStore::new();
        let snap = store.snapshot();
        assert_eq!(snap.lists.len(), 1);
        assert_eq!(snap.lists[0].name, "Default List");
        assert!(snap.lists[0].tasks.is_empty());
        assert_eq!(snap.active_list_id, Some(DEFAULT_LIST_ID));
    }

    #[test]
    fn add_list_declines_blank_names() {
        let mut store = TaskStore::new();
        store.add_list("");
        store.add_list("   \t ");
        assert_eq!(store.snapshot().lists.len(), 1);
    }

    #[test]
    fn add_list_appends_one_empty_list() {
        let mut store = TaskStore::new();
        store.add_list("Work");
        let snap = store.snapshot();
        assert_eq!(snap.lists.len(), 2);
        assert_eq!(snap.lists[1].name, "Work");
        assert!(snap.lists[1].tasks.is_empty());
        // Adding a list never steals the selection.
        assert_eq!(snap.active_list_id, Some(DEFAULT_LIST_ID));
    }

    #[test]
    fn list_ids_stay_unique_under_rapid_creation() {
        let mut store = TaskStore::new();
        for i in 0..100 {
            store.add_list(&format!("list {i}"));
        }
        let mut ids: Vec<u64> = store.snapshot().lists.iter().map(|l| l.id).collect();
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn select_list_moves_selection_only_to_known_lists() {
        let mut store = TaskStore::new();
        store.add_list("Work");
        let work_id = store.snapshot().lists[1].id;
        store.select_list(work_id);
        assert_eq!(store.snapshot().active_list_id, Some(work_id));
        store.select_list(9999);
        assert_eq!(store.snapshot().active_list_id, Some(work_id));
    }

    #[test]
    fn add_task_declines_blank_text_and_unknown_lists() {
        let mut store = TaskStore::new();
        store.add_task(DEFAULT_LIST_ID, "  ");
        assert!(store.snapshot().list(DEFAULT_LIST_ID).unwrap().tasks.is_empty());
        store.add_task(9999, "buy milk");
        assert_eq!(store.snapshot().lists.len(), 1);
        assert!(store.snapshot().list(DEFAULT_LIST_ID).unwrap().tasks.is_empty());
    }

    #[test]
    fn add_task_appends_one_fresh_task() {
        let mut store = TaskStore::new();
        store.add_task(DEFAULT_LIST_ID, "buy milk");
        let list = store.snapshot().list(DEFAULT_LIST_ID).unwrap();
        assert_eq!(list.tasks.len(), 1);
        assert_eq!(list.tasks[0].text, "buy milk");
        assert!(!list.tasks[0].completed);
        assert!(list.tasks[0].due.is_none());
    }

    #[test]
    fn toggle_twice_restores_the_flag() {
        let mut store = TaskStore::new();
        store.add_task(DEFAULT_LIST_ID, "water plants");
        let id = first_task_id(&store, DEFAULT_LIST_ID);
        store.toggle_task_completion(id);
        assert!(store.snapshot().task(id).unwrap().completed);
        store.toggle_task_completion(id);
        assert!(!store.snapshot().task(id).unwrap().completed);
    }

    #[test]
    fn toggle_finds_tasks_in_any_list() {
        let mut store = TaskStore::new();
        store.add_list("Work");
        let work_id = store.snapshot().lists[1].id;
        store.add_task(work_id, "write report");
        let id = store.snapshot().list(work_id).unwrap().tasks[0].id;
        store.toggle_task_completion(id);
        assert!(store.snapshot().task(id).unwrap().completed);
    }

    #[test]
    fn edit_task_permits_blank_text() {
        let mut store = TaskStore::new();
        store.add_task(DEFAULT_LIST_ID, "draft");
        let id = first_task_id(&store, DEFAULT_LIST_ID);
        store.edit_task(id, "");
        assert_eq!(store.snapshot().task(id).unwrap().text, "");
        store.edit_task(9999, "nope");
        assert_eq!(store.snapshot().task(id).unwrap().text, "");
    }

    #[test]
    fn delete_removes_exactly_one_and_repeats_are_noops() {
        let mut store = TaskStore::new();
        store.add_task(DEFAULT_LIST_ID, "first");
        store.add_task(DEFAULT_LIST_ID, "second");
        store.add_task(DEFAULT_LIST_ID, "third");
        let ids: Vec<u64> = store
            .snapshot()
            .list(DEFAULT_LIST_ID)
            .unwrap()
            .tasks
            .iter()
            .map(|t| t.id)
            .collect();
        store.delete_task(ids[1]);
        let texts: Vec<&str> = store
            .snapshot()
            .list(DEFAULT_LIST_ID)
            .unwrap()
            .tasks
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(texts, vec!["first", "third"]);
        store.delete_task(ids[1]);
        assert_eq!(store.snapshot().list(DEFAULT_LIST_ID).unwrap().tasks.len(), 2);
    }

    #[test]
    fn due_date_can_be_set_and_cleared() {
        let mut store = TaskStore::new();
        store.add_task(DEFAULT_LIST_ID, "file taxes");
        let id = first_task_id(&store, DEFAULT_LIST_ID);
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        store.set_task_due_date(id, Some(date));
        assert_eq!(store.snapshot().task(id).unwrap().due, Some(date));
        store.set_task_due_date(id, None);
        assert!(store.snapshot().task(id).unwrap().due.is_none());
    }

    #[test]
    fn work_list_scenario() {
        let mut store = TaskStore::new();
        store.add_list("Work");
        let work_id = store.snapshot().lists[1].id;
        store.add_task(work_id, "Write spec");
        let task_id = store.snapshot().list(work_id).unwrap().tasks[0].id;
        store.toggle_task_completion(task_id);

        let work = store.snapshot().list(work_id).unwrap();
        assert_eq!(work.tasks.len(), 1);
        assert!(work.tasks[0].completed);
        assert_eq!(work.tasks[0].text, "Write spec");
    }

    #[test]
    fn observers_see_installed_snapshots_only() {
        let mut store = TaskStore::new();
        let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(Box::new(move |snap: &Snapshot| {
            sink.borrow_mut().push(snap.lists.len());
        }));

        store.add_list("Work");
        store.add_list("   "); // declined, no notification
        store.toggle_task_completion(9999); // declined, no notification
        store.add_list("Home");

        assert_eq!(*seen.borrow(), vec![2, 3]);
    }

    #[test]
    fn snapshot_serializes_with_absent_due_as_null() {
        let mut store = TaskStore::new();
        store.add_task(DEFAULT_LIST_ID, "buy milk");
        let json = serde_json::to_value(store.snapshot()).unwrap();
        assert_eq!(json["active_list_id"], 1);
        assert_eq!(json["lists"][0]["name"], "Default List");
        assert_eq!(json["lists"][0]["tasks"][0]["text"], "buy milk");
        assert_eq!(json["lists"][0]["tasks"][0]["completed"], false);
        assert!(json["lists"][0]["tasks"][0]["due"].is_null());
    }
}
