//! Local draft state for the task edit modal.

use chrono::NaiveDate;
use taskboard_shared::{ChecklistItem, Priority, Todo, UpdateTodoRequest};
use uuid::Uuid;

use crate::calendar::CalendarState;

/// Focusable fields of the edit modal, in visual order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Title,
    Priority,
    Assignee,
    Checklist,
    Label,
    DueDate,
}

impl EditField {
    pub fn next(self) -> Self {
        match self {
            EditField::Title => EditField::Priority,
            EditField::Priority => EditField::Assignee,
            EditField::Assignee => EditField::Checklist,
            EditField::Checklist => EditField::Label,
            EditField::Label => EditField::DueDate,
            EditField::DueDate => EditField::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            EditField::Title => EditField::DueDate,
            EditField::Priority => EditField::Title,
            EditField::Assignee => EditField::Priority,
            EditField::Checklist => EditField::Assignee,
            EditField::Label => EditField::Checklist,
            EditField::DueDate => EditField::Label,
        }
    }
}

/// Uncommitted copy of one todo being edited. Seeded from a fetched record,
/// mutated only through these methods, discarded when the modal closes.
pub struct EditDraft {
    pub id: Uuid,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub tasks: Vec<ChecklistItem>,
    pub label: String,
    pub assigned_to: String,

    // Modal state
    pub field: EditField,
    pub item_cursor: usize,
    pub assignee_cursor: usize,
    pub calendar: Option<CalendarState>,
    /// At most one in-flight update per draft; a save while this is set
    /// is ignored.
    pub pending: bool,
}

impl EditDraft {
    /// Seed all draft fields from a fetched record. The checklist is copied
    /// into a fresh sequence so later edits never touch the source.
    pub fn seed(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title.clone(),
            date: todo.date,
            priority: todo.priority,
            tasks: todo.tasks.to_vec(),
            label: todo.label.clone(),
            assigned_to: todo.assigned_to.clone(),
            field: EditField::Title,
            item_cursor: 0,
            assignee_cursor: 0,
            calendar: None,
            pending: false,
        }
    }

    pub fn set_title(&mut self, text: impl Into<String>) {
        self.title = text.into();
    }

    pub fn set_label(&mut self, text: impl Into<String>) {
        self.label = text.into();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = Some(priority);
    }

    pub fn set_assigned_to(&mut self, email: impl Into<String>) {
        self.assigned_to = email.into();
    }

    /// Picking a date also closes the inline calendar.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
        self.calendar = None;
    }

    pub fn open_calendar(&mut self, today: NaiveDate) {
        self.calendar = Some(CalendarState::open_at(self.date, today));
    }

    pub fn close_calendar(&mut self) {
        self.calendar = None;
    }

    /// Append a fresh empty item to the end of the checklist.
    pub fn add_item(&mut self) {
        self.tasks.push(ChecklistItem::empty());
        self.item_cursor = self.tasks.len() - 1;
    }

    /// Remove the item at `index`; no-op when out of range.
    pub fn remove_item(&mut self, index: usize) {
        if index < self.tasks.len() {
            self.tasks.remove(index);
            if self.item_cursor >= self.tasks.len() {
                self.item_cursor = self.tasks.len().saturating_sub(1);
            }
        }
    }

    /// Replace the item at `index` with a retitled copy; no-op when out of
    /// range. Items are replaced, never edited in place.
    pub fn set_item_title(&mut self, index: usize, text: impl Into<String>) {
        if let Some(item) = self.tasks.get(index) {
            self.tasks[index] = ChecklistItem {
                title: text.into(),
                completed: item.completed,
            };
        }
    }

    /// Replace the item at `index` with a completion-flipped copy.
    pub fn toggle_item(&mut self, index: usize) {
        if let Some(item) = self.tasks.get(index) {
            self.tasks[index] = ChecklistItem {
                title: item.title.clone(),
                completed: !item.completed,
            };
        }
    }

    /// `(done, total)` over the current checklist, computed on demand.
    pub fn progress(&self) -> (usize, usize) {
        let done = self.tasks.iter().filter(|t| t.completed).count();
        (done, self.tasks.len())
    }

    /// Build the update payload, stripping empty-titled checklist items.
    /// A checklist with no titled items, or a missing priority, rejects the
    /// submission before any network call. Assignee stays optional: the
    /// directory fetch may fail soft, and the form must remain submittable.
    pub fn validate(&self) -> Result<UpdateTodoRequest, &'static str> {
        let tasks: Vec<ChecklistItem> = self
            .tasks
            .iter()
            .filter(|t| !t.title.is_empty())
            .cloned()
            .collect();

        if tasks.is_empty() {
            return Err("Checklist items are mandatory!");
        }
        let Some(priority) = self.priority else {
            return Err("Priority is mandatory!");
        };

        Ok(UpdateTodoRequest {
            title: self.title.clone(),
            priority,
            date: self.date,
            tasks,
            label: self.label.clone(),
            assigned_to: self.assigned_to.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, completed: bool) -> ChecklistItem {
        ChecklistItem {
            title: title.to_string(),
            completed,
        }
    }

    fn sample_todo() -> Todo {
        Todo {
            id: Uuid::new_v4(),
            title: "Release checklist".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 20),
            priority: Some(Priority::High),
            tasks: vec![item("A", true), item("", false), item("B", false)],
            label: "release".into(),
            assigned_to: "dev@example.com".into(),
        }
    }

    #[test]
    fn seeding_copies_checklist_without_aliasing() {
        let todo = sample_todo();
        let mut draft = EditDraft::seed(&todo);

        assert_eq!(draft.tasks, todo.tasks);

        draft.set_item_title(0, "changed");
        draft.toggle_item(2);
        draft.remove_item(1);

        // A second independent fetch of the record is unaffected
        assert_eq!(todo.tasks, vec![item("A", true), item("", false), item("B", false)]);
    }

    #[test]
    fn add_item_appends_exactly_one_empty_item() {
        let mut draft = EditDraft::seed(&sample_todo());
        let before = draft.tasks.len();

        draft.add_item();

        assert_eq!(draft.tasks.len(), before + 1);
        assert_eq!(*draft.tasks.last().unwrap(), item("", false));
    }

    #[test]
    fn remove_item_preserves_relative_order() {
        let mut draft = EditDraft::seed(&sample_todo());

        draft.remove_item(1);

        assert_eq!(draft.tasks, vec![item("A", true), item("B", false)]);
    }

    #[test]
    fn remove_item_out_of_range_is_a_noop() {
        let mut draft = EditDraft::seed(&sample_todo());

        draft.remove_item(99);

        assert_eq!(draft.tasks.len(), 3);
    }

    #[test]
    fn toggle_item_flips_only_the_target() {
        let mut draft = EditDraft::seed(&sample_todo());

        draft.toggle_item(2);
        assert!(draft.tasks[2].completed);
        assert!(draft.tasks[0].completed);

        draft.toggle_item(2);
        assert!(!draft.tasks[2].completed);
    }

    #[test]
    fn progress_counts_done_over_total() {
        let draft = EditDraft::seed(&sample_todo());
        assert_eq!(draft.progress(), (1, 3));
    }

    #[test]
    fn validate_strips_empty_titles_from_payload() {
        let draft = EditDraft::seed(&sample_todo());

        let payload = draft.validate().unwrap();

        assert_eq!(payload.tasks, vec![item("A", true), item("B", false)]);
        assert_eq!(payload.priority, Priority::High);
        assert_eq!(payload.assigned_to, "dev@example.com");
    }

    #[test]
    fn validate_rejects_all_empty_checklist() {
        let mut draft = EditDraft::seed(&sample_todo());
        draft.tasks = vec![item("", false), item("", true)];

        assert!(draft.validate().is_err());
    }

    #[test]
    fn validate_rejects_missing_priority() {
        let mut draft = EditDraft::seed(&sample_todo());
        draft.priority = None;

        assert!(draft.validate().is_err());
    }

    #[test]
    fn validate_allows_empty_assignee() {
        let mut draft = EditDraft::seed(&sample_todo());
        draft.set_assigned_to("");

        assert!(draft.validate().is_ok());
    }

    #[test]
    fn picking_a_date_closes_the_calendar() {
        let mut draft = EditDraft::seed(&sample_todo());
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        draft.open_calendar(today);
        assert!(draft.calendar.is_some());

        draft.set_date(today);
        assert!(draft.calendar.is_none());
        assert_eq!(draft.date, Some(today));
    }

    #[test]
    fn field_cycle_is_a_loop() {
        let mut field = EditField::Title;
        for _ in 0..6 {
            field = field.next();
        }
        assert_eq!(field, EditField::Title);
        assert_eq!(EditField::Title.prev(), EditField::DueDate);
    }
}
