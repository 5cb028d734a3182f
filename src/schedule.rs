//! Schedule Controller
//!
//! Owns the event store, the selected date and the displayed month. Every
//! user action goes through one of these methods.

use chrono::NaiveDate;

use crate::action::EventAction;
use crate::calendar::MonthGrid;
use crate::dates::MonthCursor;
use crate::editor::{EditorMode, EventEditor};
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{Event, EventId};
use crate::store::EventStore;

pub struct Schedule {
    store: EventStore,
    selected: Option<NaiveDate>,
    cursor: MonthCursor,
}

impl Schedule {
    /// Start on `today`'s month with `today` selected
    pub fn new(store: EventStore, today: NaiveDate) -> Self {
        Self {
            store,
            selected: Some(today),
            cursor: MonthCursor::containing(today),
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn select(&mut self, date: NaiveDate) {
        self.selected = Some(date);
    }

    pub fn show_previous_month(&mut self) {
        self.cursor = self.cursor.previous();
    }

    pub fn show_next_month(&mut self) {
        self.cursor = self.cursor.next();
    }

    pub fn month_grid(&self, today: NaiveDate) -> MonthGrid {
        MonthGrid::build(self.cursor, &self.store, today, self.selected)
    }

    /// Events of the selected date
    pub fn selected_items(&self) -> &[Event] {
        match self.selected {
            Some(date) => self.store.items(date),
            None => &[],
        }
    }

    pub fn selected_notes(&self) -> &str {
        match self.selected {
            Some(date) => self.store.notes(date),
            None => "",
        }
    }

    // ========================
    // Editor
    // ========================

    pub fn open_editor(&self, date: NaiveDate, id: Option<&EventId>) -> EventEditor {
        EventEditor::open(date, id, &self.store)
    }

    /// Create-mode editor for the selected date, selecting `today` if needed
    pub fn open_editor_for_selection(&mut self, today: NaiveDate) -> EventEditor {
        let date = *self.selected.get_or_insert(today);
        self.open_editor(date, None)
    }

    /// `e<millis>`, suffixed until unused
    fn fresh_id(&self, now_millis: u64) -> EventId {
        let mut id = EventId::from_timestamp(now_millis);
        let mut n = 1;
        while self.store.contains_id(&id) {
            id = EventId::new(format!("e{}-{}", now_millis, n));
            n += 1;
        }
        id
    }

    /// Validate and apply the editor form. On success the editor closes and
    /// the start date becomes the selection; on error nothing changes.
    pub fn submit(&mut self, editor: &mut EventEditor, now_millis: u64) -> ScheduleResult<NaiveDate> {
        let (mode, form) = match editor {
            EventEditor::Open { mode, form, .. } => (mode.clone(), form.clone()),
            EventEditor::Closed => return Err(ScheduleError::EditorClosed),
        };
        form.validate()?;

        let start = match mode {
            EditorMode::Edit(id) => {
                let event = form.to_event(id.clone())?;
                let start = event.start;
                self.store.replace_event(&id, Some(event))?;
                start
            }
            EditorMode::Create => {
                let event = form.to_event(self.fresh_id(now_millis))?;
                let start = event.start;
                self.store.upsert_event(event)?;
                start
            }
        };

        editor.close();
        self.selected = Some(start);
        Ok(start)
    }

    /// Delete every copy of the event bound to the editor, then close it
    pub fn delete_all_from_editor(&mut self, editor: &mut EventEditor) -> ScheduleResult<usize> {
        let id = editor.bound_id().cloned().ok_or(ScheduleError::NoEventBound)?;
        let removed = self.store.delete_all_by_id(&id)?;
        editor.close();
        Ok(removed)
    }

    // ========================
    // Event List
    // ========================

    /// Apply a list action to the event at `index` of the selected date
    pub fn dispatch(
        &mut self,
        action: EventAction,
        index: usize,
        editor: &mut EventEditor,
    ) -> ScheduleResult<()> {
        let date = self.selected.ok_or(ScheduleError::NoDateSelected)?;
        let id = self
            .store
            .items(date)
            .get(index)
            .map(|event| event.id.clone())
            .ok_or(ScheduleError::EventNotFound { date, index })?;

        match action {
            EventAction::Edit => {
                *editor = self.open_editor(date, Some(&id));
            }
            EventAction::Delete => {
                self.store.delete_one(date, index)?;
            }
            EventAction::DeleteAll => {
                self.store.delete_all_by_id(&id)?;
            }
        }
        Ok(())
    }

    // ========================
    // Notes
    // ========================

    pub fn save_notes(&mut self, text: &str) -> ScheduleResult<()> {
        let date = self.selected.ok_or(ScheduleError::NoDateSelected)?;
        self.store.set_notes(date, text)
    }

    pub fn clear_notes(&mut self) -> ScheduleResult<()> {
        let date = self.selected.ok_or(ScheduleError::NoDateSelected)?;
        self.store.clear_notes(date)
    }
}
