//! Application Context
//!
//! Shared state provided via Leptos Context API. Components never touch the
//! store directly; they call these methods, which route through `Schedule`
//! and surface errors to the user.

use chrono::NaiveDate;
use leptos::prelude::*;

use crate::action::EventAction;
use crate::config::ScheduleConfig;
use crate::dates::{now_millis, today_local};
use crate::editor::{EventEditor, FormField};
use crate::error::ScheduleResult;
use crate::models::EventId;
use crate::schedule::Schedule;
use crate::store::EventStore;
use crate::storage::open_storage;

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Store, selection and displayed month. Thread-local because the
    /// browser storage handle is not `Send`.
    pub schedule: RwSignal<Schedule, LocalStorage>,
    /// Modal editor state
    pub editor: RwSignal<EventEditor>,
    pub config: StoredValue<ScheduleConfig>,
}

/// Alert the user about a failed action, or log it if it is not user-facing.
/// `None` if the action failed or the signal is gone.
fn report<T>(result: Option<ScheduleResult<T>>) -> Option<T> {
    match result? {
        Ok(value) => Some(value),
        Err(e) => {
            match e.user_message() {
                Some(message) => {
                    tracing::warn!("Action rejected: {}", e);
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message(message);
                    }
                }
                None => tracing::warn!("Action ignored: {}", e),
            }
            None
        }
    }
}

impl AppContext {
    /// Load the store from browser storage and select today
    pub fn new(config: ScheduleConfig) -> Self {
        let store = EventStore::load(open_storage(), config.storage_key.clone());
        let schedule = Schedule::new(store, today_local());
        Self {
            schedule: RwSignal::new_local(schedule),
            editor: RwSignal::new(EventEditor::Closed),
            config: StoredValue::new(config),
        }
    }

    pub fn today(&self) -> NaiveDate {
        today_local()
    }

    pub fn select(&self, date: NaiveDate) {
        self.schedule.update(|s| s.select(date));
    }

    pub fn previous_month(&self) {
        self.schedule.update(|s| s.show_previous_month());
    }

    pub fn next_month(&self) {
        self.schedule.update(|s| s.show_next_month());
    }

    // ========================
    // Editor
    // ========================

    /// Open the modal for `date`, editing `id` if given
    pub fn open_editor(&self, date: NaiveDate, id: Option<EventId>) {
        let editor = self.schedule.with_untracked(|s| s.open_editor(date, id.as_ref()));
        self.editor.set(editor);
    }

    /// "Add event" control: create mode on the selected date (today if none)
    pub fn add_event(&self) {
        let today = self.today();
        if let Some(editor) = self.schedule.try_update(|s| s.open_editor_for_selection(today)) {
            self.editor.set(editor);
        }
    }

    pub fn close_editor(&self) {
        self.editor.set(EventEditor::Closed);
    }

    pub fn set_field(&self, field: FormField, value: String) {
        self.editor.update(|e| e.set_field(field, value));
    }

    pub fn submit_editor(&self) {
        let mut editor = self.editor.get_untracked();
        let result = self.schedule.try_update(|s| s.submit(&mut editor, now_millis()));
        if report(result).is_some() {
            self.editor.set(editor);
        }
    }

    pub fn delete_all_from_editor(&self) {
        let mut editor = self.editor.get_untracked();
        let result = self.schedule.try_update(|s| s.delete_all_from_editor(&mut editor));
        if report(result).is_some() {
            self.editor.set(editor);
        }
    }

    // ========================
    // Event List
    // ========================

    /// Single entry point for the per-event buttons
    pub fn dispatch(&self, action: EventAction, index: usize) {
        let mut editor = self.editor.get_untracked();
        let result = self.schedule.try_update(|s| s.dispatch(action, index, &mut editor));
        if report(result).is_some() && action == EventAction::Edit {
            self.editor.set(editor);
        }
    }

    // ========================
    // Notes
    // ========================

    pub fn save_notes(&self, text: String) {
        report(self.schedule.try_update(|s| s.save_notes(&text)));
    }

    /// Returns true if the notes were cleared
    pub fn clear_notes(&self) -> bool {
        report(self.schedule.try_update(|s| s.clear_notes())).is_some()
    }
}
