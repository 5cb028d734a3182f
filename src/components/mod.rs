//! UI Components
//!
//! Leptos components for the calendar page.

mod calendar_grid;
mod event_list;
mod event_modal;
mod note_editor;
mod delete_confirm_button;

pub use calendar_grid::CalendarGrid;
pub use event_list::EventList;
pub use event_modal::EventModal;
pub use note_editor::NoteEditor;
pub use delete_confirm_button::DeleteConfirmButton;
