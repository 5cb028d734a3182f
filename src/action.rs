//! Event List Actions
//!
//! Buttons on each event row map to one of these, dispatched together with the
//! row index.

/// Action on one event of the selected date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    /// Open the editor pre-filled with the event
    Edit,
    /// Remove the event from this date only
    Delete,
    /// Remove every date copy of the event
    DeleteAll,
}

impl EventAction {
    /// Row buttons, in display order
    pub const ALL: [EventAction; 3] = [EventAction::Edit, EventAction::Delete, EventAction::DeleteAll];

    pub fn label(&self) -> &'static str {
        match self {
            EventAction::Edit => "Edit",
            EventAction::Delete => "Delete",
            EventAction::DeleteAll => "Delete All",
        }
    }

    /// Needs an explicit confirmation before dispatch
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, EventAction::DeleteAll)
    }
}
