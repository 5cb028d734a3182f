//! Schedule Errors
//!
//! Every failure the calendar can hit is either recovered silently (bad stored
//! data) or reported to the user with the action aborted.

use chrono::NaiveDate;

/// Common result type for schedule operations
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Schedule-level errors
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// Start or end date left empty in the event form
    MissingDates,
    /// A date field that is not `YYYY-MM-DD`
    InvalidDate(String),
    /// End date falls before the start date
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// Action needs a selected date and none is selected
    NoDateSelected,
    /// Delete-all from the editor without an event bound to it
    NoEventBound,
    /// Submit while the editor is closed
    EditorClosed,
    /// List position no longer holds an event
    EventNotFound { date: NaiveDate, index: usize },
    /// Reading or writing the persistent slot failed
    Storage(String),
}

impl ScheduleError {
    /// Message shown to the user, or `None` for errors that are only logged.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            ScheduleError::MissingDates | ScheduleError::InvalidDate(_) => {
                Some("Please choose start and end dates")
            }
            ScheduleError::InvalidRange { .. } => Some("End date must be same or after start date"),
            ScheduleError::NoDateSelected => Some("Select a date first"),
            ScheduleError::NoEventBound => Some("No event selected to delete across all dates."),
            ScheduleError::Storage(_) => Some("Could not save your calendar in this browser."),
            ScheduleError::EditorClosed | ScheduleError::EventNotFound { .. } => None,
        }
    }
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::MissingDates => write!(f, "Start and end dates are required"),
            ScheduleError::InvalidDate(value) => write!(f, "Invalid date: {:?}", value),
            ScheduleError::InvalidRange { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
            ScheduleError::NoDateSelected => write!(f, "No date selected"),
            ScheduleError::NoEventBound => write!(f, "No event bound to the editor"),
            ScheduleError::EditorClosed => write!(f, "Editor is not open"),
            ScheduleError::EventNotFound { date, index } => {
                write!(f, "No event at position {} on {}", index, date)
            }
            ScheduleError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for ScheduleError {}
