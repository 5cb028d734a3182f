//! Event Editor State
//!
//! Modal form state machine: Closed -> Open(Create | Edit) -> Closed.

use chrono::NaiveDate;

use crate::dates::{format_iso, parse_iso};
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{Event, EventId};
use crate::store::EventStore;

/// Editable form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Time,
    Desc,
    Start,
    End,
}

impl FormField {
    /// Form control name
    pub fn name(&self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::Time => "time",
            FormField::Desc => "desc",
            FormField::Start => "start",
            FormField::End => "end",
        }
    }
}

/// Raw form values, as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventForm {
    pub title: String,
    pub time: String,
    pub desc: String,
    pub start: String,
    pub end: String,
}

impl EventForm {
    /// Empty form spanning just `date`
    pub fn blank(date: NaiveDate) -> Self {
        let iso = format_iso(date);
        Self { start: iso.clone(), end: iso, ..Default::default() }
    }

    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            time: event.time.clone().unwrap_or_default(),
            desc: event.desc.clone().unwrap_or_default(),
            start: format_iso(event.start),
            end: format_iso(event.end),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Time => &self.time,
            FormField::Desc => &self.desc,
            FormField::Start => &self.start,
            FormField::End => &self.end,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Title => self.title = value,
            FormField::Time => self.time = value,
            FormField::Desc => self.desc = value,
            FormField::Start => self.start = value,
            FormField::End => self.end = value,
        }
    }

    /// Both dates present and `start <= end`
    pub fn validate(&self) -> ScheduleResult<(NaiveDate, NaiveDate)> {
        if self.start.trim().is_empty() || self.end.trim().is_empty() {
            return Err(ScheduleError::MissingDates);
        }
        let start = parse_iso(&self.start).ok_or_else(|| ScheduleError::InvalidDate(self.start.clone()))?;
        let end = parse_iso(&self.end).ok_or_else(|| ScheduleError::InvalidDate(self.end.clone()))?;
        if end < start {
            return Err(ScheduleError::InvalidRange { start, end });
        }
        Ok((start, end))
    }

    /// Validated event carrying `id`
    pub fn to_event(&self, id: EventId) -> ScheduleResult<Event> {
        let (start, end) = self.validate()?;
        let desc = self.desc.trim();
        Ok(Event {
            id,
            title: self.title.trim().to_string(),
            time: Some(self.time.trim()).filter(|t| !t.is_empty()).map(str::to_string),
            desc: Some(desc).filter(|d| !d.is_empty()).map(str::to_string),
            start,
            end,
        })
    }
}

/// Whether submit creates a new event or rewrites an existing one
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMode {
    Create,
    Edit(EventId),
}

/// Modal editor state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EventEditor {
    #[default]
    Closed,
    Open {
        mode: EditorMode,
        /// Date the modal was opened from
        date: NaiveDate,
        form: EventForm,
    },
}

impl EventEditor {
    /// Open for `date`. With an id that exists in the store, pre-fill from it.
    pub fn open(date: NaiveDate, id: Option<&EventId>, store: &EventStore) -> Self {
        match id.and_then(|id| store.find_by_id(id)) {
            Some(event) => EventEditor::Open {
                mode: EditorMode::Edit(event.id.clone()),
                date,
                form: EventForm::from_event(event),
            },
            None => {
                if let Some(id) = id {
                    tracing::warn!("Event {} not found, opening editor in create mode", id);
                }
                EventEditor::Open { mode: EditorMode::Create, date, form: EventForm::blank(date) }
            }
        }
    }

    pub fn close(&mut self) {
        *self = EventEditor::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, EventEditor::Open { .. })
    }

    pub fn mode(&self) -> Option<&EditorMode> {
        match self {
            EventEditor::Open { mode, .. } => Some(mode),
            EventEditor::Closed => None,
        }
    }

    /// Id of the event being edited
    pub fn bound_id(&self) -> Option<&EventId> {
        match self.mode() {
            Some(EditorMode::Edit(id)) => Some(id),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&EventForm> {
        match self {
            EventEditor::Open { form, .. } => Some(form),
            EventEditor::Closed => None,
        }
    }

    pub fn set_field(&mut self, field: FormField, value: String) {
        if let EventEditor::Open { form, .. } = self {
            form.set(field, value);
        }
    }

    pub fn field(&self, field: FormField) -> String {
        self.form().map(|f| f.get(field).to_string()).unwrap_or_default()
    }

    /// `Add Event — 2024-06-01` / `Edit Event — 2024-06-01`
    pub fn heading(&self) -> String {
        match self {
            EventEditor::Open { mode, date, .. } => {
                let verb = match mode {
                    EditorMode::Create => "Add",
                    EditorMode::Edit(_) => "Edit",
                };
                format!("{} Event — {}", verb, format_iso(*date))
            }
            EventEditor::Closed => String::new(),
        }
    }
}
