//! Schedule Configuration

/// Storage slot holding the whole calendar as one JSON blob
pub const DEFAULT_STORAGE_KEY: &str = "site_events";

/// Static settings for the calendar page
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleConfig {
    /// `localStorage` key for the persisted store
    pub storage_key: String,
    /// Placeholder shown when the selected date has no events
    pub empty_list_text: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            empty_list_text: "No events".to_string(),
        }
    }
}
