//! Date Utilities
//!
//! Timezone-free calendar arithmetic. Dates are always built from calendar
//! components, never by parsing through a timezone-aware constructor.

use chrono::{Datelike, Months, NaiveDate};

/// Storage and form format for dates
pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string
pub fn parse_iso(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_FORMAT).ok()
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Every date in `[start, end]`, inclusive. Empty when `end < start`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// Today's date in the browser's local timezone
pub fn today_local() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .unwrap_or_default()
}

/// Unix timestamp in milliseconds
pub fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

/// The month currently shown by the calendar (always the first of the month)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthCursor(NaiveDate);

impl MonthCursor {
    /// Cursor for the month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month number, 1-based
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Weekday of the 1st, counted from Sunday = 0
    pub fn first_weekday(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    pub fn days_in_month(&self) -> u32 {
        match self.0.checked_add_months(Months::new(1)) {
            Some(next) => (next - self.0).num_days() as u32,
            None => 31,
        }
    }

    /// Date of `day` within this month, if it exists
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year(), self.month(), day)
    }

    pub fn next(&self) -> Self {
        self.0.checked_add_months(Months::new(1)).map(Self).unwrap_or(*self)
    }

    pub fn previous(&self) -> Self {
        self.0.checked_sub_months(Months::new(1)).map(Self).unwrap_or(*self)
    }

    /// Label such as `June 2024`
    pub fn label(&self) -> String {
        self.0.format("%B %Y").to_string()
    }
}

#[cfg(test)]
impl MonthCursor {
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}
