//! Month Grid
//!
//! Fixed 6x7 month view model used by the calendar component.

use chrono::NaiveDate;

use crate::dates::MonthCursor;
use crate::store::EventStore;

/// Cells in every month view (6 weeks x 7 days)
pub const GRID_CELLS: usize = 42;

/// Column headers, Sunday first
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One cell of the month view. `date` is `None` for padding cells.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
    pub date: Option<NaiveDate>,
    pub has_events: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

impl CalendarCell {
    fn padding() -> Self {
        Self { date: None, has_events: false, is_today: false, is_selected: false }
    }

    pub fn day(&self) -> Option<u32> {
        use chrono::Datelike;
        self.date.map(|d| d.day())
    }

    pub fn css_class(&self) -> String {
        let mut class = String::from("calendar-cell");
        if self.date.is_none() { class.push_str(" empty"); }
        if self.is_today { class.push_str(" today"); }
        if self.is_selected { class.push_str(" selected"); }
        class
    }
}

/// The 42 cells of one month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub cursor: MonthCursor,
    pub cells: Vec<CalendarCell>,
}

impl MonthGrid {
    /// Cell `i` shows day `i - first_weekday + 1`; days outside the month are padding
    pub fn build(
        cursor: MonthCursor,
        store: &EventStore,
        today: NaiveDate,
        selected: Option<NaiveDate>,
    ) -> Self {
        let first = cursor.first_weekday() as i64;
        let days = cursor.days_in_month() as i64;

        let cells = (0..GRID_CELLS as i64)
            .map(|i| {
                let day = i - first + 1;
                if day < 1 || day > days {
                    return CalendarCell::padding();
                }
                match cursor.day(day as u32) {
                    Some(date) => CalendarCell {
                        date: Some(date),
                        has_events: store.has_events(date),
                        is_today: date == today,
                        is_selected: selected == Some(date),
                    },
                    None => CalendarCell::padding(),
                }
            })
            .collect();

        Self { cursor, cells }
    }
}

#[cfg(test)]
impl MonthGrid {
    pub fn in_month_count(&self) -> usize {
        self.cells.iter().filter(|c| c.date.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, EventId};
    use crate::storage::MemoryStorage;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn empty_store() -> EventStore {
        EventStore::load(Box::new(MemoryStorage::default()), "test")
    }

    #[test]
    fn test_every_month_has_42_cells() {
        let store = empty_store();
        let mut cursor = MonthCursor::containing(ymd(2023, 1, 1));
        for _ in 0..36 {
            let grid = MonthGrid::build(cursor, &store, ymd(2000, 1, 1), None);
            assert_eq!(grid.cells.len(), GRID_CELLS);
            assert_eq!(grid.in_month_count(), cursor.days_in_month() as usize);
            cursor = cursor.next();
        }
    }

    #[test]
    fn test_leading_padding_matches_first_weekday() {
        // 2024-06-01 is a Saturday: six padding cells, then day 1
        let grid = MonthGrid::build(MonthCursor::containing(ymd(2024, 6, 1)), &empty_store(), ymd(2000, 1, 1), None);
        assert!(grid.cells[..6].iter().all(|c| c.date.is_none()));
        assert_eq!(grid.cells[6].day(), Some(1));
        assert_eq!(grid.cells[35].day(), Some(30));
        assert!(grid.cells[36..].iter().all(|c| c.date.is_none()));
    }

    #[test]
    fn test_markers_today_and_selection() {
        let mut store = empty_store();
        let day = ymd(2024, 6, 12);
        store
            .upsert_event(Event {
                id: EventId::new("e1"),
                title: "Review".to_string(),
                time: None,
                desc: None,
                start: day,
                end: day,
            })
            .unwrap();
        store.set_notes(ymd(2024, 6, 13), "notes only").unwrap();

        let today = ymd(2024, 6, 14);
        let grid = MonthGrid::build(MonthCursor::containing(day), &store, today, Some(day));

        let cell = |d: NaiveDate| grid.cells.iter().find(|c| c.date == Some(d)).unwrap();
        assert!(cell(day).has_events);
        assert!(cell(day).is_selected);
        assert!(!cell(ymd(2024, 6, 13)).has_events);
        assert!(cell(today).is_today);
        assert_eq!(cell(today).css_class(), "calendar-cell today");
        assert_eq!(grid.cells.iter().filter(|c| c.is_today).count(), 1);
    }

    #[test]
    fn test_today_outside_month_is_not_flagged() {
        let grid = MonthGrid::build(MonthCursor::containing(ymd(2024, 6, 1)), &empty_store(), ymd(2024, 7, 1), None);
        assert!(grid.cells.iter().all(|c| !c.is_today));
    }
}
