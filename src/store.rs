//! Event Store
//!
//! Date-indexed events and notes, mirrored in full to one storage slot after
//! every mutation. Dates with no events and blank notes are dropped.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::dates::{date_range, format_iso, parse_iso};
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{DateRecord, Event, EventId};
use crate::storage::KeyValueStorage;

// ========================
// Persisted Shapes
// ========================

/// Per-date value as found in storage: current `{items, notes}` or a bare list
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRecord {
    Legacy(Vec<RawEvent>),
    Current {
        #[serde(default)]
        items: Vec<RawEvent>,
        #[serde(default)]
        notes: Option<String>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawEvent {
    id: Option<RawId>,
    title: Option<String>,
    time: Option<String>,
    desc: Option<String>,
    start: Option<String>,
    end: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RawEvent {
    fn normalize(self, bucket: NaiveDate, position: usize) -> Event {
        let id = match self.id {
            Some(RawId::Text(id)) if !id.is_empty() => EventId::new(id),
            Some(RawId::Number(n)) => EventId::new(n.to_string()),
            _ => EventId::new(format!("legacy-{}-{}", format_iso(bucket), position)),
        };
        let start = self.start.as_deref().and_then(parse_iso).unwrap_or(bucket);
        let end = self
            .end
            .as_deref()
            .and_then(parse_iso)
            .filter(|end| *end >= start)
            .unwrap_or(start);
        Event {
            id,
            title: self.title.unwrap_or_default(),
            time: non_blank(self.time),
            desc: non_blank(self.desc),
            start,
            end,
        }
    }
}

impl RawRecord {
    fn normalize(self, bucket: NaiveDate) -> DateRecord {
        let (items, notes) = match self {
            RawRecord::Legacy(items) => (items, String::new()),
            RawRecord::Current { items, notes } => (items, notes.unwrap_or_default()),
        };
        DateRecord {
            items: items
                .into_iter()
                .enumerate()
                .map(|(position, raw)| raw.normalize(bucket, position))
                .collect(),
            notes,
        }
    }
}

/// Parse a persisted blob. Malformed JSON yields an empty mapping; a single
/// malformed record is dropped without touching its siblings.
fn parse_records(json: &str) -> BTreeMap<NaiveDate, DateRecord> {
    let raw: BTreeMap<String, serde_json::Value> = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Discarding malformed stored calendar: {}", e);
            return BTreeMap::new();
        }
    };

    let mut records = BTreeMap::new();
    for (key, value) in raw {
        let Some(date) = parse_iso(&key) else {
            tracing::warn!("Dropping stored record with invalid date key {:?}", key);
            continue;
        };
        let value: RawRecord = match serde_json::from_value(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Dropping malformed stored record for {}: {}", key, e);
                continue;
            }
        };
        let record = value.normalize(date);
        if !record.is_empty() {
            records.insert(date, record);
        }
    }
    records
}

// ========================
// Store
// ========================

/// In-memory mapping from date to events and notes, backed by storage
pub struct EventStore {
    records: BTreeMap<NaiveDate, DateRecord>,
    backend: Box<dyn KeyValueStorage>,
    key: String,
}

impl EventStore {
    /// Load from `backend[key]`, upgrading legacy per-date lists
    pub fn load(backend: Box<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let records = match backend.get(&key) {
            Ok(Some(json)) => parse_records(&json),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Could not read stored calendar: {}", e);
                BTreeMap::new()
            }
        };
        tracing::debug!("Loaded {} dated records from {:?}", records.len(), key);
        Self { records, backend, key }
    }

    /// Serialize the whole mapping as it is persisted
    pub fn to_json(&self) -> ScheduleResult<String> {
        let by_key: BTreeMap<String, &DateRecord> = self
            .records
            .iter()
            .map(|(date, record)| (format_iso(*date), record))
            .collect();
        serde_json::to_string(&by_key).map_err(|e| ScheduleError::Storage(e.to_string()))
    }

    /// Write the full mapping to storage
    pub fn save(&self) -> ScheduleResult<()> {
        let json = self.to_json()?;
        self.backend.set(&self.key, &json).map_err(|e| {
            tracing::error!("Failed to persist calendar: {}", e);
            e
        })
    }

    /// Save, or put `snapshot` back so memory matches what storage last held
    fn commit(&mut self, snapshot: BTreeMap<NaiveDate, DateRecord>) -> ScheduleResult<()> {
        if let Err(e) = self.save() {
            tracing::warn!("Rolling back unsaved change");
            self.records = snapshot;
            return Err(e);
        }
        Ok(())
    }

    /// Drop the record for `date` if it holds nothing. Returns true if removed.
    fn cleanup(&mut self, date: NaiveDate) -> bool {
        let empty = self.records.get(&date).is_some_and(DateRecord::is_empty);
        if empty {
            self.records.remove(&date);
        }
        empty
    }

    fn insert_copies(&mut self, event: &Event) -> usize {
        let mut count = 0;
        for date in date_range(event.start, event.end) {
            self.records.entry(date).or_default().items.push(event.clone());
            count += 1;
        }
        count
    }

    fn remove_copies(&mut self, id: &EventId) -> usize {
        let mut removed = 0;
        let dates: Vec<NaiveDate> = self.records.keys().copied().collect();
        for date in dates {
            if let Some(record) = self.records.get_mut(&date) {
                let before = record.items.len();
                record.items.retain(|item| &item.id != id);
                removed += before - record.items.len();
            }
            self.cleanup(date);
        }
        removed
    }

    // ========================
    // Mutations
    // ========================

    /// Append a copy of `event` to every date it spans
    pub fn upsert_event(&mut self, event: Event) -> ScheduleResult<()> {
        let snapshot = self.records.clone();
        let count = self.insert_copies(&event);
        tracing::debug!("Created event {} on {} date(s)", event.id, count);
        self.commit(snapshot)
    }

    /// Remove every copy of `id`, then insert `replacement` under the same id
    pub fn replace_event(&mut self, id: &EventId, replacement: Option<Event>) -> ScheduleResult<()> {
        let snapshot = self.records.clone();
        let removed = self.remove_copies(id);
        let inserted = match replacement {
            Some(mut event) => {
                event.id = id.clone();
                self.insert_copies(&event)
            }
            None => 0,
        };
        tracing::debug!("Replaced event {}: removed {}, inserted {}", id, removed, inserted);
        self.commit(snapshot)
    }

    /// Remove the event at `index` on `date`
    pub fn delete_one(&mut self, date: NaiveDate, index: usize) -> ScheduleResult<Event> {
        let snapshot = self.records.clone();
        let record = self
            .records
            .get_mut(&date)
            .filter(|record| index < record.items.len())
            .ok_or(ScheduleError::EventNotFound { date, index })?;
        let removed = record.items.remove(index);
        self.cleanup(date);
        tracing::debug!("Deleted event {} on {}", removed.id, date);
        self.commit(snapshot)?;
        Ok(removed)
    }

    /// Remove every copy of `id` across all dates
    pub fn delete_all_by_id(&mut self, id: &EventId) -> ScheduleResult<usize> {
        let snapshot = self.records.clone();
        let removed = self.remove_copies(id);
        tracing::debug!("Deleted all {} copies of event {}", removed, id);
        self.commit(snapshot)?;
        Ok(removed)
    }

    pub fn set_notes(&mut self, date: NaiveDate, text: &str) -> ScheduleResult<()> {
        let snapshot = self.records.clone();
        self.records.entry(date).or_default().notes = text.to_string();
        self.cleanup(date);
        self.commit(snapshot)
    }

    pub fn clear_notes(&mut self, date: NaiveDate) -> ScheduleResult<()> {
        let snapshot = self.records.clone();
        if let Some(record) = self.records.get_mut(&date) {
            record.notes.clear();
        }
        self.cleanup(date);
        self.commit(snapshot)
    }

    // ========================
    // Queries
    // ========================

    pub fn items(&self, date: NaiveDate) -> &[Event] {
        self.records.get(&date).map(|r| r.items.as_slice()).unwrap_or(&[])
    }

    pub fn notes(&self, date: NaiveDate) -> &str {
        self.records.get(&date).map(|r| r.notes.as_str()).unwrap_or("")
    }

    pub fn has_events(&self, date: NaiveDate) -> bool {
        !self.items(date).is_empty()
    }

    /// A stored copy of `id`. All copies are identical, so any one will do.
    pub fn find_by_id(&self, id: &EventId) -> Option<&Event> {
        self.records
            .values()
            .flat_map(|record| record.items.iter())
            .find(|item| &item.id == id)
    }

    pub fn contains_id(&self, id: &EventId) -> bool {
        self.find_by_id(id).is_some()
    }
}

#[cfg(test)]
impl EventStore {
    pub fn records(&self) -> &BTreeMap<NaiveDate, DateRecord> {
        &self.records
    }

    pub fn record(&self, date: NaiveDate) -> Option<&DateRecord> {
        self.records.get(&date)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FlakyStorage, MemoryStorage};

    const KEY: &str = "site_events";

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_event(id: &str, start: NaiveDate, end: NaiveDate) -> Event {
        Event {
            id: EventId::new(id),
            title: format!("Event {}", id),
            time: None,
            desc: None,
            start,
            end,
        }
    }

    fn setup_store() -> (EventStore, MemoryStorage) {
        let backend = MemoryStorage::default();
        let store = EventStore::load(Box::new(backend.clone()), KEY);
        (store, backend)
    }

    fn persisted(backend: &MemoryStorage) -> serde_json::Value {
        let json = backend.get(KEY).unwrap().expect("nothing persisted");
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_upsert_fans_out_over_range() {
        let (mut store, backend) = setup_store();
        store.upsert_event(make_event("e1", ymd(2024, 6, 1), ymd(2024, 6, 3))).unwrap();

        assert_eq!(store.len(), 3);
        for day in 1..=3 {
            let items = store.items(ymd(2024, 6, day));
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].id.as_str(), "e1");
        }
        let saved = persisted(&backend);
        assert_eq!(saved["2024-06-02"]["items"][0]["id"], "e1");
        assert_eq!(saved["2024-06-02"]["notes"], "");
    }

    #[test]
    fn test_replace_shrinks_range() {
        let (mut store, backend) = setup_store();
        store.upsert_event(make_event("e1", ymd(2024, 6, 1), ymd(2024, 6, 3))).unwrap();

        let id = EventId::new("e1");
        let edited = make_event("ignored", ymd(2024, 6, 2), ymd(2024, 6, 2));
        store.replace_event(&id, Some(edited)).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.record(ymd(2024, 6, 1)).is_none());
        assert!(store.record(ymd(2024, 6, 3)).is_none());
        assert_eq!(store.items(ymd(2024, 6, 2))[0].id, id);
        assert!(persisted(&backend).get("2024-06-01").is_none());
    }

    #[test]
    fn test_replace_keeps_dates_with_notes() {
        let (mut store, _) = setup_store();
        store.upsert_event(make_event("e1", ymd(2024, 6, 1), ymd(2024, 6, 2))).unwrap();
        store.set_notes(ymd(2024, 6, 1), "bring cake").unwrap();

        store.replace_event(&EventId::new("e1"), None).unwrap();

        let kept = store.record(ymd(2024, 6, 1)).unwrap();
        assert!(kept.items.is_empty());
        assert_eq!(kept.notes, "bring cake");
        assert!(store.record(ymd(2024, 6, 2)).is_none());
    }

    #[test]
    fn test_delete_one_removes_empty_record() {
        let (mut store, _) = setup_store();
        let day = ymd(2024, 6, 2);
        store.upsert_event(make_event("e1", day, day)).unwrap();

        let removed = store.delete_one(day, 0).unwrap();
        assert_eq!(removed.id.as_str(), "e1");
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_one_by_position() {
        let (mut store, _) = setup_store();
        let day = ymd(2024, 6, 2);
        store.upsert_event(make_event("a", day, day)).unwrap();
        store.upsert_event(make_event("b", day, day)).unwrap();

        store.delete_one(day, 0).unwrap();
        assert_eq!(store.items(day).len(), 1);
        assert_eq!(store.items(day)[0].id.as_str(), "b");
    }

    #[test]
    fn test_delete_one_out_of_range() {
        let (mut store, _) = setup_store();
        let day = ymd(2024, 6, 2);
        assert_eq!(
            store.delete_one(day, 0),
            Err(ScheduleError::EventNotFound { date: day, index: 0 })
        );
    }

    #[test]
    fn test_delete_all_by_id_only_touches_that_id() {
        let (mut store, _) = setup_store();
        store.upsert_event(make_event("e1", ymd(2024, 6, 1), ymd(2024, 6, 3))).unwrap();
        store.upsert_event(make_event("e2", ymd(2024, 6, 3), ymd(2024, 6, 3))).unwrap();

        let removed = store.delete_all_by_id(&EventId::new("e1")).unwrap();
        assert_eq!(removed, 3);
        assert_eq!(store.len(), 1);
        assert_eq!(store.items(ymd(2024, 6, 3))[0].id.as_str(), "e2");
    }

    #[test]
    fn test_notes_create_and_clear_record() {
        let (mut store, backend) = setup_store();
        let day = ymd(2024, 6, 10);
        store.set_notes(day, "dentist at 4").unwrap();

        let record = store.record(day).unwrap();
        assert!(record.items.is_empty());
        assert_eq!(record.notes, "dentist at 4");
        assert_eq!(persisted(&backend)["2024-06-10"]["notes"], "dentist at 4");

        store.clear_notes(day).unwrap();
        assert!(store.record(day).is_none());
        assert_eq!(persisted(&backend), serde_json::json!({}));
    }

    #[test]
    fn test_blank_notes_are_not_kept() {
        let (mut store, _) = setup_store();
        store.set_notes(ymd(2024, 6, 10), "   ").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_find_by_id() {
        let (mut store, _) = setup_store();
        store.upsert_event(make_event("e1", ymd(2024, 6, 1), ymd(2024, 6, 3))).unwrap();
        let found = store.find_by_id(&EventId::new("e1")).unwrap();
        assert_eq!(found.start, ymd(2024, 6, 1));
        assert_eq!(found.end, ymd(2024, 6, 3));
        assert!(!store.contains_id(&EventId::new("nope")));
    }

    #[test]
    fn test_load_upgrades_legacy_lists() {
        let json = r#"{
            "2024-06-01": [{"id": "e5", "title": "Old", "time": "", "desc": "x"}],
            "2024-06-02": {"items": [], "notes": "keep"}
        }"#;
        let store = EventStore::load(Box::new(MemoryStorage::with_entry(KEY, json)), KEY);

        let legacy = store.record(ymd(2024, 6, 1)).unwrap();
        assert_eq!(legacy.notes, "");
        let event = &legacy.items[0];
        assert_eq!(event.id.as_str(), "e5");
        assert_eq!(event.time, None);
        assert_eq!(event.desc.as_deref(), Some("x"));
        assert_eq!(event.start, ymd(2024, 6, 1));
        assert_eq!(event.end, ymd(2024, 6, 1));
        assert_eq!(store.notes(ymd(2024, 6, 2)), "keep");
    }

    #[test]
    fn test_load_numeric_ids_and_bad_keys() {
        let json = r#"{
            "2024-06-01": {"items": [{"id": 17, "title": "n", "start": "2024-06-01", "end": "2024-06-01"}], "notes": ""},
            "not-a-date": {"items": [], "notes": "lost"},
            "2024-06-05": {"items": [], "notes": ""}
        }"#;
        let store = EventStore::load(Box::new(MemoryStorage::with_entry(KEY, json)), KEY);
        assert_eq!(store.len(), 1);
        assert_eq!(store.items(ymd(2024, 6, 1))[0].id.as_str(), "17");
    }

    #[test]
    fn test_load_malformed_json_is_empty() {
        let store = EventStore::load(Box::new(MemoryStorage::with_entry(KEY, "{not json")), KEY);
        assert!(store.is_empty());
        let store = EventStore::load(Box::new(MemoryStorage::with_entry(KEY, "[1, 2]")), KEY);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_drops_only_malformed_records() {
        let json = r#"{
            "2024-06-01": {"items": [{"id": "e1", "title": "Keep me", "start": "2024-06-01", "end": "2024-06-01"}], "notes": "important"},
            "2024-06-02": {"items": null, "notes": ""},
            "2024-06-03": "junk"
        }"#;
        let backend = MemoryStorage::with_entry(KEY, json);
        let mut store = EventStore::load(Box::new(backend.clone()), KEY);

        assert_eq!(store.len(), 1);
        assert_eq!(store.items(ymd(2024, 6, 1))[0].title, "Keep me");
        assert_eq!(store.notes(ymd(2024, 6, 1)), "important");

        store.set_notes(ymd(2024, 6, 9), "x").unwrap();
        let saved = persisted(&backend);
        assert_eq!(saved["2024-06-01"]["items"][0]["title"], "Keep me");
        assert_eq!(saved["2024-06-01"]["notes"], "important");
        assert_eq!(saved["2024-06-09"]["notes"], "x");
    }

    #[test]
    fn test_failed_save_rolls_back_mutation() {
        let backend = FlakyStorage::failing(1);
        let mut store = EventStore::load(Box::new(backend.clone()), KEY);

        let result = store.upsert_event(make_event("e1", ymd(2024, 6, 1), ymd(2024, 6, 2)));
        assert!(matches!(result, Err(ScheduleError::Storage(_))));
        assert!(store.is_empty());
        assert_eq!(backend.get(KEY).unwrap(), None);

        store.upsert_event(make_event("e1", ymd(2024, 6, 1), ymd(2024, 6, 2))).unwrap();
        assert_eq!(store.items(ymd(2024, 6, 1)).len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_failed_save_restores_deleted_event_and_notes() {
        let backend = FlakyStorage::default();
        let mut store = EventStore::load(Box::new(backend.clone()), KEY);
        let day = ymd(2024, 6, 2);
        store.upsert_event(make_event("e1", day, day)).unwrap();
        store.set_notes(day, "call back").unwrap();
        let before = store.to_json().unwrap();

        backend.fail_writes.set(3);
        assert!(store.delete_one(day, 0).is_err());
        assert!(store.delete_all_by_id(&EventId::new("e1")).is_err());
        assert!(store.clear_notes(day).is_err());

        assert_eq!(store.to_json().unwrap(), before);
        assert_eq!(backend.get(KEY).unwrap(), Some(before));
    }

    #[test]
    fn test_save_and_reload_is_identical() {
        let (mut store, backend) = setup_store();
        let mut event = make_event("e1", ymd(2024, 6, 1), ymd(2024, 6, 2));
        event.time = Some("18:00".to_string());
        event.desc = Some("dinner".to_string());
        store.upsert_event(event).unwrap();
        store.set_notes(ymd(2024, 7, 4), "fireworks").unwrap();

        let reloaded = EventStore::load(Box::new(backend.clone()), KEY);
        assert_eq!(reloaded.records(), store.records());
        assert_eq!(reloaded.to_json().unwrap(), store.to_json().unwrap());
    }
}
