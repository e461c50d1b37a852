//! Task snapshots: the canonical list serialized as a JSON array under a
//! fixed store key.
//!
//! Decoding is tolerant. Field defaults cover records written before a field
//! existed, a record that still cannot be read is dropped on its own, and a
//! payload that is not an array at all is moved aside to [`CORRUPT_KEY`] so
//! the session can start empty without losing it.

use std::collections::HashSet;

use crate::io::store::{KeyValueStore, StoreError};
use crate::model::task::Task;

/// Store key holding the task snapshot
pub const STORAGE_KEY: &str = "todos";

/// Store key receiving an unreadable snapshot
pub const CORRUPT_KEY: &str = "todos.corrupt";

/// Result of decoding a snapshot
#[derive(Debug, Default)]
pub struct Decoded {
    pub tasks: Vec<Task>,
    /// Records skipped because they could not be read or repeated an id
    pub dropped: usize,
}

/// Result of loading from a store
#[derive(Debug, Default)]
pub struct LoadReport {
    pub tasks: Vec<Task>,
    pub dropped: usize,
    /// The snapshot was unreadable and was moved to [`CORRUPT_KEY`]
    pub corrupt: bool,
}

pub fn encode_tasks(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(tasks)
}

/// Decode a snapshot record by record. Fails only when `raw` is not a JSON
/// array.
pub fn decode_tasks(raw: &str) -> Result<Decoded, serde_json::Error> {
    let records: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let mut decoded = Decoded::default();
    let mut seen = HashSet::new();

    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Task>(record) {
            Ok(task) => {
                if seen.insert(task.id.clone()) {
                    decoded.tasks.push(task);
                } else {
                    log::warn!("event=record_dropped index={} reason=duplicate_id", index);
                    decoded.dropped += 1;
                }
            }
            Err(e) => {
                log::warn!("event=record_dropped index={} reason={}", index, e);
                decoded.dropped += 1;
            }
        }
    }
    Ok(decoded)
}

/// Load the snapshot from `store`. An absent snapshot is an empty list.
pub fn load_tasks<S: KeyValueStore>(store: &mut S) -> Result<LoadReport, StoreError> {
    let raw = match store.get(STORAGE_KEY)? {
        Some(raw) => raw,
        None => return Ok(LoadReport::default()),
    };

    match decode_tasks(&raw) {
        Ok(decoded) => {
            log::info!(
                "event=store_load tasks={} dropped={}",
                decoded.tasks.len(),
                decoded.dropped
            );
            Ok(LoadReport {
                tasks: decoded.tasks,
                dropped: decoded.dropped,
                corrupt: false,
            })
        }
        Err(e) => {
            log::warn!("event=store_corrupt key={} error={}", STORAGE_KEY, e);
            if let Err(e) = store.set(CORRUPT_KEY, &raw) {
                log::error!("event=store_quarantine_failed error={}", e);
            }
            Ok(LoadReport {
                corrupt: true,
                ..LoadReport::default()
            })
        }
    }
}

pub fn save_tasks<S: KeyValueStore>(store: &mut S, tasks: &[Task]) -> Result<(), StoreError> {
    let data = encode_tasks(tasks)?;
    store.set(STORAGE_KEY, &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;
    use crate::model::task::{Category, Priority, TaskId};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Task> {
        let mut done = Task::new(
            TaskId::from("2"),
            "Call &quot;mom&quot;".into(),
            Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap(),
            Category::Health,
            Priority::Low,
        );
        done.completed = true;
        vec![
            Task::new(
                TaskId::from("1"),
                "Buy milk".into(),
                Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
                Category::Shopping,
                Priority::High,
            ),
            done,
        ]
    }

    #[test]
    fn save_then_load_is_identical() {
        let mut store = MemoryStore::new();
        let tasks = sample();
        save_tasks(&mut store, &tasks).unwrap();
        let report = load_tasks(&mut store).unwrap();
        assert_eq!(report.tasks, tasks);
        assert_eq!(report.dropped, 0);
        assert!(!report.corrupt);
    }

    #[test]
    fn absent_snapshot_is_empty() {
        let mut store = MemoryStore::new();
        let report = load_tasks(&mut store).unwrap();
        assert!(report.tasks.is_empty());
        assert!(!report.corrupt);
    }

    #[test]
    fn legacy_record_without_priority() {
        let raw = r#"[
            {"id":"1700000000000","text":"legacy","completed":false,
             "createdAt":"2023-11-14T22:13:20.000Z","category":"work"}
        ]"#;
        let decoded = decode_tasks(raw).unwrap();
        assert_eq!(decoded.tasks.len(), 1);
        let task = &decoded.tasks[0];
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.category, Category::Work);
        assert_eq!(
            task.created_at,
            Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()
        );
    }

    #[test]
    fn bad_records_are_dropped_individually() {
        let raw = r#"[
            {"id":"1","text":"ok","createdAt":"2024-01-01T00:00:00Z"},
            {"id":"2","text":"bad date","createdAt":"yesterday"},
            {"text":"no id","createdAt":"2024-01-01T00:00:00Z"},
            {"id":"1","text":"dup","createdAt":"2024-01-01T00:00:00Z"},
            {"id":"3","text":"bad priority","createdAt":"2024-01-01T00:00:00Z","priority":"urgent"}
        ]"#;
        let decoded = decode_tasks(raw).unwrap();
        assert_eq!(decoded.tasks.len(), 1);
        assert_eq!(decoded.tasks[0].text, "ok");
        assert_eq!(decoded.dropped, 4);
    }

    #[test]
    fn corrupt_snapshot_is_quarantined() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();

        let report = load_tasks(&mut store).unwrap();
        assert!(report.corrupt);
        assert!(report.tasks.is_empty());
        assert_eq!(store.get(CORRUPT_KEY).unwrap().as_deref(), Some("{not json"));
        // original stays until the next save overwrites it
        assert_eq!(store.get(STORAGE_KEY).unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn non_array_json_is_corrupt() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"tasks":[]}"#).unwrap();
        assert!(load_tasks(&mut store).unwrap().corrupt);
    }
}
