//! The feed file: a capped, newest-first JSON array.
//!
//! Elements are kept as raw `serde_json::Value` so records written by older
//! generator variants pass through a read-modify-write cycle untouched.
//! The whole file is rewritten every cycle; there is no locking and no
//! partial-write protection (single writer assumed).

use crate::event::Event;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors surfaced when writing the feed file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem write failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON encoding failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outcome of reading the feed file.
///
/// Every non-`Loaded` variant collapses to an empty store via
/// [`LoadOutcome::into_events`], but the caller sees which case occurred
/// and can log before collapsing instead of having the distinction erased.
#[derive(Debug)]
pub enum LoadOutcome {
    /// File existed and held a JSON array.
    Loaded(Vec<Value>),

    /// File does not exist yet (first run).
    Absent,

    /// File exists but could not be read.
    Unreadable(io::Error),

    /// File contents are not valid JSON.
    Malformed(serde_json::Error),

    /// Valid JSON, but not an array.
    NotAnArray,
}

impl LoadOutcome {
    /// Collapses to the contained events, treating every failure as empty.
    pub fn into_events(self) -> Vec<Value> {
        match self {
            LoadOutcome::Loaded(events) => events,
            _ => Vec::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }
}

/// Reads the feed file.
///
/// Never fails: absent, unreadable, malformed, and wrong-shape files are
/// all reported as [`LoadOutcome`] variants so the loop can continue with
/// an empty store.
pub fn load(path: &Path) -> LoadOutcome {
    if !path.exists() {
        return LoadOutcome::Absent;
    }
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => return LoadOutcome::Unreadable(e),
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(events)) => LoadOutcome::Loaded(events),
        Ok(_) => LoadOutcome::NotAnArray,
        Err(e) => LoadOutcome::Malformed(e),
    }
}

/// Overwrites the feed file with the full array, pretty-printed, creating
/// parent directories as needed. Non-ASCII text is written literally.
pub fn save(path: &Path, events: &[Value]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(events)?;
    fs::write(path, json)?;
    Ok(())
}

/// Prepends `event` (newest-first) and truncates to the newest `keep`
/// entries.
pub fn append_and_trim(events: &mut Vec<Value>, event: &Event, keep: usize) -> Result<(), StoreError> {
    events.insert(0, serde_json::to_value(event)?);
    events.truncate(keep);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Candidate;
    use chrono::Utc;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::json;

    fn sample_event(seed: u64) -> Event {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Candidate {
            place: "Simulated (Andaman Sea)",
            lat: 8.2,
            lon: 97.2,
            magnitude: 8.1,
            depth: 12.0,
            tsunami: true,
        }
        .into_event(&mut rng, Utc::now())
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quake.json");

        let events: Vec<Value> = (0..3)
            .map(|i| serde_json::to_value(sample_event(i)).unwrap())
            .collect();
        save(&path, &events).unwrap();

        let outcome = load(&path);
        assert!(outcome.is_loaded());
        assert_eq!(outcome.into_events(), events);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dist").join("quake.json");

        save(&path, &[]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_preserves_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quake.json");

        save(&path, &[json!({"place": "จำลอง (Simulated)"})]).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("จำลอง"));
        assert!(!raw.contains("\\u"));
    }

    #[test]
    fn test_absent_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = load(&dir.path().join("missing.json"));
        assert!(matches!(outcome, LoadOutcome::Absent));
        assert!(outcome.into_events().is_empty());
    }

    #[test]
    fn test_invalid_json_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quake.json");
        fs::write(&path, "{not json").unwrap();

        let outcome = load(&path);
        assert!(matches!(outcome, LoadOutcome::Malformed(_)));
        assert!(outcome.into_events().is_empty());
    }

    #[test]
    fn test_non_array_json_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quake.json");
        fs::write(&path, r#"{"id": "sim-000001"}"#).unwrap();

        let outcome = load(&path);
        assert!(matches!(outcome, LoadOutcome::NotAnArray));
        assert!(outcome.into_events().is_empty());
    }

    #[test]
    fn test_foreign_shapes_survive_a_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quake.json");

        // Legacy-variant record with tsunamiWarning/location fields
        let legacy = json!({
            "id": "sim_20250328",
            "location": "Chiang Mai",
            "tsunamiWarning": "no"
        });
        save(&path, std::slice::from_ref(&legacy)).unwrap();

        let mut events = load(&path).into_events();
        append_and_trim(&mut events, &sample_event(9), 120).unwrap();
        save(&path, &events).unwrap();

        let events = load(&path).into_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], legacy);
    }

    proptest! {
        #[test]
        fn prop_retention_invariant(prev_len in 0usize..15, keep in 0usize..10) {
            let mut events: Vec<Value> = (0..prev_len)
                .map(|i| serde_json::to_value(sample_event(i as u64)).unwrap())
                .collect();
            let event = sample_event(999);

            append_and_trim(&mut events, &event, keep).unwrap();

            prop_assert_eq!(events.len(), keep.min(prev_len + 1));
            if keep > 0 {
                prop_assert_eq!(&events[0]["id"], &json!(event.id.clone()));
            }
        }
    }
}
