//! Durable record of already-fired reminders.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{Duration, NaiveDateTime};
use log::warn;
use minical_core::error::MinicalResult;
use minical_core::event::Event;

/// Ledger entries for events whose start is further in the past than
/// this are eligible for pruning.
const RETENTION_HOURS: i64 = 24;

/// Idempotency token for one dispatched reminder.
///
/// The string form (`event_id:offset_id`) is both the persisted line
/// format and the dedupe tag handed to the platform notifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FiredKey {
    pub event_id: String,
    pub offset_id: String,
}

impl FiredKey {
    pub fn new(event_id: impl Into<String>, offset_id: impl Into<String>) -> Self {
        FiredKey {
            event_id: event_id.into(),
            offset_id: offset_id.into(),
        }
    }

    /// Canonical string form. Event ids are uuids, so `:` never occurs
    /// in the first segment.
    pub fn tag(&self) -> String {
        format!("{}:{}", self.event_id, self.offset_id)
    }

    fn parse(line: &str) -> Option<FiredKey> {
        let (event_id, offset_id) = line.split_once(':')?;
        if event_id.is_empty() || offset_id.is_empty() {
            return None;
        }
        Some(FiredKey::new(event_id, offset_id))
    }
}

impl std::fmt::Display for FiredKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.event_id, self.offset_id)
    }
}

/// Growing set of fired (event, offset) keys, persisted one key per line.
///
/// Loading is fail-open: a missing or unreadable file starts an empty
/// ledger, preferring a possible duplicate notification over silently
/// dropping all future reminders. A failed write keeps the ledger dirty
/// so the next tick retries it.
pub struct FiredLedger {
    keys: HashSet<FiredKey>,
    path: Option<PathBuf>,
    dirty: bool,
}

impl FiredLedger {
    /// A ledger with no backing file. Used by the UI shell before a data
    /// directory exists, and by tests.
    pub fn in_memory() -> Self {
        FiredLedger {
            keys: HashSet::new(),
            path: None,
            dirty: false,
        }
    }

    /// Load the ledger from `path`, starting empty on any read error.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let keys = match std::fs::read_to_string(&path) {
            Ok(content) => content.lines().filter_map(FiredKey::parse).collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => {
                warn!(
                    "Could not read fired-reminder ledger at {}: {e}; starting empty",
                    path.display()
                );
                HashSet::new()
            }
        };

        FiredLedger {
            keys,
            path: Some(path),
            dirty: false,
        }
    }

    pub fn contains(&self, key: &FiredKey) -> bool {
        self.keys.contains(key)
    }

    /// Record a dispatched key. Recording an already-present key is a no-op.
    pub fn record(&mut self, key: FiredKey) {
        if self.keys.insert(key) {
            self.dirty = true;
        }
    }

    /// All recorded keys, sorted for deterministic output.
    pub fn snapshot(&self) -> Vec<FiredKey> {
        let mut keys: Vec<_> = self.keys.iter().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Drop entries that can never fire again: the event no longer
    /// exists, or its start instant is more than [`RETENTION_HOURS`] in
    /// the past. Keeps the ledger from growing forever.
    pub fn prune(&mut self, now: NaiveDateTime, events: &[Event]) {
        let horizon = now - Duration::hours(RETENTION_HOURS);
        let before = self.keys.len();

        self.keys.retain(|key| {
            let Some(event) = events.iter().find(|e| e.id == key.event_id) else {
                return false;
            };
            // An event that lost its time keeps its entries: if the time
            // comes back, old keys must still suppress re-firing.
            match event.start() {
                Some(start) => start >= horizon,
                None => true,
            }
        });

        if self.keys.len() != before {
            self.dirty = true;
        }
    }

    /// Write the ledger to its backing file (temp file + rename).
    /// No-op when nothing changed since the last successful write, or
    /// when the ledger has no backing file.
    pub fn persist(&mut self) -> MinicalResult<()> {
        if !self.dirty {
            return Ok(());
        }
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let lines: Vec<String> = self.snapshot().iter().map(FiredKey::tag).collect();
        let temp = path.with_extension("tmp");
        std::fs::write(&temp, lines.join("\n"))?;
        std::fs::rename(&temp, path)?;

        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn key(event: &str, offset: &str) -> FiredKey {
        FiredKey::new(event, offset)
    }

    #[test]
    fn test_record_is_idempotent() {
        let mut ledger = FiredLedger::in_memory();

        ledger.record(key("ev1", "1hour"));
        ledger.record(key("ev1", "1hour"));
        ledger.record(key("ev1", "10min"));

        assert_eq!(ledger.len(), 2);
        assert!(ledger.contains(&key("ev1", "1hour")));
        assert!(!ledger.contains(&key("ev2", "1hour")));
    }

    #[test]
    fn test_persistence_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fired");

        let mut ledger = FiredLedger::load(&path);
        ledger.record(key("ev1", "1hour"));
        ledger.record(key("ev2", "custom-abc"));
        ledger.persist().unwrap();

        let reloaded = FiredLedger::load(&path);
        assert!(reloaded.contains(&key("ev1", "1hour")));
        assert!(reloaded.contains(&key("ev2", "custom-abc")));
        assert!(!reloaded.contains(&key("ev3", "1hour")));
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fired");
        std::fs::write(&path, "no-separator-here\n:\n\n").unwrap();

        let ledger = FiredLedger::load(&path);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = FiredLedger::load(dir.path().join("fired"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_persist_skips_when_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fired");

        let mut ledger = FiredLedger::load(&path);
        ledger.persist().unwrap();
        // Nothing recorded, so no file should have been created
        assert!(!path.exists());
    }

    #[test]
    fn test_prune_drops_stale_and_deleted_events() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let now = date.and_time(noon);

        let recent = Event::new("Recent", date, Some(noon));
        let stale = Event::new(
            "Stale",
            date - Duration::days(3),
            Some(noon),
        );
        let timeless = Event::new("Timeless", date - Duration::days(3), None);

        let mut ledger = FiredLedger::in_memory();
        ledger.record(key(&recent.id, "1hour"));
        ledger.record(key(&stale.id, "1hour"));
        ledger.record(key(&timeless.id, "1hour"));
        ledger.record(key("deleted-event", "1hour"));

        ledger.prune(now, &[recent.clone(), stale.clone(), timeless.clone()]);

        assert!(ledger.contains(&key(&recent.id, "1hour")));
        assert!(!ledger.contains(&key(&stale.id, "1hour")));
        // No start instant means no expiry; keep it while the event exists
        assert!(ledger.contains(&key(&timeless.id, "1hour")));
        assert!(!ledger.contains(&key("deleted-event", "1hour")));
    }
}
