//! User-authored calendar events.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A calendar event as entered by the user.
///
/// Events are owned by the event store (the UI layer mutates them); the
/// reminder engine only reads snapshots. `id` is stable for the event's
/// lifetime and is the join key for fired-reminder ledger entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    /// Clock time within `date`. Events without a time have no
    /// well-defined due instant and never produce reminders.
    pub time: Option<NaiveTime>,
    /// Category used for display color; `None` falls back to the default.
    pub category_id: Option<String>,
    /// Ids into the reminder catalog. Ids that no longer resolve are
    /// kept here and simply skipped during evaluation.
    #[serde(default)]
    pub reminder_ids: Vec<String>,
    pub description: Option<String>,
}

impl Event {
    pub fn new(title: impl Into<String>, date: NaiveDate, time: Option<NaiveTime>) -> Self {
        Event {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            date,
            time,
            category_id: None,
            reminder_ids: Vec::new(),
            description: None,
        }
    }

    /// The instant the event starts, in local wall-clock time.
    /// `None` for all-day events (no time set).
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.time.map(|t| self.date.and_time(t))
    }
}
