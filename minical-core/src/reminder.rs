//! Reminder offsets and the user-extensible catalog.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{MinicalError, MinicalResult};

/// A named lead time at which a reminder fires relative to an event's start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderOffset {
    pub id: String,
    /// Display label, e.g. "1 hour before".
    pub label: String,
    /// Minutes before the event start. Non-negative.
    pub minutes_before: i64,
}

/// Unit for user-entered custom offsets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    Minutes,
    Hours,
    Days,
}

impl OffsetUnit {
    fn to_minutes(self, amount: i64) -> i64 {
        match self {
            OffsetUnit::Minutes => amount,
            OffsetUnit::Hours => amount * 60,
            OffsetUnit::Days => amount * 1440,
        }
    }

    fn label(self, amount: i64) -> String {
        let unit = match self {
            OffsetUnit::Minutes => "minute",
            OffsetUnit::Hours => "hour",
            OffsetUnit::Days => "day",
        };
        if amount == 1 {
            format!("1 {unit} before")
        } else {
            format!("{amount} {unit}s before")
        }
    }
}

/// The set of reminder offsets events can reference.
///
/// Offsets are user-extensible. Removing an offset does not touch events
/// that reference it; those references become unresolvable and the
/// evaluator skips them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderCatalog {
    offsets: Vec<ReminderOffset>,
}

impl Default for ReminderCatalog {
    fn default() -> Self {
        ReminderCatalog {
            offsets: vec![
                ReminderOffset {
                    id: "day".to_string(),
                    label: "1 day before".to_string(),
                    minutes_before: 1440,
                },
                ReminderOffset {
                    id: "6hours".to_string(),
                    label: "6 hours before".to_string(),
                    minutes_before: 360,
                },
                ReminderOffset {
                    id: "1hour".to_string(),
                    label: "1 hour before".to_string(),
                    minutes_before: 60,
                },
                ReminderOffset {
                    id: "10min".to_string(),
                    label: "10 minutes before".to_string(),
                    minutes_before: 10,
                },
            ],
        }
    }
}

impl ReminderCatalog {
    pub fn empty() -> Self {
        ReminderCatalog {
            offsets: Vec::new(),
        }
    }

    pub fn offsets(&self) -> &[ReminderOffset] {
        &self.offsets
    }

    pub fn resolve(&self, id: &str) -> Option<&ReminderOffset> {
        self.offsets.iter().find(|o| o.id == id)
    }

    /// Add a user-defined offset. Duplicate durations are rejected here,
    /// at creation; the evaluator never checks for them.
    pub fn add_custom(&mut self, amount: i64, unit: OffsetUnit) -> MinicalResult<ReminderOffset> {
        let minutes = unit.to_minutes(amount);
        if minutes < 0 {
            return Err(MinicalError::Storage(format!(
                "Reminder offset cannot be negative ({minutes} minutes)"
            )));
        }
        if self.offsets.iter().any(|o| o.minutes_before == minutes) {
            return Err(MinicalError::DuplicateOffset(minutes));
        }

        let offset = ReminderOffset {
            id: format!("custom-{}", Uuid::new_v4()),
            label: unit.label(amount),
            minutes_before: minutes,
        };
        self.offsets.push(offset.clone());
        Ok(offset)
    }

    /// Remove an offset by id. Returns true if it existed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.offsets.len();
        self.offsets.retain(|o| o.id != id);
        self.offsets.len() != before
    }
}
