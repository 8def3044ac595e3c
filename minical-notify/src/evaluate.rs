//! Due-reminder evaluation.
//!
//! Pure read-only pass over the current event and catalog snapshots.
//! Side effects (dispatching, ledger writes) belong to the scheduler
//! tick; this module must stay free of them so repeated evaluation with
//! unchanged state is idempotent.

use chrono::{Duration, NaiveDateTime};
use log::debug;
use minical_core::event::Event;
use minical_core::reminder::{ReminderCatalog, ReminderOffset};

use crate::ledger::{FiredKey, FiredLedger};

/// An (event, offset) pair whose due instant falls inside the current
/// detection window and which has not fired before.
#[derive(Debug, Clone, Copy)]
pub struct DuePair<'a> {
    pub event: &'a Event,
    pub offset: &'a ReminderOffset,
}

impl DuePair<'_> {
    pub fn key(&self) -> FiredKey {
        FiredKey::new(&self.event.id, &self.offset.id)
    }

    /// The instant this pair should trigger.
    pub fn due_at(&self) -> Option<NaiveDateTime> {
        due_instant(self.event, self.offset)
    }
}

fn due_instant(event: &Event, offset: &ReminderOffset) -> Option<NaiveDateTime> {
    Some(event.start()? - Duration::minutes(offset.minutes_before))
}

/// Compute the pairs newly due at `now`.
///
/// A pair is newly due iff its key is absent from `ledger` and its due
/// instant lies in the half-open window `(now - window, now]`. A due
/// instant that has already fallen behind the trailing edge is never
/// fired retroactively. Events without a time and offset ids that do not
/// resolve in the catalog are skipped; they are not recorded anywhere,
/// so a later correction can still fire on a subsequent poll.
///
/// Pairs are returned in event/offset iteration order.
pub fn due_reminders<'a>(
    now: NaiveDateTime,
    window: Duration,
    events: &'a [Event],
    catalog: &'a ReminderCatalog,
    ledger: &FiredLedger,
) -> Vec<DuePair<'a>> {
    let mut due = Vec::new();

    for event in events {
        let Some(start) = event.start() else {
            continue;
        };

        for offset_id in &event.reminder_ids {
            let Some(offset) = catalog.resolve(offset_id) else {
                debug!(
                    "Event {} references unknown reminder offset {offset_id}; skipping",
                    event.id
                );
                continue;
            };

            let due_at = start - Duration::minutes(offset.minutes_before);
            let in_window = due_at > now - window && due_at <= now;
            if !in_window {
                continue;
            }

            let pair = DuePair { event, offset };
            if !ledger.contains(&pair.key()) {
                due.push(pair);
            }
        }
    }

    due
}
