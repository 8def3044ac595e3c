//! Fixed-cadence polling loop driving the reminder engine.

use std::time::Duration as StdDuration;

use chrono::{Duration, Local, NaiveDateTime};
use log::warn;
use minical_core::category::Category;
use minical_core::event::Event;
use minical_core::reminder::ReminderCatalog;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::dispatch::{Dispatcher, Notification};
use crate::evaluate::due_reminders;
use crate::ledger::FiredLedger;

/// Baseline polling cadence.
pub const POLL_INTERVAL: StdDuration = StdDuration::from_secs(60);

/// Extra seconds added to the detection window so timer jitter cannot
/// open a gap between consecutive windows.
const WINDOW_SLACK_SECS: i64 = 5;

/// Fresh read of the collaborator-owned stores, taken once per tick.
/// The engine never caches one across ticks; the UI may mutate the
/// stores freely between polls.
#[derive(Debug, Clone)]
pub struct CalendarSnapshot {
    pub events: Vec<Event>,
    pub catalog: ReminderCatalog,
    pub categories: Vec<Category>,
}

/// Supplies the current calendar state. Implemented by the UI shell over
/// its stores; the engine only reads through it.
pub trait CalendarSource: Send + 'static {
    fn snapshot(&self) -> CalendarSnapshot;
}

/// One evaluation pass bundled with its collaborators.
///
/// `tick` is synchronous on purpose: ledger writes are fast local file
/// operations, and running the whole pass inline in the scheduler task
/// is what guarantees ticks never overlap.
pub struct ReminderEngine<S: CalendarSource> {
    source: S,
    dispatcher: Dispatcher,
    ledger: FiredLedger,
    feed: mpsc::UnboundedSender<Notification>,
    window: Duration,
}

impl<S: CalendarSource> ReminderEngine<S> {
    pub fn new(
        source: S,
        dispatcher: Dispatcher,
        ledger: FiredLedger,
        feed: mpsc::UnboundedSender<Notification>,
        window: Duration,
    ) -> Self {
        ReminderEngine {
            source,
            dispatcher,
            ledger,
            feed,
            window,
        }
    }

    /// Run one detection pass at `now`: evaluate, dispatch each
    /// newly-due pair, record it, then prune and persist the ledger.
    ///
    /// Every pair is recorded before the persistence write, so a crash
    /// mid-tick can at worst re-dispatch the pairs of this one tick
    /// after restart, never lose a reminder.
    pub fn tick(&mut self, now: NaiveDateTime) {
        let snapshot = self.source.snapshot();

        let due = due_reminders(
            now,
            self.window,
            &snapshot.events,
            &snapshot.catalog,
            &self.ledger,
        );

        for pair in due {
            let notification =
                self.dispatcher
                    .dispatch(now, pair.event, pair.offset, &snapshot.categories);
            // The receiver may be gone (UI shutting down); the ledger
            // entry still counts as dispatched.
            let _ = self.feed.send(notification);
            self.ledger.record(pair.key());
        }

        self.ledger.prune(now, &snapshot.events);

        // A failed write keeps the ledger dirty; the next tick retries.
        if let Err(e) = self.ledger.persist() {
            warn!("Could not persist fired-reminder ledger: {e}");
        }
    }

    pub fn ledger(&self) -> &FiredLedger {
        &self.ledger
    }
}

/// Recurring driver for a [`ReminderEngine`].
///
/// Ticks once immediately at startup (reminders due right around launch
/// must not wait out a full cadence period) and then once per cadence.
/// Ticks run inline in a single task, so they never overlap; a tick that
/// runs long suppresses missed ticks instead of queuing them.
pub struct PollScheduler {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PollScheduler {
    /// Spawn the polling task. Returns the scheduler handle and the
    /// notification feed for the UI to consume.
    pub fn spawn<S: CalendarSource>(
        source: S,
        dispatcher: Dispatcher,
        ledger: FiredLedger,
        cadence: StdDuration,
    ) -> (PollScheduler, mpsc::UnboundedReceiver<Notification>) {
        let (feed_tx, feed_rx) = mpsc::unbounded_channel();
        let window = Duration::seconds(cadence.as_secs() as i64 + WINDOW_SLACK_SECS);
        let mut engine = ReminderEngine::new(source, dispatcher, ledger, feed_tx, window);

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(cadence);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = stop_rx.changed() => break,
                    _ = interval.tick() => engine.tick(Local::now().naive_local()),
                }
            }
        });

        (
            PollScheduler {
                stop: stop_tx,
                handle,
            },
            feed_rx,
        )
    }

    /// Halt future ticks. An in-flight tick still completes, so a
    /// dispatched pair is never left without its ledger entry.
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }

    /// Stop and wait for the polling task to finish.
    pub async fn shutdown(self) {
        self.stop();
        let _ = self.handle.await;
    }
}
