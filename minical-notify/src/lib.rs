//! Reminder engine for minical.
//!
//! Watches the user's events and fires each configured reminder exactly
//! once, no matter how often the detection loop re-examines the same
//! (event, offset) pair or how many times the process restarts:
//! - `evaluate` computes which pairs are newly due inside the current
//!   detection window
//! - `ledger` is the durable dedupe record of already-fired pairs
//! - `dispatch` turns a due pair into an in-app notification and, when
//!   permitted, a desktop notification
//! - `scheduler` drives the whole thing on a fixed cadence

pub mod dispatch;
pub mod evaluate;
pub mod ledger;
pub mod scheduler;

pub use dispatch::{DesktopNotifier, Dispatcher, Notification, PlatformNotifier};
pub use evaluate::{DuePair, due_reminders};
pub use ledger::{FiredKey, FiredLedger};
pub use scheduler::{CalendarSnapshot, CalendarSource, PollScheduler, ReminderEngine};
