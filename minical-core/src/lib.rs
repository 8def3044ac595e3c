//! Core types for the minical calendar.
//!
//! This crate provides the data model shared by the UI shell and the
//! reminder engine:
//! - `Event` and `Category` records
//! - `ReminderCatalog` with user-extensible reminder offsets
//! - fail-open JSON storage helpers for durable state

pub mod category;
pub mod error;
pub mod event;
pub mod reminder;
pub mod storage;

pub use category::Category;
pub use error::{MinicalError, MinicalResult};
pub use event::Event;
pub use reminder::{OffsetUnit, ReminderCatalog, ReminderOffset};
