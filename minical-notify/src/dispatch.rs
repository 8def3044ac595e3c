//! Notification dispatch.
//!
//! The dispatcher is stateless: deduplication is entirely the ledger's
//! job, and the caller must not invoke `dispatch` twice for the same
//! (event, offset) key. All reminder side effects live here so the
//! evaluator can stay pure.

use chrono::NaiveDateTime;
use log::debug;
use minical_core::category::{self, Category};
use minical_core::error::{MinicalError, MinicalResult};
use minical_core::event::Event;
use minical_core::reminder::ReminderOffset;
use uuid::Uuid;

use crate::ledger::FiredKey;

/// An in-app reminder notice. Ephemeral: the UI renders it as a banner
/// and drops it on dismissal; it is never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub event_id: String,
    pub offset_id: String,
    pub title: String,
    pub message: String,
    pub color: String,
    pub created_at: NaiveDateTime,
}

/// Seam to the host environment's notification facility.
///
/// `dedupe_tag` is the fired key's string form, so the host can coalesce
/// duplicate system-level alerts as a second line of defense.
pub trait PlatformNotifier: Send {
    fn notify(&self, title: &str, body: &str, dedupe_tag: &str) -> MinicalResult<()>;
}

/// Desktop notifications via the OS notification daemon.
pub struct DesktopNotifier;

impl PlatformNotifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str, dedupe_tag: &str) -> MinicalResult<()> {
        notify_rust::Notification::new()
            .summary(title)
            .body(body)
            .hint(notify_rust::Hint::Custom(
                "x-minical-tag".to_string(),
                dedupe_tag.to_string(),
            ))
            .show()
            .map_err(|e| MinicalError::Notify(e.to_string()))?;
        Ok(())
    }
}

/// Turns a newly-due (event, offset) pair into notifications.
pub struct Dispatcher {
    platform: Option<Box<dyn PlatformNotifier>>,
}

impl Dispatcher {
    /// Dispatcher without platform access: in-app banners only. Used
    /// when notification permission was denied or never requested.
    pub fn in_app_only() -> Self {
        Dispatcher { platform: None }
    }

    /// Dispatcher that additionally raises platform notifications.
    pub fn with_platform(notifier: Box<dyn PlatformNotifier>) -> Self {
        Dispatcher {
            platform: Some(notifier),
        }
    }

    /// Produce the in-app notification for a due pair and, if a platform
    /// notifier is configured, request a system-level alert as well.
    /// Platform failures degrade to in-app only; they never propagate.
    pub fn dispatch(
        &self,
        now: NaiveDateTime,
        event: &Event,
        offset: &ReminderOffset,
        categories: &[Category],
    ) -> Notification {
        let message = format!("{} reminder", offset.label);

        if let Some(platform) = &self.platform {
            let tag = FiredKey::new(&event.id, &offset.id).tag();
            if let Err(e) = platform.notify(&event.title, &message, &tag) {
                debug!("Platform notification failed for {tag}: {e}");
            }
        }

        Notification {
            id: Uuid::new_v4().to_string(),
            event_id: event.id.clone(),
            offset_id: offset.id.clone(),
            title: event.title.clone(),
            message,
            color: category::color_for(categories, event.category_id.as_deref()).to_string(),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use minical_core::category::default_categories;
    use std::sync::{Arc, Mutex};

    struct RecordingNotifier {
        calls: Arc<Mutex<Vec<(String, String, String)>>>,
    }

    impl PlatformNotifier for RecordingNotifier {
        fn notify(&self, title: &str, body: &str, dedupe_tag: &str) -> MinicalResult<()> {
            self.calls.lock().unwrap().push((
                title.to_string(),
                body.to_string(),
                dedupe_tag.to_string(),
            ));
            Ok(())
        }
    }

    struct FailingNotifier;

    impl PlatformNotifier for FailingNotifier {
        fn notify(&self, _: &str, _: &str, _: &str) -> MinicalResult<()> {
            Err(MinicalError::Notify("daemon unavailable".to_string()))
        }
    }

    fn fixture() -> (Event, ReminderOffset) {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let mut event = Event::new("Team sync", date, None);
        event.category_id = Some("important".to_string());

        let offset = ReminderOffset {
            id: "1hour".to_string(),
            label: "1 hour before".to_string(),
            minutes_before: 60,
        };
        (event, offset)
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_in_app_notification_always_produced() {
        let (event, offset) = fixture();
        let dispatcher = Dispatcher::in_app_only();

        let notification = dispatcher.dispatch(noon(), &event, &offset, &default_categories());

        assert_eq!(notification.title, "Team sync");
        assert_eq!(notification.message, "1 hour before reminder");
        assert_eq!(notification.color, "#FECACA");
        assert_eq!(notification.event_id, event.id);
        assert_eq!(notification.offset_id, "1hour");
        assert_eq!(notification.created_at, noon());
    }

    #[test]
    fn test_platform_notifier_receives_dedupe_tag() {
        let (event, offset) = fixture();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = Dispatcher::with_platform(Box::new(RecordingNotifier {
            calls: calls.clone(),
        }));

        dispatcher.dispatch(noon(), &event, &offset, &[]);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "Team sync");
        assert_eq!(calls[0].1, "1 hour before reminder");
        assert_eq!(calls[0].2, format!("{}:1hour", event.id));
    }

    #[test]
    fn test_platform_failure_degrades_to_in_app() {
        let (event, offset) = fixture();
        let dispatcher = Dispatcher::with_platform(Box::new(FailingNotifier));

        let notification = dispatcher.dispatch(noon(), &event, &offset, &[]);
        assert_eq!(notification.title, "Team sync");
        // No category list supplied, so the default color applies
        assert_eq!(notification.color, category::DEFAULT_COLOR);
    }
}
