//! Lifecycle-scoped notification event listener.
//!
//! A screen calls [`NotificationEventListener::start`] when it becomes
//! visible and [`NotificationEventListener::stop`] when it goes away (or
//! simply drops the listener). While started, the listener:
//!
//! - keeps the most recent received notification (overwrite, no queue),
//!   observable through a `tokio::sync::watch` channel;
//! - logs and counts notification responses (taps) without changing state.
//!
//! Subscribing twice or unsubscribing twice is a no-op, so remounts never
//! produce duplicate deliveries.

// Rust guideline compliant 2026-02

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use super::events::{NotificationEvent, NotificationEvents, NotificationResponse, SubscriptionId};
use super::presentation::presentation;

/// Holds the latest received notification for the lifetime of a screen.
pub struct NotificationEventListener {
    events: Arc<dyn NotificationEvents>,
    subscriptions: Option<(SubscriptionId, SubscriptionId)>,
    latest: Arc<watch::Sender<Option<NotificationEvent>>>,
    responses: Arc<AtomicU64>,
}

impl std::fmt::Debug for NotificationEventListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationEventListener")
            .field("listening", &self.is_listening())
            .field("responses_seen", &self.responses_seen())
            .finish_non_exhaustive()
    }
}

impl NotificationEventListener {
    /// Create a stopped listener over `events`.
    pub fn new(events: Arc<dyn NotificationEvents>) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            events,
            subscriptions: None,
            latest: Arc::new(latest),
            responses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribe to both event streams.
    ///
    /// Returns `false` without subscribing again if already started.
    pub fn start(&mut self) -> bool {
        if self.subscriptions.is_some() {
            log::debug!("[Listener] start() while already listening, ignoring");
            return false;
        }

        let latest = Arc::clone(&self.latest);
        let received = self.events.on_received(Arc::new(move |event: NotificationEvent| {
            let policy = presentation();
            log::info!(
                "[Listener] Notification received: {} (alert={}, sound={})",
                event.identifier,
                policy.show_alert,
                policy.play_sound
            );
            latest.send_replace(Some(event));
        }));

        let responses = Arc::clone(&self.responses);
        let response = self.events.on_response(Arc::new(move |response: NotificationResponse| {
            responses.fetch_add(1, Ordering::Relaxed);
            log::info!(
                "[Listener] Notification response: {} action={}",
                response.notification.identifier,
                response.action_identifier
            );
        }));

        self.subscriptions = Some((received, response));
        log::debug!("[Listener] Subscribed to notification events");
        true
    }

    /// Unsubscribe from both streams. Safe to call when not started.
    pub fn stop(&mut self) {
        if let Some((received, response)) = self.subscriptions.take() {
            self.events.unsubscribe(received);
            self.events.unsubscribe(response);
            log::debug!("[Listener] Unsubscribed from notification events");
        }
    }

    /// Whether the listener is currently subscribed.
    pub fn is_listening(&self) -> bool {
        self.subscriptions.is_some()
    }

    /// Most recently received notification, if any.
    pub fn latest(&self) -> Option<NotificationEvent> {
        self.latest.borrow().clone()
    }

    /// Observe the latest notification as it changes.
    pub fn watch(&self) -> watch::Receiver<Option<NotificationEvent>> {
        self.latest.subscribe()
    }

    /// Number of notification responses seen so far.
    pub fn responses_seen(&self) -> u64 {
        self.responses.load(Ordering::Relaxed)
    }
}

impl Drop for NotificationEventListener {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::events::LocalEventBus;

    fn listener_on(bus: &Arc<LocalEventBus>) -> NotificationEventListener {
        let events: Arc<LocalEventBus> = Arc::clone(bus);
        NotificationEventListener::new(events)
    }

    fn event(id: &str) -> NotificationEvent {
        NotificationEvent {
            identifier: id.to_string(),
            title: Some("Critical Alert".to_string()),
            body: Some("Unauthorized access detected".to_string()),
            data: serde_json::json!({"severity": "critical"}),
        }
    }

    #[test]
    fn test_latest_tracks_received_until_stopped() {
        let bus = LocalEventBus::new();
        let mut listener = listener_on(&bus);
        assert!(listener.latest().is_none());

        assert!(listener.start());
        let p = event("p");
        bus.emit_received(&p);
        assert_eq!(listener.latest(), Some(p.clone()));

        listener.stop();
        bus.emit_received(&event("q"));
        assert_eq!(listener.latest(), Some(p));
    }

    #[test]
    fn test_overwrite_semantics() {
        let bus = LocalEventBus::new();
        let mut listener = listener_on(&bus);
        listener.start();

        bus.emit_received(&event("first"));
        bus.emit_received(&event("second"));
        assert_eq!(listener.latest().map(|e| e.identifier), Some("second".to_string()));
    }

    #[test]
    fn test_start_is_idempotent() {
        let bus = LocalEventBus::new();
        let mut listener = listener_on(&bus);
        assert!(listener.start());
        assert!(!listener.start());
        assert_eq!(bus.subscriber_counts(), (1, 1));
    }

    #[test]
    fn test_stop_without_start_and_double_stop() {
        let bus = LocalEventBus::new();
        let mut listener = listener_on(&bus);
        listener.stop();
        listener.start();
        listener.stop();
        listener.stop();
        assert!(!listener.is_listening());
        assert_eq!(bus.subscriber_counts(), (0, 0));
    }

    #[test]
    fn test_remount_does_not_duplicate_subscriptions() {
        let bus = LocalEventBus::new();
        let mut listener = listener_on(&bus);
        for _ in 0..3 {
            listener.start();
            listener.stop();
        }
        listener.start();
        assert_eq!(bus.subscriber_counts(), (1, 1));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bus = LocalEventBus::new();
        {
            let mut listener = listener_on(&bus);
            listener.start();
            assert_eq!(bus.subscriber_counts(), (1, 1));
        }
        assert_eq!(bus.subscriber_counts(), (0, 0));
    }

    #[test]
    fn test_response_is_observed_without_state_change() {
        let bus = LocalEventBus::new();
        let mut listener = listener_on(&bus);
        listener.start();

        bus.emit_response(&NotificationResponse {
            notification: event("tapped"),
            action_identifier: "default".to_string(),
        });

        assert_eq!(listener.responses_seen(), 1);
        assert!(listener.latest().is_none());
    }

    #[tokio::test]
    async fn test_watch_receiver_sees_updates() {
        let bus = LocalEventBus::new();
        let mut listener = listener_on(&bus);
        let mut rx = listener.watch();
        listener.start();

        bus.emit_received(&event("w"));
        rx.changed().await.expect("sender alive");
        assert_eq!(rx.borrow().as_ref().map(|e| e.identifier.as_str()), Some("w"));
    }
}
