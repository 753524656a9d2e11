//! Platform notification event streams.
//!
//! The platform delivers two kinds of events while the app is running:
//! a notification arriving, and the user responding to one (usually a
//! tap). [`NotificationEvents`] is the subscribe/unsubscribe capability for
//! both; [`LocalEventBus`] is an in-process implementation that hosts and
//! tests drive by hand.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A delivered notification. Everything beyond the identifier is
/// platform-defined and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Platform-assigned notification identifier.
    pub identifier: String,
    /// Title line, if any.
    #[serde(default)]
    pub title: Option<String>,
    /// Body text, if any.
    #[serde(default)]
    pub body: Option<String>,
    /// Custom payload sent by the pushing server.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// The user's interaction with a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationResponse {
    /// The notification that was interacted with.
    pub notification: NotificationEvent,
    /// Which action was taken (the default action for a plain tap).
    pub action_identifier: String,
}

/// Handler for received notifications.
pub type ReceivedHandler = Arc<dyn Fn(NotificationEvent) + Send + Sync>;

/// Handler for notification responses.
pub type ResponseHandler = Arc<dyn Fn(NotificationResponse) + Send + Sync>;

/// Token returned by a subscription, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Subscribe/unsubscribe capability for the platform's notification streams.
pub trait NotificationEvents: Send + Sync {
    /// Register a handler for incoming notifications.
    fn on_received(&self, handler: ReceivedHandler) -> SubscriptionId;

    /// Register a handler for notification responses.
    fn on_response(&self, handler: ResponseHandler) -> SubscriptionId;

    /// Remove a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

#[derive(Default)]
struct Handlers {
    received: HashMap<SubscriptionId, ReceivedHandler>,
    response: HashMap<SubscriptionId, ResponseHandler>,
}

/// In-process notification event source.
///
/// Events emitted with [`emit_received`](Self::emit_received) and
/// [`emit_response`](Self::emit_response) are delivered synchronously to
/// every current subscriber.
#[derive(Default)]
pub struct LocalEventBus {
    next_id: AtomicU64,
    handlers: Mutex<Handlers>,
}

impl std::fmt::Debug for LocalEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (received, response) = self.subscriber_counts();
        f.debug_struct("LocalEventBus")
            .field("received_subscribers", &received)
            .field("response_subscribers", &response)
            .finish_non_exhaustive()
    }
}

impl LocalEventBus {
    /// Create an empty bus.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Deliver a received notification to all subscribers.
    pub fn emit_received(&self, event: &NotificationEvent) {
        // Clone the handler list so handlers may (un)subscribe re-entrantly.
        let handlers: Vec<ReceivedHandler> = match self.handlers.lock() {
            Ok(h) => h.received.values().cloned().collect(),
            Err(e) => {
                log::error!("[Events] Handler table poisoned: {e}");
                return;
            }
        };
        for handler in handlers {
            handler(event.clone());
        }
    }

    /// Deliver a notification response to all subscribers.
    pub fn emit_response(&self, response: &NotificationResponse) {
        let handlers: Vec<ResponseHandler> = match self.handlers.lock() {
            Ok(h) => h.response.values().cloned().collect(),
            Err(e) => {
                log::error!("[Events] Handler table poisoned: {e}");
                return;
            }
        };
        for handler in handlers {
            handler(response.clone());
        }
    }

    /// Current `(received, response)` subscriber counts.
    pub fn subscriber_counts(&self) -> (usize, usize) {
        self.handlers
            .lock()
            .map(|h| (h.received.len(), h.response.len()))
            .unwrap_or((0, 0))
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl NotificationEvents for LocalEventBus {
    fn on_received(&self, handler: ReceivedHandler) -> SubscriptionId {
        let id = self.next_id();
        if let Ok(mut h) = self.handlers.lock() {
            h.received.insert(id, handler);
        }
        id
    }

    fn on_response(&self, handler: ResponseHandler) -> SubscriptionId {
        let id = self.next_id();
        if let Ok(mut h) = self.handlers.lock() {
            h.response.insert(id, handler);
        }
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if let Ok(mut h) = self.handlers.lock() {
            h.received.remove(&id);
            h.response.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn event(id: &str) -> NotificationEvent {
        NotificationEvent {
            identifier: id.to_string(),
            title: None,
            body: None,
            data: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_emit_reaches_subscribers_until_unsubscribed() {
        let bus = LocalEventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        let id = bus.on_received(Arc::new(move |_: NotificationEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        bus.emit_received(&event("a"));
        bus.unsubscribe(id);
        bus.emit_received(&event("b"));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_counts(), (0, 0));
    }

    #[test]
    fn test_unsubscribe_unknown_id_is_ignored() {
        let bus = LocalEventBus::new();
        let id = bus.on_response(Arc::new(|_: NotificationResponse| {}));
        bus.unsubscribe(id);
        bus.unsubscribe(id);
        assert_eq!(bus.subscriber_counts(), (0, 0));
    }

    #[test]
    fn test_event_deserializes_with_missing_fields() {
        let event: NotificationEvent =
            serde_json::from_str(r#"{"identifier":"n1"}"#).expect("deserialize");
        assert_eq!(event.identifier, "n1");
        assert!(event.title.is_none());
        assert!(event.data.is_null());
    }
}
