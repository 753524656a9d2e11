//! Screen-level wiring between the core and the rendering layer.
//!
//! - [`SecurityPanel`] - home tab: keypad input in, [`PanelView`] out.
//! - [`NotificationScreen`] - alerts tab: owns the notification listener
//!   for its visible lifetime and kicks off push registration on mount.
//!
//! Rendering itself (layout, colors, icons) lives outside this crate.

// Rust guideline compliant 2026-02

use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::arming::{ActivityRecord, ArmingStateMachine, Key, SystemStatus, PIN_LENGTH};
use crate::feed::{Alert, AlertFeed, AlertFilter};
use crate::notifications::{
    ChannelConfig, NotificationEvent, NotificationEventListener, NotificationEvents,
    RegistrationError, RegistrationResult, TokenRegistrar,
};

/// Everything the home tab needs to draw itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    /// Current arming state.
    pub status: SystemStatus,
    /// One entry per PIN dot, `true` when filled.
    pub pin_dots: [bool; PIN_LENGTH],
    /// Whether the arm/disarm button is enabled.
    pub submit_enabled: bool,
    /// Label of the arm/disarm button.
    pub action_label: &'static str,
    /// Recent activity, newest first.
    pub activity: Vec<ActivityRecord>,
}

/// Home tab: the PIN keypad in front of the arming state machine.
#[derive(Debug, Default)]
pub struct SecurityPanel {
    machine: ArmingStateMachine,
}

impl SecurityPanel {
    /// A panel in the initial `Unarmed` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a keypad event. Returns the new status if it changed.
    pub fn handle_key(&mut self, key: Key) -> Option<SystemStatus> {
        self.machine.apply(key)
    }

    /// The underlying state machine.
    pub fn machine(&self) -> &ArmingStateMachine {
        &self.machine
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> PanelView {
        let entered = self.machine.pin_len();
        let mut pin_dots = [false; PIN_LENGTH];
        for dot in pin_dots.iter_mut().take(entered) {
            *dot = true;
        }

        PanelView {
            status: self.machine.status(),
            pin_dots,
            submit_enabled: self.machine.can_submit(),
            action_label: self.machine.status().action_label(),
            activity: self.machine.activity_log().cloned().collect(),
        }
    }
}

/// Handle to a registration running in the background.
pub type RegistrationTask = JoinHandle<Result<RegistrationResult, RegistrationError>>;

/// Alerts tab: notification listener, push registration and alert feed.
#[derive(Debug)]
pub struct NotificationScreen {
    listener: NotificationEventListener,
    registrar: Arc<TokenRegistrar>,
    user_id: String,
    channel: ChannelConfig,
    feed: AlertFeed,
    filter: AlertFilter,
    mounted: bool,
}

impl NotificationScreen {
    /// Create an unmounted screen.
    pub fn new(
        events: Arc<dyn NotificationEvents>,
        registrar: Arc<TokenRegistrar>,
        user_id: impl Into<String>,
        channel: ChannelConfig,
    ) -> Self {
        Self {
            listener: NotificationEventListener::new(events),
            registrar,
            user_id: user_id.into(),
            channel,
            feed: AlertFeed::new(),
            filter: AlertFilter::default(),
            mounted: false,
        }
    }

    /// Screen became visible.
    ///
    /// Starts the listener and spawns the registration flow on the current
    /// tokio runtime. Returns `None` if already mounted. The registration
    /// task is detached from the screen: unmounting does not cancel it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn mount(&mut self) -> Option<RegistrationTask> {
        if self.mounted {
            log::debug!("[Screen] mount() while mounted, ignoring");
            return None;
        }
        self.mounted = true;
        self.listener.start();

        let registrar = Arc::clone(&self.registrar);
        let user_id = self.user_id.clone();
        let channel = self.channel.clone();
        Some(tokio::spawn(async move {
            registrar.register(&user_id, &channel).await
        }))
    }

    /// Screen went away. Stops the listener; safe to call repeatedly.
    pub fn unmount(&mut self) {
        self.listener.stop();
        self.mounted = false;
    }

    /// Whether the screen is mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Latest notification received while mounted.
    pub fn latest_notification(&self) -> Option<NotificationEvent> {
        self.listener.latest()
    }

    /// Move the latest notification into the feed. Returns `true` if the
    /// feed gained an alert.
    pub fn refresh_feed(&mut self) -> bool {
        match self.listener.latest() {
            Some(event) => self.feed.ingest(&event, Utc::now()),
            None => false,
        }
    }

    /// Switch between the "All Alerts" and "Critical" tabs.
    pub fn set_filter(&mut self, filter: AlertFilter) {
        self.filter = filter;
    }

    /// Active tab.
    pub fn filter(&self) -> AlertFilter {
        self.filter
    }

    /// Alerts for the active tab, newest first.
    pub fn visible_alerts(&self) -> Vec<&Alert> {
        self.feed.visible(self.filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::{LocalEventBus, LogReporter, StaticPushPlatform};
    use std::time::Duration;

    #[test]
    fn test_panel_view_tracks_keypad() {
        let mut panel = SecurityPanel::new();
        panel.handle_key(Key::Digit('1'));
        panel.handle_key(Key::Digit('2'));

        let view = panel.view();
        assert_eq!(view.pin_dots, [true, true, false, false]);
        assert!(!view.submit_enabled);
        assert_eq!(view.action_label, "Arm System");

        panel.handle_key(Key::Digit('3'));
        panel.handle_key(Key::Digit('4'));
        assert!(panel.view().submit_enabled);
        assert_eq!(panel.handle_key(Key::Submit), Some(SystemStatus::Armed));

        let view = panel.view();
        assert_eq!(view.status, SystemStatus::Armed);
        assert_eq!(view.pin_dots, [false; PIN_LENGTH]);
        assert_eq!(view.action_label, "Disarm System");
        assert_eq!(view.activity.len(), 1);
    }

    fn simulator_screen(bus: &Arc<LocalEventBus>) -> NotificationScreen {
        let platform = Arc::new(StaticPushPlatform::new("tok").physical(false));
        let registrar = TokenRegistrar::new(
            platform,
            Arc::new(LogReporter),
            "http://127.0.0.1:9/unused",
            Some("proj".to_string()),
            Duration::from_secs(1),
        )
        .expect("client builds");
        let events: Arc<LocalEventBus> = Arc::clone(bus);
        NotificationScreen::new(events, Arc::new(registrar), "user-1", ChannelConfig::default())
    }

    #[tokio::test]
    async fn test_mount_starts_listener_and_registration() {
        let bus = LocalEventBus::new();
        let mut screen = simulator_screen(&bus);

        let task = screen.mount().expect("first mount spawns registration");
        assert!(screen.is_mounted());
        assert_eq!(bus.subscriber_counts(), (1, 1));
        assert!(screen.mount().is_none());
        assert_eq!(bus.subscriber_counts(), (1, 1));

        let outcome = task.await.expect("task joins");
        assert_eq!(outcome, Err(RegistrationError::NoPhysicalDevice));

        screen.unmount();
        screen.unmount();
        assert_eq!(bus.subscriber_counts(), (0, 0));
    }

    #[tokio::test]
    async fn test_feed_refresh_and_filter() {
        let bus = LocalEventBus::new();
        let mut screen = simulator_screen(&bus);
        let _task = screen.mount();

        bus.emit_received(&NotificationEvent {
            identifier: "n1".to_string(),
            title: Some("System Warning".to_string()),
            body: Some("Camera 3 battery level low (15%)".to_string()),
            data: serde_json::json!({"severity": "warning", "type": "system"}),
        });
        assert!(screen.refresh_feed());
        assert!(!screen.refresh_feed());
        assert_eq!(screen.visible_alerts().len(), 1);

        screen.set_filter(AlertFilter::Critical);
        assert!(screen.visible_alerts().is_empty());
    }
}
