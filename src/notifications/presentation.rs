//! Process-wide foreground presentation policy.
//!
//! Decides how a notification that arrives while the app is in the
//! foreground is presented. Set once at startup with
//! [`init_presentation`]; everything afterwards only reads it.

use std::sync::OnceLock;

static PRESENTATION: OnceLock<NotificationPresentation> = OnceLock::new();

/// How to present a notification received in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationPresentation {
    /// Show the alert banner.
    pub show_alert: bool,
    /// Play the notification sound.
    pub play_sound: bool,
    /// Update the app icon badge.
    pub set_badge: bool,
}

impl Default for NotificationPresentation {
    fn default() -> Self {
        Self {
            show_alert: true,
            play_sound: false,
            set_badge: false,
        }
    }
}

/// Apply the presentation policy for this process.
///
/// Only the first call takes effect. Later calls get their value back as
/// the error.
pub fn init_presentation(
    presentation: NotificationPresentation,
) -> Result<(), NotificationPresentation> {
    PRESENTATION.set(presentation)?;
    log::debug!("[Presentation] Foreground policy set: {presentation:?}");
    Ok(())
}

/// The active policy, or the default if [`init_presentation`] was never called.
pub fn presentation() -> NotificationPresentation {
    PRESENTATION.get().copied().unwrap_or_default()
}
