//! Notification permission negotiation.
//!
//! Push tokens are only issued to a physical device whose user allowed
//! notifications. [`PermissionNegotiator::ensure_permission`] checks both,
//! prompting the user at most once per call.

use std::sync::Arc;

use super::platform::{PermissionStatus, PlatformError, PushPlatform};

/// Proof that notification permission is granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Granted;

/// Why permission could not be confirmed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// Running on a simulated host; push tokens are unobtainable there.
    #[error("Must use a physical device for push notifications")]
    NoPhysicalDevice,
    /// The user refused (or had already refused) notification permission.
    #[error("Permission not granted to get push token for push notification")]
    PermissionDenied,
    /// The platform failed while reading or requesting permission.
    #[error("Permission check failed: {0}")]
    Platform(#[from] PlatformError),
}

/// Queries and, when needed, requests notification permission.
#[derive(Clone)]
pub struct PermissionNegotiator {
    platform: Arc<dyn PushPlatform>,
}

impl std::fmt::Debug for PermissionNegotiator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionNegotiator").finish_non_exhaustive()
    }
}

impl PermissionNegotiator {
    /// Negotiate against `platform`.
    pub fn new(platform: Arc<dyn PushPlatform>) -> Self {
        Self { platform }
    }

    /// Confirm notification permission.
    ///
    /// Fails with [`PermissionError::NoPhysicalDevice`] on a simulated host
    /// without touching the platform further. If permission is not yet
    /// granted, the interactive prompt is shown once; a still-missing grant
    /// afterwards is [`PermissionError::PermissionDenied`]. Calling this
    /// while already granted never prompts.
    pub async fn ensure_permission(&self) -> Result<Granted, PermissionError> {
        if !self.platform.is_physical_device() {
            return Err(PermissionError::NoPhysicalDevice);
        }

        let mut status = self.platform.query_permission().await?;
        if !status.is_granted() {
            log::info!("[Permission] Current state {status:?}, prompting user");
            status = self.platform.request_permission().await?;
        }

        match status {
            PermissionStatus::Granted => Ok(Granted),
            other => {
                log::warn!("[Permission] Notification permission not granted ({other:?})");
                Err(PermissionError::PermissionDenied)
            }
        }
    }
}
