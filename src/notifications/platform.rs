//! Host platform push-service capabilities.
//!
//! The permission prompt, channel configuration and push-token service all
//! belong to the host OS. The core only sees them through [`PushPlatform`],
//! so hosts (and tests) plug in their own implementation.

// Rust guideline compliant 2026-02

use async_trait::async_trait;
use std::sync::Mutex;

use super::channel::ChannelConfig;

/// Notification permission state as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// The user allowed notifications.
    Granted,
    /// The user refused notifications.
    Denied,
    /// The user has not been asked yet.
    Undetermined,
}

impl PermissionStatus {
    /// Whether notifications may be delivered.
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

/// A failure reported by the platform itself (not by the core's checks).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl PlatformError {
    /// Wrap any displayable failure.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Push-service capabilities of the host platform.
///
/// Calls that may show UI or reach the network are async; the rest are
/// plain properties of the host.
#[async_trait]
pub trait PushPlatform: Send + Sync {
    /// Whether the host is a physical device. Simulated hosts cannot obtain
    /// push tokens.
    fn is_physical_device(&self) -> bool;

    /// Whether notifications are delivered through named channels.
    fn supports_channels(&self) -> bool;

    /// Read the current permission state without prompting.
    async fn query_permission(&self) -> Result<PermissionStatus, PlatformError>;

    /// Show the interactive permission prompt and return the resulting state.
    async fn request_permission(&self) -> Result<PermissionStatus, PlatformError>;

    /// Create or replace the channel keyed by its name.
    async fn upsert_channel(&self, channel: &ChannelConfig) -> Result<(), PlatformError>;

    /// Obtain a push token scoped to `project_id`.
    async fn fetch_token(&self, project_id: &str) -> Result<String, PlatformError>;
}

/// In-process platform with fixed answers.
///
/// Used by the CLI host, which has no OS push service of its own, and
/// handy in tests. Permission requests flip an `Undetermined` state to
/// the configured prompt answer.
#[derive(Debug)]
pub struct StaticPushPlatform {
    physical: bool,
    channels: bool,
    token: String,
    permission: Mutex<PermissionStatus>,
    prompt_answer: PermissionStatus,
    upserted: Mutex<Vec<ChannelConfig>>,
}

impl StaticPushPlatform {
    /// A physical, channel-capable host that already granted permission
    /// and hands out `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            physical: true,
            channels: true,
            token: token.into(),
            permission: Mutex::new(PermissionStatus::Granted),
            prompt_answer: PermissionStatus::Granted,
            upserted: Mutex::new(Vec::new()),
        }
    }

    /// A host with a freshly generated Expo-style token.
    pub fn with_generated_token() -> Self {
        Self::new(format!("ExponentPushToken[{}]", uuid::Uuid::new_v4().simple()))
    }

    /// Mark the host as simulated (or physical).
    pub fn physical(mut self, physical: bool) -> Self {
        self.physical = physical;
        self
    }

    /// Whether the host uses delivery channels.
    pub fn channels(mut self, channels: bool) -> Self {
        self.channels = channels;
        self
    }

    /// Initial permission state and the answer the prompt will give.
    pub fn permission(mut self, current: PermissionStatus, prompt_answer: PermissionStatus) -> Self {
        self.permission = Mutex::new(current);
        self.prompt_answer = prompt_answer;
        self
    }

    /// Channels upserted so far, latest config per name.
    pub fn channels_upserted(&self) -> Vec<ChannelConfig> {
        self.upserted
            .lock()
            .map(|channels| channels.clone())
            .unwrap_or_default()
    }

    fn lock_permission(&self) -> Result<std::sync::MutexGuard<'_, PermissionStatus>, PlatformError> {
        self.permission
            .lock()
            .map_err(|e| PlatformError::new(format!("permission state poisoned: {e}")))
    }
}

#[async_trait]
impl PushPlatform for StaticPushPlatform {
    fn is_physical_device(&self) -> bool {
        self.physical
    }

    fn supports_channels(&self) -> bool {
        self.channels
    }

    async fn query_permission(&self) -> Result<PermissionStatus, PlatformError> {
        Ok(*self.lock_permission()?)
    }

    async fn request_permission(&self) -> Result<PermissionStatus, PlatformError> {
        let mut current = self.lock_permission()?;
        if *current == PermissionStatus::Undetermined {
            *current = self.prompt_answer;
        }
        Ok(*current)
    }

    async fn upsert_channel(&self, channel: &ChannelConfig) -> Result<(), PlatformError> {
        let mut upserted = self
            .upserted
            .lock()
            .map_err(|e| PlatformError::new(format!("channel list poisoned: {e}")))?;
        upserted.retain(|c| c.name != channel.name);
        upserted.push(channel.clone());
        Ok(())
    }

    async fn fetch_token(&self, project_id: &str) -> Result<String, PlatformError> {
        log::debug!("[Platform] Issuing static push token for project {project_id}");
        Ok(self.token.clone())
    }
}
