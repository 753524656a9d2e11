//! Push notification infrastructure.
//!
//! Registers this installation for push delivery and listens for incoming
//! notifications while the notification screen is visible.
//!
//! # Architecture
//!
//! ```text
//! Screen mount
//!     ↓
//! TokenRegistrar ── upsert channel ── PermissionNegotiator ── fetch token
//!     ↓
//! POST {userId, expoPushToken} → registration endpoint
//!
//! Platform push events
//!     ↓
//! NotificationEventListener → latest notification → AlertFeed
//! ```
//!
//! # Platform Capabilities
//!
//! The OS push service is never reimplemented here. Permission prompts,
//! channel setup and token issuance go through [`PushPlatform`]; event
//! delivery goes through [`NotificationEvents`]. Hosts supply real
//! implementations, the CLI and tests use [`StaticPushPlatform`] and
//! [`LocalEventBus`].

// Rust guideline compliant 2026-02

pub mod channel;
pub mod events;
pub mod listener;
pub mod permission;
pub mod platform;
pub mod presentation;
pub mod registrar;
pub mod reporter;

pub use channel::{ChannelConfig, Importance};
pub use events::{
    LocalEventBus, NotificationEvent, NotificationEvents, NotificationResponse, SubscriptionId,
};
pub use listener::NotificationEventListener;
pub use permission::{Granted, PermissionError, PermissionNegotiator};
pub use platform::{PermissionStatus, PlatformError, PushPlatform, StaticPushPlatform};
pub use presentation::{init_presentation, presentation, NotificationPresentation};
pub use registrar::{RegistrationError, RegistrationResult, TokenRegistrar};
pub use reporter::{ConsoleReporter, ErrorReporter, LogReporter};
