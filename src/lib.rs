//! Homeguard - home security panel core.
//!
//! The rendering layer of the panel is a thin view over two pieces of real
//! logic, both provided here:
//!
//! - **Arming** - a PIN-driven arm/disarm state machine with an activity log
//! - **Push notifications** - permission negotiation, push token
//!   registration with a remote service, and a lifecycle-scoped listener
//!   for incoming notifications
//!
//! # Modules
//!
//! - [`arming`] - status, PIN buffer and activity log
//! - [`notifications`] - push registration and notification events
//! - [`feed`] - security alert feed built from received notifications
//! - [`screen`] - home and alerts screens wiring the above together
//! - [`config`] - configuration loading/saving
//! - [`commands`] - CLI subcommands

pub mod arming;
pub mod commands;
pub mod config;
pub mod env;
pub mod feed;
pub mod notifications;
pub mod screen;

// Re-export commonly used types
pub use arming::{ActivityRecord, ArmingStateMachine, Key, SystemStatus};
pub use config::Config;
pub use feed::{Alert, AlertFeed, AlertFilter};
pub use notifications::{
    NotificationEventListener, PermissionNegotiator, RegistrationError, RegistrationResult,
    TokenRegistrar,
};
pub use screen::{NotificationScreen, SecurityPanel};
