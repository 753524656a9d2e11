//! Notification delivery channel declaration.
//!
//! Some platforms only deliver notifications through a named channel that
//! carries presentation parameters. The channel is declared once here and
//! handed to the registrar, which upserts it on the platform before asking
//! for a push token.

use serde::{Deserialize, Serialize};

/// How intrusively the platform presents notifications on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    /// No sound, no visual interruption.
    Min,
    /// No sound.
    Low,
    /// Sound, no heads-up display.
    Default,
    /// Sound and heads-up display.
    High,
    /// Everything the platform allows.
    Max,
}

/// A named notification delivery channel.
///
/// Upserting a channel is a declarative replace keyed by [`name`](Self::name),
/// so sending the same config repeatedly is harmless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Channel name; the upsert key.
    pub name: String,
    /// Presentation importance.
    pub importance: Importance,
    /// Alternating off/on vibration durations in milliseconds.
    pub vibration_pattern: Vec<u64>,
    /// LED / accent color as `#AARRGGBB`.
    pub highlight_color: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            importance: Importance::Max,
            vibration_pattern: vec![0, 250, 250, 250],
            highlight_color: "#FF231F7C".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_channel() {
        let channel = ChannelConfig::default();
        assert_eq!(channel.name, "default");
        assert_eq!(channel.importance, Importance::Max);
        assert_eq!(channel.vibration_pattern, vec![0, 250, 250, 250]);
        assert_eq!(channel.highlight_color, "#FF231F7C");
    }

    #[test]
    fn test_importance_serializes_snake_case() {
        let json = serde_json::to_value(ChannelConfig::default()).expect("serialize");
        assert_eq!(json["importance"], "max");
    }
}
