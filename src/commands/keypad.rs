//! Keypad replay command.
//!
//! Feeds a string of key presses into a fresh security panel and prints the
//! resulting state. Handy for exercising the arming flow from a shell.
//!
//! # Key Syntax
//!
//! - `0`-`9` - digit keys
//! - `<` - delete
//! - `#` - arm/disarm button
//! - whitespace is ignored
//!
//! # Examples
//!
//! ```bash
//! # Arm, then disarm with a mistyped digit corrected
//! homeguard keypad "1234# 987<65#"
//! ```

use anyhow::{bail, Result};

use crate::arming::Key;
use crate::screen::SecurityPanel;

/// Parse a key sequence. Any character outside the syntax is an error.
pub fn parse_keys(input: &str) -> Result<Vec<Key>> {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '0'..='9' => Ok(Key::Digit(c)),
            '<' => Ok(Key::Delete),
            '#' => Ok(Key::Submit),
            other => bail!("Unknown key '{other}' (expected 0-9, '<' or '#')"),
        })
        .collect()
}

/// Replay `keys` on a new panel and return it.
pub fn replay(keys: &[Key]) -> SecurityPanel {
    let mut panel = SecurityPanel::new();
    for &key in keys {
        if let Some(status) = panel.handle_key(key) {
            println!("-> {status}");
        }
    }
    panel
}

/// Parse, replay and print the final panel state.
pub fn run(input: &str) -> Result<()> {
    let keys = parse_keys(input)?;
    let panel = replay(&keys);
    let view = panel.view();

    let dots: String = view
        .pin_dots
        .iter()
        .map(|&filled| if filled { '●' } else { '○' })
        .collect();

    println!("Status: {}", view.status);
    println!("PIN:    {dots}");
    println!("Button: {} ({})", view.action_label, if view.submit_enabled { "enabled" } else { "disabled" });
    println!("Recent activity:");
    if view.activity.is_empty() {
        println!("  (none)");
    }
    for record in &view.activity {
        println!("  [{}] {} ({})", record.id, record.message, record.timestamp);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arming::SystemStatus;

    #[test]
    fn test_parse_keys() {
        let keys = parse_keys("12 <#").unwrap();
        assert_eq!(
            keys,
            vec![Key::Digit('1'), Key::Digit('2'), Key::Delete, Key::Submit]
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(parse_keys("12a4").is_err());
    }

    #[test]
    fn test_replay_arm_then_disarm() {
        let keys = parse_keys("1234# 987<65#").unwrap();
        let panel = replay(&keys);
        assert_eq!(panel.machine().status(), SystemStatus::Unarmed);
        assert_eq!(panel.machine().activity_log().len(), 2);
    }
}
