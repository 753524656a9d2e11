//! PIN-driven arm/disarm state machine.
//!
//! The panel has two states, `Unarmed` (initial) and `Armed`. A four-digit
//! PIN entered on the keypad toggles between them and prepends a record to
//! the activity log.
//!
//! ```text
//!   press_digit / delete_digit      (buffer edits, 0..=4 digits)
//!              │
//!              ▼
//!   submit() ── len == 4 ──▶ status = !status, buffer cleared, record prepended
//!              │
//!              └─ len != 4 ──▶ unavailable, nothing changes
//! ```
//!
//! The PIN's digits are never compared against a stored credential: any
//! four digits toggle the system. This mirrors the panel's demo behaviour
//! and is not an authentication check.
//!
//! Nothing here performs I/O or awaits, so keypad handling stays responsive
//! while push registration is in flight elsewhere.

// Rust guideline compliant 2026-02

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Number of digits that make up a complete PIN.
pub const PIN_LENGTH: usize = 4;

/// Display format for activity timestamps (locale-style time of day).
const TIMESTAMP_FORMAT: &str = "%-I:%M:%S %p";

/// Arming state of the security system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemStatus {
    /// Sensors are live.
    Armed,
    /// Sensors are ignored.
    #[default]
    Unarmed,
}

impl SystemStatus {
    /// The opposite state.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Armed => Self::Unarmed,
            Self::Unarmed => Self::Armed,
        }
    }

    /// Lowercase status word used in activity messages.
    pub fn word(self) -> &'static str {
        match self {
            Self::Armed => "armed",
            Self::Unarmed => "unarmed",
        }
    }

    /// Label for the submit control in this state.
    pub fn action_label(self) -> &'static str {
        match self {
            Self::Armed => "Disarm System",
            Self::Unarmed => "Arm System",
        }
    }
}

impl std::fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Armed => write!(f, "Armed"),
            Self::Unarmed => write!(f, "Unarmed"),
        }
    }
}

/// In-progress PIN entry. Holds at most [`PIN_LENGTH`] ASCII digits.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PinBuffer {
    digits: String,
}

impl PinBuffer {
    /// Append a digit. Returns `false` (and leaves the buffer untouched) when
    /// the buffer is full or `digit` is not an ASCII digit.
    pub fn push(&mut self, digit: char) -> bool {
        if self.is_full() || !digit.is_ascii_digit() {
            return false;
        }
        self.digits.push(digit);
        true
    }

    /// Remove the last digit. Returns `false` on an empty buffer.
    pub fn pop(&mut self) -> bool {
        self.digits.pop().is_some()
    }

    /// Number of digits entered so far.
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Whether no digits have been entered.
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Whether the buffer holds a complete PIN.
    pub fn is_full(&self) -> bool {
        self.digits.len() >= PIN_LENGTH
    }

    fn clear(&mut self) {
        self.digits.clear();
    }
}

// Digits stay out of logs and panic messages.
impl std::fmt::Debug for PinBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinBuffer")
            .field("len", &self.digits.len())
            .finish_non_exhaustive()
    }
}

/// Unique, creation-ordered identifier of an [`ActivityRecord`].
///
/// Derived from wall-clock milliseconds but never reused: two records
/// created in the same millisecond get consecutive values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(u64);

impl ActivityId {
    /// Raw numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ActivityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry in the "Recent Activity" log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Unique id, increasing with creation time.
    pub id: ActivityId,
    /// Human-readable description, e.g. `"System unarmed"`.
    pub message: String,
    /// Local time of day the record was created, e.g. `"10:20:05 PM"`.
    pub timestamp: String,
}

/// A keypad event forwarded by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A digit key.
    Digit(char),
    /// The backspace key.
    Delete,
    /// The arm/disarm button.
    Submit,
}

/// Owns the system status, the PIN buffer and the activity log.
///
/// All three are mutated only through the methods below.
#[derive(Debug, Default)]
pub struct ArmingStateMachine {
    status: SystemStatus,
    pin: PinBuffer,
    log: VecDeque<ActivityRecord>,
    last_id: u64,
}

impl ArmingStateMachine {
    /// A fresh machine: `Unarmed`, empty buffer, empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current system status.
    pub fn status(&self) -> SystemStatus {
        self.status
    }

    /// Number of digits entered (drives the PIN dots).
    pub fn pin_len(&self) -> usize {
        self.pin.len()
    }

    /// Activity log, newest first.
    pub fn activity_log(&self) -> impl ExactSizeIterator<Item = &ActivityRecord> {
        self.log.iter()
    }

    /// Append a digit if fewer than [`PIN_LENGTH`] are entered; otherwise a no-op.
    pub fn press_digit(&mut self, digit: char) {
        if !self.pin.push(digit) {
            log::debug!("[Arming] Ignored key press (buffer len {})", self.pin.len());
        }
    }

    /// Remove the last digit; a no-op on an empty buffer.
    pub fn delete_digit(&mut self) {
        self.pin.pop();
    }

    /// Whether [`submit`](Self::submit) would take effect.
    pub fn can_submit(&self) -> bool {
        self.pin.len() == PIN_LENGTH
    }

    /// Submit the entered PIN using the current local time.
    ///
    /// Returns the new status, or `None` if the buffer does not hold a
    /// complete PIN (in which case nothing changes).
    pub fn submit(&mut self) -> Option<SystemStatus> {
        self.submit_at(Local::now())
    }

    /// Submit the entered PIN with an explicit clock reading.
    ///
    /// On success the status toggles, the buffer is cleared, and a record
    /// naming the state being left (`"System unarmed"` when arming) is
    /// prepended to the log.
    pub fn submit_at(&mut self, now: DateTime<Local>) -> Option<SystemStatus> {
        if !self.can_submit() {
            return None;
        }

        let previous = self.status;
        self.status = previous.toggled();
        self.pin.clear();

        let record = ActivityRecord {
            id: self.next_id(&now),
            message: format!("System {}", previous.word()),
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        };
        log::info!(
            "[Arming] {} -> {} (record {})",
            previous,
            self.status,
            record.id
        );
        self.log.push_front(record);

        Some(self.status)
    }

    /// Dispatch a keypad event. Returns the new status when a submit took effect.
    pub fn apply(&mut self, key: Key) -> Option<SystemStatus> {
        match key {
            Key::Digit(d) => {
                self.press_digit(d);
                None
            }
            Key::Delete => {
                self.delete_digit();
                None
            }
            Key::Submit => self.submit(),
        }
    }

    fn next_id(&mut self, now: &DateTime<Local>) -> ActivityId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last_id + 1);
        self.last_id = id;
        ActivityId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enter(machine: &mut ArmingStateMachine, digits: &str) {
        for d in digits.chars() {
            machine.press_digit(d);
        }
    }

    #[test]
    fn test_initial_state() {
        let machine = ArmingStateMachine::new();
        assert_eq!(machine.status(), SystemStatus::Unarmed);
        assert_eq!(machine.pin_len(), 0);
        assert_eq!(machine.activity_log().len(), 0);
        assert!(!machine.can_submit());
    }

    #[test]
    fn test_pin_never_exceeds_four_digits() {
        let mut machine = ArmingStateMachine::new();
        for (i, d) in "9876543210".chars().enumerate() {
            machine.press_digit(d);
            assert_eq!(machine.pin_len(), (i + 1).min(PIN_LENGTH));
        }
    }

    #[test]
    fn test_non_digit_is_ignored() {
        let mut machine = ArmingStateMachine::new();
        machine.press_digit('a');
        machine.press_digit('#');
        assert_eq!(machine.pin_len(), 0);
    }

    #[test]
    fn test_delete_on_empty_is_noop() {
        let mut machine = ArmingStateMachine::new();
        machine.delete_digit();
        machine.delete_digit();
        assert_eq!(machine.pin_len(), 0);

        enter(&mut machine, "12");
        machine.delete_digit();
        assert_eq!(machine.pin_len(), 1);
    }

    #[test]
    fn test_submit_requires_full_pin() {
        let mut machine = ArmingStateMachine::new();
        enter(&mut machine, "123");
        assert_eq!(machine.submit(), None);
        assert_eq!(machine.status(), SystemStatus::Unarmed);
        assert_eq!(machine.pin_len(), 3);
        assert_eq!(machine.activity_log().len(), 0);
    }

    #[test]
    fn test_arm_from_unarmed() {
        let mut machine = ArmingStateMachine::new();
        enter(&mut machine, "1234");
        assert_eq!(machine.pin_len(), 4);

        assert_eq!(machine.submit(), Some(SystemStatus::Armed));
        assert_eq!(machine.status(), SystemStatus::Armed);
        assert_eq!(machine.pin_len(), 0);

        let records: Vec<_> = machine.activity_log().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "System unarmed");
        assert!(!records[0].timestamp.is_empty());
    }

    #[test]
    fn test_any_pin_toggles_back() {
        let mut machine = ArmingStateMachine::new();
        enter(&mut machine, "1234");
        machine.submit();
        enter(&mut machine, "0000");
        assert_eq!(machine.submit(), Some(SystemStatus::Unarmed));

        let messages: Vec<_> = machine.activity_log().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["System armed", "System unarmed"]);
    }

    #[test]
    fn test_ids_unique_and_newest_first_within_same_millisecond() {
        let mut machine = ArmingStateMachine::new();
        let now = Local::now();
        for _ in 0..5 {
            enter(&mut machine, "1111");
            machine.submit_at(now);
        }

        let ids: Vec<_> = machine.activity_log().map(|r| r.id).collect();
        assert_eq!(ids.len(), 5);
        for pair in ids.windows(2) {
            assert!(pair[0] > pair[1], "log must be newest first: {:?}", ids);
        }
    }

    #[test]
    fn test_timestamp_format() {
        use chrono::TimeZone;

        let mut machine = ArmingStateMachine::new();
        let now = Local
            .with_ymd_and_hms(2024, 5, 1, 22, 20, 5)
            .single()
            .expect("unambiguous local time");
        enter(&mut machine, "4321");
        machine.submit_at(now);

        let record = machine.activity_log().next().expect("one record");
        assert_eq!(record.timestamp, "10:20:05 PM");
    }

    #[test]
    fn test_apply_keys() {
        let mut machine = ArmingStateMachine::new();
        let keys = [
            Key::Digit('1'),
            Key::Digit('2'),
            Key::Delete,
            Key::Digit('3'),
            Key::Submit,
            Key::Digit('4'),
            Key::Digit('5'),
        ];
        for key in keys {
            assert_eq!(machine.apply(key), None);
        }
        assert_eq!(machine.apply(Key::Submit), Some(SystemStatus::Armed));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(SystemStatus::Unarmed.action_label(), "Arm System");
        assert_eq!(SystemStatus::Armed.action_label(), "Disarm System");
        assert_eq!(SystemStatus::Armed.to_string(), "Armed");
        assert_eq!(SystemStatus::Unarmed.word(), "unarmed");
    }

    #[test]
    fn test_pin_buffer_debug_hides_digits() {
        let mut pin = PinBuffer::default();
        pin.push('7');
        pin.push('3');
        let debug = format!("{:?}", pin);
        assert!(!debug.contains('7'));
        assert!(debug.contains("len: 2"));
    }
}
