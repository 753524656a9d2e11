//! User-facing reporting of registration failures.
//!
//! The registrar does not know how the host shows an alert. It is handed an
//! [`ErrorReporter`] and calls it exactly once per failed attempt, before the
//! error is returned to the caller.

use super::registrar::RegistrationError;

/// Alerts the user about a failed push registration.
pub trait ErrorReporter: Send + Sync {
    /// Surface `error` to the user.
    fn report(&self, error: &RegistrationError);
}

/// Reporter that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, error: &RegistrationError) {
        log::error!("[Registrar] Push registration failed: {error}");
    }
}

/// Reporter for terminal hosts: prints the alert to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ErrorReporter for ConsoleReporter {
    fn report(&self, error: &RegistrationError) {
        eprintln!("Push notification registration failed: {error}");
    }
}
