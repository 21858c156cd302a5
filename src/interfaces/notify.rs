use crate::error::BookingError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }
}

impl From<&BookingError> for Notification {
    fn from(err: &BookingError) -> Self {
        let severity = match err {
            BookingError::RecordsDropped { .. } => Severity::Warning,
            _ => Severity::Error,
        };
        Self::new(err.to_string(), severity)
    }
}

/// Receives notifications from the view layer.
pub trait Notifier {
    fn notify(&self, notification: &Notification);
}

/// Prints notifications to stderr as `[severity] message`.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notification: &Notification) {
        eprintln!("[{}] {}", notification.severity, notification.message);
    }
}
