//! The logging capability consumed throughout the build pipeline.
//!
//! Components never log directly; they accept a `&dyn Logger` and report
//! tagged events through it. The tag is a severity plus the name of the
//! reporting component, so a host can route or filter without parsing
//! message text.

use std::fmt;
use std::sync::Mutex;

/// The severity of a logged event, ordered from least to most severe.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Severity {
    /// Routine progress reporting.
    Info,
    /// A recovered problem, such as a rejected target candidate.
    Warning,
    /// A failure surfaced to the caller or a substituted default.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A consumer-supplied sink for pipeline events.
///
/// Implementations must be cheap to call and must not fail; the pipeline
/// treats logging as fire-and-forget.
pub trait Logger {
    /// Records one event tagged with a severity and the reporting component.
    fn log(&self, severity: Severity, component: &str, message: &str);
}

/// A logger that discards every event.
///
/// Used by the cache-priming sweep, where per-candidate warnings for every
/// known target would only be noise.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _severity: Severity, _component: &str, _message: &str) {}
}

/// A single event captured by [`MemoryLogger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Severity the event was tagged with.
    pub severity: Severity,
    /// Name of the component that reported the event.
    pub component: String,
    /// The message text.
    pub message: String,
}

/// A thread-safe logger that accumulates events in memory.
///
/// Primarily a test aid: tests run a pipeline operation against a
/// `MemoryLogger` and then assert on the captured events.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    /// Creates an empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all captured events without draining.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Takes all captured events, leaving the logger empty.
    pub fn take_all(&self) -> Vec<LogEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    /// Returns `true` if any error-severity event has been captured.
    pub fn has_errors(&self) -> bool {
        self.events
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.severity == Severity::Error)
    }
}

impl Logger for MemoryLogger {
    fn log(&self, severity: Severity, component: &str, message: &str) {
        self.events.lock().unwrap().push(LogEvent {
            severity,
            component: component.to_string(),
            message: message.to_string(),
        });
    }
}
