//! Logging collaborator.
//!
//! Services report through a [`Logger`] handed to them at construction so
//! that embedding applications can route diagnostics wherever they like.
//! [`TracingLogger`] forwards to `tracing`; [`NullLogger`] discards
//! everything and is the named default.

/// Sink for the debug and error lines emitted by services.
pub trait Logger: Send + Sync {
    /// Records a debug-level message.
    fn debug(&self, message: &str);

    /// Records an error-level message.
    fn error(&self, message: &str);
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn debug(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}

/// Forwards messages to `tracing` under the `kayako` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "kayako", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "kayako", "{}", message);
    }
}

/// Test logger that keeps every line in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingLogger {
    pub(crate) lines: std::sync::Mutex<Vec<(&'static str, String)>>,
}

#[cfg(test)]
impl RecordingLogger {
    pub(crate) fn errors(&self) -> Vec<String> {
        self.by_level("error")
    }

    pub(crate) fn debugs(&self) -> Vec<String> {
        self.by_level("debug")
    }

    fn by_level(&self, level: &str) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

#[cfg(test)]
impl Logger for RecordingLogger {
    fn debug(&self, message: &str) {
        self.lines.lock().unwrap().push(("debug", message.to_string()));
    }

    fn error(&self, message: &str) {
        self.lines.lock().unwrap().push(("error", message.to_string()));
    }
}
