//! Output sinks for formatted reports.

use std::io::Write;

use parking_lot::Mutex;
use tracing::info;

/// Destination of formatted report text.
pub trait OutputSink: Send + Sync {
    fn log(&self, text: &str);
}

/// Writes reports to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl OutputSink for StderrSink {
    fn log(&self, text: &str) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{text}");
    }
}

/// Writes reports to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn log(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{text}");
    }
}

/// Emits reports as `tracing` events on target `lintfilter::report`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn log(&self, text: &str) {
        info!(target: "lintfilter::report", "{text}");
    }
}

/// Collects reports in memory.
#[derive(Debug, Default)]
pub struct BufferSink {
    entries: Mutex<Vec<String>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything logged so far, one entry per call.
    pub fn lines(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Everything logged so far, joined with newlines.
    pub fn contents(&self) -> String {
        self.entries.lock().join("\n")
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl OutputSink for BufferSink {
    fn log(&self, text: &str) {
        self.entries.lock().push(text.to_string());
    }
}
