use crate::domain::ports::Diagnostics;
use std::sync::Mutex;

/// Forwards diagnostics to `tracing`, tagged with the emitting component.
#[derive(Debug, Clone)]
pub struct TracingDiagnostics {
    component: &'static str,
    per_line_info: bool,
}

impl TracingDiagnostics {
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            per_line_info: true,
        }
    }

    /// When disabled, per-line progress drops to debug level.
    pub fn with_per_line_info(mut self, enabled: bool) -> Self {
        self.per_line_info = enabled;
        self
    }
}

impl Diagnostics for TracingDiagnostics {
    fn info(&self, message: &str) {
        tracing::info!(component = self.component, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(component = self.component, "{}", message);
    }

    fn line(&self, message: &str) {
        if self.per_line_info {
            tracing::info!(component = self.component, "{}", message);
        } else {
            tracing::debug!(component = self.component, "{}", message);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

/// Keeps every message in memory. Used by tests to observe what a component reported.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn infos(&self) -> Vec<String> {
        self.messages(Level::Info)
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(Level::Error)
    }

    fn messages(&self, level: Level) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(l, _)| *l == level)
                    .map(|(_, m)| m.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn push(&self, level: Level, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ParseError;
    use std::io::{self, Write};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured<F: FnOnce()>(f: F) -> String {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, f);
        buffer.text()
    }

    #[test]
    fn test_per_line_progress_demoted_to_debug() {
        let quiet = TracingDiagnostics::new("ingest").with_per_line_info(false);
        let output = captured(|| quiet.line("products.txt: line 1 processed successfully"));

        assert!(output.contains("DEBUG"), "got {}", output);
        assert!(!output.contains("INFO"), "got {}", output);
        assert!(output.contains("products.txt: line 1 processed successfully"));
        assert!(output.contains("component=\"ingest\""));
    }

    #[test]
    fn test_per_line_progress_at_info_by_default() {
        let diagnostics = TracingDiagnostics::new("ingest");
        let output = captured(|| diagnostics.line("listings.txt: line 2 processed successfully"));

        assert!(output.contains("INFO"), "got {}", output);
        assert!(!output.contains("DEBUG"), "got {}", output);
    }

    #[test]
    fn test_error_with_logs_cause_chain() {
        let diagnostics = TracingDiagnostics::new("ingest");
        let err = ParseError::Malformed {
            source_name: "listings.txt".to_string(),
            line: 4,
            cause: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        };
        let output = captured(|| diagnostics.error_with("listings.txt: processing of line 4 failed", &err));

        assert!(output.contains("ERROR"), "got {}", output);
        assert!(output.contains("listings.txt: processing of line 4 failed: malformed JSON: EOF"));
    }

    #[test]
    fn test_recording_separates_levels() {
        let diagnostics = RecordingDiagnostics::new();
        diagnostics.info("loaded");
        diagnostics.line("line 1 processed");
        diagnostics.error("line 2 failed");

        assert_eq!(diagnostics.infos(), vec!["loaded", "line 1 processed"]);
        assert_eq!(diagnostics.errors(), vec!["line 2 failed"]);
    }
}
