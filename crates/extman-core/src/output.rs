//! Output sink abstraction
//!
//! Batch operations report progress and failures as human-readable lines
//! through an explicit interface instead of writing to a global console,
//! so drivers and tests can capture and route them.

/// Line-oriented output channels for user-facing messages
pub trait OutputSink: Send + Sync {
    /// Write an informational line
    fn info(&self, line: &str);

    /// Write an error line
    fn error(&self, line: &str);
}

/// Output sink that records every line; used by tests to assert on
/// the messages an operation produced
#[derive(Debug, Default)]
pub struct RecordingOutput {
    lines: std::sync::Mutex<Vec<(Channel, String)>>,
}

/// Which channel a recorded line was written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Info,
    Error,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines, both channels, in write order
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .expect("output lock poisoned")
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// Recorded lines on the error channel only
    pub fn error_lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .expect("output lock poisoned")
            .iter()
            .filter(|(channel, _)| *channel == Channel::Error)
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// Whether any recorded line contains the given fragment
    pub fn contains(&self, fragment: &str) -> bool {
        self.lines().iter().any(|line| line.contains(fragment))
    }
}

impl OutputSink for RecordingOutput {
    fn info(&self, line: &str) {
        self.lines
            .lock()
            .expect("output lock poisoned")
            .push((Channel::Info, line.to_string()));
    }

    fn error(&self, line: &str) {
        self.lines
            .lock()
            .expect("output lock poisoned")
            .push((Channel::Error, line.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_output_separates_channels() {
        let output = RecordingOutput::new();
        output.info("installing");
        output.error("boom");
        assert_eq!(output.lines(), vec!["installing", "boom"]);
        assert_eq!(output.error_lines(), vec!["boom"]);
        assert!(output.contains("install"));
    }
}
