//! Terminal output utilities

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use extman_core::OutputSink;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Create a spinner
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Output sink writing styled lines to the terminal
pub struct ConsoleOutput;

impl OutputSink for ConsoleOutput {
    fn info(&self, line: &str) {
        info(line);
    }

    fn error(&self, line: &str) {
        error(line);
    }
}
