//! Rendering of call records for display.

use crate::output::config::{OutputConfig, OutputMode};
use crate::record::{CallRecord, ReturnValue};
use serde_json::Value;

// ANSI color codes
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Formatter for a spy's recorded calls.
///
/// The plain `format_*` methods feed assertion failure messages; the
/// `print_records` path adds headers and color for direct terminal output.
pub struct RecordFormatter {
    config: OutputConfig,
}

impl RecordFormatter {
    /// Create a new formatter with the given configuration.
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Create a formatter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(OutputConfig::new())
    }

    /// Check if records should be shown given the test result.
    pub fn should_show_records(&self, test_passed: bool) -> bool {
        match self.config.records {
            OutputMode::Always => true,
            OutputMode::OnFailure => !test_passed,
            OutputMode::Never => false,
        }
    }

    /// Format a single value, truncating if necessary.
    pub fn format_value(&self, value: &Value) -> String {
        self.truncate(&value.to_string())
    }

    /// Format an argument list as a parenthesized tuple.
    pub fn format_args(&self, args: &[Value]) -> String {
        let parts: Vec<String> = args.iter().map(|v| self.format_value(v)).collect();
        format!("({})", parts.join(", "))
    }

    /// Format a return slot; the sentinel renders as `(no value)`.
    pub fn format_return(&self, returned: &ReturnValue) -> String {
        match returned.as_value() {
            Some(value) => self.format_value(value),
            None => "(no value)".to_string(),
        }
    }

    /// Format a single record with its 1-based call number.
    pub fn format_record(&self, n: usize, record: &CallRecord) -> String {
        format!(
            "    {}. {} -> {}",
            n,
            self.format_args(record.args()),
            self.format_return(record.returned())
        )
    }

    /// Format the whole call log as an indented block, for embedding in
    /// assertion failure messages.
    pub fn format_records(&self, records: &[CallRecord]) -> String {
        if records.is_empty() {
            return "  recorded calls: (none)\n".to_string();
        }

        let mut output = format!("  recorded calls ({}):\n", records.len());
        for (i, record) in records.iter().enumerate() {
            output.push_str(&self.format_record(i + 1, record));
            output.push('\n');
        }
        output
    }

    /// Print the call log if the output mode allows it.
    pub fn print_records(&self, records: &[CallRecord], test_passed: bool) {
        if !self.should_show_records(test_passed) {
            return;
        }

        println!();
        if self.config.colors_enabled {
            println!("{}Recorded calls:{}", YELLOW, RESET);
        } else {
            println!("Recorded calls:");
        }

        if records.is_empty() {
            println!("  (no calls)");
        } else {
            for (i, record) in records.iter().enumerate() {
                if self.config.colors_enabled {
                    println!(
                        "  {}#{}{} {} -> {}",
                        CYAN,
                        i + 1,
                        RESET,
                        self.format_args(record.args()),
                        self.format_return(record.returned())
                    );
                } else {
                    println!(
                        "  #{} {} -> {}",
                        i + 1,
                        self.format_args(record.args()),
                        self.format_return(record.returned())
                    );
                }
            }
        }
    }

    /// Truncate a string to the configured maximum length.
    /// Handles multi-byte UTF-8 characters safely.
    fn truncate(&self, s: &str) -> String {
        let max = self.config.truncate_at;
        let char_count = s.chars().count();

        if char_count <= max {
            s.to_string()
        } else {
            // Reserve 3 chars for "..."
            let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
            format!("{}...", truncated)
        }
    }
}
