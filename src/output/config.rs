//! Configuration for call-record display.

use std::io::IsTerminal;

/// When to display recorded calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Always show records regardless of test result.
    Always,
    /// Only show records when an assertion fails (default).
    #[default]
    OnFailure,
    /// Never show records.
    Never,
}

/// Configuration for call-record display.
///
/// Use the builder pattern to configure what gets displayed:
///
/// ```rust
/// use tattle::output::{OutputConfig, OutputMode};
///
/// let config = OutputConfig::new()
///     .records(OutputMode::Always)
///     .truncate_at(80)
///     .colors(false);
/// ```
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// When to show the recorded call log.
    pub records: OutputMode,
    /// Maximum characters before truncating a rendered value.
    pub truncate_at: usize,
    /// Whether to use ANSI colors in output.
    pub colors_enabled: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            records: OutputMode::OnFailure,
            truncate_at: 60,
            colors_enabled: std::io::stdout().is_terminal(),
        }
    }
}

impl OutputConfig {
    /// Create a new output configuration with defaults.
    ///
    /// Default: `OnFailure`, 60 character truncation, colors auto-detected
    /// from TTY.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure when to show the recorded call log.
    pub fn records(mut self, mode: OutputMode) -> Self {
        self.records = mode;
        self
    }

    /// Set the maximum characters before truncating a rendered value.
    pub fn truncate_at(mut self, chars: usize) -> Self {
        self.truncate_at = chars;
        self
    }

    /// Enable or disable ANSI colors.
    pub fn colors(mut self, enabled: bool) -> Self {
        self.colors_enabled = enabled;
        self
    }

    /// Create a verbose configuration that always shows the call log.
    pub fn verbose() -> Self {
        Self {
            records: OutputMode::Always,
            ..Self::default()
        }
    }

    /// Create a quiet configuration that never shows the call log.
    pub fn quiet() -> Self {
        Self {
            records: OutputMode::Never,
            ..Self::default()
        }
    }
}
