//! Display of recorded calls for failure messages and diagnostics.
//!
//! This module provides configurable rendering of a spy's call log: the
//! fluent assertion layer uses the plain form for panic context, and tests
//! can print the colored form directly when debugging.
//!
//! # Example
//!
//! ```rust,ignore
//! use tattle::output::{OutputConfig, OutputMode, RecordFormatter};
//!
//! let config = OutputConfig::new()
//!     .records(OutputMode::Always)
//!     .truncate_at(80);
//!
//! let formatter = RecordFormatter::new(config);
//! formatter.print_records(&spy.calls(), test_passed);
//! ```

mod config;
mod formatter;

pub use config::{OutputConfig, OutputMode};
pub use formatter::RecordFormatter;
