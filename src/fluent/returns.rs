//! Fluent assertion builder for returned values.
//!
//! This module provides the builder type for making assertions about the
//! values a spy handed back:
//! - `ReturnAssertion` - Builder for assertions on returned values

use crate::record::ReturnValue;
use crate::spy::Spy;

use super::builder::{format_records, plain_formatter, AssertionResult};

/// Builder for assertions on the values a spy handed back.
///
/// Methods like `to_exist()` evaluate immediately and panic on failure.
/// Use `evaluate()` for non-panicking evaluation.
#[derive(Debug, Clone)]
pub struct ReturnAssertion {
    spy: Spy,
    expected: Option<ReturnValue>,
    expected_times: Option<usize>,
}

impl ReturnAssertion {
    /// Create a new return assertion over the given spy.
    pub fn new(spy: &Spy) -> Self {
        Self {
            spy: spy.clone(),
            expected: None,
            expected_times: None,
        }
    }

    // =========================================================================
    // Builder methods (chainable)
    // =========================================================================

    /// Expect the most recent call's return to be exactly this value.
    ///
    /// This is the strict comparison: the sentinel only matches the
    /// sentinel, and on a spy with no recorded calls only
    /// [`ReturnValue::None`] matches.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// expect(&spy).returned().with("my value").to_exist();
    /// ```
    pub fn with(mut self, expected: impl Into<ReturnValue>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Expect exactly N calls to have produced a value.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// expect(&spy).returned().times(2).to_exist();
    /// ```
    pub fn times(mut self, n: usize) -> Self {
        self.expected_times = Some(n);
        self
    }

    // =========================================================================
    // Assertion methods (panic on failure)
    // =========================================================================

    /// Assert at least one call produced a value, honoring any
    /// `with`/`times` constraints.
    ///
    /// # Panics
    ///
    /// Panics with a detailed error message if the assertion fails.
    pub fn to_exist(&self) {
        let result = self.evaluate_exists(true);
        if !result.passed {
            self.panic_with_context(&result);
        }
    }

    /// Assert no call produced a value.
    ///
    /// # Panics
    ///
    /// Panics with a detailed error message if any call produced a value.
    pub fn to_be_absent(&self) {
        let result = self.evaluate_exists(false);
        if !result.passed {
            self.panic_with_context(&result);
        }
    }

    // =========================================================================
    // Non-panicking evaluation
    // =========================================================================

    /// Evaluate the assertion without panicking (expects a produced value).
    pub fn evaluate(&self) -> AssertionResult {
        self.evaluate_exists(true)
    }

    /// Evaluate that no call produced a value, without panicking.
    pub fn evaluate_absent(&self) -> AssertionResult {
        self.evaluate_exists(false)
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn evaluate_exists(&self, should_exist: bool) -> AssertionResult {
        let mut failures: Vec<String> = Vec::new();

        let produced = self.spy.have_returned();

        if should_exist && !produced {
            failures.push("no call produced a value".to_string());
        } else if !should_exist && produced {
            failures.push("a call produced a value but none should have".to_string());
        }

        if should_exist {
            if let Some(expected) = &self.expected {
                if !self.spy.have_returned_with(expected.clone()) {
                    let formatter = plain_formatter();
                    let actual = self
                        .spy
                        .calls()
                        .last()
                        .map(|call| formatter.format_return(call.returned()))
                        .unwrap_or_else(|| "(no calls)".to_string());
                    failures.push(format!(
                        "last return was {}, expected {}",
                        actual,
                        formatter.format_return(expected)
                    ));
                }
            }

            if let Some(expected) = self.expected_times {
                if !self.spy.have_returned_times(expected) {
                    let actual = self
                        .spy
                        .calls()
                        .iter()
                        .filter(|call| call.returned().is_value())
                        .count();
                    failures.push(format!(
                        "expected {} produced values, got {}",
                        expected, actual
                    ));
                }
            }
        }

        let description = self.build_description(should_exist);

        if failures.is_empty() {
            AssertionResult::pass(description)
        } else {
            AssertionResult::fail(description, failures.join("; "))
        }
    }

    fn build_description(&self, should_exist: bool) -> String {
        let mut parts = vec!["spy".to_string()];

        if should_exist {
            parts.push("returned".to_string());
        } else {
            parts.push("returned nothing".to_string());
        }

        if let Some(expected) = &self.expected {
            parts.push(format!("with {}", plain_formatter().format_return(expected)));
        }
        if let Some(n) = self.expected_times {
            parts.push(format!("{} times", n));
        }

        parts.join(" ")
    }

    fn panic_with_context(&self, result: &AssertionResult) -> ! {
        let reason = result.reason.as_deref().unwrap_or("unknown reason");
        panic!(
            "assertion failed: expected {}\n\n  reason: {}\n{}",
            result.description,
            reason,
            format_records(&self.spy.calls())
        );
    }
}
