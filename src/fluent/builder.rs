//! Fluent assertion builder for spies.
//!
//! This module provides the core builder types for making assertions about a
//! spy's recorded calls:
//! - `expect()` - Entry point for creating assertions from a [`Spy`]
//! - `SpyExpectation` - Builder for call-count and argument assertions
//! - `CallAssertion` - Assertions about one specific recorded call

use serde_json::Value;

use crate::output::{OutputConfig, RecordFormatter};
use crate::record::{args_match, CallRecord, ReturnValue};
use crate::spy::Spy;

use super::returns::ReturnAssertion;

/// Result of evaluating an assertion.
#[derive(Debug, Clone)]
pub struct AssertionResult {
    /// Whether the assertion passed.
    pub passed: bool,
    /// Description of what was asserted.
    pub description: String,
    /// Failure reason if the assertion failed.
    pub reason: Option<String>,
}

impl AssertionResult {
    /// Create a passing assertion result.
    pub(crate) fn pass(description: impl Into<String>) -> Self {
        Self {
            passed: true,
            description: description.into(),
            reason: None,
        }
    }

    /// Create a failing assertion result.
    pub(crate) fn fail(description: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            description: description.into(),
            reason: Some(reason.into()),
        }
    }
}

/// Create an expectation on a spy's recorded calls.
///
/// This is the entry point for the fluent assertion API.
///
/// # Example
///
/// ```rust,ignore
/// use tattle::{args, expect, Spy};
///
/// let spy = Spy::new();
/// // ... drive the spied callable ...
///
/// expect(&spy).to_be_called();
/// expect(&spy).times(2).with_args(args!["john"]).to_be_called();
/// expect(&spy).nth_call(1).has_args(args!["john", "doe"]);
/// ```
pub fn expect(spy: &Spy) -> SpyExpectation {
    SpyExpectation::new(spy)
}

/// Builder for assertions about how a spy was called.
///
/// Methods like `to_be_called()` evaluate immediately and panic on failure.
/// Use `evaluate()` for non-panicking evaluation.
#[derive(Debug, Clone)]
pub struct SpyExpectation {
    spy: Spy,
    expected_args: Option<Vec<Value>>,
    expected_times: Option<usize>,
}

impl SpyExpectation {
    /// Create a new expectation over the given spy.
    pub fn new(spy: &Spy) -> Self {
        Self {
            spy: spy.clone(),
            expected_args: None,
            expected_times: None,
        }
    }

    // =========================================================================
    // Builder methods (chainable)
    // =========================================================================

    /// Expect the most recent call to have been made with exactly these
    /// arguments. Combined with [`SpyExpectation::times`], expects **every**
    /// call to have used them.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// expect(&spy)
    ///     .with_args(args!["john", "doe"])
    ///     .to_be_called();
    /// ```
    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.expected_args = Some(args);
        self
    }

    /// Expect the spy to have been called exactly N times.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// expect(&spy).times(3).to_be_called();
    /// ```
    pub fn times(mut self, n: usize) -> Self {
        self.expected_times = Some(n);
        self
    }

    // =========================================================================
    // Assertion methods (panic on failure)
    // =========================================================================

    /// Assert the spy was called, honoring any `times`/`with_args`
    /// constraints.
    ///
    /// # Panics
    ///
    /// Panics with a detailed error message, including the recorded call
    /// log, if the assertion fails.
    pub fn to_be_called(&self) {
        let result = self.evaluate_called(true);
        if !result.passed {
            self.panic_with_context(&result);
        }
    }

    /// Assert the spy was NOT called.
    ///
    /// # Panics
    ///
    /// Panics with a detailed error message if any call was recorded.
    pub fn not_to_be_called(&self) {
        let result = self.evaluate_called(false);
        if !result.passed {
            self.panic_with_context(&result);
        }
    }

    // =========================================================================
    // Per-call assertions
    // =========================================================================

    /// Get the nth call (1-indexed) for further assertions.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// expect(&spy)
    ///     .nth_call(1)
    ///     .has_args(args!["john", "doe"])
    ///     .returned("first");
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the nth call doesn't exist.
    pub fn nth_call(&self, n: usize) -> CallAssertion {
        let calls = self.spy.calls();

        if n == 0 || n > calls.len() {
            panic!(
                "assertion failed: expected call #{} to exist\n\n  actual: {} calls made\n{}",
                n,
                calls.len(),
                format_records(&calls)
            );
        }

        CallAssertion::new(calls[n - 1].clone(), n, self.spy.clone())
    }

    /// Get the most recent call for further assertions.
    ///
    /// # Panics
    ///
    /// Panics if the spy was never called.
    pub fn last_call(&self) -> CallAssertion {
        let calls = self.spy.calls();

        if calls.is_empty() {
            panic!(
                "assertion failed: expected the spy to have been called\n\n  actual: 0 calls made\n{}",
                format_records(&calls)
            );
        }

        let n = calls.len();
        CallAssertion::new(calls[n - 1].clone(), n, self.spy.clone())
    }

    /// Create an assertion about the values the spy handed back.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// expect(&spy).returned().times(2).to_exist();
    /// ```
    pub fn returned(&self) -> ReturnAssertion {
        ReturnAssertion::new(&self.spy)
    }

    // =========================================================================
    // Non-panicking evaluation
    // =========================================================================

    /// Evaluate the assertion without panicking (expects the spy to be
    /// called).
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let result = expect(&spy).times(2).evaluate();
    /// if !result.passed {
    ///     println!("Failed: {}", result.reason.unwrap());
    /// }
    /// ```
    pub fn evaluate(&self) -> AssertionResult {
        self.evaluate_called(true)
    }

    /// Evaluate that the spy was NOT called, without panicking.
    pub fn evaluate_not_called(&self) -> AssertionResult {
        self.evaluate_called(false)
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn evaluate_called(&self, should_be_called: bool) -> AssertionResult {
        let count = self.spy.call_count();
        let was_called = count > 0;

        // Collect all failures - check ALL constraints
        let mut failures: Vec<String> = Vec::new();

        if should_be_called && !was_called {
            failures.push("the spy was never called".to_string());
        } else if !should_be_called && was_called {
            failures.push(format!(
                "the spy was called {} time(s) but should not have been",
                count
            ));
        }

        if should_be_called {
            match (self.expected_times, &self.expected_args) {
                (Some(expected), Some(args)) => {
                    if count != expected {
                        failures.push(format!("expected {} calls, got {}", expected, count));
                    } else if !self
                        .spy
                        .have_been_called_times_with(expected, args.clone())
                    {
                        failures.push("not every call used the expected arguments".to_string());
                    }
                }
                (Some(expected), None) => {
                    if count != expected {
                        failures.push(format!("expected {} calls, got {}", expected, count));
                    }
                }
                (None, Some(args)) => {
                    if was_called && !self.spy.have_been_called_with(args.clone()) {
                        failures.push("last call arguments did not match".to_string());
                    }
                }
                (None, None) => {}
            }
        }

        let description = self.build_description(should_be_called);

        if failures.is_empty() {
            AssertionResult::pass(description)
        } else {
            AssertionResult::fail(description, failures.join("; "))
        }
    }

    /// Build a human-readable description of what this assertion checks.
    fn build_description(&self, should_be_called: bool) -> String {
        let mut parts = vec!["spy".to_string()];

        if should_be_called {
            parts.push("called".to_string());
        } else {
            parts.push("not called".to_string());
        }

        if let Some(n) = self.expected_times {
            parts.push(format!("{} times", n));
        }

        if let Some(args) = &self.expected_args {
            let formatter = plain_formatter();
            parts.push(format!("with {}", formatter.format_args(args)));
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

/// Assertion builder for a specific recorded call (used in
/// `nth_call`/`last_call`).
#[derive(Debug, Clone)]
pub struct CallAssertion {
    record: CallRecord,
    n: usize,
    spy: Spy,
}

impl CallAssertion {
    fn new(record: CallRecord, n: usize, spy: Spy) -> Self {
        Self { record, n, spy }
    }

    /// Assert this specific call was made with exactly these arguments.
    ///
    /// # Panics
    ///
    /// Panics if the arguments don't match.
    pub fn has_args(self, args: Vec<Value>) -> Self {
        if !args_match(&args, self.record.args()) {
            let formatter = plain_formatter();
            panic!(
                "assertion failed: call #{} arguments did not match\n\n  expected: {}\n  actual: {}\n{}",
                self.n,
                formatter.format_args(&args),
                formatter.format_args(self.record.args()),
                format_records(&self.spy.calls())
            );
        }
        self
    }

    /// Assert this specific call handed back a value deep-equal to
    /// `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the returned value doesn't match.
    pub fn returned(self, expected: impl Into<ReturnValue>) -> Self {
        let expected = expected.into();
        if !self.record.returned().deep_eq(&expected) {
            let formatter = plain_formatter();
            panic!(
                "assertion failed: call #{} returned value did not match\n\n  expected: {}\n  actual: {}\n{}",
                self.n,
                formatter.format_return(&expected),
                formatter.format_return(self.record.returned()),
                format_records(&self.spy.calls())
            );
        }
        self
    }

    /// Evaluate an argument match without panicking.
    pub fn evaluate_args(&self, args: Vec<Value>) -> AssertionResult {
        let description = format!("call #{} arguments match", self.n);
        if args_match(&args, self.record.args()) {
            AssertionResult::pass(description)
        } else {
            let formatter = plain_formatter();
            AssertionResult::fail(
                description,
                format!(
                    "expected {}, got {}",
                    formatter.format_args(&args),
                    formatter.format_args(self.record.args())
                ),
            )
        }
    }

    /// Evaluate a returned-value match without panicking.
    pub fn evaluate_returned(&self, expected: impl Into<ReturnValue>) -> AssertionResult {
        let expected = expected.into();
        let description = format!("call #{} returned value matches", self.n);
        if self.record.returned().deep_eq(&expected) {
            AssertionResult::pass(description)
        } else {
            let formatter = plain_formatter();
            AssertionResult::fail(
                description,
                format!(
                    "expected {}, got {}",
                    formatter.format_return(&expected),
                    formatter.format_return(self.record.returned())
                ),
            )
        }
    }

    /// The actual arguments of this call.
    pub fn args(&self) -> &[Value] {
        self.record.args()
    }

    /// The value this call handed back.
    pub fn returned_value(&self) -> &ReturnValue {
        self.record.returned()
    }

    /// The call index (1-indexed).
    pub fn index(&self) -> usize {
        self.n
    }
}

/// Formatter for failure messages: plain text, no colors.
pub(super) fn plain_formatter() -> RecordFormatter {
    RecordFormatter::new(OutputConfig::new().colors(false))
}

/// Render the call log for embedding in a panic message.
pub(super) fn format_records(records: &[CallRecord]) -> String {
    plain_formatter().format_records(records)
}
