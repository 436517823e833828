//! The spy: invocation capture plus the matcher set that queries it.
//!
//! A [`Spy`] is a cheaply-cloneable handle over one recorder: a queue of
//! programmed return values, a fallback return, and an append-only log of
//! [`CallRecord`]s. Install its capture handler in place of a callable (see
//! [`crate::binder`]), drive the callable, then assert on what was recorded.
//!
//! # Example
//!
//! ```rust
//! use tattle::{args, Spy};
//!
//! let spy = Spy::new();
//! spy.will_return(10).will_return(11);
//!
//! spy.capture(args!["john", "doe"]);
//! spy.capture(args!["john"]);
//!
//! assert!(spy.have_been_called_times(2));
//! assert!(spy.have_been_nth_called_with(1, args!["john", "doe"]));
//! assert!(spy.have_last_returned_with(11));
//! ```
//!
//! All matchers are pure queries over the recorded state and degrade to
//! `false` on out-of-range or absent data; none of them signal errors. The
//! handle is `Rc`-based and deliberately not `Send`/`Sync`: a recorder
//! belongs to one thread, and the read-then-append in [`Spy::capture`] is
//! not atomic.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::binder::{BindError, Binder, Callable};
use crate::record::{args_match, CallRecord, ReturnValue};

#[derive(Debug, Default)]
struct SpyState {
    queued: Vec<Value>,
    fallback: ReturnValue,
    calls: Vec<CallRecord>,
}

/// Records every invocation of a spied callable and answers assertions
/// about them.
///
/// Cloning a `Spy` clones the handle, not the recorder: all clones observe
/// the same call log, which is what lets the installed capture handler and
/// the asserting test share one recorder.
#[derive(Debug, Clone, Default)]
pub struct Spy {
    state: Rc<RefCell<SpyState>>,
}

impl Spy {
    /// Create an empty recorder: nothing queued, no fallback, no calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one invocation and pick its return value.
    ///
    /// The value for call *i* (0-based) is the programmed value at queue
    /// position *i* when one exists, otherwise the fallback as it is set at
    /// call time. The chosen value is appended to the log together with the
    /// arguments, then handed back to the invoker.
    ///
    /// Accepts any arity and any values; never fails.
    pub fn capture(&self, args: Vec<Value>) -> ReturnValue {
        let mut state = self.state.borrow_mut();
        let returned = match state.queued.get(state.calls.len()) {
            Some(value) => ReturnValue::Value(value.clone()),
            None => state.fallback.clone(),
        };
        state.calls.push(CallRecord::new(args, returned.clone()));
        returned
    }

    /// Box the capture handler for installation by a [`Binder`].
    ///
    /// The handler owns a clone of this handle, so calls that flow through
    /// it are visible to every other clone.
    pub fn handler(&self) -> Callable {
        let spy = self.clone();
        Box::new(move |args| spy.capture(args))
    }

    /// Install this spy's capture handler in place of the named callable.
    ///
    /// Returns the spy for chaining, so programming returns reads naturally:
    ///
    /// ```rust
    /// use tattle::{CallableTable, ReturnValue, Spy};
    ///
    /// let mut table = CallableTable::new();
    /// table.register("console.log", Box::new(|_| ReturnValue::None));
    ///
    /// let spy = Spy::new();
    /// spy.spy_on(&mut table, "console.log")
    ///     .unwrap()
    ///     .will_return("first")
    ///     .will_return("second");
    /// ```
    ///
    /// # Errors
    ///
    /// Fails with [`BindError::UnknownCallable`] when the binder has no
    /// callable under `name`.
    pub fn spy_on(&self, binder: &mut dyn Binder, name: &str) -> Result<&Self, BindError> {
        binder.attach(name, self.handler())?;
        Ok(self)
    }

    /// Queue `value` as the return for the next uncovered invocation.
    ///
    /// Values are position-indexed: the first `will_return` covers call 1,
    /// the second covers call 2, and so on. Positions already consumed by
    /// past invocations are not revisited.
    pub fn will_return(&self, value: impl Into<Value>) -> &Self {
        self.state.borrow_mut().queued.push(value.into());
        self
    }

    /// Set the fallback returned by every invocation the queue does not
    /// cover. Replaces any previous fallback; the queue is untouched.
    ///
    /// The fallback is read at call time, so setting it affects future
    /// fall-through invocations only; already-recorded calls keep the
    /// value they were given.
    pub fn will_always_return(&self, value: impl Into<Value>) -> &Self {
        self.state.borrow_mut().fallback = ReturnValue::Value(value.into());
        self
    }

    /// Number of invocations recorded so far.
    pub fn call_count(&self) -> usize {
        self.state.borrow().calls.len()
    }

    /// Snapshot of the recorded invocations, in call order.
    pub fn calls(&self) -> Vec<CallRecord> {
        self.state.borrow().calls.clone()
    }

    // =========================================================================
    // Matchers: calls
    // =========================================================================

    /// True when at least one invocation was recorded.
    pub fn have_been_called(&self) -> bool {
        !self.state.borrow().calls.is_empty()
    }

    /// True when exactly `expected` invocations were recorded.
    pub fn have_been_called_times(&self, expected: usize) -> bool {
        self.state.borrow().calls.len() == expected
    }

    /// True when the **most recent** invocation's arguments deep-equal
    /// `args`. False when nothing was recorded yet.
    pub fn have_been_called_with(&self, args: Vec<Value>) -> bool {
        let state = self.state.borrow();
        match state.calls.last() {
            Some(call) => args_match(&args, call.args()),
            None => false,
        }
    }

    /// True when exactly `expected` invocations were recorded **and** every
    /// one of them was made with `args`.
    ///
    /// With `expected == 0` and an untouched recorder this holds vacuously,
    /// whatever `args` contains.
    pub fn have_been_called_times_with(&self, expected: usize, args: Vec<Value>) -> bool {
        let state = self.state.borrow();
        state.calls.len() == expected
            && state.calls.iter().all(|call| args_match(&args, call.args()))
    }

    /// True when invocation `nth` (1-based) was made with `args`. False for
    /// `nth == 0` or `nth` past the recorded count.
    pub fn have_been_nth_called_with(&self, nth: usize, args: Vec<Value>) -> bool {
        let state = self.state.borrow();
        match nth_record(&state.calls, nth) {
            Some(call) => args_match(&args, call.args()),
            None => false,
        }
    }

    /// True when the most recent invocation was made with `args`. False when
    /// nothing was recorded yet.
    pub fn have_been_last_called_with(&self, args: Vec<Value>) -> bool {
        let count = self.call_count();
        self.have_been_nth_called_with(count, args)
    }

    // =========================================================================
    // Matchers: returns
    // =========================================================================

    /// True when invocation `nth` (1-based) returned a value deep-equal to
    /// `expected`. False for an out-of-range `nth`.
    pub fn have_nth_returned_with(&self, nth: usize, expected: impl Into<ReturnValue>) -> bool {
        let expected = expected.into();
        let state = self.state.borrow();
        match nth_record(&state.calls, nth) {
            Some(call) => call.returned().deep_eq(&expected),
            None => false,
        }
    }

    /// True when the most recent invocation returned a value deep-equal to
    /// `expected`. False when nothing was recorded yet.
    pub fn have_last_returned_with(&self, expected: impl Into<ReturnValue>) -> bool {
        let count = self.call_count();
        self.have_nth_returned_with(count, expected)
    }

    /// True when the most recent invocation's return is **exactly**
    /// `expected`, the "no value" sentinel included.
    ///
    /// This is a strict match, not the deep comparison the nth/last variants
    /// use, and it has one more quirk to its contract: with zero recorded
    /// invocations it is true precisely when `expected` is
    /// [`ReturnValue::None`].
    pub fn have_returned_with(&self, expected: impl Into<ReturnValue>) -> bool {
        let expected = expected.into();
        let state = self.state.borrow();
        match state.calls.last() {
            Some(call) => *call.returned() == expected,
            None => expected == ReturnValue::None,
        }
    }

    /// True when exactly `expected` recorded invocations produced a value
    /// (sentinel returns don't count). Unconditionally false while nothing
    /// was recorded, even for `expected == 0`.
    pub fn have_returned_times(&self, expected: usize) -> bool {
        let state = self.state.borrow();
        if state.calls.is_empty() {
            return false;
        }
        let times = state
            .calls
            .iter()
            .filter(|call| call.returned().is_value())
            .count();
        times == expected
    }

    /// True when at least one recorded invocation produced a value.
    pub fn have_returned(&self) -> bool {
        self.state
            .borrow()
            .calls
            .iter()
            .any(|call| call.returned().is_value())
    }
}

/// 1-based lookup into the call log; `nth == 0` is out of range.
fn nth_record(calls: &[CallRecord], nth: usize) -> Option<&CallRecord> {
    if nth == 0 {
        None
    } else {
        calls.get(nth - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use serde_json::json;

    #[test]
    fn test_have_been_called() {
        let spy = Spy::new();
        assert!(!spy.have_been_called());

        spy.capture(args!["Hello"]);
        assert!(spy.have_been_called());
    }

    #[test]
    fn test_queued_returns_then_fallback() {
        let spy = Spy::new();
        spy.will_return("my value 1").will_return("my value 2");

        assert!(spy.have_returned_with(ReturnValue::None));
        assert!(!spy.have_returned_with("my value"));

        spy.capture(args!["Hello"]);
        assert!(spy.have_returned_with("my value 1"));
        assert!(!spy.have_returned_with("my value 2"));

        spy.capture(args!["Hello"]);
        assert!(spy.have_returned_with("my value 2"));
        assert!(!spy.have_returned_with("my value 1"));

        // Queue exhausted, no fallback set.
        spy.capture(args!["Hello"]);
        assert!(spy.have_returned_with(ReturnValue::None));

        spy.will_always_return("always value");
        spy.capture(args!["Hello"]);
        assert!(spy.have_returned_with("always value"));
    }

    #[test]
    fn test_capture_hands_back_the_chosen_value() {
        let spy = Spy::new();
        spy.will_return(7);

        assert_eq!(spy.capture(args![]), ReturnValue::Value(json!(7)));
        assert_eq!(spy.capture(args![]), ReturnValue::None);
    }

    #[test]
    fn test_fallback_is_read_at_call_time() {
        let spy = Spy::new();
        spy.capture(args![]);
        spy.will_always_return("late");
        spy.capture(args![]);

        // The first call keeps the value it was given.
        assert!(spy.have_nth_returned_with(1, ReturnValue::None));
        assert!(spy.have_nth_returned_with(2, "late"));
    }

    #[test]
    fn test_queue_positions_are_not_revisited() {
        let spy = Spy::new();
        spy.capture(args![]);
        spy.will_return(45);

        // Position 1 was already consumed by the first call; the queued 45
        // sits at position 1 (0-based 0) and no future call reads it.
        spy.capture(args![]);
        assert!(spy.have_nth_returned_with(1, ReturnValue::None));
        assert!(spy.have_nth_returned_with(2, ReturnValue::None));
    }

    #[test]
    fn test_have_been_called_times() {
        let spy = Spy::new();
        spy.capture(args!["hello"]);
        assert!(spy.have_been_called_times(1));
        assert!(!spy.have_been_called_times(0));
        assert!(!spy.have_been_called_times(2));

        spy.capture(args!["hello"]);
        spy.capture(args!["hello"]);
        assert!(spy.have_been_called_times(3));
    }

    #[test]
    fn test_have_been_called_with() {
        let spy = Spy::new();
        assert!(!spy.have_been_called_with(args!["hello"]));

        spy.capture(args!["hello"]);
        assert!(spy.have_been_called_with(args!["hello"]));

        spy.capture(args!["john", "doe"]);
        assert!(spy.have_been_called_with(args!["john", "doe"]));
        // Compares the most recent call only.
        assert!(!spy.have_been_called_with(args!["hello"]));
    }

    #[test]
    fn test_have_been_called_times_with() {
        let spy = Spy::new();
        assert!(!spy.have_been_called_times_with(1, args!["hello"]));
        assert!(spy.have_been_called_times_with(0, args!["hello"]));

        spy.capture(args!["john", "doe"]);
        spy.capture(args!["john", "doe"]);
        assert!(!spy.have_been_called_times_with(1, args!["john", "doe"]));
        assert!(spy.have_been_called_times_with(2, args!["john", "doe"]));
        assert!(!spy.have_been_called_times_with(2, args!["john"]));
    }

    #[test]
    fn test_have_been_called_times_with_mixed_args() {
        let spy = Spy::new();
        spy.capture(args!["john", "doe"]);
        spy.capture(args!["john"]);
        assert!(!spy.have_been_called_times_with(2, args!["john", "doe"]));
    }

    #[test]
    fn test_have_been_nth_called_with() {
        let spy = Spy::new();
        assert!(!spy.have_been_nth_called_with(1, args!["john"]));
        assert!(!spy.have_been_nth_called_with(0, args!["john"]));

        spy.capture(args!["john", "doe"]);
        assert!(!spy.have_been_nth_called_with(1, args!["john"]));
        assert!(!spy.have_been_nth_called_with(1, args!["doe"]));
        assert!(spy.have_been_nth_called_with(1, args!["john", "doe"]));

        spy.capture(args!["john"]);
        assert!(!spy.have_been_nth_called_with(2, args!["john", "doe"]));
        assert!(!spy.have_been_nth_called_with(2, args!["doe"]));
        assert!(spy.have_been_nth_called_with(2, args!["john"]));

        assert!(!spy.have_been_nth_called_with(3, args!["john"]));
    }

    #[test]
    fn test_have_been_last_called_with() {
        let spy = Spy::new();
        assert!(!spy.have_been_last_called_with(args!["john", "doe"]));

        spy.capture(args!["john", "doe"]);
        assert!(spy.have_been_last_called_with(args!["john", "doe"]));

        spy.capture(args!["john"]);
        spy.capture(args!["doe"]);
        assert!(!spy.have_been_last_called_with(args!["john"]));
        assert!(spy.have_been_last_called_with(args!["doe"]));
    }

    #[test]
    fn test_have_nth_returned_with() {
        let spy = Spy::new();
        assert!(!spy.have_nth_returned_with(1, "john"));
        assert!(!spy.have_nth_returned_with(0, "john"));

        spy.will_return(json!(["yes", "no"]));
        spy.capture(args!["john", "doe"]);
        assert!(!spy.have_nth_returned_with(1, ReturnValue::None));
        assert!(spy.have_nth_returned_with(1, json!(["yes", "no"])));

        spy.will_return("alpha");
        spy.capture(args!["john", "doe"]);
        assert!(!spy.have_nth_returned_with(2, ReturnValue::None));
        assert!(spy.have_nth_returned_with(2, "alpha"));
    }

    #[test]
    fn test_have_last_returned_with() {
        let spy = Spy::new();
        assert!(!spy.have_last_returned_with("john"));

        spy.will_return(45);
        assert!(!spy.have_last_returned_with(45));

        spy.capture(args!["yes"]);
        assert!(spy.have_last_returned_with(45));
    }

    #[test]
    fn test_last_returned_sentinel_differs_from_returned_with() {
        let spy = Spy::new();
        // Strict last-return matching has a zero-call sentinel case; the
        // nth/last family stays false on an empty log.
        assert!(spy.have_returned_with(ReturnValue::None));
        assert!(!spy.have_last_returned_with(ReturnValue::None));
    }

    #[test]
    fn test_have_returned_times() {
        let spy = Spy::new();
        assert!(!spy.have_returned_times(1));
        assert!(!spy.have_returned_times(0));

        spy.will_return(10).will_return(11).will_return(12);
        spy.capture(args!["hello"]);
        spy.capture(args!["welcome"]);
        assert!(!spy.have_returned_times(0));
        assert!(!spy.have_returned_times(3));
        assert!(spy.have_returned_times(2));

        spy.capture(args!["welcome again"]);
        assert!(!spy.have_returned_times(2));
        assert!(spy.have_returned_times(3));
    }

    #[test]
    fn test_have_returned() {
        let spy = Spy::new();
        assert!(!spy.have_returned());

        spy.capture(args!["hello"]);
        assert!(!spy.have_returned());

        spy.will_return("no").will_return("yes");
        spy.capture(args!["John"]);
        assert!(spy.have_returned());
    }

    #[test]
    fn test_explicit_null_counts_as_a_return() {
        let spy = Spy::new();
        spy.will_return(Value::Null);
        spy.capture(args![]);

        assert!(spy.have_returned());
        assert!(spy.have_returned_times(1));
        assert!(spy.have_returned_with(Value::Null));
        assert!(!spy.have_returned_with(ReturnValue::None));
    }

    #[test]
    fn test_clones_share_the_recorder() {
        let spy = Spy::new();
        let handle = spy.clone();
        handle.capture(args!["via clone"]);

        assert!(spy.have_been_called());
        assert_eq!(spy.call_count(), 1);
    }

    #[test]
    fn test_calls_snapshot() {
        let spy = Spy::new();
        spy.will_return(1);
        spy.capture(args!["a"]);
        spy.capture(args!["b"]);

        let calls = spy.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args(), &args!["a"][..]);
        assert_eq!(calls[0].returned(), &ReturnValue::Value(json!(1)));
        assert_eq!(calls[1].returned(), &ReturnValue::None);
    }
}
