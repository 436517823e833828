//! Fluent assertion API for spied callables.
//!
//! This module provides a Jest-like API for making assertions about a spy's
//! recorded calls. Assertions evaluate immediately (panic on failure) when
//! using methods like `to_be_called()`, or can be evaluated non-destructively
//! using `evaluate()`. Everything here is a veneer over the boolean matchers
//! on [`crate::Spy`]; no new matching semantics are introduced.
//!
//! # Example
//!
//! ```rust,ignore
//! use tattle::{args, expect, Spy};
//!
//! let spy = Spy::new();
//! // ... install the spy and drive the spied callable ...
//!
//! // Immediate evaluation (panics on failure)
//! expect(&spy).times(2).to_be_called();
//! expect(&spy).nth_call(1).has_args(args!["john", "doe"]);
//!
//! // Non-panicking evaluation
//! let result = expect(&spy).evaluate();
//! assert!(result.passed);
//! ```

mod builder;
mod returns;

pub use builder::{expect, AssertionResult, CallAssertion, SpyExpectation};
pub use returns::ReturnAssertion;
