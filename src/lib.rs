//! # tattle
//!
//! A spy and call-recording library for unit tests.
//!
//! A [`Spy`] replaces a named callable on a host object with an instrumented
//! stand-in, records every invocation's arguments and computed return value,
//! and answers a rich set of assertions about what happened. It can be used
//! with Rust's native `#[test]` framework.
//!
//! ## Quick Start
//!
//! ```rust
//! use tattle::{args, Binder, CallableTable, ReturnValue, Spy};
//!
//! // A host object exposing named callables.
//! let mut table = CallableTable::new();
//! table.register("console.log", Box::new(|_| ReturnValue::None));
//!
//! // Replace it with a spy, programming two return values.
//! let spy = Spy::new();
//! spy.spy_on(&mut table, "console.log")
//!     .unwrap()
//!     .will_return("first")
//!     .will_return("second");
//!
//! // Drive the callable as production code would.
//! table.invoke("console.log", args!["john", "doe"]).unwrap();
//! table.invoke("console.log", args!["john"]).unwrap();
//!
//! // Assert on what was recorded.
//! assert!(spy.have_been_called_times(2));
//! assert!(spy.have_been_nth_called_with(1, args!["john", "doe"]));
//! assert!(spy.have_been_last_called_with(args!["john"]));
//! assert!(spy.have_last_returned_with("second"));
//!
//! // Restore the original callable.
//! table.detach("console.log").unwrap();
//! ```
//!
//! ## Fluent Assertions
//!
//! ```rust
//! use tattle::{args, expect, Spy};
//!
//! let spy = Spy::new();
//! spy.will_return(10);
//! spy.capture(args!["hello"]);
//!
//! expect(&spy).times(1).to_be_called();
//! expect(&spy).nth_call(1).has_args(args!["hello"]).returned(10);
//!
//! let result = expect(&spy).times(2).evaluate();
//! assert!(!result.passed);
//! ```
//!
//! ## Programmed Returns
//!
//! Queued values cover one invocation each, in order; the fallback set by
//! [`Spy::will_always_return`] covers everything past the queue. An
//! invocation covered by neither reports [`ReturnValue::None`], the
//! "no value" sentinel, distinct from an explicit `null` return.

pub mod binder;
pub mod fluent;
pub mod output;
pub mod record;
pub mod spy;

// Core types
pub use record::{args_match, deep_eq, CallRecord, ReturnValue};
pub use spy::Spy;

// Binder seam
pub use binder::{BindError, Binder, Callable, CallableTable};

// Fluent assertions
pub use fluent::{expect, AssertionResult, CallAssertion, ReturnAssertion, SpyExpectation};

// Output formatting
pub use output::{OutputConfig, OutputMode, RecordFormatter};

#[doc(hidden)]
pub use serde_json as __json;
