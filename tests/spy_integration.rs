//! End-to-end tests driving a spied callable through the binder seam.
//!
//! Each test registers a callable on a `CallableTable`, replaces it with a
//! spy, invokes it the way production code would, and asserts on the
//! recorded calls.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{json, Value};
use tattle::{args, expect, BindError, Binder, CallableTable, ReturnValue, Spy};

/// A table with a "console.log" that appends rendered lines to a shared
/// buffer, so tests can observe whether the original callable still runs.
fn logger_table() -> (CallableTable, Rc<RefCell<Vec<String>>>) {
    let lines = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&lines);

    let mut table = CallableTable::new();
    table.register(
        "console.log",
        Box::new(move |args: Vec<Value>| {
            let rendered: Vec<String> = args.iter().map(Value::to_string).collect();
            sink.borrow_mut().push(rendered.join(" "));
            ReturnValue::None
        }),
    );
    (table, lines)
}

#[test]
fn spying_records_calls_and_silences_the_original() {
    let (mut table, lines) = logger_table();
    let spy = Spy::new();
    spy.spy_on(&mut table, "console.log").unwrap();

    table.invoke("console.log", args!["Hello"]).unwrap();

    assert!(spy.have_been_called());
    assert!(lines.borrow().is_empty());
}

#[test]
fn detach_restores_the_original_callable() {
    let (mut table, lines) = logger_table();
    let spy = Spy::new();
    spy.spy_on(&mut table, "console.log").unwrap();

    table.invoke("console.log", args!["spied"]).unwrap();
    table.detach("console.log").unwrap();
    table.invoke("console.log", args!["restored"]).unwrap();

    // The spy saw only the first call; the second reached the original.
    assert!(spy.have_been_called_times(1));
    assert_eq!(lines.borrow().as_slice(), ["\"restored\""]);
}

#[test]
fn attach_to_unknown_callable_fails() {
    let mut table = CallableTable::new();
    let spy = Spy::new();

    let err = spy.spy_on(&mut table, "does.not.exist").unwrap_err();
    assert!(matches!(err, BindError::UnknownCallable(name) if name == "does.not.exist"));
}

#[test]
fn logger_scenario_nth_and_last_call_arguments() {
    let (mut table, _lines) = logger_table();
    let spy = Spy::new();
    spy.spy_on(&mut table, "console.log").unwrap();

    table.invoke("console.log", args!["john", "doe"]).unwrap();
    table.invoke("console.log", args!["john"]).unwrap();

    assert!(spy.have_been_nth_called_with(1, args!["john", "doe"]));
    assert!(spy.have_been_nth_called_with(2, args!["john"]));
    assert!(spy.have_been_last_called_with(args!["john"]));
    assert!(!spy.have_been_last_called_with(args!["john", "doe"]));
}

#[test]
fn queued_values_are_observable_by_the_invoker() {
    let (mut table, _lines) = logger_table();
    let spy = Spy::new();
    spy.spy_on(&mut table, "console.log")
        .unwrap()
        .will_return("my value 1")
        .will_return("my value 2");

    assert_eq!(
        table.invoke("console.log", args!["Hello"]).unwrap(),
        ReturnValue::Value(json!("my value 1"))
    );
    assert_eq!(
        table.invoke("console.log", args!["Hello"]).unwrap(),
        ReturnValue::Value(json!("my value 2"))
    );

    // Queue exhausted, no fallback: the sentinel flows back to the caller.
    assert_eq!(
        table.invoke("console.log", args!["Hello"]).unwrap(),
        ReturnValue::None
    );

    spy.will_always_return("always value");
    assert_eq!(
        table.invoke("console.log", args!["Hello"]).unwrap(),
        ReturnValue::Value(json!("always value"))
    );
}

#[test]
fn returned_times_tracks_produced_values_only() {
    let (mut table, _lines) = logger_table();
    let spy = Spy::new();
    spy.spy_on(&mut table, "console.log")
        .unwrap()
        .will_return(10)
        .will_return(11)
        .will_return(12);

    table.invoke("console.log", args!["hello"]).unwrap();
    table.invoke("console.log", args!["welcome"]).unwrap();

    assert!(spy.have_returned_times(2));
    assert!(!spy.have_returned_times(3));

    table.invoke("console.log", args!["welcome again"]).unwrap();
    assert!(spy.have_returned_times(3));

    assert!(spy.have_nth_returned_with(1, 10));
    assert!(spy.have_nth_returned_with(2, 11));
    assert!(spy.have_nth_returned_with(3, 12));
}

#[test]
fn untouched_spy_edge_cases() {
    let (mut table, _lines) = logger_table();
    let spy = Spy::new();
    spy.spy_on(&mut table, "console.log").unwrap();

    assert!(!spy.have_returned());
    // Zero calls never satisfies the returned-times count, even for zero.
    assert!(!spy.have_returned_times(0));
    assert!(spy.have_returned_with(ReturnValue::None));
    assert!(!spy.have_last_returned_with(ReturnValue::None));
    assert!(spy.have_been_called_times(0));
}

#[test]
fn identical_calls_satisfy_called_times_with() {
    let (mut table, _lines) = logger_table();
    let spy = Spy::new();
    spy.spy_on(&mut table, "console.log").unwrap();

    table.invoke("console.log", args!["john", "doe"]).unwrap();
    table.invoke("console.log", args!["john", "doe"]).unwrap();

    assert!(spy.have_been_called_times_with(2, args!["john", "doe"]));
    assert!(!spy.have_been_called_times_with(1, args!["john", "doe"]));
    assert!(!spy.have_been_called_times_with(2, args!["john"]));

    table.invoke("console.log", args!["john"]).unwrap();
    assert!(!spy.have_been_called_times_with(3, args!["john", "doe"]));
}

#[test]
fn structured_arguments_compare_deeply() {
    let (mut table, _lines) = logger_table();
    let spy = Spy::new();
    spy.spy_on(&mut table, "console.log").unwrap();

    let user = json!({"user": {"first": "john", "last": "doe"}});
    table
        .invoke("console.log", args![user, ["a", "b"]])
        .unwrap();

    assert!(spy.have_been_called_with(args![
        json!({"user": {"first": "john", "last": "doe"}}),
        ["a", "b"]
    ]));
    assert!(!spy.have_been_called_with(args![
        json!({"user": {"first": "john", "last": "ray"}}),
        ["a", "b"]
    ]));
}

#[test]
fn fluent_assertions_through_the_binder() {
    let (mut table, _lines) = logger_table();
    let spy = Spy::new();
    spy.spy_on(&mut table, "console.log")
        .unwrap()
        .will_return("first");

    table.invoke("console.log", args!["john", "doe"]).unwrap();
    table.invoke("console.log", args!["john"]).unwrap();

    expect(&spy).times(2).to_be_called();
    expect(&spy)
        .nth_call(1)
        .has_args(args!["john", "doe"])
        .returned("first");
    expect(&spy)
        .last_call()
        .has_args(args!["john"])
        .returned(ReturnValue::None);
    let result = expect(&spy).returned().with(ReturnValue::None).times(1).evaluate();
    assert!(result.passed);
}

#[test]
fn two_spies_do_not_share_state() {
    let (mut table, _lines) = logger_table();
    let mut other = CallableTable::new();
    other.register("stdout.write", Box::new(|_| ReturnValue::None));

    let log_spy = Spy::new();
    let write_spy = Spy::new();
    log_spy.spy_on(&mut table, "console.log").unwrap();
    write_spy.spy_on(&mut other, "stdout.write").unwrap();

    table.invoke("console.log", args!["hello"]).unwrap();

    assert!(log_spy.have_been_called());
    assert!(!write_spy.have_been_called());
}
