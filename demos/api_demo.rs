//! Walk-through of the spy, binder, and assertion APIs.

use tattle::{
    args, expect, Binder, CallableTable, OutputConfig, OutputMode, RecordFormatter, ReturnValue,
    Spy,
};

fn main() -> anyhow::Result<()> {
    // A host object with a named callable, standing in for an ambient
    // function like a console logger.
    let mut table = CallableTable::new();
    table.register("console.log", Box::new(|_| ReturnValue::None));

    // Example 1: record calls and query them with the boolean matchers
    println!("=== Boolean Matchers ===");
    let spy = Spy::new();
    spy.spy_on(&mut table, "console.log")?
        .will_return("first")
        .will_return("second");

    table.invoke("console.log", args!["john", "doe"])?;
    table.invoke("console.log", args!["john"])?;

    println!("called twice: {}", spy.have_been_called_times(2));
    println!(
        "first call was (john, doe): {}",
        spy.have_been_nth_called_with(1, args!["john", "doe"])
    );
    println!(
        "last returned \"second\": {}",
        spy.have_last_returned_with("second")
    );

    // Example 2: the fluent layer, panicking and non-panicking
    println!("\n=== Fluent Assertions ===");
    expect(&spy).times(2).to_be_called();
    expect(&spy)
        .nth_call(1)
        .has_args(args!["john", "doe"])
        .returned("first");

    let result = expect(&spy).times(5).evaluate();
    println!(
        "times(5) evaluated without panicking: passed={} reason={}",
        result.passed,
        result.reason.unwrap_or_default()
    );

    // Example 3: fall-through returns after the queue runs dry
    println!("\n=== Fallback Returns ===");
    let returned = table.invoke("console.log", args!["third call"])?;
    println!("queue exhausted, got: {:?}", returned);

    spy.will_always_return("always");
    let returned = table.invoke("console.log", args!["fourth call"])?;
    println!("with fallback, got: {:?}", returned);

    // Example 4: render the call log
    println!("\n=== Recorded Calls ===");
    let formatter = RecordFormatter::new(OutputConfig::new().records(OutputMode::Always));
    formatter.print_records(&spy.calls(), false);

    // Example 5: restore the original callable
    table.detach("console.log")?;
    println!("\noriginal callable restored");

    Ok(())
}
