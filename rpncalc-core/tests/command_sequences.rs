// Integration tests: whole command sequences driven through the in-memory
// host, checking both the recovered state and the text the host ends up with.

use pretty_assertions::assert_eq;
use rpncalc_core::buffer::{OP_ERROR, PARAM_ERROR, PARSE_ERROR};
use rpncalc_core::{
    Base, Command, Context, Number, Record, RecordBuilder, Settings, Snapshot, Transcript, dispatch,
};
use rstest::rstest;

fn run(transcript: &mut Transcript, command: &str, arg: &str) -> Record {
    let command: Command = command.parse().expect("known command");
    let record = dispatch(transcript, command, arg);
    transcript.apply(record.clone());
    record
}

fn snapshot(record: &Record) -> &Snapshot {
    record.snapshot().expect("calculator record")
}

fn ints(values: &[i64]) -> Vec<Number> {
    values.iter().map(|&v| Number::from(v)).collect()
}

#[test]
fn test_push_push_add() {
    let mut t = Transcript::new();
    run(&mut t, "push", "5");
    run(&mut t, "push", "3");
    let record = run(&mut t, "add", "");

    assert_eq!(record.text, "8");
    assert_eq!(snapshot(&record).stack, ints(&[8]));
    assert_eq!(snapshot(&record).buffer, "");
    assert_eq!(t.rendered(), "8");
}

#[test]
fn test_binary_base_is_sticky() {
    let mut t = Transcript::new();
    assert_eq!(run(&mut t, "push_bin", "101").text, "101");
    assert_eq!(run(&mut t, "push_bin", "11").text, "[ 101 | 11 ]");
    let record = run(&mut t, "add", "");

    assert_eq!(snapshot(&record).stack, ints(&[8]));
    assert_eq!(snapshot(&record).base, Base::Binary);
    assert_eq!(record.text, "1000");
}

#[test]
fn test_arity_error_leaves_stack() {
    let mut t = Transcript::new();
    run(&mut t, "push", "7");
    let record = run(&mut t, "div", "");

    assert_eq!(snapshot(&record).buffer, PARAM_ERROR);
    assert_eq!(snapshot(&record).stack, ints(&[7]));
    assert_eq!(t.rendered(), "[ 7 > param error ]");
}

#[test]
fn test_division_by_zero_rolls_back() {
    let mut t = Transcript::new();
    run(&mut t, "push", "4");
    run(&mut t, "push", "0");
    let record = run(&mut t, "div", "");

    assert_eq!(snapshot(&record).buffer, OP_ERROR);
    assert_eq!(snapshot(&record).stack, ints(&[4, 0]));

    // the error message does not parse, but the operator still runs
    let record = run(&mut t, "swap", "");
    assert_eq!(snapshot(&record).stack, ints(&[0, 4]));
    assert_eq!(snapshot(&record).buffer, PARSE_ERROR);
    assert_eq!(record.text, "[ 0 | 4 > parse error ]");
}

#[test]
fn test_float_forces_decimal_display() {
    let mut t = Transcript::new();
    run(&mut t, "push_hex", "ff");
    assert_eq!(run(&mut t, "put", "1.5").text, "[ ff > 1.5 ]");

    let record = run(&mut t, "add", "");
    assert_eq!(record.text, "256.5");
    assert!(snapshot(&record).is_float);

    // a later hex push still parses hex, but displays in base 10
    let record = run(&mut t, "push-hex", "a");
    assert_eq!(record.text, "[ 256.5 | 10 ]");
    assert_eq!(snapshot(&record).base, Base::Decimal);
    assert!(snapshot(&record).is_float);
}

#[test]
fn test_parse_error_then_recovery() {
    let mut t = Transcript::new();
    let record = run(&mut t, "push-binary", "12");
    assert_eq!(snapshot(&record).buffer, PARSE_ERROR);
    assert!(snapshot(&record).stack.is_empty());
    assert_eq!(record.text, "[ > parse error ]");

    let record = run(&mut t, "put", "1");
    assert_eq!(record.text, "[ > parse error1 ]");

    run(&mut t, "clear-buffer", "");
    let record = run(&mut t, "put", "1");
    assert_eq!(record.text, "[ > 1 ]");
}

#[rstest]
#[case(&[("push-binary", "12")], PARSE_ERROR)]
#[case(&[("push", "1"), ("push", "0"), ("div", "")], OP_ERROR)]
#[case(&[("push", "7"), ("div", "")], PARAM_ERROR)]
fn test_error_message_is_literal_until_removed(
    #[case] setup: &[(&str, &str)],
    #[case] message: &str,
) {
    let mut t = Transcript::new();
    for (command, arg) in setup {
        run(&mut t, command, arg);
    }
    let stack = snapshot(t.last_record().expect("a record")).stack.clone();
    assert_eq!(snapshot(t.last_record().expect("a record")).buffer, message);

    let record = run(&mut t, "put", "5");
    assert_eq!(snapshot(&record).buffer, format!("{message}5"));
    assert_eq!(snapshot(&record).stack, stack);

    let record = run(&mut t, "push", "5");
    assert_eq!(snapshot(&record).buffer, PARSE_ERROR);
    assert_eq!(snapshot(&record).stack, stack);

    let record = run(&mut t, "delete-last", "");
    assert_eq!(snapshot(&record).buffer, "parse erro");

    run(&mut t, "clear-buffer", "");
    let record = run(&mut t, "push", "5");
    assert_eq!(snapshot(&record).buffer, "");
    assert_eq!(snapshot(&record).stack.last(), Some(&Number::from(5)));
}

#[test]
fn test_stack_shuffles() {
    let mut t = Transcript::new();
    run(&mut t, "push", "1");
    run(&mut t, "push", "2");
    assert_eq!(snapshot(&run(&mut t, "swap", "")).stack, ints(&[2, 1]));
    assert_eq!(snapshot(&run(&mut t, "dup", "")).stack, ints(&[2, 1, 1]));
    assert_eq!(snapshot(&run(&mut t, "pop", "")).stack, ints(&[2, 1]));
    assert_eq!(snapshot(&run(&mut t, "neg", "")).stack, ints(&[2, -1]));
    assert_eq!(t.rendered(), "[ 2 | -1 ]");
}

#[test]
fn test_pending_buffer_is_an_operand() {
    let mut t = Transcript::new();
    run(&mut t, "push", "10");
    run(&mut t, "put", "3");
    let record = run(&mut t, "mod", "");
    assert_eq!(record.text, "1");
}

#[test]
fn test_buffer_edits() {
    let mut t = Transcript::new();
    run(&mut t, "push", "5");
    run(&mut t, "put", "123");
    assert_eq!(run(&mut t, "delete-last", "").text, "[ 5 > 12 ]");
    assert_eq!(run(&mut t, "clear-stack", "").text, "[ > 12 ]");
    assert_eq!(run(&mut t, "clear-buffer", "").text, "[  ]");
    assert_eq!(t.rendered(), "[  ]");
}

#[test]
fn test_extend_without_calculator_takes_recent_words() {
    let mut t = Transcript::new();
    t.type_text("42");
    let record = run(&mut t, "extend", "");

    assert_eq!(snapshot(&record).buffer, "42");
    assert!(snapshot(&record).stack.is_empty());
    assert_eq!(record.replaces_prior.as_deref(), Some("42"));
    assert_eq!(t.rendered(), "[ > 42 ]");
}

#[test]
fn test_extend_absorbs_text_after_live_record() {
    let mut t = Transcript::new();
    t.type_text("total");
    run(&mut t, "push", "5");
    run(&mut t, "put", "1");
    t.type_text("23");
    assert_eq!(t.rendered(), "total [ 5 > 1 ] 23");

    let record = run(&mut t, "extend", "");
    assert_eq!(snapshot(&record).buffer, "123");
    assert_eq!(snapshot(&record).stack, ints(&[5]));
    assert_eq!(record.replaces_prior.as_deref(), Some("[ 5 > 1 ] 23"));
    assert_eq!(t.rendered(), "total [ 5 > 123 ]");

    run(&mut t, "add", "");
    assert_eq!(t.rendered(), "total 128");
}

#[test]
fn test_extend_joins_attached_text_without_space() {
    let mut t = Transcript::new();
    t.type_text("total");
    run(&mut t, "push", "5");
    run(&mut t, "put", "1");
    t.apply_unit(vec![
        RecordBuilder::new().text("23").attached(true).build(),
        RecordBuilder::new().text("4").attached(true).build(),
    ]);
    assert_eq!(t.rendered(), "total [ 5 > 1 ]234");

    let record = run(&mut t, "extend", "");
    assert_eq!(snapshot(&record).buffer, "1234");
    assert_eq!(record.replaces_prior.as_deref(), Some("[ 5 > 1 ]234"));
    assert_eq!(t.rendered(), "total [ 5 > 1234 ]");

    run(&mut t, "add", "");
    assert_eq!(t.rendered(), "total 1239");
}

#[test]
fn test_extend_budget_limits_the_scan() {
    let mut t = Transcript::with_settings(Settings::default().with_extend_limit(3));
    run(&mut t, "push", "5");
    t.type_text("1234");
    assert_eq!(t.settings().extend_limit, 3);

    let record = run(&mut t, "extend", "");
    assert!(snapshot(&record).stack.is_empty());
    assert_eq!(snapshot(&record).buffer, "1234");
    assert_eq!(t.rendered(), "5 [ > 1234 ]");
}

#[test]
fn test_end_finishes_the_chain() {
    let mut t = Transcript::new();
    run(&mut t, "push", "5");
    let record = run(&mut t, "end", "");
    assert_eq!(record.text, "5");
    assert!(!snapshot(&record).live);

    let record = run(&mut t, "push", "3");
    assert_eq!(record.replaces_prior, None);
    assert_eq!(t.rendered(), "5 3");
}

#[test]
fn test_clear_all_erases_display() {
    let mut t = Transcript::new();
    run(&mut t, "push", "5");
    run(&mut t, "push", "3");
    let record = run(&mut t, "clear-all", "");
    assert!(record.snapshot().is_none());
    assert_eq!(record.replaces_prior.as_deref(), Some("[ 5 | 3 ]"));
    assert_eq!(t.rendered(), "");

    let record = run(&mut t, "push", "2");
    assert_eq!(record.replaces_prior, None);
    assert_eq!(t.rendered(), "2");
}

#[test]
fn test_huge_power_is_an_op_error() {
    let mut t = Transcript::new();
    run(&mut t, "push", "10");
    run(&mut t, "push", "10000000");
    let record = run(&mut t, "pow", "");
    assert_eq!(snapshot(&record).buffer, OP_ERROR);
    assert_eq!(snapshot(&record).stack, ints(&[10, 10_000_000]));
}

#[cfg(feature = "lambda")]
#[test]
fn test_apply_function() {
    let mut t = Transcript::new();
    run(&mut t, "push", "3");
    run(&mut t, "push", "4");
    let record = run(&mut t, "apply-function", "x, y: x * y + 1");
    assert_eq!(snapshot(&record).stack, ints(&[13]));

    let record = run(&mut t, "apply-function", "x: (x // 2, x % 2)");
    assert_eq!(record.text, "[ 6 | 1 ]");
}

#[cfg(feature = "lambda")]
#[test]
fn test_apply_function_failures() {
    let mut t = Transcript::new();
    run(&mut t, "push", "3");
    run(&mut t, "put", "4");

    // the pending buffer is still committed before the definition is rejected
    let record = run(&mut t, "apply-function", "x, y: __import__(x)");
    assert_eq!(snapshot(&record).buffer, OP_ERROR);
    assert_eq!(snapshot(&record).stack, ints(&[3, 4]));

    let record = run(&mut t, "apply-function", "x, y, z: x + y + z");
    assert_eq!(snapshot(&record).buffer, PARAM_ERROR);
    assert_eq!(snapshot(&record).stack, ints(&[3, 4]));
}

#[cfg(feature = "lambda")]
#[test]
fn test_apply_function_with_runaway_body_is_an_op_error() {
    let mut t = Transcript::new();
    run(&mut t, "push", "3");
    let body = format!("x: x{}", "+x".repeat(10_000));
    let record = run(&mut t, "apply-function", &body);
    assert_eq!(snapshot(&record).buffer, OP_ERROR);
    assert_eq!(snapshot(&record).stack, ints(&[3]));
}
