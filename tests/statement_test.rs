mod common;
use basicd::lang::Position;
use basicd::mach::{Event, Runtime};
use common::*;
use pretty_assertions::assert_eq;

#[test]
fn test_for_next_across_lines() {
    let out = run("
        10 for i=1 to 3
        20 print i
        30 next i
    ");
    assert_eq!(out, "1\n2\n3\n");
}

#[test]
fn test_for_next_on_one_line_with_step() {
    assert_eq!(run("10 for i=3 to 1 step -1:print i;:next i"), "321");
    assert_eq!(run("10 for i=0 to 1 step 0.5:print i;:next i"), "00.51");
}

#[test]
fn test_for_loop_always_runs_once() {
    assert_eq!(run("10 for i=3 to 1 step 1:print i:next i"), "3\n");
}

#[test]
fn test_for_needs_float_variable() {
    assert_eq!(run("10 for a$=1 to 2"), "Type mismatch in 10:0\n");
    assert_eq!(run("10 for i=1"), "Incomplete FOR loop in 10:0\n");
    assert_eq!(run("10 next i"), "Incomplete FOR loop in 10:0\n");
}

#[test]
fn test_gosub_returns_mid_line() {
    let out = run(r#"
        10 gosub 100:print "back"
        20 goto 200
        100 print "sub"
        110 return
        200 print "end"
    "#);
    assert_eq!(out, "sub\nback\nend\n");
}

#[test]
fn test_gosub_errors() {
    assert_eq!(run("10 return"), "RETURN without GOSUB in 10:0\n");
    assert_eq!(run("10 gosub 10"), "GOSUB stack overflow in 10:0\n");
    assert_eq!(run("10 goto 99"), "Invalid line number in 10:0\n");
    assert_eq!(run("10 goto 0\n20 print 2"), "Invalid line number in 10:0\n");
    assert_eq!(run("10 gosub 0\n20 print 2"), "Invalid line number in 10:0\n");
}

#[test]
fn test_failed_gosub_pushes_nothing() {
    let (mut r, c) = Runtime::with_capture();
    r.enter("10 gosub 99");
    r.enter("run");
    assert_eq!(exec(&mut r, &c), "Invalid line number in 10:0\n");
    r.enter("return");
    assert_eq!(exec(&mut r, &c), "RETURN without GOSUB in 0:0\n");
}

#[test]
fn test_deleting_a_missing_line_changes_nothing() {
    assert_eq!(run("10 print 1\n20\n30 print 3"), "1\n3\n");
}

#[test]
fn test_if_then() {
    let out = run(r#"
        10 x=5
        20 if x>3 then print "big"
        30 if x<3 then print "small"
        40 print "done"
    "#);
    assert_eq!(out, "big\ndone\n");
}

#[test]
fn test_if_without_then() {
    assert_eq!(run("10 if 1 print 2"), "Missing \"then\" in 10:0\n");
}

#[test]
fn test_error_position_counts_statements() {
    let out = run("
        10 print 1
        20 print 1:print 1/0
        30 print 3
    ");
    assert_eq!(out, "1\n1\nDivide by zero in 20:1\n");
}

#[test]
fn test_stop_and_cont() {
    let (mut r, c) = Runtime::with_capture();
    r.enter("10 print 1");
    r.enter("20 stop");
    r.enter("30 print 2");
    r.enter("run");
    assert_eq!(exec(&mut r, &c), "1\nStopped in 20:0\n");
    r.enter("cont");
    assert_eq!(exec(&mut r, &c), "2\n");
}

#[test]
fn test_break_and_cont() {
    let (mut r, c) = Runtime::with_capture();
    r.enter("10 i=0");
    r.enter("20 i=i+1");
    r.enter("30 goto 20");
    r.run(0).unwrap();
    assert_eq!(r.execute(10), Event::Running);
    r.interrupt();
    assert_eq!(r.execute(10), Event::Break(Position::new(30, 0)));
    r.enter("print i");
    assert_eq!(exec(&mut r, &c), "5\n");
    r.enter("cont");
    assert_eq!(r.execute(4), Event::Running);
    r.interrupt();
    assert_eq!(r.execute(4), Event::Break(Position::new(20, 0)));
    r.enter("print i");
    assert_eq!(exec(&mut r, &c), "6\n");
}

#[test]
fn test_run_keeps_variables() {
    let (mut r, c) = Runtime::with_capture();
    r.enter("10 print x");
    r.enter("x=5");
    assert_eq!(exec(&mut r, &c), "");
    r.enter("run");
    assert_eq!(exec(&mut r, &c), "5\n");
}

#[test]
fn test_run_from_line() {
    let out = run("
        10 print 1
        20 print 2
    ");
    assert_eq!(out, "1\n2\n");
    let (mut r, c) = Runtime::with_capture();
    r.enter("10 print 1");
    r.enter("20 print 2");
    r.enter("run 15");
    assert_eq!(exec(&mut r, &c), "2\n");
}

#[test]
fn test_new_and_clear() {
    let (mut r, c) = Runtime::with_capture();
    r.enter("10 print 1");
    r.enter("x=1:clear:print x");
    assert_eq!(exec(&mut r, &c), "Unknown variable in 0:2\n");
    r.enter("x=1:new:list");
    assert_eq!(exec(&mut r, &c), "");
    assert!(r.listing().is_empty());
    r.enter("print x");
    assert_eq!(exec(&mut r, &c), "Unknown variable in 0:0\n");
}

#[test]
fn test_rem_and_comments() {
    assert_eq!(run("10 rem print 1:print 2\n20 print 3 ' four"), "3\n");
}
