mod common;
use basicd::mach::Runtime;
use common::*;
use pretty_assertions::assert_eq;

#[test]
fn test_input_converts_by_type() {
    let (mut r, c) = Runtime::with_capture();
    c.push_input("bob");
    c.push_input("21");
    r.enter(r#"10 input "name? " n$, a"#);
    r.enter("20 print n$; a*2");
    r.enter("run");
    assert_eq!(exec(&mut r, &c), "name? bob42\n");
}

#[test]
fn test_input_without_a_line_reads_zero() {
    let (mut r, c) = Runtime::with_capture();
    r.enter("input n.i:print n.i");
    assert_eq!(exec(&mut r, &c), "0\n");
}

#[test]
fn test_input_needs_a_variable() {
    let (mut r, c) = Runtime::with_capture();
    r.enter(r#"input "x""#);
    assert_eq!(exec(&mut r, &c), "Missing operand in 0:0\n");
}

#[test]
fn test_sys_spreads_reply_over_variables() {
    let (mut r, c) = Runtime::with_capture();
    c.respond("temp", "T: 21.5, 40");
    r.enter(r#"t=0:h.i=0:sys "temp","t","h.i":print t;" ";h.i"#);
    assert_eq!(exec(&mut r, &c), "21.5 40\n");
    assert_eq!(c.calls(), vec!["sys temp".to_string()]);
}

#[test]
fn test_sys_errors() {
    let (mut r, c) = Runtime::with_capture();
    r.enter(r#"sys "nothing""#);
    assert_eq!(exec(&mut r, &c), "\nSystem call error in 0:0\n");
    c.respond("bad", "E: busy");
    r.enter(r#"sys "bad""#);
    assert_eq!(exec(&mut r, &c), "E: busy\nSystem call error in 0:0\n");
    c.respond("one", "1");
    r.enter(r#"sys "one","q""#);
    assert_eq!(exec(&mut r, &c), "Unknown variable in 0:0\n");
}

#[test]
fn test_list() {
    let (mut r, c) = Runtime::with_capture();
    r.enter(r#"10 IF X>1 THEN PRINT "A""#);
    r.enter("20 print 2");
    r.enter("30 print 3");
    r.enter("list");
    assert_eq!(
        exec(&mut r, &c),
        "10 if X>1 then print \"A\"\n20 print 2\n30 print 3\n"
    );
    r.enter("list 20");
    assert_eq!(exec(&mut r, &c), "20 print 2\n30 print 3\n");
    r.enter("list 10,1");
    assert_eq!(exec(&mut r, &c), "10 if X>1 then print \"A\"\n");
}

#[test]
fn test_save_and_load() {
    let (mut r, c) = Runtime::with_capture();
    r.enter(r#"10 print "hi""#);
    r.enter("20 print 2");
    r.enter(r#"save "x.bas""#);
    assert_eq!(exec(&mut r, &c), "");
    assert_eq!(c.file("x.bas").unwrap(), "10 print \"hi\"\n20 print 2\n");
    r.enter("new");
    assert_eq!(exec(&mut r, &c), "");
    r.enter(r#"load "x.bas""#);
    assert_eq!(exec(&mut r, &c), "");
    r.enter("run");
    assert_eq!(exec(&mut r, &c), "hi\n2\n");
}

#[test]
fn test_load_default_name_and_errors() {
    let (mut r, c) = Runtime::with_capture();
    c.set_file("prog.bas", "# header\n\n10 print 1\n");
    r.enter("load:run");
    assert_eq!(exec(&mut r, &c), "1\n");
    r.enter(r#"load "nope""#);
    assert_eq!(exec(&mut r, &c), "File not found in 0:0\n");
    c.set_file("dup.bas", "40 print 1\n10 print 2\n");
    r.enter(r#"load "dup.bas""#);
    assert_eq!(exec(&mut r, &c), "Duplicate line number in 2:0\n");
    c.set_file("bare.bas", "print 1\n");
    r.enter(r#"load "bare.bas""#);
    assert_eq!(exec(&mut r, &c), "No line number in 1:0\n");
}

#[test]
fn test_load_str_and_save_string() {
    let mut r = Runtime::default();
    assert_eq!(r.load_str("20 b=2\n10 a=1\n").unwrap(), 2);
    assert_eq!(r.save_string(), "10 a=1\n20 b=2\n");
    assert_eq!(r.listing().len(), 2);
}

#[test]
fn test_pause_and_sleep() {
    let (mut r, c) = Runtime::with_capture();
    r.enter("pause:sleep 100:cls");
    assert_eq!(exec(&mut r, &c), "");
    assert_eq!(c.calls(), vec!["sleep 100".to_string(), "cls".to_string()]);
}
