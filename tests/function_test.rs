mod common;
use basicd::mach::Runtime;
use common::*;
use pretty_assertions::assert_eq;

fn eval(s: &str) -> String {
    let (mut r, c) = Runtime::with_capture();
    r.enter(s);
    exec(&mut r, &c)
}

#[test]
fn test_def_fn() {
    let out = run("
        10 def f(x) = x*2
        20 print f(3)+1
    ");
    assert_eq!(out, "7\n");
}

#[test]
fn test_def_fn_called_as_statement_prints() {
    let out = run("
        10 def f(x) = x*2
        20 f(4)
    ");
    assert_eq!(out, "8\n");
}

#[test]
fn test_def_fn_body_keeps_its_own_precedence() {
    let out = run("
        10 def f(x) = x+1
        20 print 2*f(3)
    ");
    assert_eq!(out, "8\n");
}

#[test]
fn test_def_fn_nested_and_multiple_args() {
    let out = run("
        10 def f(x) = x*2
        20 def g(x) = f(x)+1
        30 def h(a,b) = a-b
        40 print g(2), h(10,g(1))
    ");
    assert_eq!(out, "5\n7\n");
}

#[test]
fn test_def_fn_errors() {
    assert_eq!(
        run("10 def r(x)=r(x)\n20 print r(1)"),
        "Stack is full; TOKEN LIST in 20:0\n"
    );
    assert_eq!(
        run("10 def f(x)=1\n20 def f(y)=2"),
        "Function redefinition in 20:0\n"
    );
    assert_eq!(
        run("10 def f(x)=x\n20 print f(1,2)"),
        "Too many arguments in 20:0\n"
    );
    assert_eq!(
        run("10 def f(a,b,c,d)=a"),
        "Too many function arguments in 10:0\n"
    );
}

#[test]
fn test_numeric_functions() {
    assert_eq!(eval("print int(-2.7)"), "-2\n");
    assert_eq!(eval("print abs(-3), sqr(16)"), "3\n4\n");
    assert_eq!(eval("print min(2,5), max(1.5, 2)"), "2\n2\n");
    assert_eq!(eval("print 1+abs(-2)"), "3\n");
    assert_eq!(eval("print rnd(0)"), "0\n");
    assert_eq!(eval("print and#(12,10), sl#(1,4)"), "8\n16\n");
}

#[test]
fn test_conversion_functions() {
    assert_eq!(eval("print hex$(byte(255))"), "ff\n");
    assert_eq!(eval("print word(byte(1), byte(2))"), "258\n");
    assert_eq!(eval(r#"print int("b101")"#), "5\n");
    assert_eq!(eval(r#"print val$(1.5)+"x""#), "1.5x\n");
}

#[test]
fn test_function_arity() {
    assert_eq!(eval("print sin()"), "Missing operand in 0:0\n");
    assert_eq!(eval("print min(1)"), "Too few arguments in 0:0\n");
}

#[test]
fn test_peek_and_poke() {
    assert_eq!(eval("poke(100, 0x12345678):print peek(100)"), "305419896\n");
    assert_eq!(eval("poke(0, byte(7)):peek(0)"), "7\n");
    assert_eq!(eval("print peek(65535)"), "Variable out of range in 0:0\n");
}

#[test]
fn test_inkey() {
    let (mut r, c) = Runtime::with_capture();
    c.push_key(65);
    r.enter("print inkey; inkey");
    assert_eq!(exec(&mut r, &c), "650\n");
}
