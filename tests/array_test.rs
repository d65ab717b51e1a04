mod common;
use common::*;
use pretty_assertions::assert_eq;

#[test]
fn test_dim_store_fetch() {
    let out = run("
        10 dim a[3]
        20 a[1]=5
        30 print a[1]+1, a[0]
    ");
    assert_eq!(out, "6\n0\n");
}

#[test]
fn test_dim_with_values_is_row_major() {
    let out = run("
        10 dim b.i[2,2] = 1,2,3,4
        20 print b.i[1,0]; b.i[0,1]
    ");
    assert_eq!(out, "32\n");
}

#[test]
fn test_store_runs_from_index() {
    let out = run("
        10 dim a[4]
        20 a[1]=7,8,9
        30 print a[0];a[1];a[2];a[3]
    ");
    assert_eq!(out, "0789\n");
}

#[test]
fn test_subscript_expressions() {
    let out = run("
        10 dim a[5]
        20 i=2:a[i*2]=9
        30 print a[i+2]
    ");
    assert_eq!(out, "9\n");
}

#[test]
fn test_string_array_truncates() {
    let out = run(r#"
        10 dim n$[2,5]
        20 n$[0]="hello world"
        30 n$[1]="hi"
        40 print n$[0]; n$[1]
    "#);
    assert_eq!(out, "hellohi\n");
}

#[test]
fn test_array_errors() {
    assert_eq!(run("10 dim a[3]\n20 print a[3]"), "Array out of range in 20:0\n");
    assert_eq!(run("10 dim a[3]\n20 dim a[2]"), "Array redefinition in 20:0\n");
    assert_eq!(run("10 dim a[3]\n20 print a[1,1]"), "Wrong array dimension in 20:0\n");
    assert_eq!(run("10 dim a[3]\n20 a[1]=\"x\""), "Type mismatch in 20:0\n");
    assert_eq!(run("10 dim a[0]"), "Wrong array dimension in 10:0\n");
    assert_eq!(run("10 dim a[70000]"), "Out of memory in 10:0\n");
    assert_eq!(
        run("10 dim s$[3000000,1]:print \"ok\""),
        "Out of memory in 10:0\n"
    );
}
