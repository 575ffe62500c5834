// end to end scenarios, assembling with `nasm` and linking with `ld`
//
// every test skips silently when the external toolchain is not installed

mod common;

use common::run;

#[test]
fn exit_code_zero() {
    let Some((exit_code, stdout)) = run("run_exit_zero", "exit(0);") else {
        return;
    };
    assert_eq!(exit_code, 0);
    assert_eq!(stdout, "");
}

#[test]
fn arithmetic_precedence() {
    let Some((exit_code, _)) = run("run_precedence", "let x = 2 + 3 * 4; exit(x);") else {
        return;
    };
    assert_eq!(exit_code, 14);
}

#[test]
fn parenthesized_arithmetic() {
    let Some((exit_code, _)) = run("run_parenthesis", "let x = (10 - 2 * 3) / 2; exit(x);")
    else {
        return;
    };
    assert_eq!(exit_code, 2);
}

#[test]
fn if_taken_branch_exits() {
    let Some((exit_code, _)) =
        run("run_if", "let x = 1; if (x == 1) { exit(7); } exit(0);")
    else {
        return;
    };
    assert_eq!(exit_code, 7);
}

#[test]
fn while_loop_with_assignment_terminates() {
    let Some((exit_code, _)) = run(
        "run_while",
        "let i = 0; while (i == 0) { let j = 1; i = 1; } exit(i);",
    ) else {
        return;
    };
    assert_eq!(exit_code, 1);
}

#[test]
fn print_string_literal() {
    let Some((exit_code, stdout)) = run("run_print_str", "print \"hi\\n\"; exit(0);") else {
        return;
    };
    assert_eq!(exit_code, 0);
    assert_eq!(stdout, "hi\n");
}

#[test]
fn print_integers() {
    let Some((_, stdout)) = run(
        "run_print_int",
        "print 42; print \"\\n\"; print 0; print \"\\n\"; print 0 - 5; print \"\\n\"; exit(0);",
    ) else {
        return;
    };
    assert_eq!(stdout, "42\n0\n-5\n");
}

#[test]
fn else_if_chain_picks_the_matching_branch() {
    let Some((exit_code, _)) = run(
        "run_else_if",
        "let x = 2;\
        \nif (x == 1) { exit(1); }\
        \nelse if x == 2 { exit(2); }\
        \nelse { exit(3); }\
        \nexit(0);",
    ) else {
        return;
    };
    assert_eq!(exit_code, 2);
}

#[test]
fn else_branch_runs_when_nothing_matches() {
    let Some((exit_code, _)) = run(
        "run_else",
        "let x = 9;\
        \nif (x == 1) { exit(1); }\
        \nelse if x == 2 { exit(2); }\
        \nelse { exit(3); }\
        \nexit(0);",
    ) else {
        return;
    };
    assert_eq!(exit_code, 3);
}

#[test]
fn for_loop_counts() {
    let Some((exit_code, _)) = run(
        "run_for",
        "let i = 0;\
        \nlet total = 0;\
        \nfor (i = 0; 10 - i; i = i + 1) { total = total + 2; }\
        \nexit(total);",
    ) else {
        return;
    };
    assert_eq!(exit_code, 20);
}

#[test]
fn nested_scopes_unwind() {
    let Some((exit_code, _)) = run(
        "run_scopes",
        "let x = 1;\
        \n{ let y = 2; { let z = 3; x = x + y + z; } }\
        \nexit(x);",
    ) else {
        return;
    };
    assert_eq!(exit_code, 6);
}

#[test]
fn function_call_returns_a_value() {
    let Some((exit_code, _)) = run(
        "run_function",
        "function add(a, b) { return a + b; }\
        \nlet r = add(40, 2);\
        \nexit(r);",
    ) else {
        return;
    };
    assert_eq!(exit_code, 42);
}

#[test]
fn function_body_falling_off_returns_zero() {
    let Some((exit_code, _)) = run(
        "run_function_fallthrough",
        "function nothing() { let unused = 1; }\
        \nexit(nothing());",
    ) else {
        return;
    };
    assert_eq!(exit_code, 0);
}

#[test]
fn recursion_works() {
    let Some((exit_code, _)) = run(
        "run_recursion",
        "function sum(n) {\
        \n    if (n == 0) { return 0; }\
        \n    return n + sum(n - 1);\
        \n}\
        \nexit(sum(10));",
    ) else {
        return;
    };
    assert_eq!(exit_code, 55);
}

#[test]
fn and_skips_the_right_hand_side() {
    let Some((exit_code, stdout)) = run(
        "run_shortcircuit_and",
        "function touched() { print \"touched\"; return 1; }\
        \nlet x = 0;\
        \nif (x == 1 && touched()) { exit(1); }\
        \nexit(0);",
    ) else {
        return;
    };
    assert_eq!(exit_code, 0);
    assert_eq!(stdout, "", "the right hand side of && must not be evaluated");
}

#[test]
fn or_skips_the_right_hand_side() {
    let Some((exit_code, stdout)) = run(
        "run_shortcircuit_or",
        "function touched() { print \"touched\"; return 1; }\
        \nlet x = 1;\
        \nif (x == 1 || touched()) { exit(4); }\
        \nexit(0);",
    ) else {
        return;
    };
    assert_eq!(exit_code, 4);
    assert_eq!(stdout, "", "the right hand side of || must not be evaluated");
}
