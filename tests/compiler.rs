mod common;

use common::compile;
use hylang::{
    back_end::Compiler,
    front_end::{
        ast::{ErrorKind as ParserErrorKind, Parser},
        src_file::SrcFile,
        tokenizer::Tokenizer,
    },
};
use std::collections::HashSet;

/// runs the pipeline expecting a parse failure
fn parse_error(test_name: &str, code: &str) -> ParserErrorKind {
    let src_path = common::write_source(test_name, code);
    let src_file = SrcFile::load(&src_path).unwrap();
    let tokens = Tokenizer::tokenize(&src_file).unwrap();
    return match Parser::parse(&tokens) {
        Ok(_) => panic!("expected a parse error"),
        Err(err) => err.kind,
    };
}

/// runs the pipeline expecting a code generation failure, returning the error
/// rendered to text since its kind borrows the source
fn compile_error(test_name: &str, code: &str) -> String {
    let src_path = common::write_source(test_name, code);
    let src_file = SrcFile::load(&src_path).unwrap();
    let tokens = Tokenizer::tokenize(&src_file).unwrap();
    let ast = Parser::parse(&tokens).unwrap();
    return match Compiler::compile(&ast) {
        Ok(_) => panic!("expected a compilation error"),
        Err(err) => format!("{:?}", err.kind),
    };
}

#[test]
fn empty_program_only_exits() {
    let asm = compile("gen_empty", "");
    assert!(asm.starts_with("global _start"));
    assert!(asm.contains(" mov rax, 60"));
    assert!(asm.contains(" mov rdi, 0"));
    assert!(asm.contains(" syscall"));
    assert!(!asm.contains("section .data"));
}

#[test]
fn arithmetic_precedence() {
    let asm = compile("gen_arithmetic", "let x = 2 + 3 * 4; exit(x);");

    // the multiplication must be lowered before the addition folds it in
    let mul_at = asm.find(" mul rbx").unwrap();
    let add_at = asm.find(" add rax, rbx").unwrap();
    assert!(mul_at < add_at);

    // exit lowers its argument and pops it into rdi
    assert!(asm.contains(" pop rdi"));
}

#[test]
fn division_zeroes_rdx() {
    let asm = compile("gen_division", "let x = (10 - 2 * 3) / 2; exit(x);");
    assert!(asm.contains(
        " xor rdx, rdx\
        \n div rbx"
    ));
}

#[test]
fn comparison_materializes_bool() {
    let asm = compile("gen_comparison", "let x = 1; exit(x == 1);");
    assert!(asm.contains(
        " cmp rax, rbx\
        \n sete al\
        \n movzx rax, al"
    ));
}

#[test]
fn and_is_short_circuiting() {
    let asm = compile("gen_and", "let x = true && false; exit(x);");
    assert!(asm.contains(" je and_0_false"));
    assert!(asm.contains("and_0_end:"));
    // the eager form must not be emitted
    assert!(!asm.contains(" and rax"));
}

#[test]
fn or_is_short_circuiting() {
    let asm = compile("gen_or", "let x = false || true; exit(x);");
    assert!(asm.contains(" jne or_0_true"));
    assert!(asm.contains("or_0_end:"));
    assert!(!asm.contains(" or rax"));
}

#[test]
fn identifier_loads_are_rsp_relative() {
    let asm = compile("gen_identifier", "let x = 1; let y = x; exit(y);");
    assert!(asm.contains(" push QWORD [rsp + 0]"));
}

#[test]
fn scope_exit_pops_locals_in_one_instruction() {
    let asm = compile("gen_scope", "{ let a = 1; let b = 2; } exit(0);");
    assert!(asm.contains(" add rsp, 16"));
}

#[test]
fn empty_scope_pops_nothing() {
    let asm = compile("gen_empty_scope", "{ } exit(0);");
    assert!(!asm.contains(" add rsp, 0"));
}

#[test]
fn assignment_stores_into_the_variable_slot() {
    let asm = compile("gen_assignment", "let i = 0; i = 5; exit(i);");
    assert!(asm.contains(" mov [rsp + 0], rax"));
}

#[test]
fn if_else_chain_shares_one_end_label() {
    let asm = compile(
        "gen_if_chain",
        "let x = 2;\
        \nif (x == 1) { exit(1); }\
        \nelse if x == 2 { exit(2); }\
        \nelse { exit(3); }\
        \nexit(0);",
    );

    assert!(asm.contains("if_0_else_if_1:"));
    assert!(asm.contains("if_0_else:"));
    assert_eq!(asm.matches("if_0_end:").count(), 1);
    assert!(asm.contains(" jmp if_0_end"));
}

#[test]
fn plain_if_tests_and_skips() {
    let asm = compile("gen_plain_if", "let x = 1; if (x == 1) { exit(7); } exit(0);");
    assert!(asm.contains(
        " test rax, rax\
        \n jz if_0_end"
    ));
}

#[test]
fn while_loop_labels() {
    let asm = compile(
        "gen_while",
        "let i = 0; while (i == 0) { i = 1; } exit(i);",
    );
    assert!(asm.contains("loop_0:"));
    assert!(asm.contains(" je loop_0_end"));
    assert!(asm.contains(" jmp loop_0"));
}

#[test]
fn print_string_literal_uses_its_length() {
    let asm = compile("gen_print_str", "print \"hi\\n\"; exit(0);");
    assert!(asm.contains(" str_0: db `hi\\n`, 0"));
    assert!(asm.contains(" str_0_len: equ $ - str_0"));
    assert!(asm.contains(" mov rdi, str_0_len"));
    assert!(asm.contains(" call str_print"));
    assert!(asm.contains("section .data"));
    // no integer printing support should be emitted
    assert!(!asm.contains("int_to_str"));
}

#[test]
fn print_integer_converts_at_runtime() {
    let asm = compile("gen_print_int", "print 42; exit(0);");
    assert!(asm.contains(" call int_print"));
    assert!(asm.contains("int_to_str:"));
    assert!(asm.contains(" int_str: times 64 db 0"));
}

#[test]
fn functions_are_emitted_after_the_exit_sequence() {
    let asm = compile(
        "gen_function",
        "function add(a, b) { return a + b; }\
        \nlet r = add(1, 2);\
        \nexit(r);",
    );

    let exit_at = asm.find(" mov rax, 60").unwrap();
    let function_at = asm.find("fn_add:").unwrap();
    assert!(exit_at < function_at);

    // caller protocol
    assert!(asm.contains(" call fn_add"));
    assert!(asm.contains(" add rsp, 16"));

    // callee protocol
    assert!(asm.contains(
        " push rbp\
        \n mov rbp, rsp"
    ));
    assert!(asm.contains(" push QWORD [rbp + 16]"));
    assert!(asm.contains(" push QWORD [rbp + 24]"));
    assert!(asm.contains(
        " mov rsp, rbp\
        \n pop rbp\
        \n ret"
    ));
}

#[test]
fn every_emitted_label_is_unique() {
    let asm = compile(
        "gen_label_uniqueness",
        "let x = 1;\
        \nif (x == 1) { print 1; } else { print 2; }\
        \nif (x == 2) { print 3; }\
        \nwhile (x == 0) { x = 1; }\
        \nlet y = true && false || true;\
        \nexit(0);",
    );

    let mut seen = HashSet::new();
    for line in asm.lines() {
        let line = line.trim();
        let Some(label) = line.strip_suffix(':') else {
            continue;
        };
        assert!(seen.insert(label.to_owned()), "duplicate label '{label}'");
    }
}

#[test]
fn lowering_is_idempotent() {
    let source = "let x = 1;\
        \nif (x == 1) { print \"yes\\n\"; }\
        \nwhile (x == 0) { x = 1; }\
        \nexit(x);";

    let first = compile("gen_idempotent_a", source);
    let second = compile("gen_idempotent_b", source);
    assert_eq!(first, second);
}

#[test]
fn bare_literal_statement_is_a_no_op() {
    let with_literal = compile("gen_bare_literal_a", "true; exit(0);");
    let without = compile("gen_bare_literal_b", "exit(0);");
    assert_eq!(with_literal, without);
}

#[test]
fn rejects_missing_semicolon() {
    let error = parse_error("parse_no_semi", "let x = 1 exit(x);");
    assert_eq!(error, ParserErrorKind::MissingSemicolon);
}

#[test]
fn rejects_stray_else() {
    let error = parse_error("parse_stray_else", "else { exit(1); }");
    assert_eq!(error, ParserErrorKind::StrayElseBlock);
}

#[test]
fn rejects_exit_without_parenthesis() {
    let error = parse_error("parse_exit_no_paren", "exit 0;");
    assert_eq!(error, ParserErrorKind::MissingOpenRoundBracket { after: "exit" });
}

#[test]
fn rejects_nested_function_definition() {
    let error = parse_error(
        "parse_nested_function",
        "{ function f() { return 0; } } exit(0);",
    );
    assert_eq!(error, ParserErrorKind::NestedFunctionDefinition);
}

#[test]
fn rejects_empty_parenthesis_expression() {
    let error = parse_error("parse_empty_expression", "let x = (); exit(x);");
    assert_eq!(error, ParserErrorKind::EmptyExpression);
}

#[test]
fn rejects_integer_literal_overflow() {
    let error = parse_error("parse_overflow", "exit(99999999999999999999);");
    assert_eq!(error, ParserErrorKind::IntegerLiteralOverflow);
}

#[test]
fn rejects_redeclared_variable() {
    let error = compile_error("sem_redeclared", "let x = 1; let x = 2; exit(x);");
    assert!(error.contains("VariableAlreadyDefined"), "{error}");
}

#[test]
fn rejects_redeclaration_in_nested_scope() {
    let error = compile_error("sem_shadowing", "let x = 1; { let x = 2; } exit(x);");
    assert!(error.contains("VariableAlreadyDefined"), "{error}");
}

#[test]
fn rejects_undeclared_variable() {
    let error = compile_error("sem_undeclared", "exit(x);");
    assert!(error.contains("VariableNotPreviouslyDefined"), "{error}");
}

#[test]
fn rejects_undeclared_assignment_target() {
    let error = compile_error("sem_undeclared_assignment", "x = 1; exit(0);");
    assert!(error.contains("VariableNotPreviouslyDefined"), "{error}");
}

#[test]
fn scoped_variable_dies_with_its_scope() {
    let error = compile_error("sem_out_of_scope", "{ let x = 1; } exit(x);");
    assert!(error.contains("VariableNotPreviouslyDefined"), "{error}");
}

#[test]
fn rejects_call_to_undefined_function() {
    let error = compile_error("sem_undefined_function", "exit(f());");
    assert!(error.contains("FunctionNotPreviouslyDefined"), "{error}");
}

#[test]
fn rejects_wrong_argument_count() {
    let error = compile_error(
        "sem_wrong_arity",
        "function f(a) { return a; } exit(f(1, 2));",
    );
    assert!(error.contains("WrongNumberOfArguments"), "{error}");
}

#[test]
fn rejects_duplicate_function() {
    let error = compile_error(
        "sem_duplicate_function",
        "function f() { return 0; } function f() { return 1; } exit(0);",
    );
    assert!(error.contains("FunctionAlreadyDefined"), "{error}");
}

#[test]
fn rejects_duplicate_parameter() {
    let error = compile_error(
        "sem_duplicate_parameter",
        "function f(a, a) { return a; } exit(0);",
    );
    assert!(error.contains("ParameterAlreadyDefined"), "{error}");
}

#[test]
fn rejects_return_outside_of_function() {
    let error = compile_error("sem_stray_return", "return 0;");
    assert!(error.contains("ReturnOutsideOfFunction"), "{error}");
}
