use hylang::{
    back_end::{artifacts::Artifacts, Compiler},
    front_end::{ast::Parser, src_file::SrcFile, tokenizer::Tokenizer},
};
use std::{fs, path::PathBuf, process::Command};

/// writes the source under the target tmp dir and runs the front end and the
/// code generator on it, panicking on the first compilation error
#[allow(dead_code)]
pub fn compile(test_name: &str, code: &str) -> String {
    let src_path = write_source(test_name, code);

    let src_file = match SrcFile::load(&src_path) {
        Ok(src_file) => src_file,
        Err(err) => panic!("could not load '{}': {err}", src_path.display()),
    };

    let tokens = match Tokenizer::tokenize(&src_file) {
        Ok(tokens) => tokens,
        Err(err) => panic!("tokenization failed: {err}"),
    };

    let ast = match Parser::parse(&tokens) {
        Ok(ast) => ast,
        Err(err) => panic!("parsing failed: {err}"),
    };

    return match Compiler::compile(&ast) {
        Ok(compiled_code) => compiled_code,
        Err(err) => panic!("compilation failed: {err}"),
    };
}

/// compiles, assembles, links and runs the program, returning its exit code
/// and captured stdout
///
/// returns `None` when `nasm` or `ld` are not available, letting callers skip
#[allow(dead_code)]
pub fn run(test_name: &str, code: &str) -> Option<(i32, String)> {
    let src_path = write_source(test_name, code);
    let out_path = src_path.parent().unwrap().to_owned();

    let compiled_code = compile(test_name, code);

    let artifacts = match Artifacts::new(&src_path, Some(out_path.as_path())) {
        Ok(artifacts) => artifacts,
        Err(err) => panic!("could not create artifacts: {err}"),
    };

    if let Err(err) = fs::write(&artifacts.asm_path, compiled_code) {
        panic!("could not write '{}': {err}", artifacts.asm_path.display());
    }

    let assembler_output = match artifacts.assembler().output() {
        Ok(output) => output,
        Err(_) => return None, // nasm not installed
    };
    assert!(
        assembler_output.status.success(),
        "nasm failed:\n{}",
        String::from_utf8_lossy(&assembler_output.stderr)
    );

    let linker_output = match artifacts.linker().output() {
        Ok(output) => output,
        Err(_) => return None, // ld not installed
    };
    assert!(
        linker_output.status.success(),
        "ld failed:\n{}",
        String::from_utf8_lossy(&linker_output.stderr)
    );

    let exe_path = PathBuf::from(".").join(&artifacts.exe_path);
    let run_output = match Command::new(&exe_path).output() {
        Ok(output) => output,
        Err(err) => panic!("could not run '{}': {err}", exe_path.display()),
    };

    let exit_code = run_output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&run_output.stdout).into_owned();
    return Some((exit_code, stdout));
}

#[allow(dead_code)]
pub fn write_source(test_name: &str, code: &str) -> PathBuf {
    let out_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(test_name);
    if let Err(err) = fs::create_dir_all(&out_dir) {
        panic!("could not create '{}': {err}", out_dir.display());
    }

    let src_path = out_dir.join(format!("{test_name}.hy"));
    if let Err(err) = fs::write(&src_path, code) {
        panic!("could not write '{}': {err}", src_path.display());
    }

    return src_path;
}
