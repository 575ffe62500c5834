use hylang::{
    back_end::{artifacts::Artifacts, Compiler},
    error,
    front_end::{ast::Parser, src_file::SrcFile, tokenizer::Tokenizer},
    Args, Help, Logger, RunMode, Version, ASSEMBLING, ASSEMBLING_ERROR, CHECKING, COMPILING,
    COULD_NOT_RUN_ASSEMBLER, COULD_NOT_RUN_EXECUTABLE, COULD_NOT_RUN_LINKER,
    COULD_NOT_WRITE_COMPILED_CODE, GENERATING_ASM, LINKING, LINKING_ERROR, LOADING_SOURCE,
    PARSING_AST, RUNNING, SUBSTEP_DONE, TOKENIZATION,
};
use std::{
    env,
    path::Path,
    process::{Command, ExitCode},
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Check,
    Compile,
    Run,
}

fn main() -> ExitCode {
    let args = match Args::try_from(env::args()) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    args.color.set(&std::io::stderr());
    args.verbosity.set();

    let (src_path, out_path, mode) = match args.run_mode {
        RunMode::Help => {
            Help::print(args.color);
            return ExitCode::SUCCESS;
        }
        RunMode::Version => {
            Version::print(args.color);
            return ExitCode::SUCCESS;
        }
        RunMode::Check { src_path } => (src_path, None, Mode::Check),
        RunMode::Compile { src_path, out_path } => (src_path, out_path, Mode::Compile),
        RunMode::Run { src_path, out_path } => (src_path, out_path, Mode::Run),
    };

    let execution_step = Logger::new();

    Logger::info(&CHECKING, &src_path);
    let checking_sub_step = Logger::new();

    let src_file = {
        let loading_source_sub_step = Logger::new();
        let source_loading_result = SrcFile::load(&src_path);
        loading_source_sub_step.sub_step(&LOADING_SOURCE, None);
        match source_loading_result {
            Ok(src_file) => src_file,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    };

    let tokens = {
        let tokenization_sub_step = Logger::new();
        let tokenization_result = Tokenizer::tokenize(&src_file);
        tokenization_sub_step.sub_step(&TOKENIZATION, None);
        match tokenization_result {
            Ok(tokens) => tokens,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    };

    let ast = {
        let parsing_ast_sub_step = Logger::new();
        let parsing_ast_result = Parser::parse(&tokens);
        parsing_ast_sub_step.sub_step(&PARSING_AST, None);
        match parsing_ast_result {
            Ok(ast) => ast,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    };

    checking_sub_step.sub_step(&SUBSTEP_DONE, None);

    if let Mode::Check = mode {
        execution_step.step_done();
        return ExitCode::SUCCESS;
    }

    let artifacts = match Artifacts::new(&src_path, out_path.as_deref()) {
        Ok(artifacts) => artifacts,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    Logger::info(&COMPILING, &src_path);
    let compilation_sub_step = Logger::new();

    let _compiler_result: () = {
        let generating_asm_sub_step = Logger::new();
        let compilation_result = Compiler::compile(&ast);
        generating_asm_sub_step.sub_step(&GENERATING_ASM, Some(&artifacts.asm_path));
        let compiled_code = match compilation_result {
            Ok(compiled_code) => compiled_code,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        };

        if let Err(err) = std::fs::write(&artifacts.asm_path, compiled_code) {
            let error = error::Msg { kind: &COULD_NOT_WRITE_COMPILED_CODE, message: &err };
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let _assembler_status: () = {
        let assembling_sub_step = Logger::new();
        let mut assembler_command = artifacts.assembler();
        let assembler_result = assembler_command.output();
        assembling_sub_step.sub_step(&ASSEMBLING, Some(&artifacts.obj_path));
        match assembler_result {
            Ok(output) => {
                if !output.status.success() {
                    let error = error::Msg {
                        kind: &ASSEMBLING_ERROR,
                        message: &String::from_utf8_lossy(&output.stderr),
                    };
                    eprintln!("{error}");
                    return match output.status.code() {
                        Some(code) => ExitCode::from(code as u8),
                        None => ExitCode::FAILURE,
                    };
                }
            }
            Err(err) => {
                let error = error::Msg { kind: &COULD_NOT_RUN_ASSEMBLER, message: &err };
                eprintln!("{error}");
                return ExitCode::FAILURE;
            }
        }
    };

    let _linker_status: () = {
        let linking_sub_step = Logger::new();
        let mut linker_command = artifacts.linker();
        let linker_result = linker_command.output();
        linking_sub_step.sub_step(&LINKING, Some(&artifacts.exe_path));
        match linker_result {
            Ok(output) => {
                if !output.status.success() {
                    let error = error::Msg {
                        kind: &LINKING_ERROR,
                        message: &String::from_utf8_lossy(&output.stderr),
                    };
                    eprintln!("{error}");
                    return match output.status.code() {
                        Some(code) => ExitCode::from(code as u8),
                        None => ExitCode::FAILURE,
                    };
                }
            }
            Err(err) => {
                let error = error::Msg { kind: &COULD_NOT_RUN_LINKER, message: &err };
                eprintln!("{error}");
                return ExitCode::FAILURE;
            }
        }
    };

    compilation_sub_step.sub_step(&SUBSTEP_DONE, None);
    execution_step.step_done();

    if let Mode::Compile = mode {
        return ExitCode::SUCCESS;
    }

    let exe_path = Path::new(".").join(&artifacts.exe_path);
    Logger::info(&RUNNING, &exe_path);

    let mut run_command = Command::new(&exe_path);
    return match run_command.status() {
        Ok(status) => match status.code() {
            Some(code) => ExitCode::from(code as u8),
            None => ExitCode::FAILURE,
        },
        Err(err) => {
            let error = error::Msg { kind: &COULD_NOT_RUN_EXECUTABLE, message: &err };
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };
}
