use hylang::{
    cli::{Args, Error, RunMode},
    Color, Verbosity,
};

fn args(arguments: &[&str]) -> Result<Args, Error> {
    let mut argv = vec!["hy".to_owned()];
    argv.extend(arguments.iter().map(|argument| (*argument).to_owned()));
    return Args::try_from(argv);
}

#[test]
fn no_arguments_selects_help() {
    let args = args(&[]).unwrap();
    assert!(matches!(args.run_mode, RunMode::Help));
}

#[test]
fn check_mode_takes_a_source_file() {
    let args = args(&["check", "program.hy"]).unwrap();
    let RunMode::Check { src_path } = args.run_mode else {
        panic!("expected check mode");
    };
    assert_eq!(src_path.to_str().unwrap(), "program.hy");
}

#[test]
fn compile_mode_accepts_an_output_folder() {
    let args = args(&["compile", "program.hy", "-o", "build"]).unwrap();
    let RunMode::Compile { src_path, out_path } = args.run_mode else {
        panic!("expected compile mode");
    };
    assert_eq!(src_path.to_str().unwrap(), "program.hy");
    assert_eq!(out_path.unwrap().to_str().unwrap(), "build");
}

#[test]
fn rejects_non_hy_source_files() {
    let error = args(&["compile", "program.txt"]).unwrap_err();
    assert!(matches!(error, Error::MustBeAHySourceFile { .. }));
}

#[test]
fn rejects_missing_source_file() {
    let error = args(&["run"]).unwrap_err();
    assert!(matches!(error, Error::MissingSourceFilePathForRunMode { .. }));
}

#[test]
fn rejects_unrecognized_flags() {
    let error = args(&["--frobnicate"]).unwrap_err();
    assert!(matches!(error, Error::UnrecognizedFlag { .. }));
}

#[test]
fn color_and_verbosity_flags() {
    let args = args(&["-c", "never", "--quiet", "check", "program.hy"]).unwrap();
    assert!(matches!(args.color, Color::Never));
    assert!(matches!(args.verbosity, Verbosity::Quiet));
}

#[test]
fn rejects_duplicated_run_modes() {
    let error = args(&["check", "a.hy", "compile", "b.hy"]).unwrap_err();
    assert!(matches!(error, Error::RunModeAlreadySelected { .. }));
}
