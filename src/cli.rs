use crate::{color::Color, error::Msg, logging::ERROR, Verbosity};
use core::fmt::Display;
use std::path::PathBuf;

pub(crate) const SRC_FILE_EXTENSION: &str = "hy";

#[derive(Debug, Default, Clone)]
pub enum RunMode {
    #[default]
    Help,
    Version,
    Check {
        src_path: PathBuf,
    },
    Compile {
        src_path: PathBuf,
        out_path: Option<PathBuf>,
    },
    Run {
        src_path: PathBuf,
        out_path: Option<PathBuf>,
    },
}

#[derive(Debug, Default, Clone)]
pub struct Args {
    pub color: Color,
    pub verbosity: Verbosity,
    pub run_mode: RunMode,
}

impl TryFrom<Vec<String>> for Args {
    type Error = Error;

    fn try_from(args: Vec<String>) -> Result<Self, Self::Error> {
        let args_iter = args.iter();

        // the color mode is selected first so that every following message,
        // error messages included, gets displayed in the chosen mode
        let mut args = args_iter.clone();
        _ = args.next(); // skipping the name of this executable

        Color::Auto.set(&std::io::stderr());
        let mut color: Option<Color> = None;

        while let Some(arg) = args.next() {
            if arg == "-c" || arg == "--color" {
                if let Some(mode) = color {
                    return Err(Error::ColorModeAlreadySelected { mode });
                }

                let Some(mode) = args.next() else {
                    return Err(Error::MissingColorMode);
                };

                color = match mode.as_str() {
                    "auto" => Some(Color::Auto),
                    "always" => Some(Color::Always),
                    "never" => Some(Color::Never),
                    _ => return Err(Error::UnrecognizedColorMode { unrecognized: mode.clone() }),
                };
            }
        }

        let color = color.unwrap_or_default();
        color.set(&std::io::stderr());

        let mut verbosity: Option<Verbosity> = None;
        let mut run_mode: Option<RunMode> = None;

        let mut args = args_iter.clone().peekable();
        _ = args.next(); // skipping the name of this executable

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-q" | "--quiet" | "-V" | "--verbose" => {
                    if let Some(mode) = verbosity {
                        return Err(Error::VerbosityModeAlreadySelected { mode });
                    }

                    verbosity = match arg.as_str() {
                        "-q" | "--quiet" => Some(Verbosity::Quiet),
                        "-V" | "--verbose" => Some(Verbosity::Verbose),
                        _ => unreachable!(),
                    };
                }
                "-h" | "--help" => match run_mode {
                    Some(RunMode::Help) => return Err(Error::HelpCommandAlreadySelected),
                    Some(RunMode::Version) => return Err(Error::HelpAndVersionCommandSelected),
                    _ => run_mode = Some(RunMode::Help),
                },
                "-v" | "--version" => match run_mode {
                    Some(RunMode::Version) => return Err(Error::VersionCommandAlreadySelected),
                    Some(RunMode::Help) => return Err(Error::HelpAndVersionCommandSelected),
                    _ => run_mode = Some(RunMode::Version),
                },
                mode_str @ ("check" | "compile" | "run") => {
                    if let Some(RunMode::Check { .. } | RunMode::Compile { .. } | RunMode::Run { .. }) =
                        run_mode
                    {
                        return Err(Error::RunModeAlreadySelected { mode: mode_str.to_owned() });
                    }

                    let Some(path) = args.next() else {
                        return Err(Error::MissingSourceFilePathForRunMode {
                            mode: mode_str.to_owned(),
                        });
                    };

                    let src_path = PathBuf::from(path);
                    let extension = src_path.extension().unwrap_or_default();
                    if extension != SRC_FILE_EXTENSION {
                        return Err(Error::MustBeAHySourceFile { path: src_path });
                    }

                    let mode = match arg.as_str() {
                        "check" => RunMode::Check { src_path },
                        "compile" | "run" => {
                            let mut out_path: Option<PathBuf> = None;

                            if let Some(out_flag) = args.peek() {
                                if *out_flag == "-o" || *out_flag == "--output" {
                                    _ = args.next();

                                    out_path = match args.next() {
                                        Some(path) => Some(PathBuf::from(path)),
                                        None => {
                                            return Err(Error::MissingOutputFolderPathForRunMode {
                                                mode: mode_str.to_owned(),
                                            })
                                        }
                                    };
                                }
                            }

                            match arg.as_str() {
                                "compile" => RunMode::Compile { src_path, out_path },
                                "run" => RunMode::Run { src_path, out_path },
                                _ => unreachable!(),
                            }
                        }
                        _ => unreachable!(),
                    };

                    if let Some(RunMode::Help | RunMode::Version) = run_mode {
                        // the run mode is still checked for correct usage but ignored when the
                        // help or version command was already selected
                    } else {
                        run_mode = Some(mode);
                    }
                }
                "-o" | "--output" => match args.next() {
                    Some(_) => return Err(Error::StrayOutputFolderPath),
                    None => return Err(Error::MissingOutputFolderPath),
                },
                "-c" | "--color" => {
                    _ = args.next();
                }
                unrecognized => {
                    return Err(Error::UnrecognizedFlag { flag: unrecognized.to_owned() })
                }
            }
        }

        return Ok(Self {
            color,
            verbosity: verbosity.unwrap_or_default(),
            run_mode: run_mode.unwrap_or_default(),
        });
    }
}

impl TryFrom<std::env::Args> for Args {
    type Error = Error;

    fn try_from(args: std::env::Args) -> Result<Self, Self::Error> {
        return Self::try_from(args.collect::<Vec<String>>());
    }
}

#[derive(Debug, Clone)]
pub enum Error {
    ColorModeAlreadySelected { mode: Color },
    MissingColorMode,
    UnrecognizedColorMode { unrecognized: String },

    VerbosityModeAlreadySelected { mode: Verbosity },

    HelpCommandAlreadySelected,
    VersionCommandAlreadySelected,
    HelpAndVersionCommandSelected,

    RunModeAlreadySelected { mode: String },
    MissingSourceFilePathForRunMode { mode: String },
    MustBeAHySourceFile { path: PathBuf },
    MissingOutputFolderPathForRunMode { mode: String },
    MissingOutputFolderPath,
    StrayOutputFolderPath,

    UnrecognizedFlag { flag: String },
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let message = match self {
            Self::ColorModeAlreadySelected { mode } => {
                format!("'{mode}' color mode already selected")
            }
            Self::MissingColorMode => "missing color mode".to_owned(),
            Self::UnrecognizedColorMode { unrecognized } => {
                format!("unrecognized color mode '{unrecognized}'")
            }
            Self::VerbosityModeAlreadySelected { mode } => {
                format!("'{mode}' verbosity mode already selected")
            }
            Self::HelpCommandAlreadySelected => "help command already selected".to_owned(),
            Self::VersionCommandAlreadySelected => "version command already selected".to_owned(),
            Self::HelpAndVersionCommandSelected => {
                "help and version commands cannot be used together".to_owned()
            }
            Self::RunModeAlreadySelected { mode } => format!("'{mode}' run mode already selected"),
            Self::MissingSourceFilePathForRunMode { mode } => {
                format!("missing source file path for '{mode}' mode")
            }
            Self::MustBeAHySourceFile { path } => format!(
                "invalid source file '{path}', must have a '.{SRC_FILE_EXTENSION}' extension",
                path = path.display()
            ),
            Self::MissingOutputFolderPathForRunMode { mode } => {
                format!("missing output folder path for '{mode}' mode")
            }
            Self::MissingOutputFolderPath => "missing output folder path".to_owned(),
            Self::StrayOutputFolderPath => {
                "output folder option can only be used after a 'compile' or 'run' command"
                    .to_owned()
            }
            Self::UnrecognizedFlag { flag } => format!("unrecognized option '{flag}'"),
        };

        let error = Msg { kind: &ERROR, message: &message };
        return write!(f, "{error}");
    }
}

impl std::error::Error for Error {}
