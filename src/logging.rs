use crate::color::{Bg, Colored, ColoredStr, Fg, Flag};
use std::{path::Path, time::Instant};

// main compilation steps (displayed when verbosity level is normal or verbose)
pub(crate) const STEP_PADDING: usize = 9;

pub static CHECKING: ColoredStr =
    Colored { text: "Checking", fg: Fg::LightGreen, bg: Bg::Default, flags: Flag::Bold };
pub static COMPILING: ColoredStr =
    Colored { text: "Compiling", fg: Fg::LightGreen, bg: Bg::Default, flags: Flag::Bold };
pub static RUNNING: ColoredStr =
    Colored { text: "Running", fg: Fg::LightGreen, bg: Bg::Default, flags: Flag::Bold };
pub static DONE: ColoredStr =
    Colored { text: "Done", fg: Fg::LightGreen, bg: Bg::Default, flags: Flag::Bold };

// sub compilation steps (displayed when verbosity level is verbose)
pub(crate) const SUBSTEP_PADDING: usize = 14;

pub static LOADING_SOURCE: ColoredStr =
    Colored { text: "Loading Source", fg: Fg::LightBlue, bg: Bg::Default, flags: Flag::Bold };
pub static TOKENIZATION: ColoredStr =
    Colored { text: "Tokenizing", fg: Fg::LightBlue, bg: Bg::Default, flags: Flag::Bold };
pub static PARSING_AST: ColoredStr =
    Colored { text: "Parsing Ast", fg: Fg::LightBlue, bg: Bg::Default, flags: Flag::Bold };
pub static GENERATING_ASM: ColoredStr =
    Colored { text: "Generating Asm", fg: Fg::LightBlue, bg: Bg::Default, flags: Flag::Bold };
pub static ASSEMBLING: ColoredStr =
    Colored { text: "Assembling", fg: Fg::LightBlue, bg: Bg::Default, flags: Flag::Bold };
pub static LINKING: ColoredStr =
    Colored { text: "Linking", fg: Fg::LightBlue, bg: Bg::Default, flags: Flag::Bold };
pub static SUBSTEP_DONE: ColoredStr =
    Colored { text: "Done", fg: Fg::LightBlue, bg: Bg::Default, flags: Flag::Bold };

// errors
pub static ERROR: ColoredStr =
    Colored { text: "Error", fg: Fg::LightRed, bg: Bg::Default, flags: Flag::Bold };
pub static CAUSE: ColoredStr =
    Colored { text: "Cause", fg: Fg::LightRed, bg: Bg::Default, flags: Flag::Bold };

pub static ASSEMBLING_ERROR: ColoredStr =
    Colored { text: "Assembling Error", fg: Fg::LightRed, bg: Bg::Default, flags: Flag::Bold };
pub static LINKING_ERROR: ColoredStr =
    Colored { text: "Linking Error", fg: Fg::LightRed, bg: Bg::Default, flags: Flag::Bold };
pub static COULD_NOT_RUN_ASSEMBLER: ColoredStr = Colored {
    text: "Could not run assembler",
    fg: Fg::LightRed,
    bg: Bg::Default,
    flags: Flag::Bold,
};
pub static COULD_NOT_RUN_LINKER: ColoredStr =
    Colored { text: "Could not run linker", fg: Fg::LightRed, bg: Bg::Default, flags: Flag::Bold };
pub static COULD_NOT_RUN_EXECUTABLE: ColoredStr = Colored {
    text: "Could not run executable",
    fg: Fg::LightRed,
    bg: Bg::Default,
    flags: Flag::Bold,
};
pub static COULD_NOT_WRITE_COMPILED_CODE: ColoredStr = Colored {
    text: "Could not write compiled code",
    fg: Fg::LightRed,
    bg: Bg::Default,
    flags: Flag::Bold,
};

// help messages
pub(crate) static VERSION: ColoredStr = Colored {
    text: env!("CARGO_PKG_VERSION"),
    fg: Fg::LightGray,
    bg: Bg::Default,
    flags: Flag::Bold,
};
pub(crate) static OPTIONS: ColoredStr =
    Colored { text: "Options", fg: Fg::LightGray, bg: Bg::Default, flags: Flag::Bold };
pub(crate) static RUN_MODE: ColoredStr =
    Colored { text: "Run mode", fg: Fg::LightGray, bg: Bg::Default, flags: Flag::Bold };
pub(crate) static MODE: ColoredStr =
    Colored { text: "mode", fg: Fg::LightGray, bg: Bg::Default, flags: Flag::Bold };
pub(crate) static FILE: ColoredStr =
    Colored { text: "file", fg: Fg::LightGray, bg: Bg::Default, flags: Flag::Bold };
pub(crate) static PATH: ColoredStr =
    Colored { text: "path", fg: Fg::LightGray, bg: Bg::Default, flags: Flag::Bold };
pub(crate) static OUTPUT: ColoredStr =
    Colored { text: "Output", fg: Fg::LightGray, bg: Bg::Default, flags: Flag::Bold };

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    #[default]
    Normal,
    Quiet,
    Verbose,
}

#[allow(non_upper_case_globals)]
static mut verbosity: Verbosity = Verbosity::Normal;

impl Verbosity {
    pub fn set(self) {
        unsafe { verbosity = self };
    }

    fn current() -> Self {
        return unsafe { verbosity };
    }
}

impl core::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        return match self {
            Self::Normal => write!(f, "normal"),
            Self::Quiet => write!(f, "quiet"),
            Self::Verbose => write!(f, "verbose"),
        };
    }
}

/// measures the elapsed time of the step it was created for
#[derive(Debug)]
pub struct Logger {
    start: Instant,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        return Self { start: Instant::now() };
    }

    pub fn info(step: &ColoredStr, path: &Path) {
        match Verbosity::current() {
            Verbosity::Quiet => {}
            Verbosity::Normal | Verbosity::Verbose => {
                eprintln!("{step:>STEP_PADDING$}: {path}", path = path.display());
            }
        }
    }

    pub fn step(&self, step: &ColoredStr, path: Option<&Path>) {
        match Verbosity::current() {
            Verbosity::Quiet => {}
            Verbosity::Normal | Verbosity::Verbose => self.display(step, path, STEP_PADDING, 0),
        }
    }

    pub fn step_done(&self) {
        self.step(&DONE, None);
    }

    pub fn sub_step(&self, sub_step: &ColoredStr, path: Option<&Path>) {
        match Verbosity::current() {
            Verbosity::Quiet | Verbosity::Normal => {}
            Verbosity::Verbose => self.display(sub_step, path, SUBSTEP_PADDING, 4),
        }
    }

    fn display(&self, step: &ColoredStr, path: Option<&Path>, padding: usize, indent: usize) {
        let elapsed = Colored {
            text: format!("{}s", self.start.elapsed().as_secs_f32()),
            fg: Fg::White,
            bg: Bg::Default,
            flags: Flag::Default,
        };

        match path {
            Some(path) => eprintln!(
                "{spaces:indent$}{step:>padding$}: in {elapsed} -> {path}",
                spaces = "",
                path = path.display()
            ),
            None => eprintln!("{spaces:indent$}{step:>padding$}: in {elapsed}", spaces = ""),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        return Self::new();
    }
}
