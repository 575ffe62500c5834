pub mod back_end;
pub mod cli;
pub mod color;
pub mod error;
pub mod front_end;
pub mod logging;

pub use cli::{Args, RunMode};
pub use color::Color;
pub use logging::{
    Logger, Verbosity, ASSEMBLING, ASSEMBLING_ERROR, CHECKING, COMPILING, COULD_NOT_RUN_ASSEMBLER,
    COULD_NOT_RUN_EXECUTABLE, COULD_NOT_RUN_LINKER, COULD_NOT_WRITE_COMPILED_CODE, DONE, ERROR,
    GENERATING_ASM, LINKING, LINKING_ERROR, LOADING_SOURCE, PARSING_AST, RUNNING, SUBSTEP_DONE,
    TOKENIZATION,
};
use logging::{FILE, MODE, OPTIONS, OUTPUT, PATH, RUN_MODE, VERSION};

#[derive(Clone, Copy, Debug)]
pub struct Version;

impl Version {
    pub fn print(color: Color) {
        color.set(&std::io::stdout());
        println!("hylang compiler, version {VERSION}");
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Help;

impl Help {
    pub fn print(color: Color) {
        Version::print(color);

        println!(
            r"
Usage: hy [{OPTIONS}] [{RUN_MODE}]

{OPTIONS}:
-h, --help            Display this message (selected when no other run commands are provided)
-v, --version         Display the compiler version
-c, --color <{MODE}>    Wether to display colored output ({MODE}: auto (default), never, always)
-q, --quiet           Don't display any diagnostic messages
-V, --verbose         Display extra diagnostic messages

{RUN_MODE}:
check    <{FILE}>              Check the source code for correctness
compile  <{FILE}> [{OUTPUT}]     Compile the source code down to an executable
run      <{FILE}> [{OUTPUT}]     Compile and run the generated executable

{OUTPUT}:
-o, --output <{PATH}>       Folder to populate with compilation artifacts (.asm, .o, executable) (default: '.')"
        );
    }
}
